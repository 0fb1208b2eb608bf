//! Balance accounting over accruals and withdrawals.
//!
//! A balance is never stored. It is derived on demand:
//!
//! ```text
//! withdrawn = Σ withdrawal.sum
//! current   = Σ accrual of PROCESSED orders − withdrawn
//! ```
//!
//! `current` must never be negative; a derivation that would produce a
//! negative balance is reported as [`LedgerError::Overdrawn`].

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Order, Points, PointsError, UserId};

/// Longest withdrawal order reference accepted.
pub const ORDER_REFERENCE_MAX_LEN: usize = 255;

/// Errors raised while deriving a balance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Withdrawals exceed accruals; the store is inconsistent.
    #[error("withdrawn total {withdrawn} exceeds accrued total {accrued}")]
    Overdrawn {
        /// Sum of processed accruals.
        accrued: Points,
        /// Sum of withdrawals.
        withdrawn: Points,
    },
    /// A running total could not be represented.
    #[error("ledger arithmetic failed: {0}")]
    Arithmetic(#[from] PointsError),
}

/// A user's derived balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Balance {
    /// Points available to withdraw.
    pub current: Points,
    /// Lifetime total withdrawn.
    pub withdrawn: Points,
}

impl Balance {
    /// Build a balance from aggregate totals.
    pub fn from_totals(accrued: Points, withdrawn: Points) -> Result<Self, LedgerError> {
        let current = accrued
            .checked_sub(withdrawn)
            .map_err(|_| LedgerError::Overdrawn { accrued, withdrawn })?;
        Ok(Self { current, withdrawn })
    }

    /// Derive a balance from a user's orders and withdrawals.
    ///
    /// Orders that are not `PROCESSED` contribute nothing.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use loyalty_backend::domain::{
    ///     Balance, Order, OrderNumber, OrderReference, Settlement, UserId, Withdrawal,
    /// };
    ///
    /// let user = UserId::random();
    /// let mut order = Order::submitted(OrderNumber::parse("79927398713").unwrap(), user, Utc::now());
    /// order.apply(&Settlement::Processed { accrual: "10.50".parse().unwrap() });
    /// let spent = Withdrawal::new(user, OrderReference::new("2377225624").unwrap(), "3".parse().unwrap(), Utc::now());
    ///
    /// let balance = Balance::accumulate([&order], [&spent]).unwrap();
    /// assert_eq!(balance.current.to_string(), "7.50");
    /// ```
    pub fn accumulate<'a>(
        orders: impl IntoIterator<Item = &'a Order>,
        withdrawals: impl IntoIterator<Item = &'a Withdrawal>,
    ) -> Result<Self, LedgerError> {
        let accrued = orders
            .into_iter()
            .try_fold(Points::ZERO, |total, order| {
                total.checked_add(order.credited_points())
            })?;
        let withdrawn = withdrawals
            .into_iter()
            .try_fold(Points::ZERO, |total, withdrawal| {
                total.checked_add(withdrawal.sum)
            })?;
        Self::from_totals(accrued, withdrawn)
    }

    /// Whether a withdrawal of `sum` keeps the balance non-negative.
    pub fn admits(&self, sum: Points) -> bool {
        sum <= self.current
    }
}

/// Free-form reference to the order a withdrawal pays for.
///
/// The reference is not required to exist as a stored order, nor to belong
/// to the withdrawing user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderReference(String);

/// Validation errors for [`OrderReference`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderReferenceError {
    /// The reference was blank.
    #[error("order reference must not be empty")]
    Empty,
    /// The reference exceeded [`ORDER_REFERENCE_MAX_LEN`] characters.
    #[error("order reference must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

impl OrderReference {
    /// Trim and validate a reference.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, OrderReferenceError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(OrderReferenceError::Empty);
        }
        if trimmed.chars().count() > ORDER_REFERENCE_MAX_LEN {
            return Err(OrderReferenceError::TooLong {
                max: ORDER_REFERENCE_MAX_LEN,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the reference.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for OrderReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<OrderReference> for String {
    fn from(value: OrderReference) -> Self {
        value.0
    }
}

impl TryFrom<String> for OrderReference {
    type Error = OrderReferenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// An immutable debit against a user's balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Withdrawal {
    /// Ledger entry identifier.
    pub id: Uuid,
    /// The withdrawing user.
    pub owner: UserId,
    /// Order the points are spent on.
    pub order_ref: OrderReference,
    /// Amount debited; always positive.
    pub sum: Points,
    /// When the withdrawal was admitted.
    pub processed_at: DateTime<Utc>,
}

impl Withdrawal {
    /// Create a new ledger entry with a fresh identifier.
    pub fn new(
        owner: UserId,
        order_ref: OrderReference,
        sum: Points,
        processed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            order_ref,
            sum,
            processed_at,
        }
    }
}

/// Unvalidated withdrawal request as received from a driving adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalRequest {
    /// Order reference as submitted.
    pub order_ref: String,
    /// Requested sum.
    pub sum: Decimal,
}
