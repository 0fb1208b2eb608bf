//! Driving port for order submission and order history.

use async_trait::async_trait;

use crate::domain::{Error, Order, UserId};

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOrderOutcome {
    /// The order was new and has been stored in the `NEW` state.
    Accepted(Order),
    /// The caller already owns this order; nothing changed.
    AlreadyOwned(Order),
}

impl SubmitOrderOutcome {
    /// The stored order, whichever way the submission resolved.
    pub fn order(&self) -> &Order {
        match self {
            Self::Accepted(order) | Self::AlreadyOwned(order) => order,
        }
    }
}

/// Order intake use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderIntake: Send + Sync {
    /// Submit `raw_number` on behalf of `user`.
    ///
    /// Fails with `InvalidOrderNumber` when the Luhn check fails and with
    /// `Conflict` when another user already owns the number.
    async fn submit_order(&self, user: &UserId, raw_number: &str)
    -> Result<SubmitOrderOutcome, Error>;

    /// Orders owned by `user`, newest first.
    async fn list_orders(&self, user: &UserId) -> Result<Vec<Order>, Error>;
}
