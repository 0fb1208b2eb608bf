//! Orders and their settlement lifecycle.
//!
//! ```text
//! NEW ──► PROCESSING ──► PROCESSED (accrual set)
//!  │           │
//!  └───────────┴───────► INVALID
//! ```
//!
//! `PROCESSED` and `INVALID` are terminal. Only `PROCESSED` orders carry an
//! accrual, and only those contribute to a balance.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{OrderNumber, Points, UserId};

/// Settlement status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Submitted, not yet picked up by the accrual processor.
    New,
    /// The accrual processor is working on it.
    Processing,
    /// Rejected by the accrual processor; never accrues.
    Invalid,
    /// Settled with an accrual amount.
    Processed,
}

impl OrderStatus {
    /// Stable wire and storage spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Processing => "PROCESSING",
            Self::Invalid => "INVALID",
            Self::Processed => "PROCESSED",
        }
    }

    /// Whether no further transitions are allowed.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Invalid | Self::Processed)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status: {value}")]
pub struct UnknownOrderStatus {
    /// The rejected input.
    pub value: String,
}

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(Self::New),
            "PROCESSING" => Ok(Self::Processing),
            "INVALID" => Ok(Self::Invalid),
            "PROCESSED" => Ok(Self::Processed),
            other => Err(UnknownOrderStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// A submitted purchase order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Globally unique order number.
    pub number: OrderNumber,
    /// The user who first submitted the number; never changes.
    pub owner: UserId,
    /// Current settlement status.
    pub status: OrderStatus,
    /// Points credited; present only when `status` is `PROCESSED`.
    pub accrual: Option<Points>,
    /// When the order was first accepted.
    pub uploaded_at: DateTime<Utc>,
}

impl Order {
    /// A freshly submitted order in the `NEW` state.
    pub fn submitted(number: OrderNumber, owner: UserId, uploaded_at: DateTime<Utc>) -> Self {
        Self {
            number,
            owner,
            status: OrderStatus::New,
            accrual: None,
            uploaded_at,
        }
    }

    /// Whether `user` owns this order.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner == user
    }

    /// Points this order contributes to its owner's balance.
    pub fn credited_points(&self) -> Points {
        match (self.status, self.accrual) {
            (OrderStatus::Processed, Some(accrual)) => accrual,
            _ => Points::ZERO,
        }
    }

    /// Apply a settlement report, returning whether the order changed.
    ///
    /// Terminal orders are left untouched.
    pub fn apply(&mut self, settlement: &Settlement) -> SettlementOutcome {
        if self.status.is_terminal() {
            return SettlementOutcome::AlreadySettled {
                status: self.status,
            };
        }
        self.status = settlement.status();
        self.accrual = settlement.accrual();
        SettlementOutcome::Applied {
            status: self.status,
        }
    }
}

/// A status report from the accrual processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Processing started.
    Processing,
    /// Settled with the given (possibly zero) accrual.
    Processed {
        /// Points credited to the owner.
        accrual: Points,
    },
    /// Rejected; no accrual.
    Invalid,
}

/// Error raised when a settlement report is inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettlementError {
    /// `NEW` is an initial state, not something that can be reported.
    #[error("status NEW cannot be reported")]
    NewIsNotReportable,
    /// A `PROCESSED` report must carry an accrual.
    #[error("PROCESSED reports require an accrual")]
    MissingAccrual,
    /// Only `PROCESSED` reports may carry an accrual.
    #[error("{status} reports must not carry an accrual")]
    UnexpectedAccrual {
        /// The reported status.
        status: OrderStatus,
    },
}

impl Settlement {
    /// Build a settlement from a reported status and optional accrual.
    pub fn from_report(
        status: OrderStatus,
        accrual: Option<Points>,
    ) -> Result<Self, SettlementError> {
        match (status, accrual) {
            (OrderStatus::New, _) => Err(SettlementError::NewIsNotReportable),
            (OrderStatus::Processed, Some(accrual)) => Ok(Self::Processed { accrual }),
            (OrderStatus::Processed, None) => Err(SettlementError::MissingAccrual),
            (status, Some(_)) => Err(SettlementError::UnexpectedAccrual { status }),
            (OrderStatus::Processing, None) => Ok(Self::Processing),
            (OrderStatus::Invalid, None) => Ok(Self::Invalid),
        }
    }

    /// Status the order moves to.
    pub fn status(&self) -> OrderStatus {
        match self {
            Self::Processing => OrderStatus::Processing,
            Self::Processed { .. } => OrderStatus::Processed,
            Self::Invalid => OrderStatus::Invalid,
        }
    }

    /// Accrual recorded with the transition.
    pub fn accrual(&self) -> Option<Points> {
        match self {
            Self::Processed { accrual } => Some(*accrual),
            Self::Processing | Self::Invalid => None,
        }
    }
}

/// Result of applying a settlement to a stored order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementOutcome {
    /// The order moved to `status`.
    Applied {
        /// New status.
        status: OrderStatus,
    },
    /// The order was already terminal; nothing changed.
    AlreadySettled {
        /// The terminal status found.
        status: OrderStatus,
    },
}
