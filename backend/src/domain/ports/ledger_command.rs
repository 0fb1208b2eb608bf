//! Driving port for spending accrued points.

use async_trait::async_trait;

use crate::domain::{Error, UserId, Withdrawal, WithdrawalRequest};

/// Withdrawal use-case.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerCommand: Send + Sync {
    /// Debit `request.sum` from `user`'s balance.
    ///
    /// Fails with `InsufficientFunds` when the balance does not cover the sum
    /// and with `InvalidRequest` when the reference or sum is malformed.
    async fn withdraw(&self, user: &UserId, request: WithdrawalRequest)
    -> Result<Withdrawal, Error>;
}
