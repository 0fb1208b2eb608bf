//! Port for balance derivation and withdrawal persistence.

use async_trait::async_trait;

use crate::domain::{Balance, Points, UserId, Withdrawal};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ledger repository adapters.
    pub enum LedgerRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "ledger repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "ledger repository query failed: {message}",
        /// The withdrawal exceeds the current balance.
        InsufficientFunds { available: Points } => "insufficient funds: {available} available",
        /// The withdrawing user is not registered.
        UnknownUser { user_id: String } => "user {user_id} is not registered",
    }
}

/// Ledger reads and the atomic withdrawal write.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Derive the current balance for `user`.
    async fn balance(&self, user: &UserId) -> Result<Balance, LedgerRepositoryError>;

    /// Record `withdrawal` if the owner's balance covers it.
    ///
    /// The balance check and the insert happen as one critical section per
    /// user: of any set of concurrent withdrawals whose combined sum exceeds
    /// the balance, only those that fit are admitted.
    async fn record_withdrawal(&self, withdrawal: &Withdrawal)
    -> Result<(), LedgerRepositoryError>;

    /// All withdrawals by `user`, newest first.
    async fn list_withdrawals(
        &self,
        user: &UserId,
    ) -> Result<Vec<Withdrawal>, LedgerRepositoryError>;
}

/// Fixture implementation backed by an always-empty ledger.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLedgerRepository;

#[async_trait]
impl LedgerRepository for FixtureLedgerRepository {
    async fn balance(&self, _user: &UserId) -> Result<Balance, LedgerRepositoryError> {
        Ok(Balance::default())
    }

    async fn record_withdrawal(
        &self,
        _withdrawal: &Withdrawal,
    ) -> Result<(), LedgerRepositoryError> {
        Err(LedgerRepositoryError::insufficient_funds(Points::ZERO))
    }

    async fn list_withdrawals(
        &self,
        _user: &UserId,
    ) -> Result<Vec<Withdrawal>, LedgerRepositoryError> {
        Ok(Vec::new())
    }
}
