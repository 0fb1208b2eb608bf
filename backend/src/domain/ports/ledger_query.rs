//! Driving port for balance and withdrawal history reads.

use async_trait::async_trait;

use crate::domain::{Balance, Error, UserId, Withdrawal};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// Current and lifetime-withdrawn points for `user`.
    async fn balance(&self, user: &UserId) -> Result<Balance, Error>;

    /// Withdrawals by `user`, newest first.
    async fn list_withdrawals(&self, user: &UserId) -> Result<Vec<Withdrawal>, Error>;
}
