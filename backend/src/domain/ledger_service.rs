//! Balance queries and withdrawals.
//!
//! The service validates the request shape and delegates the balance check
//! to the repository, which performs check and insert in one per-user
//! critical section.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use rust_decimal::prelude::ToPrimitive;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{LedgerCommand, LedgerQuery, LedgerRepository, LedgerRepositoryError};
use crate::domain::{
    Balance, Error, OperationTimeout, OrderReference, Points, UserId, Withdrawal,
    WithdrawalRequest,
};

/// Ledger service implementing the [`LedgerCommand`] and [`LedgerQuery`]
/// driving ports.
#[derive(Clone)]
pub struct LedgerService<L> {
    ledger: Arc<L>,
    clock: Arc<dyn Clock>,
    timeout: OperationTimeout,
}

impl<L> LedgerService<L> {
    /// Create a new service over `ledger`.
    pub fn new(ledger: Arc<L>, clock: Arc<dyn Clock>, timeout: OperationTimeout) -> Self {
        Self {
            ledger,
            clock,
            timeout,
        }
    }
}

impl<L> LedgerService<L>
where
    L: LedgerRepository,
{
    fn map_ledger_error(error: LedgerRepositoryError) -> Error {
        match error {
            LedgerRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("ledger repository unavailable: {message}"))
            }
            LedgerRepositoryError::Query { message } => {
                Error::internal(format!("ledger repository error: {message}"))
            }
            LedgerRepositoryError::InsufficientFunds { available } => {
                Error::insufficient_funds("insufficient funds").with_details(json!({
                    "available": available.as_decimal().to_f64(),
                }))
            }
            LedgerRepositoryError::UnknownUser { user_id } => {
                Error::unauthorized(format!("user {user_id} is not registered"))
            }
        }
    }

    fn validate(request: WithdrawalRequest) -> Result<(OrderReference, Points), Error> {
        let order_ref = OrderReference::new(&request.order_ref)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let sum = Points::new(request.sum)
            .map_err(|err| Error::invalid_request(format!("invalid sum: {err}")))?;
        if !sum.is_positive() {
            return Err(Error::invalid_request("sum must be greater than zero"));
        }
        Ok((order_ref, sum))
    }
}

#[async_trait]
impl<L> LedgerCommand for LedgerService<L>
where
    L: LedgerRepository,
{
    async fn withdraw(
        &self,
        user: &UserId,
        request: WithdrawalRequest,
    ) -> Result<Withdrawal, Error> {
        let (order_ref, sum) = Self::validate(request)?;
        let withdrawal = Withdrawal::new(*user, order_ref, sum, self.clock.utc());

        self.timeout
            .run(
                "record withdrawal",
                self.ledger.record_withdrawal(&withdrawal),
            )
            .await?
            .map_err(Self::map_ledger_error)?;

        info!(
            %user,
            order_ref = %withdrawal.order_ref,
            sum = %withdrawal.sum,
            "withdrawal recorded"
        );
        Ok(withdrawal)
    }
}

#[async_trait]
impl<L> LedgerQuery for LedgerService<L>
where
    L: LedgerRepository,
{
    async fn balance(&self, user: &UserId) -> Result<Balance, Error> {
        self.timeout
            .run("derive balance", self.ledger.balance(user))
            .await?
            .map_err(Self::map_ledger_error)
    }

    async fn list_withdrawals(&self, user: &UserId) -> Result<Vec<Withdrawal>, Error> {
        self.timeout
            .run("list withdrawals", self.ledger.list_withdrawals(user))
            .await?
            .map_err(Self::map_ledger_error)
    }
}

#[cfg(test)]
#[path = "ledger_service_tests.rs"]
mod tests;
