//! Applies settlement reports from the accrual system.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{OrderRepository, OrderRepositoryError, SettlementCommand};
use crate::domain::{Error, OperationTimeout, OrderNumber, Settlement, SettlementOutcome};

/// Settlement service implementing the [`SettlementCommand`] driving port.
#[derive(Clone)]
pub struct SettlementService<R> {
    orders: Arc<R>,
    timeout: OperationTimeout,
}

impl<R> SettlementService<R> {
    /// Create a new service over `orders`.
    pub fn new(orders: Arc<R>, timeout: OperationTimeout) -> Self {
        Self { orders, timeout }
    }
}

impl<R> SettlementService<R>
where
    R: OrderRepository,
{
    fn map_repository_error(error: OrderRepositoryError) -> Error {
        match error {
            OrderRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("order repository unavailable: {message}"))
            }
            OrderRepositoryError::Query { message } => {
                Error::internal(format!("order repository error: {message}"))
            }
            OrderRepositoryError::NotFound { number } => {
                Error::not_found(format!("order {number} not found"))
            }
            OrderRepositoryError::Conflict { number } => {
                Error::internal(format!("unexpected conflict settling order {number}"))
            }
            OrderRepositoryError::UnknownOwner { user_id } => {
                Error::internal(format!("order owner {user_id} vanished during settlement"))
            }
        }
    }
}

#[async_trait]
impl<R> SettlementCommand for SettlementService<R>
where
    R: OrderRepository,
{
    async fn apply_settlement(
        &self,
        number: &OrderNumber,
        settlement: Settlement,
    ) -> Result<SettlementOutcome, Error> {
        let outcome = self
            .timeout
            .run(
                "apply settlement",
                self.orders.update_settlement(number, &settlement),
            )
            .await?
            .map_err(Self::map_repository_error)?;

        match outcome {
            SettlementOutcome::Applied { status } => {
                info!(order = %number, %status, accrual = ?settlement.accrual(), "order settled");
            }
            SettlementOutcome::AlreadySettled { status } => {
                debug!(order = %number, %status, "ignoring report for terminal order");
            }
        }
        Ok(outcome)
    }
}
