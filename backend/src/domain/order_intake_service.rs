//! Order intake: Luhn validation, ownership resolution, and accrual hand-off.
//!
//! Submission is decided by the stored state of the number:
//!
//! | stored owner   | outcome                          |
//! |----------------|----------------------------------|
//! | none           | `Accepted`, accrual notified     |
//! | the caller     | `AlreadyOwned`, nothing changes  |
//! | someone else   | `Conflict` error                 |
//!
//! The uniqueness guarantee lives in the repository. When two callers race
//! past the initial lookup, the loser's insert fails with a conflict and the
//! stored row is re-read to decide between `AlreadyOwned` and `Conflict`.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AccrualNotifier, OrderIntake, OrderRepository, OrderRepositoryError, SubmitOrderOutcome,
};
use crate::domain::{Error, OperationTimeout, Order, OrderNumber, TraceId, UserId};

/// Order intake service implementing the [`OrderIntake`] driving port.
#[derive(Clone)]
pub struct OrderIntakeService<R> {
    orders: Arc<R>,
    notifier: Arc<dyn AccrualNotifier>,
    clock: Arc<dyn Clock>,
    timeout: OperationTimeout,
}

impl<R> OrderIntakeService<R> {
    /// Create a new service.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use loyalty_backend::domain::OperationTimeout;
    /// # use loyalty_backend::domain::ports::{FixtureAccrualNotifier, FixtureOrderRepository};
    /// # use mockable::DefaultClock;
    /// let service = loyalty_backend::domain::OrderIntakeService::new(
    ///     Arc::new(FixtureOrderRepository),
    ///     Arc::new(FixtureAccrualNotifier),
    ///     Arc::new(DefaultClock),
    ///     OperationTimeout::default(),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(
        orders: Arc<R>,
        notifier: Arc<dyn AccrualNotifier>,
        clock: Arc<dyn Clock>,
        timeout: OperationTimeout,
    ) -> Self {
        Self {
            orders,
            notifier,
            clock,
            timeout,
        }
    }
}

impl<R> OrderIntakeService<R>
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
            OrderRepositoryError::Conflict { number } => {
                Error::conflict(format!("order {number} was uploaded by another user"))
            }
            OrderRepositoryError::NotFound { number } => {
                Error::internal(format!("order {number} vanished during intake"))
            }
            OrderRepositoryError::UnknownOwner { user_id } => {
                Error::unauthorized(format!("user {user_id} is not registered"))
            }
        }
    }

    async fn find(&self, number: &OrderNumber) -> Result<Option<Order>, Error> {
        self.timeout
            .run("find order", self.orders.find_by_number(number))
            .await?
            .map_err(Self::map_repository_error)
    }

    fn resolve_existing(user: &UserId, existing: Order) -> Result<SubmitOrderOutcome, Error> {
        if existing.is_owned_by(user) {
            debug!(order = %existing.number, %user, "order already uploaded by caller");
            Ok(SubmitOrderOutcome::AlreadyOwned(existing))
        } else {
            Err(Error::conflict(format!(
                "order {} was uploaded by another user",
                existing.number
            )))
        }
    }

    /// Hand the number to the accrual system without waiting for it.
    ///
    /// Failures are logged; the order stays accepted either way.
    fn notify_accrual(&self, number: OrderNumber) {
        let notifier = Arc::clone(&self.notifier);
        TraceId::spawn_detached(async move {
            if let Err(err) = notifier.notify(&number).await {
                warn!(order = %number, error = %err, "accrual notification failed");
            }
        });
    }
}

#[async_trait]
impl<R> OrderIntake for OrderIntakeService<R>
where
    R: OrderRepository,
{
    async fn submit_order(
        &self,
        user: &UserId,
        raw_number: &str,
    ) -> Result<SubmitOrderOutcome, Error> {
        let number = OrderNumber::parse(raw_number)
            .map_err(|err| Error::invalid_order_number(err.to_string()))?;

        if let Some(existing) = self.find(&number).await? {
            return Self::resolve_existing(user, existing);
        }

        let order = Order::submitted(number, *user, self.clock.utc());
        let created = self
            .timeout
            .run("create order", self.orders.create(&order))
            .await?;
        match created {
            Ok(()) => {}
            Err(OrderRepositoryError::Conflict { number }) => {
                debug!(order = %number, "lost order creation race; re-reading owner");
                let winner = self.find(&order.number).await?.ok_or_else(|| {
                    Error::internal(format!("order {number} conflicted but is not stored"))
                })?;
                return Self::resolve_existing(user, winner);
            }
            Err(err) => return Err(Self::map_repository_error(err)),
        }

        info!(order = %order.number, %user, "order accepted");
        self.notify_accrual(order.number.clone());
        Ok(SubmitOrderOutcome::Accepted(order))
    }

    async fn list_orders(&self, user: &UserId) -> Result<Vec<Order>, Error> {
        self.timeout
            .run("list orders", self.orders.list_by_user(user))
            .await?
            .map_err(Self::map_repository_error)
    }
}

#[cfg(test)]
#[path = "order_intake_service_tests.rs"]
mod tests;
