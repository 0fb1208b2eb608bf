//! Port for order persistence.
//!
//! Adapters own the uniqueness guarantee: two concurrent `create` calls for
//! the same number must resolve to exactly one stored row, with the loser
//! observing [`OrderRepositoryError::Conflict`].

use async_trait::async_trait;

use crate::domain::{Order, OrderNumber, Settlement, SettlementOutcome, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by order repository adapters.
    pub enum OrderRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "order repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "order repository query failed: {message}",
        /// Another row already holds this order number.
        Conflict { number: String } => "order {number} already exists",
        /// No order with this number is stored.
        NotFound { number: String } => "order {number} not found",
        /// The order's owner is not a registered user.
        UnknownOwner { user_id: String } => "user {user_id} is not registered",
    }
}

/// Storage for submitted orders.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Look up an order by its number.
    async fn find_by_number(
        &self,
        number: &OrderNumber,
    ) -> Result<Option<Order>, OrderRepositoryError>;

    /// Insert a new order; fails with `Conflict` if the number is taken.
    async fn create(&self, order: &Order) -> Result<(), OrderRepositoryError>;

    /// Apply a settlement report to a non-terminal order.
    ///
    /// Terminal orders are left untouched and reported as
    /// [`SettlementOutcome::AlreadySettled`].
    async fn update_settlement(
        &self,
        number: &OrderNumber,
        settlement: &Settlement,
    ) -> Result<SettlementOutcome, OrderRepositoryError>;

    /// All orders owned by `user`, newest first.
    async fn list_by_user(&self, user: &UserId) -> Result<Vec<Order>, OrderRepositoryError>;
}

/// Fixture implementation for tests that do not touch order storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOrderRepository;

#[async_trait]
impl OrderRepository for FixtureOrderRepository {
    async fn find_by_number(
        &self,
        _number: &OrderNumber,
    ) -> Result<Option<Order>, OrderRepositoryError> {
        Ok(None)
    }

    async fn create(&self, _order: &Order) -> Result<(), OrderRepositoryError> {
        Ok(())
    }

    async fn update_settlement(
        &self,
        number: &OrderNumber,
        _settlement: &Settlement,
    ) -> Result<SettlementOutcome, OrderRepositoryError> {
        Err(OrderRepositoryError::not_found(number.as_str()))
    }

    async fn list_by_user(&self, _user: &UserId) -> Result<Vec<Order>, OrderRepositoryError> {
        Ok(Vec::new())
    }
}
