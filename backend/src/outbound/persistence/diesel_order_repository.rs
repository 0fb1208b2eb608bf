//! PostgreSQL-backed `OrderRepository` implementation using Diesel ORM.
//!
//! The primary key on `orders.number` is the uniqueness guarantee: of any
//! set of concurrent inserts for one number exactly one succeeds, and the
//! rest surface as [`OrderRepositoryError::Conflict`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{OrderRepository, OrderRepositoryError};
use crate::domain::{
    Order, OrderNumber, OrderStatus, Points, Settlement, SettlementOutcome, UserId,
};

use super::diesel_helpers::{
    DieselFailure, classify_diesel_error, collect_rows, map_pool_error_message,
};
use super::models::{NewOrderRow, OrderRow};
use super::pool::{DbPool, PoolError};
use super::schema::orders;

/// Statuses a settlement report may still move an order out of.
const OPEN_STATUSES: [&str; 2] = ["NEW", "PROCESSING"];

/// Diesel-backed implementation of the [`OrderRepository`] port.
#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> OrderRepositoryError {
    OrderRepositoryError::connection(map_pool_error_message(error))
}

fn map_failure(failure: DieselFailure) -> OrderRepositoryError {
    match failure {
        DieselFailure::UniqueViolation { constraint } => OrderRepositoryError::query(format!(
            "unexpected unique violation on {}",
            constraint.as_deref().unwrap_or("unknown constraint")
        )),
        DieselFailure::ForeignKeyViolation => {
            OrderRepositoryError::query("order owner is not a registered user")
        }
        DieselFailure::Connection => OrderRepositoryError::connection("database connection error"),
        DieselFailure::Query { message } => OrderRepositoryError::query(message),
    }
}

fn map_diesel_error(error: diesel::result::Error, operation: &'static str) -> OrderRepositoryError {
    map_failure(classify_diesel_error(error, operation))
}

fn map_row(row: OrderRow) -> Result<Order, OrderRepositoryError> {
    row.into_order().map_err(OrderRepositoryError::query)
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn find_by_number(
        &self,
        number: &OrderNumber,
    ) -> Result<Option<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<OrderRow> = orders::table
            .filter(orders::number.eq(number.as_str()))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find order"))?;

        row.map(map_row).transpose()
    }

    async fn create(&self, order: &Order) -> Result<(), OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(orders::table)
            .values(&NewOrderRow::from(order))
            .execute(&mut conn)
            .await
            .map_err(|err| match classify_diesel_error(err, "create order") {
                DieselFailure::UniqueViolation { .. } => {
                    OrderRepositoryError::conflict(order.number.as_str())
                }
                DieselFailure::ForeignKeyViolation => {
                    OrderRepositoryError::unknown_owner(order.owner.to_string())
                }
                other => map_failure(other),
            })?;
        Ok(())
    }

    async fn update_settlement(
        &self,
        number: &OrderNumber,
        settlement: &Settlement,
    ) -> Result<SettlementOutcome, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let status = settlement.status();

        // The status guard makes terminal rows immune to late reports.
        let updated = diesel::update(
            orders::table
                .filter(orders::number.eq(number.as_str()))
                .filter(orders::status.eq_any(OPEN_STATUSES)),
        )
        .set((
            orders::status.eq(status.as_str()),
            orders::accrual.eq(settlement.accrual().map(Points::as_decimal)),
        ))
        .execute(&mut conn)
        .await
        .map_err(|err| map_diesel_error(err, "apply settlement"))?;

        if updated > 0 {
            return Ok(SettlementOutcome::Applied { status });
        }

        let current: Option<String> = orders::table
            .filter(orders::number.eq(number.as_str()))
            .select(orders::status)
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "read order status"))?;

        match current {
            None => Err(OrderRepositoryError::not_found(number.as_str())),
            Some(raw) => {
                let status = raw
                    .parse::<OrderStatus>()
                    .map_err(|err| OrderRepositoryError::query(err.to_string()))?;
                Ok(SettlementOutcome::AlreadySettled { status })
            }
        }
    }

    async fn list_by_user(&self, user: &UserId) -> Result<Vec<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<OrderRow> = orders::table
            .filter(orders::user_id.eq(user.as_uuid()))
            .order_by((orders::uploaded_at.desc(), orders::number.desc()))
            .select(OrderRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list orders"))?;

        collect_rows(rows.into_iter().map(OrderRow::into_order), |message| {
            OrderRepositoryError::query(message)
        })
    }
}
