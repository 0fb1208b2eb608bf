//! PostgreSQL-backed `LedgerRepository` implementation.
//!
//! Balances are aggregated in SQL on every read. Withdrawals serialise per
//! user by taking a row lock on the owner's `users` row; the balance is then
//! recomputed and the insert performed inside the same transaction, so two
//! concurrent withdrawals can never both observe the pre-withdrawal balance.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Uuid as SqlUuid;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{LedgerRepository, LedgerRepositoryError};
use crate::domain::{Balance, Points, UserId, Withdrawal};

use super::diesel_helpers::{
    DieselFailure, classify_diesel_error, collect_rows, map_pool_error_message,
};
use super::models::{LedgerTotalsRow, NewWithdrawalRow, WithdrawalRow};
use super::pool::{DbPool, PoolError};
use super::schema::{users, withdrawals};

const LEDGER_TOTALS_SQL: &str = r#"
SELECT
    COALESCE(
        (SELECT SUM(accrual) FROM orders WHERE user_id = $1 AND status = 'PROCESSED'),
        0
    )::NUMERIC AS accrued,
    COALESCE(
        (SELECT SUM(sum) FROM withdrawals WHERE user_id = $1),
        0
    )::NUMERIC AS withdrawn
"#;

/// Diesel-backed implementation of the [`LedgerRepository`] port.
#[derive(Clone)]
pub struct DieselLedgerRepository {
    pool: DbPool,
}

impl DieselLedgerRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure modes inside the withdrawal transaction.
#[derive(Debug)]
enum WithdrawalTxError {
    Diesel(diesel::result::Error),
    UnknownUser,
    Insufficient(Points),
    Inconsistent(String),
}

impl From<diesel::result::Error> for WithdrawalTxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

fn map_pool_error(error: PoolError) -> LedgerRepositoryError {
    LedgerRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, operation: &'static str) -> LedgerRepositoryError {
    match classify_diesel_error(error, operation) {
        DieselFailure::Connection => LedgerRepositoryError::connection("database connection error"),
        DieselFailure::UniqueViolation { .. } => {
            LedgerRepositoryError::query(format!("{operation}: duplicate ledger entry"))
        }
        DieselFailure::ForeignKeyViolation => {
            LedgerRepositoryError::query(format!("{operation}: owner is not a registered user"))
        }
        DieselFailure::Query { message } => LedgerRepositoryError::query(message),
    }
}

async fn load_balance(
    conn: &mut AsyncPgConnection,
    user_id: Uuid,
) -> Result<Result<Balance, String>, diesel::result::Error> {
    let totals: LedgerTotalsRow = sql_query(LEDGER_TOTALS_SQL)
        .bind::<SqlUuid, _>(user_id)
        .get_result(conn)
        .await?;
    Ok(balance_from_totals(totals))
}

fn balance_from_totals(totals: LedgerTotalsRow) -> Result<Balance, String> {
    let accrued = Points::new(totals.accrued).map_err(|err| format!("accrued total: {err}"))?;
    let withdrawn =
        Points::new(totals.withdrawn).map_err(|err| format!("withdrawn total: {err}"))?;
    Balance::from_totals(accrued, withdrawn).map_err(|err| err.to_string())
}

#[async_trait]
impl LedgerRepository for DieselLedgerRepository {
    async fn balance(&self, user: &UserId) -> Result<Balance, LedgerRepositoryError> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;

        load_balance(&mut pooled, *user.as_uuid())
            .await
            .map_err(|err| map_diesel_error(err, "derive balance"))?
            .map_err(LedgerRepositoryError::query)
    }

    async fn record_withdrawal(
        &self,
        withdrawal: &Withdrawal,
    ) -> Result<(), LedgerRepositoryError> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let owner = *withdrawal.owner.as_uuid();
        let sum = withdrawal.sum;
        let row = NewWithdrawalRow::from(withdrawal);

        let result = conn
            .transaction::<_, WithdrawalTxError, _>(|conn| {
                async move {
                    let locked: Option<Uuid> = users::table
                        .filter(users::id.eq(owner))
                        .select(users::id)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    if locked.is_none() {
                        return Err(WithdrawalTxError::UnknownUser);
                    }

                    let balance = load_balance(conn, owner)
                        .await?
                        .map_err(WithdrawalTxError::Inconsistent)?;
                    if !balance.admits(sum) {
                        return Err(WithdrawalTxError::Insufficient(balance.current));
                    }

                    diesel::insert_into(withdrawals::table)
                        .values(&row)
                        .execute(conn)
                        .await?;
                    Ok(())
                }
                .scope_boxed()
            })
            .await;

        result.map_err(|err| match err {
            WithdrawalTxError::Diesel(error) => map_diesel_error(error, "record withdrawal"),
            WithdrawalTxError::UnknownUser => {
                LedgerRepositoryError::unknown_user(withdrawal.owner.to_string())
            }
            WithdrawalTxError::Insufficient(available) => {
                LedgerRepositoryError::insufficient_funds(available)
            }
            WithdrawalTxError::Inconsistent(message) => LedgerRepositoryError::query(message),
        })
    }

    async fn list_withdrawals(
        &self,
        user: &UserId,
    ) -> Result<Vec<Withdrawal>, LedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<WithdrawalRow> = withdrawals::table
            .filter(withdrawals::user_id.eq(user.as_uuid()))
            .order_by((withdrawals::processed_at.desc(), withdrawals::id.desc()))
            .select(WithdrawalRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list withdrawals"))?;

        collect_rows(
            rows.into_iter().map(WithdrawalRow::into_withdrawal),
            LedgerRepositoryError::query,
        )
    }
}
