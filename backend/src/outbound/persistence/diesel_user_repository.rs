//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{Login, UserAccount};

use super::diesel_helpers::{DieselFailure, classify_diesel_error, map_pool_error_message};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    UserRepositoryError::connection(map_pool_error_message(error))
}

fn map_failure(failure: DieselFailure) -> UserRepositoryError {
    match failure {
        DieselFailure::Connection => UserRepositoryError::connection("database connection error"),
        DieselFailure::UniqueViolation { constraint } => UserRepositoryError::query(format!(
            "unexpected unique violation on {}",
            constraint.as_deref().unwrap_or("unknown constraint")
        )),
        DieselFailure::ForeignKeyViolation => UserRepositoryError::query("foreign key violation"),
        DieselFailure::Query { message } => UserRepositoryError::query(message),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, account: &UserAccount) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(users::table)
            .values(&NewUserRow::from(account))
            .execute(&mut conn)
            .await
            .map_err(|err| match classify_diesel_error(err, "create user") {
                DieselFailure::UniqueViolation { .. } => {
                    UserRepositoryError::duplicate_login(account.user.login.as_str())
                }
                other => map_failure(other),
            })?;
        Ok(())
    }

    async fn find_by_login(
        &self,
        login: &Login,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::login.eq(login.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_failure(classify_diesel_error(err, "find user")))?;

        row.map(UserRow::into_account)
            .transpose()
            .map_err(UserRepositoryError::query)
    }
}
