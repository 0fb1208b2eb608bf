//! Port abstraction for user account persistence.
use async_trait::async_trait;

use crate::domain::{Login, UserAccount};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The login is already registered.
        DuplicateLogin { login: String } => "login {login} is already taken",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account; fails with `DuplicateLogin` if taken.
    async fn create(&self, account: &UserAccount) -> Result<(), UserRepositoryError>;

    /// Fetch an account by login.
    async fn find_by_login(&self, login: &Login)
    -> Result<Option<UserAccount>, UserRepositoryError>;
}

/// Fixture implementation that accepts every registration and finds nobody.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn create(&self, _account: &UserAccount) -> Result<(), UserRepositoryError> {
        Ok(())
    }

    async fn find_by_login(
        &self,
        _login: &Login,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        Ok(None)
    }
}
