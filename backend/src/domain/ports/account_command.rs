//! Driving port for registration and login.
//!
//! Inbound adapters call it to authenticate credentials without knowing the
//! backing storage or hashing scheme.

use async_trait::async_trait;

use crate::domain::{Credentials, Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account; fails with `Conflict` if the login is taken.
    async fn register(&self, credentials: &Credentials) -> Result<UserId, Error>;

    /// Validate credentials and return the authenticated user id.
    async fn login(&self, credentials: &Credentials) -> Result<UserId, Error>;
}
