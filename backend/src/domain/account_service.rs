//! Registration and login over a user repository and a password hasher.
//!
//! Password hashing is CPU-bound, so it runs on the blocking pool rather
//! than on the async executor.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccountCommand, PasswordHasher, PasswordHasherError, UserRepository, UserRepositoryError,
};
use crate::domain::{Credentials, Error, OperationTimeout, User, UserAccount, UserId};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Account service implementing the [`AccountCommand`] driving port.
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    timeout: OperationTimeout,
}

impl<U, H> AccountService<U, H> {
    /// Create a new service.
    pub fn new(users: Arc<U>, hasher: Arc<H>, timeout: OperationTimeout) -> Self {
        Self {
            users,
            hasher,
            timeout,
        }
    }
}

impl<U, H> AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    fn map_user_error(error: UserRepositoryError) -> Error {
        match error {
            UserRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserRepositoryError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserRepositoryError::DuplicateLogin { login } => {
                Error::conflict(format!("login {login} is already taken"))
            }
        }
    }

    fn map_hasher_error(error: PasswordHasherError) -> Error {
        Error::internal(error.to_string())
    }

    async fn blocking<T, F>(&self, job: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(&H) -> Result<T, PasswordHasherError> + Send + 'static,
    {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || job(&hasher))
            .await
            .map_err(|err| Error::internal(format!("password task failed: {err}")))?
            .map_err(Self::map_hasher_error)
    }
}

#[async_trait]
impl<U, H> AccountCommand for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn register(&self, credentials: &Credentials) -> Result<UserId, Error> {
        let password = Zeroizing::new(credentials.password().to_owned());
        let password_hash = self
            .blocking(move |hasher| hasher.hash(password.as_str()))
            .await?;
        let account = UserAccount {
            user: User {
                id: UserId::random(),
                login: credentials.login().clone(),
            },
            password_hash,
        };

        self.timeout
            .run("create user", self.users.create(&account))
            .await?
            .map_err(Self::map_user_error)?;

        info!(user = %account.user.id, login = %account.user.login, "user registered");
        Ok(account.user.id)
    }

    async fn login(&self, credentials: &Credentials) -> Result<UserId, Error> {
        let account = self
            .timeout
            .run("find user", self.users.find_by_login(credentials.login()))
            .await?
            .map_err(Self::map_user_error)?
            .ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS))?;

        let password = Zeroizing::new(credentials.password().to_owned());
        let stored_hash = account.password_hash.clone();
        let matches = self
            .blocking(move |hasher| hasher.verify(password.as_str(), &stored_hash))
            .await?;
        if !matches {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        Ok(account.user.id)
    }
}
