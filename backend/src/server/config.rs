//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::Key;
use loyalty_backend::domain::OperationTimeout;
use loyalty_backend::domain::ports::AccrualNotifier;
use loyalty_backend::outbound::persistence::DbPool;

/// Everything `create_server` needs besides health state.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) timeout: OperationTimeout,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) notifier: Option<Arc<dyn AccrualNotifier>>,
}

impl ServerConfig {
    /// Configuration backed by the in-memory store with notifications off.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            bind_addr,
            timeout: OperationTimeout::default(),
            db_pool: None,
            notifier: None,
        }
    }

    /// Use PostgreSQL-backed repositories.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Forward accepted orders through `notifier`.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn AccrualNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Deadline applied to every storage call.
    #[must_use]
    pub fn with_timeout(mut self, timeout: OperationTimeout) -> Self {
        self.timeout = timeout;
        self
    }
}
