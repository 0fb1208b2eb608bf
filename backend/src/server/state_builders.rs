//! Wires domain services onto storage and notification adapters.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use loyalty_backend::domain::ports::{
    AccrualNotifier, FixtureAccrualNotifier, LedgerRepository, OrderRepository, UserRepository,
};
use loyalty_backend::domain::{
    AccountService, LedgerService, OperationTimeout, OrderIntakeService, SettlementService,
};
use loyalty_backend::inbound::http::state::HttpState;
use loyalty_backend::outbound::memory::InMemoryLedgerStore;
use loyalty_backend::outbound::persistence::{
    DieselLedgerRepository, DieselOrderRepository, DieselUserRepository,
};
use loyalty_backend::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Repositories backing the services.
struct Stores<O, L, U> {
    orders: Arc<O>,
    ledger: Arc<L>,
    users: Arc<U>,
}

fn build_with<O, L, U>(
    stores: Stores<O, L, U>,
    notifier: Arc<dyn AccrualNotifier>,
    timeout: OperationTimeout,
) -> HttpState
where
    O: OrderRepository + 'static,
    L: LedgerRepository + 'static,
    U: UserRepository + 'static,
{
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let ledger = Arc::new(LedgerService::new(stores.ledger, clock.clone(), timeout));
    HttpState {
        orders: Arc::new(OrderIntakeService::new(
            stores.orders.clone(),
            notifier,
            clock,
            timeout,
        )),
        ledger: ledger.clone(),
        ledger_query: ledger,
        settlements: Arc::new(SettlementService::new(stores.orders, timeout)),
        accounts: Arc::new(AccountService::new(
            stores.users,
            Arc::new(Argon2PasswordHasher),
            timeout,
        )),
    }
}

/// Build handler state from `config`.
///
/// PostgreSQL repositories are used when a pool is configured, otherwise a
/// process-local store holds everything until shutdown.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let notifier = config.notifier.clone().unwrap_or_else(|| {
        warn!("no accrual system configured; accepted orders will not be forwarded");
        Arc::new(FixtureAccrualNotifier)
    });
    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL storage");
            build_with(
                Stores {
                    orders: Arc::new(DieselOrderRepository::new(pool.clone())),
                    ledger: Arc::new(DieselLedgerRepository::new(pool.clone())),
                    users: Arc::new(DieselUserRepository::new(pool.clone())),
                },
                notifier,
                config.timeout,
            )
        }
        None => {
            warn!("no database configured; using the in-memory store");
            let store = Arc::new(InMemoryLedgerStore::new());
            build_with(
                Stores {
                    orders: store.clone(),
                    ledger: store.clone(),
                    users: store,
                },
                notifier,
                config.timeout,
            )
        }
    }
}
