//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data`, so they only depend
//! on driving ports and can be tested against mocks.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, LedgerCommand, LedgerQuery, OrderIntake, SettlementCommand,
};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use loyalty_backend::domain::ports::{
///     FixtureAccrualNotifier, FixturePasswordHasher,
/// };
/// use loyalty_backend::domain::{
///     AccountService, LedgerService, OperationTimeout, OrderIntakeService, SettlementService,
/// };
/// use loyalty_backend::inbound::http::state::HttpState;
/// use loyalty_backend::outbound::memory::InMemoryLedgerStore;
///
/// let store = Arc::new(InMemoryLedgerStore::new());
/// let clock: Arc<dyn mockable::Clock> = Arc::new(mockable::DefaultClock);
/// let timeout = OperationTimeout::default();
/// let ledger = Arc::new(LedgerService::new(store.clone(), clock.clone(), timeout));
/// let state = HttpState {
///     orders: Arc::new(OrderIntakeService::new(
///         store.clone(),
///         Arc::new(FixtureAccrualNotifier),
///         clock,
///         timeout,
///     )),
///     ledger: ledger.clone(),
///     ledger_query: ledger,
///     settlements: Arc::new(SettlementService::new(store.clone(), timeout)),
///     accounts: Arc::new(AccountService::new(store, Arc::new(FixturePasswordHasher), timeout)),
/// };
/// let _orders = state.orders.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    /// Order submission and history.
    pub orders: Arc<dyn OrderIntake>,
    /// Withdrawals.
    pub ledger: Arc<dyn LedgerCommand>,
    /// Balance and withdrawal history.
    pub ledger_query: Arc<dyn LedgerQuery>,
    /// Settlement reports from the accrual system.
    pub settlements: Arc<dyn SettlementCommand>,
    /// Registration and login.
    pub accounts: Arc<dyn AccountCommand>,
}
