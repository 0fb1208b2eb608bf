//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`OrderIntake`, `LedgerCommand`, `LedgerQuery`,
//! `SettlementCommand`, `AccountCommand`) are implemented by domain services
//! and called by inbound adapters. Driven ports are implemented by outbound
//! adapters and called by services.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod accrual_notifier;
mod ledger_command;
mod ledger_query;
mod ledger_repository;
mod order_intake;
mod order_repository;
mod password_hasher;
mod settlement_command;
mod user_repository;

pub use account_command::AccountCommand;
#[cfg(test)]
pub use account_command::MockAccountCommand;
#[cfg(test)]
pub use accrual_notifier::MockAccrualNotifier;
pub use accrual_notifier::{AccrualNotifier, AccrualNotifierError, FixtureAccrualNotifier};
pub use ledger_command::LedgerCommand;
#[cfg(test)]
pub use ledger_command::MockLedgerCommand;
pub use ledger_query::LedgerQuery;
#[cfg(test)]
pub use ledger_query::MockLedgerQuery;
#[cfg(test)]
pub use ledger_repository::MockLedgerRepository;
pub use ledger_repository::{FixtureLedgerRepository, LedgerRepository, LedgerRepositoryError};
#[cfg(test)]
pub use order_intake::MockOrderIntake;
pub use order_intake::{OrderIntake, SubmitOrderOutcome};
#[cfg(test)]
pub use order_repository::MockOrderRepository;
pub use order_repository::{FixtureOrderRepository, OrderRepository, OrderRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{FixturePasswordHasher, PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use settlement_command::MockSettlementCommand;
pub use settlement_command::SettlementCommand;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserRepository, UserRepositoryError};
