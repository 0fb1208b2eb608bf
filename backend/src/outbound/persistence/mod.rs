//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the order, ledger, and user ports backed by
//! PostgreSQL through `diesel-async` and a `bb8` pool.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Ledger arithmetic lives in the domain.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leak into the domain.
//! - **Database-enforced invariants**: order-number uniqueness is the primary
//!   key, and withdrawals serialise on a per-user row lock.
//!
//! # Example
//!
//! ```ignore
//! use loyalty_backend::outbound::persistence::{DbPool, DieselOrderRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/loyalty")).await?;
//! let orders = DieselOrderRepository::new(pool);
//! ```

mod diesel_helpers;
mod diesel_ledger_repository;
mod diesel_order_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_ledger_repository::DieselLedgerRepository;
pub use diesel_order_repository::DieselOrderRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, MIGRATIONS, PoolConfig, PoolError};
