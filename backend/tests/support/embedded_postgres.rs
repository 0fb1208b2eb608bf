//! Database provisioning for the embedded PostgreSQL suites.
//!
//! Each suite gets its own database, recreated from scratch and migrated
//! with the same embedded migrations the server applies at startup.

use loyalty_backend::outbound::persistence::{DbPool, PoolConfig};
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use tokio::runtime::Runtime;

use super::format_postgres_error;

/// Drop and recreate `name` on `cluster`.
///
/// Runs over a plain `postgres` client connected to the maintenance
/// database; `DROP DATABASE` cannot run inside a transaction.
pub fn reset_database(cluster: &TestCluster, name: &str) -> Result<(), String> {
    let admin_url = cluster.connection().database_url("postgres");
    let mut client = Client::connect(&admin_url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&format!("DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE);"))
        .map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&format!("CREATE DATABASE \"{name}\";"))
        .map_err(|err| format_postgres_error(&err))
}

/// Recreate `name`, migrate it, and open a small pool against it.
pub fn provision_pool(
    runtime: &Runtime,
    cluster: &TestCluster,
    name: &str,
    max_size: u32,
) -> Result<(DbPool, String), String> {
    reset_database(cluster, name)?;
    let url = cluster.connection().database_url(name);
    runtime
        .block_on(DbPool::run_migrations(&url))
        .map_err(|err| err.to_string())?;
    let pool = runtime
        .block_on(DbPool::new(
            PoolConfig::new(&url)
                .with_max_size(max_size)
                .with_min_idle(Some(1)),
        ))
        .map_err(|err| err.to_string())?;
    Ok((pool, url))
}

/// Insert a bare user row so ledger entries have an owner.
pub fn seed_user(url: &str, id: uuid::Uuid, login: &str) -> Result<(), String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .execute(
            "INSERT INTO users (id, login, password_hash) VALUES ($1, $2, 'unused')",
            &[&id, &login],
        )
        .map_err(|err| format_postgres_error(&err))?;
    Ok(())
}
