//! Loyalty backend entry point: loads settings, prepares storage and serves
//! the REST API.

mod server;

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use loyalty_backend::inbound::http::health::HealthState;
use loyalty_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use loyalty_backend::outbound::accrual::HttpAccrualNotifier;
use loyalty_backend::outbound::persistence::{DbPool, PoolConfig};
use loyalty_backend::settings::AppSettings;
use ortho_config::OrthoConfig;

use server::{ServerConfig, create_server};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let settings = AppSettings::load().context("load settings")?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .context("load session settings")?;
    let bind_addr: SocketAddr = settings
        .run_address()
        .parse()
        .with_context(|| format!("parse run address {}", settings.run_address()))?;

    let mut config = ServerConfig::new(session.key, session.cookie_secure, bind_addr)
        .with_timeout(settings.operation_timeout());

    if let Some(database_uri) = settings.database_uri.as_deref() {
        let applied = DbPool::run_migrations(database_uri)
            .await
            .context("run database migrations")?;
        info!(applied, "database schema up to date");
        let pool = DbPool::new(PoolConfig::new(database_uri))
            .await
            .context("create database pool")?;
        config = config.with_db_pool(pool);
    }

    if let Some(address) = settings.accrual_system_address.as_deref() {
        let notifier = HttpAccrualNotifier::new(address, settings.accrual_timeout())
            .context("configure accrual notifier")?;
        info!(endpoint = %notifier.endpoint(), "forwarding accepted orders for accrual");
        config = config.with_notifier(Arc::new(notifier));
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config).context("start HTTP server")?;
    info!(%bind_addr, "listening");
    let handle = server.handle();
    let shutdown_health = health_state.clone();
    actix_web::rt::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown_health.mark_unhealthy();
            handle.stop(true).await;
        }
    });
    server.await.context("serve HTTP")?;
    Ok(())
}
