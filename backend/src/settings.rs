//! Application settings loaded via OrthoConfig.
//!
//! Values come from `--run-address`-style flags, `LOYALTY_*` environment
//! variables or a configuration file, in that order of precedence.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::OperationTimeout;

/// Server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LOYALTY")]
pub struct AppSettings {
    /// Address the HTTP listener binds to.
    #[ortho_config(default = String::from("0.0.0.0:8080"))]
    pub run_address: String,
    /// PostgreSQL connection string; without one the in-memory store is used.
    pub database_uri: Option<String>,
    /// Base address of the accrual system; without one orders are not
    /// forwarded for accrual.
    pub accrual_system_address: Option<String>,
    /// Deadline for each storage call, in milliseconds.
    #[ortho_config(default = 10_000)]
    pub operation_timeout_ms: u64,
    /// Deadline for each accrual notification, in milliseconds.
    #[ortho_config(default = 5_000)]
    pub accrual_timeout_ms: u64,
}

impl AppSettings {
    /// Listener address; `0.0.0.0:8080` unless configured.
    pub fn run_address(&self) -> &str {
        &self.run_address
    }

    /// Deadline applied by domain services.
    pub fn operation_timeout(&self) -> OperationTimeout {
        OperationTimeout::from_millis(self.operation_timeout_ms)
    }

    /// Timeout for outbound accrual requests.
    pub fn accrual_timeout(&self) -> Duration {
        Duration::from_millis(self.accrual_timeout_ms)
    }
}
