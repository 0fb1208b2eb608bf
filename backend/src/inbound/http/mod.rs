//! HTTP inbound adapter exposing the loyalty REST API.

pub mod balance;
pub mod error;
pub mod health;
pub mod orders;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod settlements;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::{ApiResult, json_error_handler};
