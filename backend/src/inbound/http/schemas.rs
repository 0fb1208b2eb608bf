//! OpenAPI schema definitions for domain types.
//!
//! The wrappers mirror their domain counterparts so utoipa can document them
//! under the domain type's name without the domain deriving adapter traits
//! for every type it exposes.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The order number failed the Luhn check.
    #[schema(rename = "invalid_order_number")]
    InvalidOrderNumber,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The order belongs to another user, or the login is taken.
    #[schema(rename = "conflict")]
    Conflict,
    /// The withdrawal exceeds the current balance.
    #[schema(rename = "insufficient_funds")]
    InsufficientFunds,
    /// The request did not complete in time.
    #[schema(rename = "timeout")]
    Timeout,
    /// A backing service is unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "insufficient_funds")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "insufficient funds")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details, such as the offending field.
    details: Option<serde_json::Value>,
}
