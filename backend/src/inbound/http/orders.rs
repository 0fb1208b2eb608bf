//! Order handlers.
//!
//! ```text
//! POST /api/user/orders   (text/plain) 79927398713
//! GET  /api/user/orders
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::domain::ports::SubmitOrderOutcome;
use crate::domain::{Error, Order};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Order as listed to its owner.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct OrderResponse {
    #[schema(example = "79927398713")]
    pub number: String,
    #[schema(value_type = String, example = "PROCESSED")]
    pub status: String,
    /// Credited points; present only once processed.
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    #[schema(value_type = Option<f64>, example = 500.0)]
    pub accrual: Option<Decimal>,
    pub uploaded_at: DateTime<Utc>,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            number: order.number.to_string(),
            status: order.status.as_str().to_owned(),
            accrual: order.accrual.map(|points| points.as_decimal()),
            uploaded_at: order.uploaded_at,
        }
    }
}

/// Submit an order number for accrual.
///
/// Responds `202 Accepted` for a new number and `200 OK` when the caller
/// already submitted it.
#[utoipa::path(
    post,
    path = "/api/user/orders",
    request_body(content = String, content_type = "text/plain", example = "79927398713"),
    responses(
        (status = 200, description = "Already submitted by this user"),
        (status = 202, description = "Accepted for processing"),
        (status = 400, description = "Empty body", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 409, description = "Submitted by another user", body = Error),
        (status = 422, description = "Order number fails the Luhn check", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["orders"],
    operation_id = "submitOrder"
)]
#[post("/user/orders")]
pub async fn submit_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: String,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let raw = body.trim();
    if raw.is_empty() {
        return Err(Error::invalid_request("order number must not be empty")
            .with_details(json!({ "field": "number", "code": "missing_field" })));
    }
    let response = match state.orders.submit_order(&user, raw).await? {
        SubmitOrderOutcome::Accepted(_) => HttpResponse::Accepted().finish(),
        SubmitOrderOutcome::AlreadyOwned(order) => {
            debug!(number = %order.number, "order resubmitted by owner");
            HttpResponse::Ok().finish()
        }
    };
    Ok(response)
}

/// List the caller's orders, newest first.
#[utoipa::path(
    get,
    path = "/api/user/orders",
    responses(
        (status = 200, description = "Orders", body = [OrderResponse]),
        (status = 204, description = "No orders yet"),
        (status = 401, description = "Login required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["orders"],
    operation_id = "listOrders"
)]
#[get("/user/orders")]
pub async fn list_orders(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let orders = state.orders.list_orders(&user).await?;
    if orders.is_empty() {
        return Ok(HttpResponse::NoContent().finish());
    }
    let body: Vec<OrderResponse> = orders.iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[cfg(test)]
#[path = "orders_tests.rs"]
mod tests;
