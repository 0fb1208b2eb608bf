//! Balance and withdrawal handlers.
//!
//! ```text
//! GET  /api/user/balance
//! POST /api/user/balance/withdraw {"order":"2377225624","sum":751}
//! GET  /api/user/withdrawals
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{Balance, Error, Withdrawal, WithdrawalRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Current balance and lifetime withdrawals.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct BalanceResponse {
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 500.5)]
    pub current: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 42.0)]
    pub withdrawn: Decimal,
}

impl From<Balance> for BalanceResponse {
    fn from(balance: Balance) -> Self {
        Self {
            current: balance.current.as_decimal(),
            withdrawn: balance.withdrawn.as_decimal(),
        }
    }
}

/// Body for `POST /api/user/balance/withdraw`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct WithdrawRequest {
    /// Order the points pay for; need not be a stored order.
    #[schema(example = "2377225624")]
    pub order: String,
    #[schema(value_type = f64, example = 751.0)]
    pub sum: Decimal,
}

impl From<WithdrawRequest> for WithdrawalRequest {
    fn from(value: WithdrawRequest) -> Self {
        Self {
            order_ref: value.order,
            sum: value.sum,
        }
    }
}

/// One withdrawal in the caller's history.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct WithdrawalResponse {
    #[schema(example = "2377225624")]
    pub order: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 500.0)]
    pub sum: Decimal,
    pub processed_at: DateTime<Utc>,
}

impl From<&Withdrawal> for WithdrawalResponse {
    fn from(withdrawal: &Withdrawal) -> Self {
        Self {
            order: withdrawal.order_ref.to_string(),
            sum: withdrawal.sum.as_decimal(),
            processed_at: withdrawal.processed_at,
        }
    }
}

/// Show the caller's balance.
#[utoipa::path(
    get,
    path = "/api/user/balance",
    responses(
        (status = 200, description = "Balance", body = BalanceResponse),
        (status = 401, description = "Login required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["balance"],
    operation_id = "getBalance"
)]
#[get("/user/balance")]
pub async fn get_balance(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<BalanceResponse>> {
    let user = session.require_user_id()?;
    let balance = state.ledger_query.balance(&user).await?;
    Ok(web::Json(balance.into()))
}

/// Spend points on an order.
#[utoipa::path(
    post,
    path = "/api/user/balance/withdraw",
    request_body = WithdrawRequest,
    responses(
        (status = 200, description = "Withdrawal recorded"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 402, description = "Insufficient funds", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["balance"],
    operation_id = "withdraw"
)]
#[post("/user/balance/withdraw")]
pub async fn withdraw(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<WithdrawRequest>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    state
        .ledger
        .withdraw(&user, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().finish())
}

/// List the caller's withdrawals, newest first.
#[utoipa::path(
    get,
    path = "/api/user/withdrawals",
    responses(
        (status = 200, description = "Withdrawals", body = [WithdrawalResponse]),
        (status = 204, description = "No withdrawals yet"),
        (status = 401, description = "Login required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["balance"],
    operation_id = "listWithdrawals"
)]
#[get("/user/withdrawals")]
pub async fn list_withdrawals(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let withdrawals = state.ledger_query.list_withdrawals(&user).await?;
    if withdrawals.is_empty() {
        return Ok(HttpResponse::NoContent().finish());
    }
    let body: Vec<WithdrawalResponse> =
        withdrawals.iter().map(WithdrawalResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[cfg(test)]
#[path = "balance_tests.rs"]
mod tests;
