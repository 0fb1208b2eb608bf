//! Settlement callback used by the accrual system.
//!
//! ```text
//! POST /api/internal/accruals {"order":"79927398713","status":"PROCESSED","accrual":500}
//! ```
//!
//! The route is meant for the internal network only and does not require a
//! user session.

use actix_web::{post, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    Error, OrderNumber, OrderStatus, Points, Settlement, SettlementError, SettlementOutcome,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Status report for one order.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SettlementReport {
    #[schema(example = "79927398713")]
    pub order: String,
    /// One of `PROCESSING`, `PROCESSED` or `INVALID`.
    #[schema(example = "PROCESSED")]
    pub status: String,
    /// Required for `PROCESSED`, rejected otherwise.
    #[serde(default)]
    #[schema(value_type = Option<f64>, example = 500.0)]
    pub accrual: Option<Decimal>,
}

/// What the report did to the order.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SettlementResponse {
    #[schema(example = "79927398713")]
    pub order: String,
    #[schema(example = "PROCESSED")]
    pub status: String,
    /// `false` when the order was already terminal and the report was ignored.
    pub applied: bool,
}

fn invalid_field(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

impl SettlementReport {
    fn into_parts(self) -> Result<(OrderNumber, Settlement), Error> {
        let number = OrderNumber::parse(&self.order)
            .map_err(|err| invalid_field("order", "invalid_order_number", err.to_string()))?;
        let status = self
            .status
            .parse::<OrderStatus>()
            .map_err(|err| invalid_field("status", "unknown_status", err.to_string()))?;
        let accrual = self
            .accrual
            .map(Points::new)
            .transpose()
            .map_err(|err| invalid_field("accrual", "invalid_accrual", err.to_string()))?;
        let settlement = Settlement::from_report(status, accrual).map_err(|err| {
            let field = match err {
                SettlementError::NewIsNotReportable => "status",
                SettlementError::MissingAccrual | SettlementError::UnexpectedAccrual { .. } => {
                    "accrual"
                }
            };
            invalid_field(field, "inconsistent_report", err.to_string())
        })?;
        Ok((number, settlement))
    }
}

/// Apply an accrual report.
#[utoipa::path(
    post,
    path = "/api/internal/accruals",
    request_body = SettlementReport,
    responses(
        (status = 200, description = "Report applied or ignored", body = SettlementResponse),
        (status = 400, description = "Invalid report", body = Error),
        (status = 404, description = "Unknown order", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["internal"],
    operation_id = "applySettlement",
    security([])
)]
#[post("/internal/accruals")]
pub async fn apply_settlement(
    state: web::Data<HttpState>,
    payload: web::Json<SettlementReport>,
) -> ApiResult<web::Json<SettlementResponse>> {
    let (number, settlement) = payload.into_inner().into_parts()?;
    let outcome = state
        .settlements
        .apply_settlement(&number, settlement)
        .await?;
    let (status, applied) = match outcome {
        SettlementOutcome::Applied { status } => (status, true),
        SettlementOutcome::AlreadySettled { status } => (status, false),
    };
    Ok(web::Json(SettlementResponse {
        order: number.to_string(),
        status: status.as_str().to_owned(),
        applied,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::TestPorts;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;

    macro_rules! settlement_app {
        ($ports:expr) => {
            actix_test::init_service(
                App::new()
                    .app_data($ports.into_state())
                    .service(web::scope("/api").service(apply_settlement)),
            )
            .await
        };
    }

    #[rstest]
    #[case(
        SettlementOutcome::Applied { status: OrderStatus::Processed },
        json!({"order": "79927398713", "status": "PROCESSED", "applied": true})
    )]
    #[case(
        SettlementOutcome::AlreadySettled { status: OrderStatus::Invalid },
        json!({"order": "79927398713", "status": "INVALID", "applied": false})
    )]
    #[actix_web::test]
    async fn reports_are_applied(#[case] outcome: SettlementOutcome, #[case] expected: Value) {
        let mut ports = TestPorts::default();
        ports
            .settlements
            .expect_apply_settlement()
            .withf(|number, settlement| {
                number.as_str() == "79927398713"
                    && *settlement
                        == Settlement::Processed {
                            accrual: "500".parse().expect("points"),
                        }
            })
            .times(1)
            .return_once(move |_, _| Ok(outcome));
        let app = settlement_app!(ports);

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/internal/accruals")
                .set_json(json!({"order": "79927398713", "status": "PROCESSED", "accrual": 500}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body, expected);
    }

    #[rstest]
    #[case(json!({"order": "79927398714", "status": "PROCESSED", "accrual": 1}), "order")]
    #[case(json!({"order": "79927398713", "status": "DONE"}), "status")]
    #[case(json!({"order": "79927398713", "status": "NEW"}), "status")]
    #[case(json!({"order": "79927398713", "status": "PROCESSED"}), "accrual")]
    #[case(json!({"order": "79927398713", "status": "INVALID", "accrual": 3}), "accrual")]
    #[case(json!({"order": "79927398713", "status": "PROCESSED", "accrual": -1}), "accrual")]
    #[case(json!({"order": "79927398713", "status": "PROCESSED", "accrual": 1e10}), "accrual")]
    #[actix_web::test]
    async fn malformed_reports_are_rejected(#[case] report: Value, #[case] field: &str) {
        let mut ports = TestPorts::default();
        ports.settlements.expect_apply_settlement().never();
        let app = settlement_app!(ports);

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/internal/accruals")
                .set_json(report)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], field);
    }

    #[actix_web::test]
    async fn unknown_orders_are_not_found() {
        let mut ports = TestPorts::default();
        ports
            .settlements
            .expect_apply_settlement()
            .return_once(|number, _| Err(Error::not_found(format!("order {number} not found"))));
        let app = settlement_app!(ports);

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/internal/accruals")
                .set_json(json!({"order": "79927398713", "status": "PROCESSING"}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
