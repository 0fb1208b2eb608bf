//! Tests for order handlers.

use super::*;
use crate::domain::{OrderNumber, OrderStatus, Points, Settlement, UserId};
use crate::inbound::http::test_utils::{
    TestPorts, session_cookie, sign_in, sign_in_as, test_session_middleware,
};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use chrono::TimeZone;
use rstest::rstest;
use serde_json::Value;

const USER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn user() -> UserId {
    UserId::new(USER).expect("fixture id")
}

fn order(number: &str) -> Order {
    let uploaded_at = Utc
        .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    Order::submitted(
        OrderNumber::parse(number).expect("valid number"),
        user(),
        uploaded_at,
    )
}

macro_rules! order_app {
    ($ports:expr) => {
        actix_test::init_service(
            App::new()
                .app_data($ports.into_state())
                .wrap(test_session_middleware())
                .service(sign_in_as)
                .service(web::scope("/api").service(submit_order).service(list_orders)),
        )
        .await
    };
}

#[rstest]
#[case(SubmitOrderOutcome::Accepted(order("79927398713")), StatusCode::ACCEPTED)]
#[case(SubmitOrderOutcome::AlreadyOwned(order("79927398713")), StatusCode::OK)]
#[actix_web::test]
async fn submission_outcomes_map_to_status(
    #[case] outcome: SubmitOrderOutcome,
    #[case] expected: StatusCode,
) {
    let mut ports = TestPorts::default();
    ports
        .orders
        .expect_submit_order()
        .withf(|who, raw| *who == user() && raw == "79927398713")
        .times(1)
        .return_once(move |_, _| Ok(outcome));
    let app = order_app!(ports);
    let cookie = session_cookie(&actix_test::call_service(&app, sign_in(USER).to_request()).await);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/user/orders")
            .insert_header(("content-type", "text/plain"))
            .cookie(cookie)
            .set_payload("79927398713\n")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), expected);
}

#[rstest]
#[case(Error::invalid_order_number("order number fails the Luhn check"), StatusCode::UNPROCESSABLE_ENTITY)]
#[case(Error::conflict("order 79927398713 was uploaded by another user"), StatusCode::CONFLICT)]
#[case(Error::timeout("submit order timed out"), StatusCode::REQUEST_TIMEOUT)]
#[actix_web::test]
async fn submission_errors_map_to_status(#[case] error: Error, #[case] expected: StatusCode) {
    let mut ports = TestPorts::default();
    ports
        .orders
        .expect_submit_order()
        .return_once(move |_, _| Err(error));
    let app = order_app!(ports);
    let cookie = session_cookie(&actix_test::call_service(&app, sign_in(USER).to_request()).await);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/user/orders")
            .cookie(cookie)
            .set_payload("79927398714")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), expected);
}

#[actix_web::test]
async fn empty_body_is_a_bad_request() {
    let mut ports = TestPorts::default();
    ports.orders.expect_submit_order().never();
    let app = order_app!(ports);
    let cookie = session_cookie(&actix_test::call_service(&app, sign_in(USER).to_request()).await);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/user/orders")
            .cookie(cookie)
            .set_payload("   ")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn anonymous_submission_is_unauthorised() {
    let mut ports = TestPorts::default();
    ports.orders.expect_submit_order().never();
    let app = order_app!(ports);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/user/orders")
            .set_payload("79927398713")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn listing_renders_accrual_only_when_processed() {
    let mut processed = order("79927398713");
    processed.apply(&Settlement::Processed {
        accrual: "500.5".parse::<Points>().expect("points"),
    });
    let fresh = order("12345678903");
    let mut ports = TestPorts::default();
    ports
        .orders
        .expect_list_orders()
        .return_once(move |_| Ok(vec![fresh, processed]));
    let app = order_app!(ports);
    let cookie = session_cookie(&actix_test::call_service(&app, sign_in(USER).to_request()).await);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/user/orders")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    let listed = body.as_array().expect("array body");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["number"], "12345678903");
    assert_eq!(listed[0]["status"], OrderStatus::New.as_str());
    assert!(listed[0].get("accrual").is_none());
    assert_eq!(listed[1]["status"], "PROCESSED");
    assert_eq!(listed[1]["accrual"], 500.5);
    assert_eq!(listed[1]["uploaded_at"], "2026-03-01T12:00:00Z");
}

#[actix_web::test]
async fn empty_listing_is_no_content() {
    let mut ports = TestPorts::default();
    ports
        .orders
        .expect_list_orders()
        .return_once(|_| Ok(Vec::new()));
    let app = order_app!(ports);
    let cookie = session_cookie(&actix_test::call_service(&app, sign_in(USER).to_request()).await);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/user/orders")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}
