//! Tests for balance handlers.

use super::*;
use crate::domain::{OrderReference, Points, UserId};
use crate::inbound::http::test_utils::{
    TestPorts, session_cookie, sign_in, sign_in_as, test_session_middleware,
};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use chrono::TimeZone;
use serde_json::{Value, json};

const USER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn user() -> UserId {
    UserId::new(USER).expect("fixture id")
}

fn points(raw: &str) -> Points {
    raw.parse().expect("valid points")
}

macro_rules! balance_app {
    ($ports:expr) => {
        actix_test::init_service(
            App::new()
                .app_data($ports.into_state())
                .wrap(test_session_middleware())
                .service(sign_in_as)
                .service(
                    web::scope("/api")
                        .service(get_balance)
                        .service(withdraw)
                        .service(list_withdrawals),
                ),
        )
        .await
    };
}

#[actix_web::test]
async fn balance_is_rendered_as_numbers() {
    let mut ports = TestPorts::default();
    ports
        .ledger_query
        .expect_balance()
        .withf(|who| *who == user())
        .return_once(|_| {
            Balance::from_totals(points("15.75"), points("3")).map_err(|err| Error::internal(err.to_string()))
        });
    let app = balance_app!(ports);
    let cookie = session_cookie(&actix_test::call_service(&app, sign_in(USER).to_request()).await);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/user/balance")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body, json!({"current": 12.75, "withdrawn": 3.0}));
}

#[actix_web::test]
async fn withdraw_forwards_the_request() {
    let mut ports = TestPorts::default();
    ports
        .ledger
        .expect_withdraw()
        .withf(|who, request| {
            *who == user()
                && request.order_ref == "2377225624"
                && request.sum == Decimal::new(7511, 1)
        })
        .times(1)
        .return_once(|who, request| {
            Ok(Withdrawal::new(
                *who,
                OrderReference::new(request.order_ref).expect("reference"),
                Points::new(request.sum).expect("points"),
                Utc::now(),
            ))
        });
    let app = balance_app!(ports);
    let cookie = session_cookie(&actix_test::call_service(&app, sign_in(USER).to_request()).await);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/user/balance/withdraw")
            .cookie(cookie)
            .set_json(json!({"order": "2377225624", "sum": 751.1}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn overdraft_is_payment_required() {
    let mut ports = TestPorts::default();
    ports.ledger.expect_withdraw().return_once(|_, _| {
        Err(Error::insufficient_funds("insufficient funds").with_details(json!({"available": 50.0})))
    });
    let app = balance_app!(ports);
    let cookie = session_cookie(&actix_test::call_service(&app, sign_in(USER).to_request()).await);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/user/balance/withdraw")
            .cookie(cookie)
            .set_json(json!({"order": "2377225624", "sum": 100}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::PAYMENT_REQUIRED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "insufficient_funds");
    assert_eq!(body["details"]["available"], 50.0);
}

#[actix_web::test]
async fn withdraw_requires_a_session() {
    let mut ports = TestPorts::default();
    ports.ledger.expect_withdraw().never();
    let app = balance_app!(ports);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/user/balance/withdraw")
            .set_json(json!({"order": "2377225624", "sum": 1}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn withdrawal_history_lists_or_is_empty() {
    let processed_at = Utc
        .with_ymd_and_hms(2026, 3, 2, 8, 30, 0)
        .single()
        .expect("valid timestamp");
    let entry = Withdrawal::new(
        user(),
        OrderReference::new("2377225624").expect("reference"),
        points("500"),
        processed_at,
    );
    let mut ports = TestPorts::default();
    let mut calls = 0;
    ports
        .ledger_query
        .expect_list_withdrawals()
        .times(2)
        .returning(move |_| {
            calls += 1;
            if calls == 1 {
                Ok(vec![entry.clone()])
            } else {
                Ok(Vec::new())
            }
        });
    let app = balance_app!(ports);
    let cookie = session_cookie(&actix_test::call_service(&app, sign_in(USER).to_request()).await);
    let list = || {
        actix_test::TestRequest::get()
            .uri("/api/user/withdrawals")
            .cookie(cookie.clone())
            .to_request()
    };

    let res = actix_test::call_service(&app, list()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(
        body,
        json!([{"order": "2377225624", "sum": 500.0, "processed_at": "2026-03-02T08:30:00Z"}])
    );

    let res = actix_test::call_service(&app, list()).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}
