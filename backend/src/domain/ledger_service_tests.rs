//! Tests for the ledger service.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use rstest::rstest;
use rust_decimal::Decimal;
use serde_json::json;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockLedgerRepository;

struct FixtureClock(DateTime<Utc>);

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 2, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

fn make_service(repo: MockLedgerRepository) -> LedgerService<MockLedgerRepository> {
    LedgerService::new(
        Arc::new(repo),
        Arc::new(FixtureClock(now())),
        OperationTimeout::default(),
    )
}

fn request(order_ref: &str, sum: &str) -> WithdrawalRequest {
    WithdrawalRequest {
        order_ref: order_ref.to_owned(),
        sum: Decimal::from_str(sum).expect("decimal"),
    }
}

#[tokio::test]
async fn records_admitted_withdrawals() {
    let user = UserId::random();
    let mut repo = MockLedgerRepository::new();
    repo.expect_record_withdrawal()
        .withf(move |withdrawal| {
            withdrawal.owner == user
                && withdrawal.order_ref.as_str() == "2377225624"
                && withdrawal.sum.to_string() == "751.00"
        })
        .times(1)
        .return_once(|_| Ok(()));
    let service = make_service(repo);

    let withdrawal = service
        .withdraw(&user, request("2377225624", "751"))
        .await
        .expect("admitted");

    assert_eq!(withdrawal.processed_at, now());
}

#[rstest]
#[case::blank_reference("  ", "10")]
#[case::zero_sum("2377225624", "0")]
#[case::negative_sum("2377225624", "-5")]
#[case::sub_cent_sum("2377225624", "1.005")]
#[tokio::test]
async fn malformed_requests_are_rejected(#[case] order_ref: &str, #[case] sum: &str) {
    let mut repo = MockLedgerRepository::new();
    repo.expect_record_withdrawal().never();
    let service = make_service(repo);

    let err = service
        .withdraw(&UserId::random(), request(order_ref, sum))
        .await
        .expect_err("rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn references_need_not_name_a_stored_order() {
    let mut repo = MockLedgerRepository::new();
    repo.expect_record_withdrawal().return_once(|_| Ok(()));
    let service = make_service(repo);

    let withdrawal = service
        .withdraw(&UserId::random(), request("gift-card #4", "1"))
        .await
        .expect("free-form reference accepted");

    assert_eq!(withdrawal.order_ref.as_str(), "gift-card #4");
}

#[tokio::test]
async fn overdrafts_report_the_available_balance() {
    let mut repo = MockLedgerRepository::new();
    repo.expect_record_withdrawal().return_once(|_| {
        Err(LedgerRepositoryError::insufficient_funds(
            "50.00".parse::<Points>().expect("points"),
        ))
    });
    let service = make_service(repo);

    let err = service
        .withdraw(&UserId::random(), request("2377225624", "100"))
        .await
        .expect_err("overdraft");

    assert_eq!(err.code(), ErrorCode::InsufficientFunds);
    assert_eq!(err.details(), Some(&json!({ "available": 50.0 })));
}

#[rstest]
#[case(LedgerRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(LedgerRepositoryError::query("deadlock"), ErrorCode::InternalError)]
#[case(LedgerRepositoryError::unknown_user("ghost"), ErrorCode::Unauthorized)]
#[tokio::test]
async fn repository_failures_are_mapped(
    #[case] failure: LedgerRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockLedgerRepository::new();
    repo.expect_balance().return_once(move |_| Err(failure));
    let service = make_service(repo);

    let err = service
        .balance(&UserId::random())
        .await
        .expect_err("mapped failure");

    assert_eq!(err.code(), expected);
}

#[tokio::test]
async fn balance_is_read_through() {
    let user = UserId::random();
    let balance = Balance::from_totals(
        "500.50".parse().expect("points"),
        "42".parse().expect("points"),
    )
    .expect("balance");
    let mut repo = MockLedgerRepository::new();
    repo.expect_balance()
        .withf(move |candidate| *candidate == user)
        .return_once(move |_| Ok(balance));
    let service = make_service(repo);

    let observed = service.balance(&user).await.expect("balance");

    assert_eq!(observed.current.to_string(), "458.50");
    assert_eq!(observed.withdrawn.to_string(), "42.00");
}
