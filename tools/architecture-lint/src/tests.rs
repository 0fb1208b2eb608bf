//! Unit tests for the architecture lint.

use std::path::PathBuf;

use rstest::rstest;
use tempfile::TempDir;

use super::*;

fn lint_one(file: &str, contents: &str) -> Result<(), ArchitectureLintError> {
    lint_sources(&[LintSource {
        file: PathBuf::from(file),
        contents: contents.to_owned(),
    }])
}

#[rstest]
#[case("inbound/http/orders.rs", "use crate::domain::OrderNumber;", true)]
#[case("inbound/http/state.rs", "use crate::outbound::memory::InMemoryLedgerStore;", false)]
#[case("inbound/http/state.rs", "use loyalty_backend::outbound::memory::InMemoryLedgerStore;", false)]
#[case("inbound/http/orders.rs", "use diesel::prelude::*;", false)]
#[case("inbound/http/users.rs", "fn hash() { let _ = argon2::Argon2::default(); }", false)]
#[case("domain/order_intake_service.rs", "use crate::inbound::http;", false)]
#[case("domain/ledger.rs", "use super::super::outbound::persistence;", false)]
#[case("domain/ports/accrual_notifier.rs", "use reqwest::Client;", false)]
#[case("domain/error.rs", "use utoipa::ToSchema; #[derive(ToSchema)] struct Foo;", true)]
#[case("domain/ledger.rs", "use rust_decimal::Decimal; use mockable::Clock;", true)]
#[case("outbound/accrual/http_notifier.rs", "use reqwest::Client;", true)]
#[case("outbound/persistence/pool.rs", "use crate::inbound::http::HttpState;", false)]
#[case("outbound/memory/store.rs", "fn f() -> actix_web::HttpResponse { todo!() }", false)]
fn detects_boundary_violations(#[case] file: &str, #[case] contents: &str, #[case] ok: bool) {
    let result = lint_one(file, contents);
    assert_eq!(result.is_ok(), ok, "result: {result:?}");
}

#[rstest]
fn violations_name_the_file_and_rule() {
    let Err(ArchitectureLintError::Violations(violations)) =
        lint_one("domain/order.rs", "use diesel::prelude::*;")
    else {
        panic!("expected violations");
    };
    assert_eq!(
        violations,
        vec![Violation {
            file: PathBuf::from("domain/order.rs"),
            message: "domain code must not depend on external crate `diesel`".to_owned(),
        }]
    );
}

#[rstest]
fn files_outside_the_layers_are_rejected() {
    let err = lint_one("main.rs", "fn main() {}").expect_err("unknown layer");
    assert!(matches!(err, ArchitectureLintError::Parse { .. }));
}

#[rstest]
fn unparsable_sources_are_reported() {
    let err = lint_one("domain/order.rs", "fn broken(").expect_err("parse failure");
    assert!(err.to_string().contains("domain/order.rs"));
}

#[rstest]
fn walks_the_backend_tree_on_disk() {
    let root = TempDir::new().expect("tempdir");
    let domain = root.path().join("src/domain/ports");
    let inbound = root.path().join("src/inbound/http");
    fs::create_dir_all(&domain).expect("domain dir");
    fs::create_dir_all(&inbound).expect("inbound dir");
    fs::write(domain.join("order_repository.rs"), "use crate::domain::Order;").expect("write");
    fs::write(root.path().join("src/main.rs"), "use crate::outbound::x;").expect("write");
    fs::write(inbound.join("README.md"), "not rust").expect("write");
    assert!(lint_backend_sources(root.path()).is_ok());

    fs::write(inbound.join("orders.rs"), "use crate::outbound::persistence::DbPool;")
        .expect("write");
    let err = lint_backend_sources(root.path()).expect_err("violation");
    assert!(
        err.to_string()
            .contains("inbound/http/orders.rs: inbound code must not depend on crate::outbound")
    );
}
