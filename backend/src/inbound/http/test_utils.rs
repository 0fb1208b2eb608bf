//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::test::TestRequest;
use actix_web::{HttpResponse, get, web};

use crate::domain::ports::{
    MockAccountCommand, MockLedgerCommand, MockLedgerQuery, MockOrderIntake,
    MockSettlementCommand,
};
use crate::domain::{Error, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Session middleware for tests: fresh key, cookie named `session`, and no
/// `Secure` flag so plain HTTP test requests keep the cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Signs the caller in as the user in the path, bypassing credentials.
#[get("/test/sign-in/{user_id}")]
pub async fn sign_in_as(
    session: SessionContext,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let user = UserId::new(path.into_inner())
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_user(&user)?;
    Ok(HttpResponse::Ok().finish())
}

/// Request that signs in as `user` through [`sign_in_as`].
pub fn sign_in(user: &str) -> TestRequest {
    TestRequest::get().uri(&format!("/test/sign-in/{user}"))
}

/// Extract the session cookie set by `response`.
pub fn session_cookie(response: &ServiceResponse) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Mocked driving ports; set expectations, then convert into state.
#[derive(Default)]
pub struct TestPorts {
    pub orders: MockOrderIntake,
    pub ledger: MockLedgerCommand,
    pub ledger_query: MockLedgerQuery,
    pub settlements: MockSettlementCommand,
    pub accounts: MockAccountCommand,
}

impl TestPorts {
    /// Wrap the mocks for `App::app_data`.
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            orders: Arc::new(self.orders),
            ledger: Arc::new(self.ledger),
            ledger_query: Arc::new(self.ledger_query),
            settlements: Arc::new(self.settlements),
            accounts: Arc::new(self.accounts),
        })
    }
}
