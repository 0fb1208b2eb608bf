//! OpenAPI documentation for the REST API.
//!
//! Registers every handler in [`crate::inbound::http`], the error schema
//! wrappers and the session cookie security scheme. Swagger UI serves the
//! document in debug builds.

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/user/register or /api/user/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Loyalty backend API",
        description = "Order intake, accrual settlement and points balance for signed-in users."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::orders::submit_order,
        crate::inbound::http::orders::list_orders,
        crate::inbound::http::balance::get_balance,
        crate::inbound::http::balance::withdraw,
        crate::inbound::http::balance::list_withdrawals,
        crate::inbound::http::settlements::apply_settlement,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "users", description = "Registration and login"),
        (name = "orders", description = "Order submission and history"),
        (name = "balance", description = "Points balance and withdrawals"),
        (name = "internal", description = "Callbacks from the accrual system"),
        (name = "health", description = "Probes for orchestration")
    )
)]
pub struct ApiDoc;
