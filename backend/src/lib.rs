//! Loyalty points backend: order intake, settlement and balance accounting.
//!
//! The crate is laid out hexagonally. [`domain`] holds entities, services and
//! ports; [`inbound`] adapts HTTP requests onto driving ports; [`outbound`]
//! implements driven ports over PostgreSQL, memory, HTTP and Argon2.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
