//! Landlord accounts backend.
//!
//! Hexagonal layout: [`domain`] holds the types, ports and services,
//! [`inbound`] the HTTP adapter and [`outbound`] the PostgreSQL, hashing and
//! notification adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
