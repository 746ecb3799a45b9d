//! Charity website backend: donation ledger, gateway verification, signed
//! webhook intake, and the post catalogue service.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request-tracing middleware re-exported for app wiring.
pub use middleware::Trace;
