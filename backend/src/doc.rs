//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST surface:
//! donation endpoints, the gateway webhook, post cards, the admin surface,
//! and the health probes. The generated document feeds Swagger UI in debug
//! builds and the `openapi-dump` binary for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::admin::{AdminDonorsResponse, DonorRecord, LoginRequest};
use crate::inbound::http::donations::{
    DonorEntry, DonorsResponse, ProgressResponse, VerifyPaymentRequest,
};
use crate::inbound::http::error::ApiError;
use crate::inbound::http::posts::{PostCard, PostsResponse};

/// Enrich the generated document with the session cookie security scheme.
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
                "Session cookie issued by POST /admin/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Charity donation backend API",
        description = "Donation ledger, payment verification, post cards, and admin surface."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::donations::get_progress,
        crate::inbound::http::donations::get_donors,
        crate::inbound::http::donations::verify_payment,
        crate::inbound::http::webhook::paystack_webhook,
        crate::inbound::http::posts::list_posts,
        crate::inbound::http::admin::login,
        crate::inbound::http::admin::logout,
        crate::inbound::http::admin::list_donors,
        crate::inbound::http::admin::export_donors,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ApiError,
        ProgressResponse,
        DonorsResponse,
        DonorEntry,
        VerifyPaymentRequest,
        PostsResponse,
        PostCard,
        LoginRequest,
        AdminDonorsResponse,
        DonorRecord,
    )),
    tags(
        (name = "donations", description = "Donation progress, feed, and verification"),
        (name = "posts", description = "Blog post cards"),
        (name = "admin", description = "Session-authenticated admin surface"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
