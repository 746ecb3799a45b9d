//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub use state_builders::{StateBuildError, build_http_state};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::SameSite;
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};

#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::admin::{export_donors, list_donors, login, logout};
use crate::inbound::http::donations::{get_donors, get_progress, verify_payment};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::posts::list_posts;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::webhook::paystack_webhook;
use crate::middleware::Trace;

/// A bound server plus the shared health state to mark ready once
/// startup work completes.
pub struct ServerHandles {
    /// The bound Actix server, ready to `.await`.
    pub server: Server,
    /// Health state shared with the readiness probe.
    pub health: web::Data<HealthState>,
}

/// Build and bind the HTTP server.
///
/// # Errors
///
/// Returns the bind error when the configured address is unavailable.
pub fn create_server(config: &ServerConfig, state: HttpState) -> std::io::Result<ServerHandles> {
    let health = web::Data::new(HealthState::new());
    let server_health = health.clone();
    let key = config.key.clone();
    let cookie_secure = config.cookie_secure;
    let same_site = config.same_site;

    let server = HttpServer::new(move || {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(cookie_secure)
            .cookie_http_only(true)
            .cookie_same_site(same_site)
            .build();

        let app = App::new()
            .app_data(server_health.clone())
            .app_data(web::Data::new(state.clone()))
            .wrap(session)
            .wrap(Trace)
            .service(get_progress)
            .service(get_donors)
            .service(verify_payment)
            .service(paystack_webhook)
            .service(list_posts)
            .service(login)
            .service(logout)
            .service(list_donors)
            .service(export_donors)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app = app.service(
            SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );

        #[cfg(feature = "metrics")]
        let app = app.wrap(make_metrics());

        app
    })
    .bind(config.bind_addr())?;

    Ok(ServerHandles {
        server: server.run(),
        health,
    })
}

/// Default cookie policy used by `main`.
#[must_use]
pub fn default_same_site() -> SameSite {
    SameSite::Lax
}

#[cfg(feature = "metrics")]
fn make_metrics() -> actix_web_prom::PrometheusMetrics {
    actix_web_prom::PrometheusMetricsBuilder::new("charity")
        .endpoint("/metrics")
        .build()
        .expect("configure Prometheus metrics")
}
