//! Backend entry-point: loads settings, wires adapters, and serves the
//! donation and content endpoints.

use std::net::SocketAddr;

use actix_web::cookie::Key;
use color_eyre::eyre::{WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use backend::server::{ServerConfig, build_http_state, create_server, default_same_site};
use backend::settings::AppSettings;

#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    // Environment and config-file layers drive everything; argv is passed
    // through so future CLI flags merge in the usual precedence order.
    let settings =
        AppSettings::load_from_iter(std::env::args_os()).wrap_err("failed to load settings")?;
    let bind_addr: SocketAddr = settings
        .bind_addr()
        .parse()
        .wrap_err_with(|| format!("invalid bind address {}", settings.bind_addr()))?;

    let db_pool = match settings.database_url.as_deref() {
        Some(url) => {
            run_pending_migrations(url)
                .await
                .wrap_err("failed to apply database migrations")?;
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .wrap_err("failed to build the database pool")?;
            Some(pool)
        }
        None => None,
    };

    let key = load_session_key(&settings)?;
    let state = build_http_state(&settings, db_pool).wrap_err("failed to assemble HTTP state")?;
    let config = ServerConfig::new(key, settings.cookie_secure, default_same_site(), bind_addr);

    let handles = create_server(&config, state)
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    handles.health.mark_ready();
    info!(%bind_addr, "server listening");
    handles.server.await.wrap_err("server terminated abnormally")
}

/// Load the session signing key, allowing an ephemeral key only in debug
/// builds or when explicitly permitted.
fn load_session_key(settings: &AppSettings) -> color_eyre::Result<Key> {
    let key_path = settings.session_key_file();
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(error) => {
            if cfg!(debug_assertions) || settings.session_allow_ephemeral {
                warn!(path = %key_path.display(), %error, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(eyre!(
                    "failed to read session key at {}: {error}",
                    key_path.display()
                ))
            }
        }
    }
}
