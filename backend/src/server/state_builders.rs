//! Builders assembling the HTTP state from settings.
//!
//! Every port picks its real adapter when the matching setting is present
//! and falls back to the in-memory/fixture implementation otherwise, so a
//! bare `cargo run` boots a working site.

use std::sync::Arc;

use actix_web::cookie::Key;
use chrono::{Duration, Utc};
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

use crate::domain::money::Amount;
use crate::domain::ports::{
    ConfiguredLoginService, DisabledLoginService, DonationRepository, FixturePaymentGateway,
    ImageProbe, LoginService, MemoryDonationLedger, PaymentGateway,
};
use crate::domain::{
    AdminCredentials, Donation, DonationReference, DonationService, DonationSource, EmailAddress,
    FundraisingGoal, WebhookSecret,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::content::JsonPostStore;
use crate::outbound::paystack::PaystackHttpGateway;
use crate::outbound::persistence::{DbPool, DieselDonationLedger};
use crate::outbound::probe::HttpImageProbe;
use crate::settings::AppSettings;

/// Failures raised while assembling the HTTP state.
#[derive(Debug, thiserror::Error)]
pub enum StateBuildError {
    /// The configured goal is not a positive amount.
    #[error("invalid fundraising goal: {message}")]
    InvalidGoal {
        /// Underlying error text.
        message: String,
    },
    /// The admin credentials failed validation.
    #[error("invalid admin credentials: {message}")]
    InvalidAdminCredentials {
        /// Underlying error text.
        message: String,
    },
    /// An outbound adapter could not be constructed.
    #[error("failed to build outbound adapter: {message}")]
    Adapter {
        /// Underlying error text.
        message: String,
    },
}

/// Assemble the HTTP state from settings and an optional database pool.
///
/// # Errors
///
/// Returns [`StateBuildError`] when a configured value fails validation or
/// an adapter cannot be constructed.
pub fn build_http_state(
    settings: &AppSettings,
    db_pool: Option<DbPool>,
) -> Result<HttpState, StateBuildError> {
    let goal_amount =
        Amount::from_kobo(settings.goal_kobo()).map_err(|error| StateBuildError::InvalidGoal {
            message: error.to_string(),
        })?;
    let goal = FundraisingGoal::new(goal_amount).map_err(|error| StateBuildError::InvalidGoal {
        message: error.to_string(),
    })?;

    let ledger = build_ledger(settings, db_pool);
    let gateway = build_gateway(settings)?;
    let login = build_login(settings)?;
    let webhook_secret = build_webhook_secret(settings)?;
    let images = build_image_probe(settings)?;
    let posts = Arc::new(JsonPostStore::new(settings.posts_path()));

    let donations = DonationService::new(ledger, gateway, goal, Arc::new(DefaultClock));
    let mut state = HttpState::new(donations, login, posts, images, webhook_secret);
    if let Some(placeholder) = settings.placeholder_image.as_deref() {
        state = state.with_placeholder_image(placeholder);
    }
    Ok(state)
}

fn build_ledger(settings: &AppSettings, db_pool: Option<DbPool>) -> Arc<dyn DonationRepository> {
    match db_pool {
        Some(pool) => {
            info!("donation ledger backed by PostgreSQL");
            Arc::new(DieselDonationLedger::new(pool))
        }
        None => {
            info!("donation ledger held in memory (no DATABASE_URL)");
            if settings.seed_demo_donors {
                Arc::new(MemoryDonationLedger::seeded(demo_donors()))
            } else {
                Arc::new(MemoryDonationLedger::new())
            }
        }
    }
}

fn build_gateway(
    settings: &AppSettings,
) -> Result<Arc<dyn PaymentGateway>, StateBuildError> {
    match settings.paystack_secret_key.as_deref() {
        Some(secret_key) => {
            let gateway = PaystackHttpGateway::new(secret_key).map_err(|error| {
                StateBuildError::Adapter {
                    message: error.to_string(),
                }
            })?;
            Ok(Arc::new(gateway))
        }
        None => {
            warn!("no gateway secret key configured; using the fixture gateway (dev only)");
            Ok(Arc::new(FixturePaymentGateway::new()))
        }
    }
}

fn build_login(settings: &AppSettings) -> Result<Arc<dyn LoginService>, StateBuildError> {
    match settings.admin_password.as_deref() {
        Some(password) => {
            let account = AdminCredentials::new(settings.admin_username(), password).map_err(
                |error| StateBuildError::InvalidAdminCredentials {
                    message: error.to_string(),
                },
            )?;
            Ok(Arc::new(ConfiguredLoginService::new(account)))
        }
        None => {
            warn!("no admin password configured; admin surface disabled");
            Ok(Arc::new(DisabledLoginService))
        }
    }
}

fn build_webhook_secret(settings: &AppSettings) -> Result<WebhookSecret, StateBuildError> {
    match settings.webhook_secret() {
        Some(secret) => {
            WebhookSecret::new(secret).map_err(|error| StateBuildError::Adapter {
                message: error.to_string(),
            })
        }
        None => {
            warn!("no webhook secret configured; webhook deliveries will be rejected");
            // A random per-boot secret nobody holds: every delivery fails
            // signature verification instead of being accepted unsigned.
            WebhookSecret::new(hex::encode(Key::generate().master())).map_err(|error| {
                StateBuildError::Adapter {
                    message: error.to_string(),
                }
            })
        }
    }
}

fn build_image_probe(settings: &AppSettings) -> Result<Arc<dyn ImageProbe>, StateBuildError> {
    let base_url = match settings.site_base_url.as_deref() {
        Some(raw) => Some(Url::parse(raw).map_err(|error| StateBuildError::Adapter {
            message: format!("site base URL: {error}"),
        })?),
        None => None,
    };
    let probe = HttpImageProbe::new(base_url).map_err(|error| StateBuildError::Adapter {
        message: error.to_string(),
    })?;
    Ok(Arc::new(probe))
}

/// The two demo donors the original site shipped with.
fn demo_donors() -> Vec<Donation> {
    let clock = DefaultClock;
    let entries = [
        ("john@example.com", 5000_i64, "demo-john"),
        ("mary@example.com", 10_000_i64, "demo-mary"),
    ];
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, (email, kobo, reference))| {
            let offset = Duration::minutes(i64::try_from(index).unwrap_or(0));
            Some(Donation::new(
                Uuid::new_v4(),
                EmailAddress::new(email).ok()?,
                Amount::from_kobo(kobo).ok()?,
                DonationReference::new(reference).ok()?,
                DonationSource::Seed,
                clock
                    .utc()
                    .checked_sub_signed(offset)
                    .unwrap_or_else(Utc::now),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for fallback wiring.

    use super::*;

    fn bare_settings() -> AppSettings {
        use std::ffi::OsString;

        use ortho_config::OrthoConfig;

        let _guard = env_lock::lock_env([
            ("CHARITY_DATABASE_URL", None::<String>),
            ("CHARITY_PAYSTACK_SECRET_KEY", None::<String>),
            ("CHARITY_ADMIN_PASSWORD", None::<String>),
            ("CHARITY_GOAL_KOBO", None::<String>),
            ("CHARITY_SEED_DEMO_DONORS", None::<String>),
        ]);
        AppSettings::load_from_iter([OsString::from("backend")]).expect("config should load")
    }

    #[tokio::test]
    async fn bare_settings_boot_a_working_state() {
        let state = build_http_state(&bare_settings(), None).expect("state builds");
        let progress = state.donations.progress().await.expect("progress readable");
        assert!(progress.raised().is_zero());
    }

    #[tokio::test]
    async fn demo_donors_seed_the_memory_ledger() {
        let mut settings = bare_settings();
        settings.seed_demo_donors = true;
        let state = build_http_state(&settings, None).expect("state builds");
        let progress = state.donations.progress().await.expect("progress readable");
        assert_eq!(progress.raised().kobo(), 15_000);
    }

    #[test]
    fn zero_goals_fail_the_build() {
        let mut settings = bare_settings();
        settings.goal_kobo = Some(0);
        let error = build_http_state(&settings, None).expect_err("goal must be positive");
        assert!(matches!(error, StateBuildError::InvalidGoal { .. }));
    }
}
