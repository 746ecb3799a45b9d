//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use mockable::DefaultClock;

use crate::domain::ports::{
    FixtureImageProbe, FixturePaymentGateway, FixturePostCatalogue, MemoryDonationLedger,
    ConfiguredLoginService,
};
use crate::domain::{
    AdminCredentials, Amount, Donation, DonationService, FundraisingGoal, Post, WebhookSecret,
};

use super::state::HttpState;

/// Webhook secret used across handler tests.
pub const TEST_WEBHOOK_SECRET: &str = "whsec_test_1234";

/// Admin credentials accepted by the test login service.
pub const TEST_ADMIN: (&str, &str) = ("admin", "correct horse battery staple");

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Knobs for [`test_state`].
#[derive(Default)]
pub struct TestStateConfig {
    /// Donations pre-recorded in the ledger (newest first).
    pub seeded_donations: Vec<Donation>,
    /// Charges the fixture gateway knows about.
    pub gateway: FixturePaymentGateway,
    /// Posts served by the fixture catalogue.
    pub posts: Vec<Post>,
    /// Image probe behaviour.
    pub images: FixtureImageProbe,
}

/// Build an [`HttpState`] wired entirely to fixtures.
///
/// # Panics
///
/// Panics when the compiled-in test fixtures fail validation.
pub fn test_state(config: TestStateConfig) -> HttpState {
    let goal = FundraisingGoal::new(Amount::from_kobo(100_000).expect("non-negative"))
        .expect("positive goal");
    let donations = DonationService::new(
        Arc::new(MemoryDonationLedger::seeded(config.seeded_donations)),
        Arc::new(config.gateway),
        goal,
        Arc::new(DefaultClock),
    );
    let login = ConfiguredLoginService::new(
        AdminCredentials::new(TEST_ADMIN.0, TEST_ADMIN.1).expect("valid admin account"),
    );
    HttpState::new(
        donations,
        Arc::new(login),
        Arc::new(FixturePostCatalogue::new(config.posts)),
        Arc::new(config.images),
        WebhookSecret::new(TEST_WEBHOOK_SECRET).expect("non-empty secret"),
    )
}
