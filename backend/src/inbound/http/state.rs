//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend
//! only on domain ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{ImageProbe, LoginService, PostCatalogue};
use crate::domain::{DonationService, WebhookSecret};

/// Placeholder shown for posts whose image URL fails its preflight.
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "https://picsum.photos/800/450?random=999";

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Donation use-cases (progress, feed, verification, webhook).
    pub donations: DonationService,
    /// Admin authentication port.
    pub login: Arc<dyn LoginService>,
    /// Post catalogue port.
    pub posts: Arc<dyn PostCatalogue>,
    /// Image preflight port.
    pub images: Arc<dyn ImageProbe>,
    /// Shared secret authenticating gateway webhooks.
    pub webhook_secret: WebhookSecret,
    /// Placeholder image substituted for unreachable images.
    pub placeholder_image: String,
}

impl std::fmt::Debug for HttpState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpState")
            .field("donations", &"..")
            .field("login", &"..")
            .field("posts", &"..")
            .field("images", &"..")
            .field("webhook_secret", &self.webhook_secret)
            .field("placeholder_image", &self.placeholder_image)
            .finish()
    }
}

impl HttpState {
    /// Assemble the handler state from its ports.
    #[must_use]
    pub fn new(
        donations: DonationService,
        login: Arc<dyn LoginService>,
        posts: Arc<dyn PostCatalogue>,
        images: Arc<dyn ImageProbe>,
        webhook_secret: WebhookSecret,
    ) -> Self {
        Self {
            donations,
            login,
            posts,
            images,
            webhook_secret,
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_owned(),
        }
    }

    /// Override the placeholder image URL.
    #[must_use]
    pub fn with_placeholder_image(mut self, url: impl Into<String>) -> Self {
        self.placeholder_image = url.into();
        self
    }
}
