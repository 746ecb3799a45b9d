//! Reqwest-backed image preflight probe.
//!
//! Issues a `HEAD` request per image URL with a short timeout. The probe is
//! advisory only: every failure mode collapses to "missing" and the caller
//! substitutes a placeholder, so there is no error channel.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::domain::ports::{ImageProbe, needs_probe};

/// Preflight timeout matching the site's original loader.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// HTTP image probe with an optional base for site-relative URLs.
pub struct HttpImageProbe {
    client: Client,
    base_url: Option<Url>,
}

impl HttpImageProbe {
    /// Build a probe with the default timeout.
    ///
    /// `base_url` resolves site-relative image paths (`images/blog1.jpg`);
    /// without one, relative paths are assumed to be locally served assets
    /// and pass unprobed.
    ///
    /// # Errors
    ///
    /// Returns the reqwest error when the client cannot be constructed.
    pub fn new(base_url: Option<Url>) -> Result<Self, reqwest::Error> {
        Self::with_timeout(base_url, DEFAULT_PROBE_TIMEOUT)
    }

    /// Build a probe with an explicit timeout.
    ///
    /// # Errors
    ///
    /// Returns the reqwest error when the client cannot be constructed.
    pub fn with_timeout(
        base_url: Option<Url>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn resolve(&self, url: &str) -> Option<Url> {
        match Url::parse(url) {
            Ok(absolute) => Some(absolute),
            Err(_) => self.base_url.as_ref().and_then(|base| base.join(url).ok()),
        }
    }
}

#[async_trait]
impl ImageProbe for HttpImageProbe {
    async fn exists(&self, url: &str) -> bool {
        if !needs_probe(url) {
            return true;
        }
        let Some(target) = self.resolve(url) else {
            // No base configured for a relative path: treat it as a locally
            // served asset rather than flagging every card as missing.
            return true;
        };

        match self.client.head(target).send().await {
            Ok(response) => response.status().is_success(),
            Err(error) => {
                debug!(%url, %error, "image preflight failed");
                false
            }
        }
    }
}
