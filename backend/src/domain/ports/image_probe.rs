//! Driven port for image URL preflight checks.

use std::collections::HashSet;

use async_trait::async_trait;

/// Driven port answering "does this image URL resolve?".
///
/// Probes are advisory: any failure (timeout, transport error, non-success
/// status) counts as missing and the caller substitutes a placeholder. There
/// is deliberately no error type.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageProbe: Send + Sync {
    /// Whether the URL currently resolves to an image.
    async fn exists(&self, url: &str) -> bool;
}

/// Inline `data:` URLs embed their payload and never need probing.
#[must_use]
pub fn needs_probe(url: &str) -> bool {
    !url.starts_with("data:")
}

/// Probe for tests that treats a configured set of URLs as missing.
#[derive(Debug, Default)]
pub struct FixtureImageProbe {
    missing: HashSet<String>,
}

impl FixtureImageProbe {
    /// Create a probe that reports every URL as present.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a URL as missing.
    #[must_use]
    pub fn with_missing(mut self, url: &str) -> Self {
        self.missing.insert(url.to_owned());
        self
    }
}

#[async_trait]
impl ImageProbe for FixtureImageProbe {
    async fn exists(&self, url: &str) -> bool {
        !self.missing.contains(url)
    }
}
