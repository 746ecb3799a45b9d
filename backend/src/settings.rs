//! Application settings loaded via OrthoConfig.
//!
//! Every knob can come from CLI flags, the environment (`CHARITY_` prefix),
//! or a config file, in that precedence order. Accessors supply defaults so
//! the server boots with nothing configured: an in-memory ledger, the
//! fixture gateway, and a disabled admin surface.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Default listen address (the port the original deployment used).
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// Default fundraising goal in kobo.
pub const DEFAULT_GOAL_KOBO: i64 = 100_000;

/// Default catalogue file path, relative to the working directory.
pub const DEFAULT_POSTS_PATH: &str = "posts.json";

/// Configuration values for the donation backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CHARITY")]
pub struct AppSettings {
    /// Socket address to bind, `host:port`.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; absent means the in-memory ledger.
    pub database_url: Option<String>,
    /// Gateway secret key (`sk_...`); absent means the fixture gateway.
    pub paystack_secret_key: Option<String>,
    /// Webhook signing secret override; defaults to the gateway secret key,
    /// which is what the gateway signs callbacks with.
    pub webhook_secret: Option<String>,
    /// Fundraising goal in kobo.
    pub goal_kobo: Option<i64>,
    /// Path to the `posts.json` catalogue.
    pub posts_path: Option<PathBuf>,
    /// Public base URL used to resolve site-relative image paths.
    pub site_base_url: Option<String>,
    /// Placeholder image substituted for unreachable post images.
    pub placeholder_image: Option<String>,
    /// Admin username.
    pub admin_username: Option<String>,
    /// Admin password; absent disables the admin surface.
    pub admin_password: Option<String>,
    /// File holding the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Allow an ephemeral session key outside debug builds.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Set the `Secure` flag on session cookies.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
    /// Seed the in-memory ledger with demo donors on boot.
    #[ortho_config(default = false)]
    pub seed_demo_donors: bool,
}

impl AppSettings {
    /// Listen address, falling back to [`DEFAULT_BIND_ADDR`].
    #[must_use]
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Fundraising goal in kobo, falling back to [`DEFAULT_GOAL_KOBO`].
    #[must_use]
    pub fn goal_kobo(&self) -> i64 {
        self.goal_kobo.unwrap_or(DEFAULT_GOAL_KOBO)
    }

    /// Catalogue path, falling back to [`DEFAULT_POSTS_PATH`].
    #[must_use]
    pub fn posts_path(&self) -> PathBuf {
        self.posts_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_POSTS_PATH))
    }

    /// Webhook signing secret: the explicit override when present,
    /// otherwise the gateway secret key.
    #[must_use]
    pub fn webhook_secret(&self) -> Option<&str> {
        self.webhook_secret
            .as_deref()
            .or(self.paystack_secret_key.as_deref())
    }

    /// Admin username, defaulting to `admin`.
    #[must_use]
    pub fn admin_username(&self) -> &str {
        self.admin_username.as_deref().unwrap_or("admin")
    }

    /// Session key file path, defaulting to the conventional secret mount.
    #[must_use]
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("/var/run/secrets/session_key"))
    }
}
