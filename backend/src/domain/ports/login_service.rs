//! Driving port for admin login.
//!
//! Inbound adapters call this to authenticate credentials without knowing
//! the backing account store. HTTP handler tests substitute a double
//! instead of wiring configuration.

use async_trait::async_trait;

use crate::domain::{AdminCredentials, DomainError, LoginCredentials};

/// Domain use-case port for admin authentication.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated admin username.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<String, DomainError>;
}

/// Login service backed by the configured admin account.
#[derive(Debug, Clone)]
pub struct ConfiguredLoginService {
    account: AdminCredentials,
}

impl ConfiguredLoginService {
    /// Create a service accepting exactly the configured account.
    #[must_use]
    pub fn new(account: AdminCredentials) -> Self {
        Self { account }
    }
}

#[async_trait]
impl LoginService for ConfiguredLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<String, DomainError> {
        if self.account.matches(credentials) {
            Ok(self.account.username().to_owned())
        } else {
            Err(DomainError::unauthorized("invalid credentials"))
        }
    }
}

/// Login service used when no admin password is configured.
///
/// Rejects every attempt, so the admin surface stays unreachable instead of
/// falling back to a guessable default.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledLoginService;

#[async_trait]
impl LoginService for DisabledLoginService {
    async fn authenticate(&self, _credentials: &LoginCredentials) -> Result<String, DomainError> {
        Err(DomainError::unauthorized(
            "admin login is not configured on this install",
        ))
    }
}
