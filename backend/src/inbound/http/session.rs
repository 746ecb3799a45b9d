//! Session helpers keeping HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix session so admin handlers deal only in domain-friendly
//! operations: persisting the authenticated admin, requiring one, and
//! purging the session on logout.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::DomainError;

pub(crate) const ADMIN_USER_KEY: &str = "admin_user";

/// Newtype wrapper exposing higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a wrapper from the underlying Actix session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated admin username in the session cookie.
    ///
    /// # Errors
    ///
    /// Returns an internal [`DomainError`] when the session backend fails.
    pub fn persist_admin(&self, username: &str) -> Result<(), DomainError> {
        self.0
            .insert(ADMIN_USER_KEY, username)
            .map_err(|error| DomainError::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the authenticated admin username, if present.
    ///
    /// # Errors
    ///
    /// Returns an internal [`DomainError`] when the session backend fails.
    pub fn admin(&self) -> Result<Option<String>, DomainError> {
        let value = self
            .0
            .get::<String>(ADMIN_USER_KEY)
            .map_err(|error| DomainError::internal(format!("failed to read session: {error}")))?;
        Ok(value.filter(|username| !username.trim().is_empty()))
    }

    /// Require an authenticated admin or return `401 Unauthorized`.
    ///
    /// # Errors
    ///
    /// Returns an unauthorised [`DomainError`] when no admin is logged in.
    pub fn require_admin(&self) -> Result<String, DomainError> {
        self.admin()?
            .ok_or_else(|| DomainError::unauthorized("admin login required"))
    }

    /// Purge the session, logging the admin out.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
