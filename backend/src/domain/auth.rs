//! Admin authentication primitives.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to the login port.
//! Passwords are never stored: the configured admin password is reduced to a
//! SHA-256 fingerprint at startup and login attempts are compared by
//! fingerprint.

use std::fmt;

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials presented by a client.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    ///
    /// # Errors
    ///
    /// Returns the matching [`LoginValidationError`] variant for blank
    /// inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalised = username.trim();
        if normalised.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalised.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for account lookups.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Configured admin account, held as username plus password fingerprint.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password_fingerprint: [u8; 32],
}

impl AdminCredentials {
    /// Reduce a configured username/password pair to a comparable account.
    ///
    /// # Errors
    ///
    /// Returns the matching [`LoginValidationError`] variant for blank
    /// inputs.
    pub fn new(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalised = username.trim();
        if normalised.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalised.to_owned(),
            password_fingerprint: fingerprint(password),
        })
    }

    /// Configured admin username.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Whether presented credentials match this account.
    ///
    /// The password check compares fixed-length digests rather than the raw
    /// strings, so the comparison does not shortcut on the first differing
    /// password byte.
    #[must_use]
    pub fn matches(&self, presented: &LoginCredentials) -> bool {
        let username_ok = self.username == presented.username();
        let password_ok = self.password_fingerprint == fingerprint(presented.password());
        username_ok && password_ok
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password_fingerprint", &"***")
            .finish()
    }
}

fn fingerprint(password: &str) -> [u8; 32] {
    Sha256::digest(password.as_bytes()).into()
}
