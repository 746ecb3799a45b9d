//! Domain primitives, aggregates, and use-case services.
//!
//! Purpose: define the strongly typed entities shared by the HTTP layer and
//! the outbound adapters. Types are immutable once constructed and document
//! their invariants in Rustdoc; parsing and normalisation happen in the
//! constructors so the rest of the crate only sees well-formed values.

pub mod auth;
pub mod campaign;
pub mod donation;
mod donation_service;
#[cfg(test)]
mod donation_service_tests;
pub mod error;
pub mod money;
pub mod ports;
pub mod post;
pub mod slug;
pub mod webhook;

pub use self::auth::{AdminCredentials, LoginCredentials, LoginValidationError};
pub use self::campaign::{CampaignProgress, FundraisingGoal, GoalMustBePositiveError};
pub use self::donation::{
    Donation, DonationReference, DonationSource, DonationValidationError, EmailAddress,
};
pub use self::donation_service::{DonationService, VerificationOutcome};
pub use self::error::{DomainError, DomainErrorValidationError, ErrorCode};
pub use self::money::{Amount, AmountError};
pub use self::post::{Post, PostDraft, PostValidationError, Tag};
pub use self::webhook::{
    ChargeNotification, SignatureError, WebhookEvent, WebhookParseError, WebhookSecret,
    verify_signature,
};

/// Convenient result alias for domain fallible operations.
pub type DomainResult<T> = Result<T, DomainError>;
