//! Outbound adapters: gateway HTTP client, content files, preflight probes,
//! and persistence.

pub mod content;
pub mod paystack;
pub mod persistence;
pub mod probe;
