//! HTTP inbound adapter exposing the site's REST endpoints.

pub mod admin;
pub mod donations;
pub mod error;
pub mod health;
pub mod posts;
pub mod session;
pub mod state;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod webhook;

pub use error::{ApiError, ApiResult};
