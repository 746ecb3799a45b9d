//! Paystack outbound adapter.

mod dto;
mod http_gateway;

pub use http_gateway::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, PaystackHttpGateway};
