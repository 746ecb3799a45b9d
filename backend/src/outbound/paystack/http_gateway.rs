//! Reqwest-backed payment gateway adapter.
//!
//! This adapter owns transport details only: request construction, timeout
//! and HTTP error mapping, and JSON decoding into the domain charge. The
//! secret key never appears in logs or error text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;
use zeroize::Zeroizing;

use super::dto::VerifyResponseDto;
use crate::domain::DonationReference;
use crate::domain::ports::{PaymentGateway, PaymentGatewayError, VerifiedCharge};

/// Default verify endpoint base.
pub const DEFAULT_BASE_URL: &str = "https://api.paystack.co/";

/// Default outbound request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Gateway adapter performing authenticated GET requests against the
/// hosted verify endpoint.
pub struct PaystackHttpGateway {
    client: Client,
    base_url: Url,
    secret_key: Zeroizing<String>,
}

impl PaystackHttpGateway {
    /// Build an adapter against the default hosted endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or
    /// the default base URL fails to parse.
    pub fn new(secret_key: impl Into<String>) -> Result<Self, PaymentGatewayError> {
        let base_url = Url::parse(DEFAULT_BASE_URL)
            .map_err(|error| PaymentGatewayError::transport(error.to_string()))?;
        Self::with_endpoint(base_url, secret_key, DEFAULT_TIMEOUT)
    }

    /// Build an adapter with an explicit endpoint and request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_endpoint(
        base_url: Url,
        secret_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PaymentGatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| PaymentGatewayError::transport(error.to_string()))?;
        Ok(Self {
            client,
            base_url,
            secret_key: Zeroizing::new(secret_key.into()),
        })
    }

    fn verify_url(&self, reference: &DonationReference) -> Result<Url, PaymentGatewayError> {
        self.base_url
            .join(&format!("transaction/verify/{reference}"))
            .map_err(|error| PaymentGatewayError::transport(error.to_string()))
    }
}

#[async_trait]
impl PaymentGateway for PaystackHttpGateway {
    async fn verify(
        &self,
        reference: &DonationReference,
    ) -> Result<VerifiedCharge, PaymentGatewayError> {
        let url = self.verify_url(reference)?;
        let response = self
            .client
            .get(url)
            .bearer_auth(self.secret_key.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        decode_charge(body.as_ref())
    }
}

fn decode_charge(body: &[u8]) -> Result<VerifiedCharge, PaymentGatewayError> {
    let decoded: VerifyResponseDto = serde_json::from_slice(body).map_err(|error| {
        PaymentGatewayError::decode(format!("invalid verify JSON payload: {error}"))
    })?;
    decoded
        .into_verified_charge()
        .map_err(PaymentGatewayError::decode)
}

fn map_transport_error(error: reqwest::Error) -> PaymentGatewayError {
    // reqwest error text can embed the request URL; that is fine here, the
    // secret travels in a header.
    if error.is_timeout() {
        PaymentGatewayError::timeout(error.to_string())
    } else {
        PaymentGatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PaymentGatewayError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => PaymentGatewayError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            PaymentGatewayError::timeout(message)
        }
        _ if status.is_client_error() => PaymentGatewayError::invalid_reference(message),
        _ => PaymentGatewayError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network gateway mapping helpers.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS, "RateLimited")]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, "Timeout")]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "Timeout")]
    #[case::not_found(StatusCode::NOT_FOUND, "InvalidReference")]
    #[case::bad_request(StatusCode::BAD_REQUEST, "InvalidReference")]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "Transport")]
    fn statuses_map_to_expected_errors(#[case] status: StatusCode, #[case] expected: &str) {
        let error = map_status_error(status, br#"{"status":false}"#);
        let matched = match expected {
            "RateLimited" => matches!(error, PaymentGatewayError::RateLimited { .. }),
            "Timeout" => matches!(error, PaymentGatewayError::Timeout { .. }),
            "InvalidReference" => matches!(error, PaymentGatewayError::InvalidReference { .. }),
            "Transport" => matches!(error, PaymentGatewayError::Transport { .. }),
            other => panic!("unsupported expectation: {other}"),
        };
        assert!(matched, "{status} should map to {expected}, got {error:?}");
    }

    #[test]
    fn status_messages_carry_a_compact_body_preview() {
        let error = map_status_error(StatusCode::BAD_REQUEST, b"{\n  \"status\": false\n}");
        let PaymentGatewayError::InvalidReference { message } = error else {
            panic!("expected InvalidReference");
        };
        assert_eq!(message, "status 400: { \"status\": false }");
    }

    #[test]
    fn long_previews_are_truncated() {
        let body = "x".repeat(500);
        let error = map_status_error(StatusCode::INTERNAL_SERVER_ERROR, body.as_bytes());
        let PaymentGatewayError::Transport { message } = error else {
            panic!("expected Transport");
        };
        assert!(message.ends_with("..."));
    }

    #[test]
    fn decode_rejects_non_json_bodies() {
        let error = decode_charge(b"<html>oops</html>").expect_err("body must fail");
        assert!(matches!(error, PaymentGatewayError::Decode { .. }));
    }

    #[test]
    fn verify_urls_embed_the_reference() {
        let gateway = PaystackHttpGateway::new("sk_test_x").expect("client builds");
        let reference = DonationReference::new("T685312322670516").expect("valid reference");
        let url = gateway.verify_url(&reference).expect("url joins");
        assert_eq!(
            url.as_str(),
            "https://api.paystack.co/transaction/verify/T685312322670516"
        );
    }
}
