//! Gateway webhook endpoint.
//!
//! ```text
//! POST /paystack-webhook  (x-paystack-signature: <hex HMAC-SHA512>)
//! ```
//!
//! The handler reads the raw body bytes: the signature covers the payload
//! exactly as sent, so the body must not pass through JSON extraction
//! before verification.

use actix_web::{HttpRequest, HttpResponse, post, web};
use serde_json::json;
use tracing::{debug, info};

use crate::domain::{DomainError, WebhookEvent, verify_signature};

use super::error::ApiResult;
use super::state::HttpState;

/// Header carrying the gateway's HMAC digest.
pub const SIGNATURE_HEADER: &str = "x-paystack-signature";

/// Receive a signed gateway event and record successful charges.
#[utoipa::path(
    post,
    path = "/paystack-webhook",
    tags = ["donations"],
    security([]),
    request_body(content = String, description = "Raw gateway event payload", content_type = "application/json"),
    responses(
        (status = 200, description = "Event acknowledged"),
        (status = 400, description = "Body is not a usable event"),
        (status = 401, description = "Missing or invalid signature"),
        (status = 502, description = "Ledger unavailable"),
        (status = 500, description = "Internal server error")
    )
)]
#[post("/paystack-webhook")]
pub async fn paystack_webhook(
    state: web::Data<HttpState>,
    request: HttpRequest,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let signature = request
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| DomainError::unauthorized("missing webhook signature"))?;

    verify_signature(&state.webhook_secret, body.as_ref(), signature)
        .map_err(|_| DomainError::unauthorized("invalid webhook signature"))?;

    match WebhookEvent::parse(body.as_ref())
        .map_err(|error| DomainError::invalid_request(error.to_string()))?
    {
        WebhookEvent::ChargeSuccess(charge) => {
            let donation = state.donations.record_webhook_charge(charge).await?;
            info!(
                reference = %donation.reference(),
                amount = donation.amount().kobo(),
                "webhook charge recorded"
            );
        }
        WebhookEvent::Ignored { event } => {
            debug!(%event, "webhook event acknowledged without action");
        }
    }

    Ok(HttpResponse::Ok().json(json!({ "status": "success" })))
}

#[cfg(test)]
mod tests {
    //! Endpoint coverage with real HMAC signatures.

    use actix_web::{App, http::StatusCode, test};
    use hmac::{Hmac, Mac};
    use sha2::Sha512;

    use crate::inbound::http::test_utils::{TEST_WEBHOOK_SECRET, TestStateConfig, test_state};

    use super::*;

    const CHARGE_BODY: &[u8] = br#"{"event":"charge.success","data":{"reference":"hook-1","amount":2500,"customer":{"email":"mary@example.com"}}}"#;

    fn sign(body: &[u8], secret: &str) -> String {
        let mut mac =
            Hmac::<Sha512>::new_from_slice(secret.as_bytes()).expect("any key length works");
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    async fn call(
        body: &'static [u8],
        signature: Option<String>,
    ) -> (StatusCode, serde_json::Value, web::Data<HttpState>) {
        let state = web::Data::new(test_state(TestStateConfig::default()));
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(paystack_webhook),
        )
        .await;

        let mut request = test::TestRequest::post()
            .uri("/paystack-webhook")
            .set_payload(body);
        if let Some(signature) = signature {
            request = request.insert_header((SIGNATURE_HEADER, signature));
        }
        let response = test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let bytes = test::read_body(response).await;
        let value = serde_json::from_slice(&bytes).expect("JSON body");
        (status, value, state)
    }

    #[actix_web::test]
    async fn signed_charge_events_are_recorded() {
        let signature = sign(CHARGE_BODY, TEST_WEBHOOK_SECRET);
        let (status, body, state) = call(CHARGE_BODY, Some(signature)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");

        let recent = state
            .donations
            .recent_donations(5)
            .await
            .expect("feed readable");
        assert_eq!(recent.len(), 1);
        assert_eq!(
            recent.first().map(|d| d.reference().as_str()),
            Some("hook-1")
        );
    }

    #[actix_web::test]
    async fn missing_signatures_are_unauthorised() {
        let (status, body, state) = call(CHARGE_BODY, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["status"], "error");
        let recent = state
            .donations
            .recent_donations(5)
            .await
            .expect("feed readable");
        assert!(recent.is_empty(), "unsigned events must not be recorded");
    }

    #[actix_web::test]
    async fn wrong_secret_signatures_are_unauthorised() {
        let signature = sign(CHARGE_BODY, "some-other-secret");
        let (status, _, state) = call(CHARGE_BODY, Some(signature)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let recent = state
            .donations
            .recent_donations(5)
            .await
            .expect("feed readable");
        assert!(recent.is_empty());
    }

    #[actix_web::test]
    async fn other_event_types_are_acknowledged_without_recording() {
        const OTHER_BODY: &[u8] = br#"{"event":"transfer.success","data":null}"#;
        let signature = sign(OTHER_BODY, TEST_WEBHOOK_SECRET);
        let (status, body, state) = call(OTHER_BODY, Some(signature)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        let recent = state
            .donations
            .recent_donations(5)
            .await
            .expect("feed readable");
        assert!(recent.is_empty());
    }

    #[actix_web::test]
    async fn signed_but_unusable_bodies_are_bad_requests() {
        const BAD_BODY: &[u8] = br#"{"event":"charge.success"}"#;
        let signature = sign(BAD_BODY, TEST_WEBHOOK_SECRET);
        let (status, body, _) = call(BAD_BODY, Some(signature)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
    }
}
