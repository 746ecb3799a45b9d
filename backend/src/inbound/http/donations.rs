//! Public donation endpoints.
//!
//! ```text
//! GET  /get-progress
//! GET  /get-donors
//! POST /verify-payment {"reference":"T685...","amount":5000}
//! ```
//!
//! Success envelopes carry `status: "success"`; a gateway answer that does
//! not confirm the claimed charge is a business rejection returned as
//! `status: "failed"` with HTTP 200, matching the site's original contract.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::money::Amount;
use crate::domain::{DomainError, DonationReference, VerificationOutcome};

use super::error::ApiResult;
use super::state::HttpState;

/// How many donors the public feed shows.
pub const RECENT_DONORS_LIMIT: usize = 5;

/// Response body for `GET /get-progress`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    /// Always `success`.
    #[schema(value_type = String, example = "success")]
    pub status: &'static str,
    /// Sum of recorded donations, in kobo.
    pub raised: Amount,
    /// Campaign target, in kobo.
    pub goal: Amount,
    /// Whole-number percent complete, capped at 100.
    pub percent: u8,
}

/// One entry of the public donor feed.
#[derive(Debug, Serialize, ToSchema)]
pub struct DonorEntry {
    /// Masked donor email (`gr***@example.com`).
    #[schema(example = "gr***@example.com")]
    pub email: String,
    /// Contribution amount in kobo.
    pub amount: Amount,
}

/// Response body for `GET /get-donors`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DonorsResponse {
    /// Always `success`.
    #[schema(value_type = String, example = "success")]
    pub status: &'static str,
    /// Most recent donors, newest first, emails masked.
    pub donors: Vec<DonorEntry>,
}

/// Request body for `POST /verify-payment`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct VerifyPaymentRequest {
    /// Gateway transaction reference handed back by the checkout widget.
    pub reference: String,
    /// Amount the client claims was charged, in kobo.
    pub amount: i64,
}

/// Campaign progress for the donation widget.
#[utoipa::path(
    get,
    path = "/get-progress",
    tags = ["donations"],
    security([]),
    responses(
        (status = 200, description = "Campaign progress", body = ProgressResponse),
        (status = 502, description = "Ledger unavailable"),
        (status = 500, description = "Internal server error")
    )
)]
#[get("/get-progress")]
pub async fn get_progress(state: web::Data<HttpState>) -> ApiResult<web::Json<ProgressResponse>> {
    let progress = state.donations.progress().await?;
    Ok(web::Json(ProgressResponse {
        status: "success",
        raised: progress.raised(),
        goal: progress.goal(),
        percent: progress.percent(),
    }))
}

/// Recent donors with masked emails.
#[utoipa::path(
    get,
    path = "/get-donors",
    tags = ["donations"],
    security([]),
    responses(
        (status = 200, description = "Recent donors", body = DonorsResponse),
        (status = 502, description = "Ledger unavailable"),
        (status = 500, description = "Internal server error")
    )
)]
#[get("/get-donors")]
pub async fn get_donors(state: web::Data<HttpState>) -> ApiResult<web::Json<DonorsResponse>> {
    let recent = state
        .donations
        .recent_donations(RECENT_DONORS_LIMIT)
        .await?;
    let donors = recent
        .iter()
        .map(|donation| DonorEntry {
            email: donation.email().masked(),
            amount: donation.amount(),
        })
        .collect();
    Ok(web::Json(DonorsResponse {
        status: "success",
        donors,
    }))
}

/// Verify a checkout charge against the gateway and record the donation.
#[utoipa::path(
    post,
    path = "/verify-payment",
    request_body = VerifyPaymentRequest,
    tags = ["donations"],
    security([]),
    responses(
        (status = 200, description = "Verification outcome (`success` or `failed`)"),
        (status = 400, description = "Missing or invalid reference/amount"),
        (status = 502, description = "Gateway unavailable"),
        (status = 500, description = "Internal server error")
    )
)]
#[post("/verify-payment")]
pub async fn verify_payment(
    state: web::Data<HttpState>,
    payload: web::Json<VerifyPaymentRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let reference = DonationReference::new(&request.reference).map_err(|error| {
        DomainError::invalid_request(error.to_string())
            .with_details(json!({ "field": "reference" }))
    })?;
    let amount = Amount::from_kobo(request.amount).map_err(|error| {
        DomainError::invalid_request(error.to_string()).with_details(json!({ "field": "amount" }))
    })?;
    if amount.is_zero() {
        return Err(DomainError::invalid_request("amount must be greater than zero")
            .with_details(json!({ "field": "amount" }))
            .into());
    }

    let outcome = state.donations.verify_and_record(reference, amount).await?;
    let response = match outcome {
        VerificationOutcome::Recorded(_) => {
            HttpResponse::Ok().json(json!({ "status": "success" }))
        }
        VerificationOutcome::Rejected { message } => {
            HttpResponse::Ok().json(json!({ "status": "failed", "message": message }))
        }
    };
    Ok(response)
}
