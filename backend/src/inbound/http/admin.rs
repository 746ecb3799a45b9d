//! Admin endpoints behind the cookie session.
//!
//! ```text
//! POST /admin/login {"username":"...","password":"..."}
//! POST /admin/logout
//! GET  /admin/donors?cursor=<token>&limit=20
//! GET  /admin/export
//! ```
//!
//! Unlike the public feed, admin listings expose full donor records; the
//! export streams the whole ledger as CSV.

use actix_web::{HttpResponse, get, http::header, post, web};
use chrono::{DateTime, SecondsFormat, Utc};
use pagination::{Cursor, Page, clamp_limit};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::money::Amount;
use crate::domain::{
    Donation, DomainError, DonationSource, LoginCredentials, LoginValidationError,
};

use super::error::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;

/// Default page size for the admin donor listing.
pub const DEFAULT_ADMIN_PAGE_SIZE: usize = 20;

/// Upper bound on one admin listing page.
pub const MAX_ADMIN_PAGE_SIZE: usize = 200;

/// Cursor fingerprint for the admin donor listing (no query axes).
const DONORS_FINGERPRINT: &str = "admin-donors";

/// Request body for `POST /admin/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    /// Admin username.
    pub username: String,
    /// Admin password.
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Query parameters for `GET /admin/donors`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DonorsQuery {
    /// Continuation token from a previous page.
    pub cursor: Option<String>,
    /// Page size (defaults to 20, capped at 200).
    pub limit: Option<usize>,
}

/// One full donor record in the admin listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonorRecord {
    /// Ledger row identifier.
    pub id: Uuid,
    /// Full donor email address.
    pub email: String,
    /// Contribution amount in kobo.
    pub amount: Amount,
    /// Gateway transaction reference.
    pub reference: String,
    /// How the donation entered the ledger.
    pub source: DonationSource,
    /// When the donation was recorded.
    pub created_at: DateTime<Utc>,
}

impl DonorRecord {
    fn from_domain(donation: &Donation) -> Self {
        Self {
            id: donation.id(),
            email: donation.email().as_str().to_owned(),
            amount: donation.amount(),
            reference: donation.reference().as_str().to_owned(),
            source: donation.source(),
            created_at: donation.created_at(),
        }
    }
}

/// Response body for `GET /admin/donors`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminDonorsResponse {
    /// Always `success`.
    #[schema(value_type = String, example = "success")]
    pub status: &'static str,
    /// Full donor records, newest first.
    pub donors: Vec<DonorRecord>,
    /// Total ledger entries.
    pub total: usize,
    /// Entries still undelivered after this page.
    pub remaining: usize,
    /// Token for the next page, absent once exhausted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Authenticate the admin and establish a session.
#[utoipa::path(
    post,
    path = "/admin/login",
    request_body = LoginRequest,
    tags = ["admin"],
    security([]),
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
#[post("/admin/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let admin = state.login.authenticate(&credentials).await?;
    session.persist_admin(&admin)?;
    Ok(HttpResponse::Ok().json(json!({ "status": "success" })))
}

fn map_login_validation_error(err: LoginValidationError) -> DomainError {
    match err {
        LoginValidationError::EmptyUsername => {
            DomainError::invalid_request("username must not be empty")
                .with_details(json!({ "field": "username" }))
        }
        LoginValidationError::EmptyPassword => {
            DomainError::invalid_request("password must not be empty")
                .with_details(json!({ "field": "password" }))
        }
    }
}

/// Drop the admin session.
#[utoipa::path(
    post,
    path = "/admin/logout",
    tags = ["admin"],
    responses(
        (status = 200, description = "Session cleared"),
        (status = 500, description = "Internal server error")
    )
)]
#[post("/admin/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.clear();
    Ok(HttpResponse::Ok().json(json!({ "status": "success" })))
}

/// Full donor records, newest first, paginated.
#[utoipa::path(
    get,
    path = "/admin/donors",
    params(DonorsQuery),
    tags = ["admin"],
    responses(
        (status = 200, description = "One page of donor records", body = AdminDonorsResponse),
        (status = 400, description = "Invalid cursor"),
        (status = 401, description = "Admin login required"),
        (status = 502, description = "Ledger unavailable"),
        (status = 500, description = "Internal server error")
    )
)]
#[get("/admin/donors")]
pub async fn list_donors(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<DonorsQuery>,
) -> ApiResult<web::Json<AdminDonorsResponse>> {
    session.require_admin()?;
    let query = query.into_inner();

    let cursor = match query.cursor.as_deref() {
        Some(token) => Cursor::decode(token, DONORS_FINGERPRINT).map_err(|error| {
            DomainError::invalid_request(error.to_string())
                .with_details(json!({ "field": "cursor" }))
        })?,
        None => Cursor::initial(DONORS_FINGERPRINT),
    };
    let limit = clamp_limit(query.limit, DEFAULT_ADMIN_PAGE_SIZE, MAX_ADMIN_PAGE_SIZE);

    let donations = state.donations.all_donations().await?;
    let records: Vec<DonorRecord> = donations.iter().map(DonorRecord::from_domain).collect();
    let page = Page::paginate(records, &cursor, limit);

    Ok(web::Json(AdminDonorsResponse {
        status: "success",
        donors: page.items,
        total: page.total,
        remaining: page.remaining,
        next_cursor: page.next_cursor,
    }))
}

/// Export the full ledger as CSV.
#[utoipa::path(
    get,
    path = "/admin/export",
    tags = ["admin"],
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv"),
        (status = 401, description = "Admin login required"),
        (status = 502, description = "Ledger unavailable"),
        (status = 500, description = "Internal server error")
    )
)]
#[get("/admin/export")]
pub async fn export_donors(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let donations = state.donations.all_donations().await?;
    let csv = render_csv(&donations);
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "text/csv; charset=utf-8"))
        .insert_header((
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"donations.csv\"",
        ))
        .body(csv))
}

fn render_csv(donations: &[Donation]) -> String {
    let mut out = String::from("id,email,amount_kobo,reference,source,created_at\n");
    for donation in donations {
        let row = [
            donation.id().to_string(),
            donation.email().as_str().to_owned(),
            donation.amount().kobo().to_string(),
            donation.reference().as_str().to_owned(),
            donation.source().as_str().to_owned(),
            donation
                .created_at()
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        ];
        let rendered: Vec<String> = row.iter().map(|field| csv_field(field)).collect();
        out.push_str(&rendered.join(","));
        out.push('\n');
    }
    out
}

/// Quote a CSV field per RFC 4180 when it contains a comma, quote, or
/// newline.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}
