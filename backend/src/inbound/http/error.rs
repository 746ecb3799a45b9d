//! HTTP error payloads and mapping from domain errors.
//!
//! Keep the domain free of transport concerns by translating
//! [`DomainError`] into Actix responses here. The wire envelope keeps the
//! site's original contract: failures carry `status: "error"` plus a
//! `message`, enriched with the stable machine code and the request trace
//! identifier.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{DomainError, ErrorCode};
use crate::middleware::trace::{TRACE_ID_HEADER, TraceId};

/// Standard error envelope returned by HTTP handlers.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Always the literal `error`; business rejections use their own
    /// `failed` envelope with HTTP 200.
    #[schema(value_type = String, example = "error")]
    status: &'static str,
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCode,
    /// Human-readable message.
    #[schema(example = "Something went wrong")]
    message: String,
    /// Correlation identifier echoed in the `Trace-Id` header.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary structured details.
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl ApiError {
    /// Construct an API error from a domain failure, capturing any ambient
    /// trace identifier.
    #[must_use]
    pub fn from_domain(error: DomainError) -> Self {
        Self {
            status: "error",
            code: error.code(),
            message: error.message().to_owned(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: error.details().cloned(),
        }
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    fn to_status_code(&self) -> StatusCode {
        match self.code {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(value: DomainError) -> Self {
        Self::from_domain(value)
    }
}

impl From<actix_web::Error> for ApiError {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to API error");
        Self::from_domain(DomainError::internal("Internal server error"))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.to_status_code()
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = &self.trace_id {
            builder.insert_header((TRACE_ID_HEADER, id.clone()));
        }
        if matches!(self.code, ErrorCode::InternalError) {
            // Internal messages may quote adapter state; never leak them.
            let mut redacted = self.clone();
            redacted.message = "Internal server error".to_owned();
            redacted.details = None;
            return builder.json(redacted);
        }
        builder.json(self)
    }
}

/// Convenience alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    //! Regression coverage for the error envelope.

    use actix_web::body::to_bytes;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;

    async fn body_of(error: &ApiError) -> Value {
        let response = error.error_response();
        let bytes = to_bytes(response.into_body()).await.expect("body bytes");
        serde_json::from_slice(&bytes).expect("body is JSON")
    }

    #[rstest]
    #[case(DomainError::invalid_request("bad"), StatusCode::BAD_REQUEST)]
    #[case(DomainError::unauthorized("no"), StatusCode::UNAUTHORIZED)]
    #[case(DomainError::forbidden("no"), StatusCode::FORBIDDEN)]
    #[case(DomainError::not_found("gone"), StatusCode::NOT_FOUND)]
    #[case(DomainError::upstream_unavailable("down"), StatusCode::BAD_GATEWAY)]
    #[case(DomainError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn codes_map_to_http_statuses(#[case] domain: DomainError, #[case] expected: StatusCode) {
        assert_eq!(ApiError::from_domain(domain).status_code(), expected);
    }

    #[actix_web::test]
    async fn envelope_carries_status_error() {
        let body = body_of(&ApiError::from_domain(DomainError::invalid_request(
            "bad amount",
        )))
        .await;
        assert_eq!(body.get("status"), Some(&json!("error")));
        assert_eq!(body.get("code"), Some(&json!("invalid_request")));
        assert_eq!(body.get("message"), Some(&json!("bad amount")));
    }

    #[actix_web::test]
    async fn internal_messages_are_redacted() {
        let body = body_of(&ApiError::from_domain(
            DomainError::internal("pool state: postgres://user:pw@host").with_details(json!({
                "dsn": "postgres://user:pw@host"
            })),
        ))
        .await;
        assert_eq!(body.get("message"), Some(&json!("Internal server error")));
        assert!(body.get("details").is_none());
    }

    #[actix_web::test]
    async fn details_survive_for_client_errors() {
        let body = body_of(&ApiError::from_domain(
            DomainError::invalid_request("bad").with_details(json!({ "field": "reference" })),
        ))
        .await;
        assert_eq!(
            body.get("details").and_then(|d| d.get("field")),
            Some(&json!("reference"))
        );
    }
}
