//! Request correlation middleware.
//!
//! Every request gets a UUID trace identifier. It lives in tokio task-local
//! storage while the handler runs, which lets the error envelope pick it up
//! without threading it through every signature, and it is stamped onto the
//! response as a `Trace-Id` header for client-side correlation.
//!
//! Task-locals do not cross `tokio::spawn` boundaries; wrap spawned work in
//! [`TraceId::scope`] to keep the identifier attached.

use std::future::Future;
use std::task::{Context, Poll};

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tokio::task_local;
use uuid::Uuid;

/// Response header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static ACTIVE_TRACE: TraceId;
}

/// Per-request trace identifier exposed via task-local storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    /// The trace identifier currently in scope, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        ACTIVE_TRACE.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` in scope.
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        ACTIVE_TRACE.scope(trace_id, fut).await
    }
}

impl From<Uuid> for TraceId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Middleware issuing a trace identifier per request.
///
/// Handlers read it via [`TraceId::current`]; every response carries it in
/// the [`TRACE_ID_HEADER`] header.
#[derive(Clone)]
pub struct Trace;

/// Service wrapper produced by [`Trace`]; not used directly.
pub struct TraceService<S> {
    inner: S,
}

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = TraceService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, inner: S) -> Self::Future {
        ready(Ok(TraceService { inner }))
    }
}

impl<S, B> Service<ServiceRequest> for TraceService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = TraceId::from(Uuid::new_v4());
        let downstream = self.inner.call(req);
        Box::pin(TraceId::scope(trace_id, async move {
            let mut res = downstream.await?;
            stamp(&mut res, trace_id);
            Ok(res)
        }))
    }
}

fn stamp<B>(res: &mut ServiceResponse<B>, trace_id: TraceId) {
    // A UUID renders as plain ASCII hex-and-hyphens; the header value
    // conversion cannot fail in practice, so a miss is only logged.
    match HeaderValue::from_str(&trace_id.to_string()) {
        Ok(value) => {
            res.headers_mut()
                .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
        }
        Err(err) => {
            tracing::error!(error = %err, %trace_id, "failed to encode trace header");
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use actix_web::{App, HttpResponse, test, web};

    use super::*;

    #[tokio::test]
    async fn scope_exposes_the_identifier() {
        let expected = TraceId::from(Uuid::new_v4());
        let observed = TraceId::scope(expected, async move { TraceId::current() }).await;
        assert_eq!(observed, Some(expected));
    }

    #[tokio::test]
    async fn current_is_none_outside_any_scope() {
        assert!(TraceId::current().is_none());
    }

    #[::core::prelude::v1::test]
    fn only_uuids_parse() {
        assert!("not-a-uuid".parse::<TraceId>().is_err());
        let nil = Uuid::nil().to_string();
        let parsed: TraceId = nil.parse().expect("uuid parses");
        assert_eq!(parsed.to_string(), nil);
    }

    #[actix_web::test]
    async fn every_response_carries_the_header() {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(res.headers().contains_key(TRACE_ID_HEADER));
    }

    #[actix_web::test]
    async fn the_handler_and_header_observe_the_same_id() {
        let app = test::init_service(App::new().wrap(Trace).route(
            "/",
            web::get().to(|| async {
                let id = TraceId::current().expect("trace id in scope");
                HttpResponse::Ok().body(id.to_string())
            }),
        ))
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let header = res
            .headers()
            .get(TRACE_ID_HEADER)
            .expect("trace header")
            .to_str()
            .expect("ascii header")
            .to_owned();
        let body = test::read_body(res).await;
        assert_eq!(header.as_bytes(), body.as_ref());
    }
}
