//! Security header policy applied to every response.
//!
//! Documentation pages need inline scripts and third-party assets, so paths
//! under [`DOCUMENTATION_PREFIXES`] only receive the framing and sniffing
//! headers. Every other path gets the full set. Identifying headers are
//! stripped everywhere and `X-Process-Time` reports the handling time in
//! seconds.

use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{
    CONTENT_SECURITY_POLICY, HeaderMap, HeaderName, HeaderValue, REFERRER_POLICY, SERVER,
    STRICT_TRANSPORT_SECURITY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS, X_XSS_PROTECTION,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::warn;

/// Path prefixes served with the relaxed documentation policy.
pub const DOCUMENTATION_PREFIXES: [&str; 3] = ["/docs", "/redoc", "/openapi.json"];

/// Content security policy for non-documentation responses.
pub const CONTENT_SECURITY_POLICY_VALUE: &str = "default-src 'self'; \
script-src 'self' 'unsafe-inline' https://cdn.jsdelivr.net; \
style-src 'self' 'unsafe-inline' https://cdn.jsdelivr.net; \
img-src 'self' data: https://fastapi.tiangolo.com; \
font-src 'self' https://cdn.jsdelivr.net;";

const STRICT_TRANSPORT_SECURITY_VALUE: &str = "max-age=31536000; includeSubDomains";
const REFERRER_POLICY_VALUE: &str = "strict-origin-when-cross-origin";
const PERMISSIONS_POLICY_VALUE: &str = "geolocation=(), microphone=()";

const PERMISSIONS_POLICY: HeaderName = HeaderName::from_static("permissions-policy");
const X_POWERED_BY: HeaderName = HeaderName::from_static("x-powered-by");
const X_PROCESS_TIME: HeaderName = HeaderName::from_static("x-process-time");

/// Whether `path` belongs to the interactive API documentation.
pub fn is_documentation_path(path: &str) -> bool {
    DOCUMENTATION_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

/// Apply the header policy for `path` to `headers`.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use actix_web::http::header::HeaderMap;
/// use user_service::middleware::security_headers::apply_security_headers;
///
/// let mut headers = HeaderMap::new();
/// apply_security_headers(&mut headers, "/users", Duration::from_millis(5));
/// assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
/// assert_eq!(headers.get("x-process-time").unwrap(), "0.005");
/// ```
pub fn apply_security_headers(headers: &mut HeaderMap, path: &str, elapsed: Duration) {
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));

    if !is_documentation_path(path) {
        headers.insert(X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block"));
        headers.insert(
            STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(STRICT_TRANSPORT_SECURITY_VALUE),
        );
        headers.insert(
            CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CONTENT_SECURITY_POLICY_VALUE),
        );
        headers.insert(REFERRER_POLICY, HeaderValue::from_static(REFERRER_POLICY_VALUE));
        headers.insert(
            PERMISSIONS_POLICY,
            HeaderValue::from_static(PERMISSIONS_POLICY_VALUE),
        );
    }

    headers.remove(SERVER);
    headers.remove(X_POWERED_BY);

    match HeaderValue::from_str(&elapsed.as_secs_f64().to_string()) {
        Ok(value) => {
            headers.insert(X_PROCESS_TIME, value);
        }
        Err(error) => {
            warn!(%error, path, "failed to encode process time header");
        }
    }
}

/// Middleware applying [`apply_security_headers`] to every response.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use user_service::middleware::SecurityHeaders;
///
/// let app = App::new().wrap(SecurityHeaders);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityHeaders;

impl<S, B> Transform<S, ServiceRequest> for SecurityHeaders
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityHeadersMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityHeadersMiddleware { service }))
    }
}

/// Service wrapper produced by [`SecurityHeaders`].
pub struct SecurityHeadersMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for SecurityHeadersMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let started = Instant::now();
        let path = req.path().to_owned();
        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            apply_security_headers(res.headers_mut(), &path, started.elapsed());
            Ok(res)
        })
    }
}
