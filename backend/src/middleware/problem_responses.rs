//! Problem document rendering for every error-carrying response.
//!
//! Handlers, extractors, and the default service report failures as
//! `actix_web::Error` values. This middleware inspects the error attached to
//! a response (or returned by the inner service) and replaces the body with
//! a problem document from the configured [`ProblemFormatter`].

use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::{
    InternalError, JsonPayloadError, PathError, QueryPayloadError, UrlencodedError,
};
use actix_web::{Error, web};
use futures_util::future::{LocalBoxFuture, Ready, ready};

use crate::domain::Error as DomainError;
use crate::inbound::http::problem::{Problem, ProblemFormatter, RequestContext};

/// Classify an Actix error as a problem.
///
/// Domain errors keep their own mapping. Extractor failures for JSON bodies,
/// path segments, query strings, and forms are validation problems. Anything
/// else becomes [`DomainError::Upstream`] carrying the framework's status and
/// message.
pub fn problem_for_error(error: &Error) -> Problem {
    if let Some(domain) = error.as_error::<DomainError>() {
        return Problem::from_domain(domain);
    }

    let malformed_request = error.as_error::<JsonPayloadError>().is_some()
        || error.as_error::<PathError>().is_some()
        || error.as_error::<QueryPayloadError>().is_some()
        || error.as_error::<UrlencodedError>().is_some();
    if malformed_request {
        return Problem::validation();
    }

    let status = error.as_response_error().status_code();
    Problem::from_domain(&DomainError::upstream(status.as_u16(), error.to_string()))
}

/// Path extractor configuration that keeps [`PathError`] visible.
///
/// Actix's default handler wraps path failures in a plain 404, which would
/// hide them from [`problem_for_error`].
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|error, _req| error.into())
}

/// Middleware converting failures into problem responses.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use user_service::inbound::http::problem::{DetailMode, ProblemFormatter};
/// use user_service::middleware::ProblemResponses;
///
/// let app = App::new().wrap(ProblemResponses::new(ProblemFormatter::new(DetailMode::Production)));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ProblemResponses {
    formatter: ProblemFormatter,
}

impl ProblemResponses {
    /// Render problems with `formatter`.
    pub fn new(formatter: ProblemFormatter) -> Self {
        Self { formatter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ProblemResponses
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ProblemResponsesMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ProblemResponsesMiddleware {
            service,
            formatter: self.formatter,
        }))
    }
}

/// Service wrapper produced by [`ProblemResponses`].
pub struct ProblemResponsesMiddleware<S> {
    service: S,
    formatter: ProblemFormatter,
}

impl<S, B> Service<ServiceRequest> for ProblemResponsesMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let formatter = self.formatter;
        // The router needs sole ownership of the request, so capture the
        // context now instead of holding an `HttpRequest` clone.
        let ctx = RequestContext::from_request(req.request());
        let fut = self.service.call(req);
        Box::pin(async move {
            match fut.await {
                Ok(res) => {
                    let Some(problem) = res.response().error().map(problem_for_error) else {
                        return Ok(res.map_into_left_body());
                    };
                    let response = formatter.respond(problem, &ctx);
                    Ok(res.into_response(response).map_into_right_body())
                }
                Err(error) => {
                    let response = formatter.respond(problem_for_error(&error), &ctx);
                    Err(InternalError::from_response(error, response).into())
                }
            }
        })
    }
}
