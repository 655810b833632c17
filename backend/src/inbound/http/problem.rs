//! RFC 7807-style problem documents.
//!
//! A [`Problem`] describes a failure in transport terms. The
//! [`ProblemFormatter`] turns it into a [`ProblemDocument`] bound to a request,
//! stamps it with a fresh correlation id, and emits exactly one log event for
//! it. The detail text never reaches the log and the logged instance URL is
//! sanitised. What reaches the client depends on the configured
//! [`DetailMode`].

use actix_web::http::StatusCode;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, sanitize_detail};

/// Media type of every problem response.
pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";
/// Problem type used when no more specific URI applies.
pub const ABOUT_BLANK: &str = "about:blank";
/// Problem type for malformed or invalid request input.
pub const VALIDATION_PROBLEM_TYPE: &str = "https://example.com/errors/validation";
/// Detail sent to clients in production mode.
pub const SUPPRESSED_DETAIL: &str = "An error occurred";
/// Detail attached to every validation problem.
pub const INVALID_PARAMETERS_DETAIL: &str = "Invalid request parameters";

/// Whether clients see the sanitised detail or a fixed placeholder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DetailMode {
    /// Replace every detail with [`SUPPRESSED_DETAIL`].
    #[default]
    Production,
    /// Return the sanitised detail.
    Debug,
}

impl DetailMode {
    /// Select the mode from a boolean debug flag.
    pub fn from_debug_flag(debug: bool) -> Self {
        if debug { Self::Debug } else { Self::Production }
    }
}

/// Failure description before it is bound to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    problem_type: String,
    title: String,
    status: StatusCode,
    detail: String,
    instance: Option<String>,
}

impl Problem {
    /// Build a problem with the `about:blank` type and no explicit instance.
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            problem_type: ABOUT_BLANK.to_owned(),
            title: title.into(),
            status,
            detail: detail.into(),
            instance: None,
        }
    }

    /// Replace the problem type URI.
    #[must_use]
    pub fn with_type(mut self, problem_type: impl Into<String>) -> Self {
        self.problem_type = problem_type.into();
        self
    }

    /// Pin the instance URI instead of using the request URL.
    #[must_use]
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Malformed request or rejected field value.
    ///
    /// The specific reason is not carried into the document.
    pub fn validation() -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Validation Error",
            INVALID_PARAMETERS_DETAIL,
        )
        .with_type(VALIDATION_PROBLEM_TYPE)
    }

    /// Framework-level failure such as an unmatched route.
    ///
    /// An empty message falls back to the status' canonical reason.
    pub fn http_error(status: StatusCode, message: &str) -> Self {
        let detail = if message.trim().is_empty() {
            status.canonical_reason().unwrap_or_default().to_owned()
        } else {
            message.to_owned()
        };
        Self::new(status, "HTTP Error", detail)
    }

    /// Map a domain error onto its problem.
    pub fn from_domain(error: &Error) -> Self {
        match error {
            Error::Validation(_) => Self::validation(),
            Error::Conflict => Self::new(StatusCode::BAD_REQUEST, "existing user", error.to_string()),
            Error::NotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, "non existing user", error.to_string())
            }
            Error::Upstream { status, message } => Self::http_error(
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                message,
            ),
            Error::Storage { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                error.to_string(),
            ),
        }
    }

    /// HTTP status of the problem.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Short, human-readable summary.
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Serialised problem returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProblemDocument {
    /// URI identifying the problem type, or `about:blank`.
    #[serde(rename = "type")]
    #[schema(example = "https://example.com/errors/validation")]
    pub problem_type: String,
    #[schema(example = "Validation Error")]
    pub title: String,
    #[schema(example = 422)]
    pub status: u16,
    /// Sanitised detail, or a fixed placeholder in production mode.
    #[schema(example = "An error occurred")]
    pub detail: String,
    /// URI of the request that failed.
    #[schema(example = "http://localhost:8080/users")]
    pub instance: String,
    /// Fresh UUID v4 shared with the matching log event.
    pub correlation_id: String,
}

/// Request attributes a problem is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    method: String,
    path: String,
    url: String,
}

impl RequestContext {
    /// Assemble a context from its parts.
    pub fn new(method: impl Into<String>, path: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            url: url.into(),
        }
    }

    /// Capture method, path, and full URL from an Actix request.
    pub fn from_request(req: &HttpRequest) -> Self {
        let connection = req.connection_info();
        let url = format!("{}://{}{}", connection.scheme(), connection.host(), req.uri());
        Self::new(req.method().as_str(), req.path(), url)
    }
}

/// Converts problems into documents and responses.
///
/// # Examples
/// ```
/// use actix_web::http::StatusCode;
/// use user_service::inbound::http::problem::{
///     DetailMode, Problem, ProblemFormatter, RequestContext, SUPPRESSED_DETAIL,
/// };
///
/// let formatter = ProblemFormatter::new(DetailMode::Production);
/// let ctx = RequestContext::new("GET", "/users/9", "http://localhost/users/9");
/// let doc = formatter.format(Problem::new(StatusCode::NOT_FOUND, "non existing user", "gone"), &ctx);
/// assert_eq!(doc.detail, SUPPRESSED_DETAIL);
/// assert_eq!(doc.instance, "http://localhost/users/9");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ProblemFormatter {
    mode: DetailMode,
}

impl ProblemFormatter {
    /// Create a formatter for the given detail mode.
    pub fn new(mode: DetailMode) -> Self {
        Self { mode }
    }

    /// Bind `problem` to the request and log it once.
    pub fn format(&self, problem: Problem, ctx: &RequestContext) -> ProblemDocument {
        let correlation_id = Uuid::new_v4().to_string();
        let status = problem.status.as_u16();
        let instance = problem.instance.unwrap_or_else(|| ctx.url.clone());

        error!(
            correlation_id = %correlation_id,
            status,
            problem_type = %problem.problem_type,
            instance = %sanitize_detail(&instance),
            path = %ctx.path,
            method = %ctx.method,
            "Error {}: {}",
            status,
            problem.title
        );

        let detail = match self.mode {
            DetailMode::Production => SUPPRESSED_DETAIL.to_owned(),
            DetailMode::Debug => sanitize_detail(&problem.detail),
        };

        ProblemDocument {
            problem_type: problem.problem_type,
            title: problem.title,
            status,
            detail,
            instance,
            correlation_id,
        }
    }

    /// Format `problem` and wrap it in an `application/problem+json` response.
    pub fn respond(&self, problem: Problem, ctx: &RequestContext) -> HttpResponse {
        let status = problem.status;
        let document = self.format(problem, ctx);
        HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, PROBLEM_CONTENT_TYPE))
            .json(document)
    }
}
