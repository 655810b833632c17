//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error HTTP-agnostic while letting Actix handlers
//! return it directly. The response carries only the status; the
//! `ProblemResponses` middleware renders the body, since that needs the
//! request URL and the configured detail mode.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use crate::domain::Error;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Conflict => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Error::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::new(self.status_code())
    }
}

#[cfg(test)]
mod tests {
    //! Status mapping for domain errors.
    use super::*;
    use crate::domain::{UserId, UserValidationError};
    use actix_web::body::MessageBody;
    use rstest::rstest;

    #[rstest]
    #[case(Error::from(UserValidationError::InvalidEmail), StatusCode::UNPROCESSABLE_ENTITY)]
    #[case(Error::conflict(), StatusCode::BAD_REQUEST)]
    #[case(Error::not_found(UserId::new(1)), StatusCode::NOT_FOUND)]
    #[case(Error::upstream(405, "Method Not Allowed"), StatusCode::METHOD_NOT_ALLOWED)]
    #[case(Error::upstream(42, "nonsense"), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(Error::storage("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn maps_errors_to_status(#[case] error: Error, #[case] expected: StatusCode) {
        assert_eq!(error.status_code(), expected);
    }

    #[rstest]
    fn error_response_body_is_left_to_middleware() {
        let response = Error::storage("password=hunter2").error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.into_body().try_into_bytes().is_ok_and(|bytes| bytes.is_empty()));
    }
}
