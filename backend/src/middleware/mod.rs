//! Request middleware.
//!
//! Purpose: response post-processing shared by every route. Problem
//! conversion runs inside the header policy so problem documents get the same
//! headers as successful responses.

pub mod problem_responses;
pub mod security_headers;

pub use problem_responses::ProblemResponses;
pub use security_headers::SecurityHeaders;
