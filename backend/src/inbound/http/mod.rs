//! HTTP inbound adapter exposing the user REST endpoints.

pub mod error;
pub mod health;
pub mod problem;
pub mod state;
pub mod users;

pub use error::ApiResult;
