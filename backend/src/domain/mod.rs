//! Domain primitives, ports, and services.
//!
//! Purpose: define the validated user model, the error taxonomy, and the use
//! cases driven by inbound adapters. Nothing here depends on HTTP.
//!
//! Public surface:
//! - Error (alias to `error::Error`): outcome of a failed user operation.
//! - User, NewUser, UserChanges: validated records and partial updates.
//! - sanitize_detail: redaction applied before details leave the process.
//! - UserService: implementation of the user driving ports.

pub mod error;
pub mod ports;
pub mod sanitize;
pub mod user;
pub mod user_service;

pub use self::error::Error;
pub use self::sanitize::{sanitize_detail, sanitize_display};
pub use self::user::{
    EmailAddress, NewUser, Password, User, UserChanges, UserId, UserValidationError, Username,
};
pub use self::user_service::UserService;
