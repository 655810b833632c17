//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: user record storage
//!
//! Adapters are thin translators between domain types and their backing
//! representation. They contain no business logic beyond the invariants the
//! store itself must guarantee.

pub mod persistence;
