//! User record storage adapters.
//!
//! The record store is an external collaborator behind
//! [`crate::domain::ports::UserRepository`]. The in-memory adapter backs the
//! binary and the test suites.

mod in_memory_user_repository;

pub use in_memory_user_repository::InMemoryUserRepository;
