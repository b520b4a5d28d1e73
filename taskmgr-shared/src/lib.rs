//! # taskmgr Shared Library
//!
//! This crate contains the domain types, authentication primitives, storage
//! contracts and business logic used by the taskmgr API server.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, session tokens and the access-control gate
//! - `models`: User and task records
//! - `store`: Storage traits with in-memory and PostgreSQL adapters
//! - `usecase`: Registration, login and task orchestration
//! - `db`: PostgreSQL pool and schema management
//! - `error`: Service-level error taxonomy

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod store;
pub mod usecase;

/// Current version of the taskmgr shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
