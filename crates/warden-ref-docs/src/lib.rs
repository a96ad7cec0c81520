//! # warden-ref-docs
//!
//! Document service reference for the WARDEN authorization core.
//!
//! Demonstrates two scenarios with in-memory data:
//!
//! 1. **Document Access**: resource-scoped roles, a permission difference
//!    and the authentication/denial split, against a guarded document store.
//! 2. **Delegated Role Management**: plain and recursive management roles
//!    granting, revoking and retrieving roles through the user directory.
//!
//! All data is fictional. Nothing is persisted.

pub mod scenarios;
pub mod store;

pub use store::{Document, DocumentError, DocumentResult, DocumentStore};
