//! # warden-core
//!
//! The secure-evaluation protocol for WARDEN.
//!
//! This crate provides:
//! - `PermissionSource`, the uniform evaluator built from a permission, a
//!   role or a user
//! - The `Guard` trait with the only two sanctioned entry points, `secure`
//!   and `try_secure`
//! - The `Authority` and `Authenticator` trait seams, and `authorize`, which
//!   composes authentication with `secure`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use warden_core::{Guard, PermissionSource};
//! use warden_policy::Permissible;
//!
//! let source = PermissionSource::from(user);
//! let body = Permissible::access(path, "read").secure(&source, || store.load(&path))?;
//! ```

pub mod guard;
pub mod source;
pub mod traits;
pub mod user;

pub use guard::{authorize, Guard};
pub use source::PermissionSource;
pub use traits::{Authenticator, Authority};
pub use user::{Credentials, User, UserId};
