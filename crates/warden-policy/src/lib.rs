//! # warden-policy
//!
//! The policy core of WARDEN: immutable permission and role values with a
//! union/difference algebra and a partial order.
//!
//! ## Overview
//!
//! - [`Permissible`]: a thing that can be asked about (an operation, a
//!   resource access, a management request). [`PermissibleSet`] composes
//!   them with `and` / `or`.
//! - [`Permission`]: answers `permits(&Permissible)`. Combines with `|` and
//!   `-`, and is ordered by [`PartialOrd`].
//! - [`Resource`]: a parent-linked path tree scoping operations to a subtree.
//! - [`Role`]: the bearer-facing wrapper around a permission, with the
//!   multi-bearer union `+` and management roles.
//! - [`RoleCatalog`]: named roles loaded from TOML.
//!
//! Every operation here is a pure function of its inputs. Values are cheap to
//! clone and safe to share across threads.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use warden_policy::{Permissible, Permission, Resource};
//!
//! let docs = Resource::parse("/docs")?;
//! let editor = Permission::resource(docs.clone(), ["read", "write"]);
//! assert!(editor.permits(&Permissible::access(docs.child("a")?, "write")));
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod management;
pub mod permissible;
pub mod permissible_set;
pub mod permission;
pub mod resource;
pub mod role;

mod hashing;
mod order;

pub use catalog::RoleCatalog;
pub use config::{CatalogConfig, RoleDefinition, RoleKind};
pub use error::{WardenError, WardenResult};
pub use management::{Level, Management};
pub use permissible::{ManageRequest, ManagementOperation, Operation, Permissible, ResourceAccess};
pub use permissible_set::{Combinator, PermissibleSet, Requirement};
pub use permission::{
    CustomPermission, Permission, PermissionDifference, PermissionSet, SimplePermission,
};
pub use resource::{Resource, ResourcePermission};
pub use role::{PermissionsRole, Role, RoleSet};

// ── Tests ─────────────────────────────────────────────────────────────────────
