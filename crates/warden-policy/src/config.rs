//! Role catalog configuration schema.
//!
//! A `CatalogConfig` is deserialized from TOML and holds a list of named
//! role definitions. A definition may refer to roles declared earlier in the
//! same file (by `includes` or `manages`); forward references are rejected
//! when the catalog is built.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::permissible::ManagementOperation;

/// How a catalog role is built.
///
/// Selected by the `kind` key in TOML:
/// ```toml
/// kind = "superuser"
/// kind = "none"
/// kind = "operations"
/// kind = "resource"
/// kind = "union"
/// kind = "management"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RoleKind {
    /// Holds every permission.
    Superuser,

    /// Holds nothing. Useful as an explicit placeholder.
    #[serde(rename = "none")]
    NoRole,

    /// Plain operations, optionally minus some excluded ones.
    Operations {
        operations: Vec<String>,
        #[serde(default)]
        exclude: Vec<String>,
    },

    /// Operations on a resource subtree. `resource` is an absolute path.
    Resource {
        resource: String,
        operations: Vec<String>,
    },

    /// Multi-bearer union of previously declared roles.
    Union { includes: Vec<String> },

    /// Management of a previously declared role.
    Management {
        manages: String,
        operations: BTreeSet<ManagementOperation>,
        #[serde(default)]
        recursive: bool,
    },
}

/// A single named role loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleDefinition {
    /// Unique name; later definitions refer to it.
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(flatten)]
    pub kind: RoleKind,
}

/// The top-level structure deserialized from a TOML role catalog.
///
/// Example:
/// ```toml
/// [[roles]]
/// name = "reader"
/// kind = "resource"
/// resource = "/docs"
/// operations = ["read"]
///
/// [[roles]]
/// name = "librarian"
/// kind = "management"
/// manages = "reader"
/// operations = ["grant", "revoke"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub roles: Vec<RoleDefinition>,
}
