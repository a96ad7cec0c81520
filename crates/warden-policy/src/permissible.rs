//! Permissibles: the things a policy can be asked about.
//!
//! A `Permissible` is an immutable value. Two permissibles are equal when
//! they are structurally equal, so a permission granting `read` permits every
//! `read` constructed anywhere in the program.

use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    error::WardenError, permission::Permission, resource::Resource, role::Role,
};

/// A named action such as `read` or `write`.
///
/// Cloning is cheap; the name is shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Operation(Arc<str>);

impl Operation {
    /// An operation called `name`.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The operation name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Actions a management permission or role can authorize on its subjects.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ManagementOperation {
    Grant,
    Revoke,
    Retrieve,
}

impl ManagementOperation {
    /// Every management operation, in declaration order.
    pub const ALL: [ManagementOperation; 3] = [Self::Grant, Self::Revoke, Self::Retrieve];

    /// The lowercase name used in catalogs and messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grant => "grant",
            Self::Revoke => "revoke",
            Self::Retrieve => "retrieve",
        }
    }
}

impl fmt::Display for ManagementOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ManagementOperation {
    type Err = WardenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grant" => Ok(Self::Grant),
            "revoke" => Ok(Self::Revoke),
            "retrieve" => Ok(Self::Retrieve),
            other => Err(WardenError::ConfigError {
                reason: format!("unknown management operation '{other}'"),
            }),
        }
    }
}

/// A request to perform `operation` on `resource`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceAccess {
    pub resource: Resource,
    pub operation: Operation,
}

/// A request to grant, revoke or retrieve `target`.
///
/// `L` is the kind of subject being managed: a `Permission` or a `Role`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ManageRequest<L> {
    pub target: L,
    pub operation: ManagementOperation,
}

/// Anything that can be checked against a policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Permissible {
    /// A plain named action.
    Operation(Operation),
    /// An action scoped to a node of the resource hierarchy.
    Resource(ResourceAccess),
    /// Managing a permission value.
    ManagePermission(Arc<ManageRequest<Permission>>),
    /// Managing a role.
    ManageRole(Arc<ManageRequest<Role>>),
}

impl Permissible {
    /// A plain operation request.
    pub fn operation(name: impl AsRef<str>) -> Self {
        Self::Operation(Operation::new(name))
    }

    /// A request to perform `operation` on `resource`.
    pub fn access(resource: Resource, operation: impl AsRef<str>) -> Self {
        Self::Resource(ResourceAccess {
            resource,
            operation: Operation::new(operation),
        })
    }

    /// A request to `operation` the permission `target`.
    pub fn manage_permission(target: Permission, operation: ManagementOperation) -> Self {
        Self::ManagePermission(Arc::new(ManageRequest { target, operation }))
    }

    /// A request to `operation` the role `target`.
    pub fn manage_role(target: Role, operation: ManagementOperation) -> Self {
        Self::ManageRole(Arc::new(ManageRequest { target, operation }))
    }
}

impl From<Operation> for Permissible {
    fn from(operation: Operation) -> Self {
        Self::Operation(operation)
    }
}

impl From<ResourceAccess> for Permissible {
    fn from(access: ResourceAccess) -> Self {
        Self::Resource(access)
    }
}

impl fmt::Display for Permissible {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operation(op) => write!(f, "{op}"),
            Self::Resource(access) => write!(f, "{} {}", access.operation, access.resource),
            Self::ManagePermission(req) => write!(f, "{} permission {}", req.operation, req.target),
            Self::ManageRole(req) => write!(f, "{} role {}", req.operation, req.target),
        }
    }
}
