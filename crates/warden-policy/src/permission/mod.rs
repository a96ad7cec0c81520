//! The permission algebra.
//!
//! A `Permission` is an immutable policy value answering "is this
//! permissible allowed?". Permissions combine with `|` (union) and `-`
//! (difference) and are partially ordered by how much they permit.
//!
//! ```text
//!                AllPermissions                 top
//!               /       |      \
//!         Set{a,b}   Set{a,c}   ...            unions (flattened)
//!          /    \     /
//!     Single(a) Single(b)  Difference(p, q)    leaves and remainders
//!               \    |    /
//!                NoPermissions                  bottom
//! ```
//!
//! Set-valued results are always built through the union factory, which
//! collapses empty, singleton and top-containing member sets, so callers
//! never observe a malformed `PermissionSet`.

mod algebra;
mod custom;
mod order;

use std::{
    fmt,
    ops::{BitOr, Sub},
    sync::Arc,
};

pub use algebra::{PermissionDifference, PermissionSet};
pub use custom::{CustomPermission, SimplePermission};

use crate::{
    management::{Level, Management},
    permissible::{Operation, Permissible},
    resource::ResourcePermission,
    role::Role,
};

/// A grantable capability set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Permits every permissible.
    AllPermissions,
    /// Permits nothing.
    NoPermissions,
    /// Permits exactly one permissible.
    Single(Permissible),
    /// Union of at least two flattened members.
    Set(PermissionSet),
    /// What the first term permits minus what the second permits.
    Difference(PermissionDifference),
    /// Operations on a resource subtree.
    Resource(ResourcePermission),
    /// Managing permissions up to a level.
    ManagePermissions(Arc<Management<Permission>>),
    /// Managing roles up to a level.
    ManageRoles(Arc<Management<Role>>),
    /// A caller-supplied predicate.
    Custom(CustomPermission),
}

impl Permission {
    /// Permit exactly `permissible`.
    pub fn single(permissible: impl Into<Permissible>) -> Self {
        Self::Single(permissible.into())
    }

    /// Union of every permission in `permissions`, collapsing as it goes.
    pub fn any_of<I>(permissions: I) -> Self
    where
        I: IntoIterator<Item = Permission>,
    {
        permissions
            .into_iter()
            .fold(Self::NoPermissions, |acc, p| acc.union(&p))
    }

    /// Union of single permissions for each named operation.
    pub fn operations<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::any_of(
            names
                .into_iter()
                .map(|name| Self::from(Operation::new(name))),
        )
    }

    /// Wrap a caller-defined predicate.
    pub fn custom(permission: impl SimplePermission + 'static) -> Self {
        Self::Custom(CustomPermission::new(permission))
    }

    /// True if this permission allows `permissible`.
    pub fn permits(&self, permissible: &Permissible) -> bool {
        match self {
            Self::AllPermissions => true,
            Self::NoPermissions => false,
            Self::Single(p) => p == permissible,
            Self::Set(set) => set.iter().any(|m| m.permits(permissible)),
            Self::Difference(d) => {
                d.include().permits(permissible) && !d.exclude().permits(permissible)
            }
            Self::Resource(r) => r.permits(permissible),
            Self::ManagePermissions(m) => match permissible {
                Permissible::ManagePermission(request) => m.permits_request(request),
                _ => false,
            },
            Self::ManageRoles(m) => match permissible {
                Permissible::ManageRole(request) => m.permits_request(request),
                _ => false,
            },
            Self::Custom(c) => c.permits(permissible),
        }
    }
}

impl Level for Permission {
    fn join(&self, other: &Self) -> Self {
        self.union(other)
    }

    fn lift(management: &Management<Self>) -> Self {
        Self::ManagePermissions(Arc::new(management.clone()))
    }
}

impl From<Permissible> for Permission {
    fn from(p: Permissible) -> Self {
        Self::Single(p)
    }
}

impl From<Operation> for Permission {
    fn from(op: Operation) -> Self {
        Self::Single(Permissible::Operation(op))
    }
}

impl BitOr for Permission {
    type Output = Permission;

    fn bitor(self, rhs: Permission) -> Permission {
        self.union(&rhs)
    }
}

impl<'a> BitOr<&'a Permission> for &'a Permission {
    type Output = Permission;

    fn bitor(self, rhs: &'a Permission) -> Permission {
        self.union(rhs)
    }
}

impl Sub for Permission {
    type Output = Permission;

    fn sub(self, rhs: Permission) -> Permission {
        self.difference(&rhs)
    }
}

impl<'a> Sub<&'a Permission> for &'a Permission {
    type Output = Permission;

    fn sub(self, rhs: &'a Permission) -> Permission {
        self.difference(rhs)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllPermissions => f.write_str("all permissions"),
            Self::NoPermissions => f.write_str("no permissions"),
            Self::Single(p) => write!(f, "{p}"),
            Self::Set(set) => write!(f, "{set}"),
            Self::Difference(d) => write!(f, "({} - {})", d.include(), d.exclude()),
            Self::Resource(r) => write!(f, "{r}"),
            Self::ManagePermissions(m) => m.fmt_subject("permissions", f),
            Self::ManageRoles(m) => m.fmt_subject("roles", f),
            Self::Custom(c) => f.write_str(c.name()),
        }
    }
}
