//! `PermissionSource`: the uniform evaluator handed to every guard.
//!
//! A source is built from a `Permission`, a `Role` or a `User`. It is passed
//! explicitly into each `secure` call; there is no ambient "current user".

use std::fmt;

use warden_policy::{Permissible, PermissibleSet, Permission, Role};

use crate::{traits::Authority, user::User};

#[derive(Debug, Clone)]
pub enum PermissionSource {
    Permission(Permission),
    Role(Role),
    /// Delegates to the user's role.
    User(User),
}

impl PermissionSource {
    fn authority(&self) -> &dyn Authority {
        match self {
            Self::Permission(p) => p,
            Self::Role(r) => r,
            Self::User(u) => u,
        }
    }

    /// True if the wrapped authority permits `permissible`.
    pub fn permits(&self, permissible: &Permissible) -> bool {
        self.authority().permits(permissible)
    }

    /// Evaluate a whole `and`/`or` tree.
    pub fn permits_all(&self, set: &PermissibleSet) -> bool {
        set.is_permitted_by(&|p: &Permissible| self.permits(p))
    }

    /// Shown in denial errors.
    pub fn description(&self) -> String {
        self.authority().describe()
    }
}

impl Authority for PermissionSource {
    fn permits(&self, permissible: &Permissible) -> bool {
        PermissionSource::permits(self, permissible)
    }

    fn describe(&self) -> String {
        self.description()
    }
}

impl From<Permission> for PermissionSource {
    fn from(permission: Permission) -> Self {
        Self::Permission(permission)
    }
}

impl From<Role> for PermissionSource {
    fn from(role: Role) -> Self {
        Self::Role(role)
    }
}

impl From<User> for PermissionSource {
    fn from(user: User) -> Self {
        Self::User(user)
    }
}

impl From<&User> for PermissionSource {
    fn from(user: &User) -> Self {
        Self::User(user.clone())
    }
}

impl fmt::Display for PermissionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}
