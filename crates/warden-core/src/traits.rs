//! Trait seams of the secure-evaluation protocol.
//!
//! - `Authority`: anything that can answer "is this permissible allowed?"
//! - `Authenticator`: turns presented credentials into a `User`
//!
//! Guards only ever consult an authority through a `PermissionSource`, and
//! adapters only ever obtain a `User` through an authenticator, so the two
//! failure modes (denied vs. not authenticated) stay distinguishable.

use warden_policy::{Permissible, Permission, Role, WardenResult};

use crate::user::{Credentials, User};

/// A policy value that can be evaluated by a guard.
///
/// Evaluation must be pure: no I/O, no interior mutation.
pub trait Authority: Send + Sync {
    /// Return true if `permissible` is allowed.
    fn permits(&self, permissible: &Permissible) -> bool;

    /// Human-readable description used in denial errors.
    fn describe(&self) -> String;
}

impl Authority for Permission {
    fn permits(&self, permissible: &Permissible) -> bool {
        Permission::permits(self, permissible)
    }

    fn describe(&self) -> String {
        format!("permission {}", self)
    }
}

impl Authority for Role {
    fn permits(&self, permissible: &Permissible) -> bool {
        self.can(permissible)
    }

    fn describe(&self) -> String {
        format!("role {}", self)
    }
}

/// Resolves presented credentials to a registered user.
///
/// Implementations must fail with `WardenError::AuthenticationFailed` for
/// unknown names and wrong secrets alike, without revealing which.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, credentials: &Credentials) -> WardenResult<User>;
}
