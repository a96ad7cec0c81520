//! Bearers and the credentials they present.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use warden_policy::{Permissible, Role};

use crate::traits::Authority;

/// Unique identifier for a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bearer of exactly one role.
///
/// A user's permissions are its role's permissions; holding several roles
/// is expressed with the multi-bearer union `Role + Role`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a user named `name` holding `role`, with a fresh id.
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            role,
            created_at: Utc::now(),
        }
    }

    /// The same user holding `role` instead.
    pub fn with_role(self, role: Role) -> Self {
        Self { role, ..self }
    }

    /// True if the user's role permits `permissible`.
    pub fn can(&self, permissible: &Permissible) -> bool {
        self.role.can(permissible)
    }
}

impl Authority for User {
    fn permits(&self, permissible: &Permissible) -> bool {
        self.can(permissible)
    }

    fn describe(&self) -> String {
        format!("user '{}' with role {}", self.name, self.role)
    }
}

/// A name and secret presented for authentication.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub name: String,
    pub secret: String,
}

impl Credentials {
    /// Credentials presented as `name` and `secret`.
    pub fn new(name: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("name", &self.name)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_policy::Permission;

    #[test]
    fn user_permits_through_its_role() {
        let user = User::new("ada", Role::from(Permission::operations(["read"])));
        assert!(user.can(&Permissible::operation("read")));
        assert!(!user.can(&Permissible::operation("write")));

        let promoted = user.clone().with_role(Role::SuperUser);
        assert_eq!(promoted.id, user.id);
        assert!(promoted.can(&Permissible::operation("write")));
    }

    #[test]
    fn credentials_debug_redacts_secret() {
        let creds = Credentials::new("ada", "hunter2");
        let shown = format!("{:?}", creds);
        assert!(shown.contains("ada"));
        assert!(!shown.contains("hunter2"));
    }

    #[test]
    fn user_ids_are_unique() {
        assert_ne!(UserId::new(), UserId::new());
    }
}
