//! In-memory bearer registry.
//!
//! `InMemoryDirectory` maps user ids to users and their credential digests.
//! It is the reference store an adapter consults to turn credentials into a
//! `PermissionSource`. All state sits behind one `RwLock`, so a write is
//! visible to every read that starts after it returns.
//!
//! Role changes come in two flavours:
//!
//! - `assign_role` is the administrative bypass used while provisioning.
//! - `grant_role`, `revoke_role` and `role_of` act on behalf of another
//!   bearer and are guarded by role-management requests.

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use tracing::{info, warn};

use warden_core::{Authenticator, Credentials, Guard, PermissionSource, User, UserId};
use warden_policy::{ManagementOperation, Permissible, Role, WardenError, WardenResult};

use crate::credential::{digest_secret, verify_secret};

// ── Internal mutable state ────────────────────────────────────────────────────

struct Account {
    user: User,
    digest: String,
}

#[derive(Default)]
struct DirectoryState {
    accounts: HashMap<UserId, Account>,
    by_name: HashMap<String, UserId>,
}

impl DirectoryState {
    fn account_mut(&mut self, id: UserId) -> WardenResult<&mut Account> {
        self.accounts
            .get_mut(&id)
            .ok_or_else(|| WardenError::UnknownBearer {
                name: id.to_string(),
            })
    }

    fn user(&self, id: UserId) -> WardenResult<&User> {
        self.accounts
            .get(&id)
            .map(|a| &a.user)
            .ok_or_else(|| WardenError::UnknownBearer {
                name: id.to_string(),
            })
    }
}

// ── Public directory ──────────────────────────────────────────────────────────

/// A thread-safe, in-memory user directory.
///
/// Cloning shares the underlying state.
#[derive(Clone, Default)]
pub struct InMemoryDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

impl InMemoryDirectory {
    /// An empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, DirectoryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DirectoryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new user.
    ///
    /// Returns `WardenError::Conflict` if the name is already taken.
    pub fn register(
        &self,
        name: impl Into<String>,
        secret: &str,
        role: Role,
    ) -> WardenResult<User> {
        let user = User::new(name, role);
        let digest = digest_secret(&user.id, secret);

        let mut state = self.write();
        if state.by_name.contains_key(&user.name) {
            warn!(user = %user.name, "registration rejected: name taken");
            return Err(WardenError::Conflict {
                reason: format!("a user named '{}' is already registered", user.name),
            });
        }
        state.by_name.insert(user.name.clone(), user.id);
        state.accounts.insert(
            user.id,
            Account {
                user: user.clone(),
                digest,
            },
        );

        info!(user = %user.name, user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }

    /// Look up a user by id.
    pub fn find(&self, id: UserId) -> WardenResult<User> {
        self.read().user(id).cloned()
    }

    /// Look up a user by name.
    pub fn find_by_name(&self, name: &str) -> WardenResult<User> {
        let state = self.read();
        let id = state
            .by_name
            .get(name)
            .copied()
            .ok_or_else(|| WardenError::UnknownBearer {
                name: name.to_string(),
            })?;
        state.user(id).cloned()
    }

    /// Remove a user and return it.
    pub fn remove(&self, id: UserId) -> WardenResult<User> {
        let mut state = self.write();
        let account = state
            .accounts
            .remove(&id)
            .ok_or_else(|| WardenError::UnknownBearer {
                name: id.to_string(),
            })?;
        state.by_name.remove(&account.user.name);
        info!(user = %account.user.name, user_id = %id, "user removed");
        Ok(account.user)
    }

    /// All users, sorted by name.
    pub fn users(&self) -> Vec<User> {
        let mut users: Vec<User> = self.read().accounts.values().map(|a| a.user.clone()).collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        users
    }

    /// Number of registered users.
    pub fn len(&self) -> usize {
        self.read().accounts.len()
    }

    /// True if no users are registered.
    pub fn is_empty(&self) -> bool {
        self.read().accounts.is_empty()
    }

    /// Replace a user's role without any policy check.
    pub fn assign_role(&self, id: UserId, role: Role) -> WardenResult<User> {
        let mut state = self.write();
        let account = state.account_mut(id)?;
        account.user.role = role;
        info!(user = %account.user.name, role = %account.user.role, "role assigned");
        Ok(account.user.clone())
    }

    /// Add `role` to the target user's roles on behalf of `actor`.
    ///
    /// Requires `actor` to permit granting `role`. The target ends up holding
    /// its previous role plus `role` (multi-bearer union).
    pub fn grant_role(
        &self,
        actor: &PermissionSource,
        target: UserId,
        role: Role,
    ) -> WardenResult<User> {
        let request = Permissible::manage_role(role.clone(), ManagementOperation::Grant);
        request.try_secure(actor, || {
            let mut state = self.write();
            let account = state.account_mut(target)?;
            account.user.role = account.user.role.join(&role);
            info!(
                user = %account.user.name,
                granted = %role,
                by = %actor,
                "role granted"
            );
            Ok(account.user.clone())
        })
    }

    /// Take `role` away from the target user on behalf of `actor`.
    ///
    /// Requires `actor` to permit revoking `role`. Returns
    /// `WardenError::Conflict` if the target does not hold `role` as one of
    /// its roles.
    pub fn revoke_role(
        &self,
        actor: &PermissionSource,
        target: UserId,
        role: &Role,
    ) -> WardenResult<User> {
        let request = Permissible::manage_role(role.clone(), ManagementOperation::Revoke);
        request.try_secure(actor, || {
            let mut state = self.write();
            let account = state.account_mut(target)?;
            let remaining =
                without(&account.user.role, role).ok_or_else(|| WardenError::Conflict {
                    reason: format!("user '{}' does not hold role {}", account.user.name, role),
                })?;
            account.user.role = remaining;
            info!(
                user = %account.user.name,
                revoked = %role,
                by = %actor,
                "role revoked"
            );
            Ok(account.user.clone())
        })
    }

    /// Read the target user's role on behalf of `actor`.
    ///
    /// Requires `actor` to permit retrieving that role.
    pub fn role_of(&self, actor: &PermissionSource, target: UserId) -> WardenResult<Role> {
        let state = self.read();
        let role = state.user(target)?.role.clone();
        Permissible::manage_role(role.clone(), ManagementOperation::Retrieve)
            .secure(actor, || role)
    }
}

/// `held` with `role` removed from its multi-bearer union, if present.
fn without(held: &Role, role: &Role) -> Option<Role> {
    match held {
        _ if held == role => Some(Role::NoRole),
        Role::Roles(set) if set.contains(role) => Some(Role::any_of(
            set.iter().filter(|r| *r != role).cloned(),
        )),
        _ => None,
    }
}

// ── Authenticator impl ────────────────────────────────────────────────────────

impl Authenticator for InMemoryDirectory {
    /// Unknown names and wrong secrets fail identically.
    fn authenticate(&self, credentials: &Credentials) -> WardenResult<User> {
        let state = self.read();
        let account = state
            .by_name
            .get(&credentials.name)
            .and_then(|id| state.accounts.get(id));

        match account {
            Some(a) if verify_secret(&a.user.id, &credentials.secret, &a.digest) => {
                Ok(a.user.clone())
            }
            _ => {
                warn!(user = %credentials.name, "authentication failed");
                Err(WardenError::AuthenticationFailed {
                    reason: "invalid name or secret".to_string(),
                })
            }
        }
    }
}
