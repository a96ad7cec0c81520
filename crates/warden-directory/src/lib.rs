//! # warden-directory
//!
//! Reference bearer registry for WARDEN: a thread-safe in-memory user
//! directory with salted SHA-256 credential digests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use warden_core::{authorize, Credentials};
//! use warden_directory::InMemoryDirectory;
//!
//! let directory = InMemoryDirectory::new();
//! directory.register("ada", "hunter2", editor_role)?;
//! let body = authorize(&directory, &Credentials::new("ada", "hunter2"), &read_docs, |user| {
//!     store.load(&path)
//! })?;
//! ```

pub mod credential;
pub mod directory;

pub use credential::{digest_secret, verify_secret};
pub use directory::InMemoryDirectory;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::thread;

    use warden_core::{Authenticator, Credentials, PermissionSource};
    use warden_policy::{ManagementOperation, Permission, Role, WardenError};

    use crate::InMemoryDirectory;

    use ManagementOperation::{Grant, Retrieve, Revoke};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn role(ops: &[&str]) -> Role {
        Role::from(Permission::operations(ops))
    }

    fn editor() -> Role {
        role(&["edit"])
    }

    fn viewer() -> Role {
        role(&["view"])
    }

    /// May grant, revoke and retrieve editor and viewer roles.
    fn hr() -> PermissionSource {
        PermissionSource::from(Role::manager(
            editor() + viewer(),
            [Grant, Revoke, Retrieve],
        ))
    }

    // ── Registry ──────────────────────────────────────────────────────────────

    #[test]
    fn register_then_find() {
        let dir = InMemoryDirectory::new();
        let ada = dir.register("ada", "pw", viewer()).unwrap();

        assert_eq!(dir.find(ada.id).unwrap(), ada);
        assert_eq!(dir.find_by_name("ada").unwrap().id, ada.id);
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn duplicate_names_conflict() {
        let dir = InMemoryDirectory::new();
        dir.register("ada", "pw", viewer()).unwrap();
        let err = dir.register("ada", "other", editor()).unwrap_err();
        assert!(matches!(err, WardenError::Conflict { .. }));
    }

    #[test]
    fn remove_forgets_name_and_id() {
        let dir = InMemoryDirectory::new();
        let ada = dir.register("ada", "pw", viewer()).unwrap();
        dir.remove(ada.id).unwrap();

        assert!(matches!(dir.find(ada.id), Err(WardenError::UnknownBearer { .. })));
        assert!(matches!(
            dir.find_by_name("ada"),
            Err(WardenError::UnknownBearer { .. })
        ));
        assert!(dir.is_empty());
        dir.register("ada", "pw", viewer()).unwrap();
    }

    #[test]
    fn users_are_listed_by_name() {
        let dir = InMemoryDirectory::new();
        dir.register("grace", "pw", viewer()).unwrap();
        dir.register("ada", "pw", viewer()).unwrap();
        let names: Vec<String> = dir.users().into_iter().map(|u| u.name).collect();
        assert_eq!(names, vec!["ada", "grace"]);
    }

    #[test]
    fn writes_are_visible_to_other_threads() {
        let dir = InMemoryDirectory::new();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let dir = dir.clone();
                thread::spawn(move || {
                    let user = dir.register(format!("user-{i}"), "pw", viewer()).unwrap();
                    assert_eq!(dir.find(user.id).unwrap().name, user.name);
                    user.id
                })
            })
            .collect();

        for handle in handles {
            let id = handle.join().unwrap();
            assert!(dir.find(id).is_ok());
        }
        assert_eq!(dir.len(), 8);
    }

    // ── Authentication ────────────────────────────────────────────────────────

    #[test]
    fn authenticate_checks_secret() {
        let dir = InMemoryDirectory::new();
        let ada = dir.register("ada", "hunter2", viewer()).unwrap();

        let user = dir.authenticate(&Credentials::new("ada", "hunter2")).unwrap();
        assert_eq!(user.id, ada.id);

        let wrong = dir.authenticate(&Credentials::new("ada", "nope")).unwrap_err();
        let unknown = dir.authenticate(&Credentials::new("bob", "hunter2")).unwrap_err();
        assert!(wrong.is_authentication_failure());
        assert!(unknown.is_authentication_failure());
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    // ── Delegated role management ─────────────────────────────────────────────

    #[test]
    fn manager_grants_and_revokes_within_level() {
        let dir = InMemoryDirectory::new();
        let ada = dir.register("ada", "pw", viewer()).unwrap();

        let granted = dir.grant_role(&hr(), ada.id, editor()).unwrap();
        assert_eq!(granted.role, viewer() + editor());
        assert_eq!(dir.find(ada.id).unwrap().role, viewer() + editor());

        let revoked = dir.revoke_role(&hr(), ada.id, &viewer()).unwrap();
        assert_eq!(revoked.role, editor());

        let emptied = dir.revoke_role(&hr(), ada.id, &editor()).unwrap();
        assert_eq!(emptied.role, Role::NoRole);
    }

    #[test]
    fn manager_cannot_grant_above_level() {
        let dir = InMemoryDirectory::new();
        let ada = dir.register("ada", "pw", viewer()).unwrap();

        let err = dir.grant_role(&hr(), ada.id, Role::SuperUser).unwrap_err();
        assert!(err.is_denial());
        assert_eq!(dir.find(ada.id).unwrap().role, viewer());
    }

    #[test]
    fn revoking_an_unheld_role_conflicts() {
        let dir = InMemoryDirectory::new();
        let ada = dir.register("ada", "pw", viewer()).unwrap();
        let err = dir.revoke_role(&hr(), ada.id, &editor()).unwrap_err();
        assert!(matches!(err, WardenError::Conflict { .. }));
    }

    #[test]
    fn role_of_requires_retrieve() {
        let dir = InMemoryDirectory::new();
        let ada = dir.register("ada", "pw", viewer()).unwrap();

        assert_eq!(dir.role_of(&hr(), ada.id).unwrap(), viewer());

        let grant_only = PermissionSource::from(Role::manager(viewer(), [Grant]));
        assert!(dir.role_of(&grant_only, ada.id).unwrap_err().is_denial());
    }

    #[test]
    fn plain_roles_cannot_manage() {
        let dir = InMemoryDirectory::new();
        let ada = dir.register("ada", "pw", viewer()).unwrap();
        let actor = PermissionSource::from(editor());
        assert!(dir.grant_role(&actor, ada.id, viewer()).unwrap_err().is_denial());
    }

    #[test]
    fn assign_role_bypasses_policy() {
        let dir = InMemoryDirectory::new();
        let ada = dir.register("ada", "pw", viewer()).unwrap();
        let user = dir.assign_role(ada.id, Role::SuperUser).unwrap();
        assert_eq!(user.role, Role::SuperUser);
    }
}
