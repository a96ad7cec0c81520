//! The role algebra.
//!
//! A `Role` is the bearer-facing wrapper around a `Permission`. Roles compose
//! in two ways:
//!
//! - `|` and `-` combine the underlying permissions into a new single role.
//! - `+` is the multi-bearer union: it keeps each role intact inside a
//!   flattened `Roles` set, which is what management roles reason about.
//!
//! Constructors normalise: a role over `AllPermissions` is `SuperUser`, a
//! role over `NoPermissions` is `NoRole`, and a role over a role-management
//! permission is the matching management role. Two roles that permit the
//! same things through the same permission are therefore always equal.

use std::{
    cmp::Ordering,
    collections::HashSet,
    fmt,
    hash::{Hash, Hasher},
    ops::{Add, BitOr, Sub},
    sync::Arc,
};

use crate::{
    error::{WardenError, WardenResult},
    hashing::hash_unordered,
    management::{Level, Management},
    order::is_at_most,
    permissible::{ManagementOperation, Permissible},
    permission::Permission,
    resource::Resource,
};

/// A role defined by a permission value. Never wraps the top, the bottom or
/// a role-management permission; see [`Role::from`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermissionsRole(Permission);

impl PermissionsRole {
    /// The wrapped permission.
    pub fn permission(&self) -> &Permission {
        &self.0
    }
}

/// The multi-bearer union of two or more roles.
#[derive(Debug, Clone)]
pub struct RoleSet {
    members: Arc<HashSet<Role>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    /// Holds every permission.
    SuperUser,
    /// Holds nothing.
    NoRole,
    Permissions(PermissionsRole),
    Roles(RoleSet),
    /// May manage roles up to a level; recursive managers also reach roles
    /// built from themselves.
    Management(Arc<Management<Role>>),
}

impl Role {
    /// A role permitting `operations` under `resource`.
    pub fn resource<I, S>(resource: Resource, operations: I) -> Role
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Role::from(Permission::resource(resource, operations))
    }

    /// A role that may perform `operations` on roles up to `role`.
    pub fn manager<I>(role: Role, operations: I) -> Role
    where
        I: IntoIterator<Item = ManagementOperation>,
    {
        Role::Management(Arc::new(Management::new(role, operations)))
    }

    /// Like [`Role::manager`], and also on roles built from the manager itself.
    pub fn recursive_manager<I>(role: Role, operations: I) -> Role
    where
        I: IntoIterator<Item = ManagementOperation>,
    {
        Role::Management(Arc::new(Management::recursive(role, operations)))
    }

    /// Multi-bearer union of every role in `roles`.
    pub fn any_of<I>(roles: I) -> Role
    where
        I: IntoIterator<Item = Role>,
    {
        roles.into_iter().fold(Role::NoRole, |acc, r| acc.join(&r))
    }

    /// The permission this role stands for.
    pub fn permission(&self) -> Permission {
        match self {
            Self::SuperUser => Permission::AllPermissions,
            Self::NoRole => Permission::NoPermissions,
            Self::Permissions(p) => p.0.clone(),
            Self::Roles(set) => Permission::any_of(set.iter().map(Role::permission)),
            Self::Management(m) => Permission::ManageRoles(Arc::clone(m)),
        }
    }

    /// True if this role permits `permissible`.
    ///
    /// A `Roles` set permits whatever any of its members permits.
    pub fn can(&self, permissible: &Permissible) -> bool {
        match self {
            Self::SuperUser => true,
            Self::NoRole => false,
            Self::Permissions(p) => p.0.permits(permissible),
            Self::Roles(set) => set.iter().any(|r| r.can(permissible)),
            Self::Management(m) => match permissible {
                Permissible::ManageRole(request) => m.permits_request(request),
                _ => false,
            },
        }
    }

    /// Permission-level union (`|`).
    pub fn union(&self, other: &Role) -> Role {
        if self == other {
            return self.clone();
        }
        Role::from(self.permission().union(&other.permission()))
    }

    /// Permission-level difference (`-`).
    pub fn difference(&self, other: &Role) -> Role {
        Role::from(self.permission().difference(&other.permission()))
    }

    /// Multi-bearer union (`+`).
    pub fn join(&self, other: &Role) -> Role {
        if self == other {
            return self.clone();
        }
        match (self, other) {
            (Self::SuperUser, _) | (_, Self::SuperUser) => Self::SuperUser,
            (Self::NoRole, _) => other.clone(),
            (_, Self::NoRole) => self.clone(),
            _ => {
                let mut members = HashSet::new();
                self.flatten_into(&mut members);
                other.flatten_into(&mut members);
                match members.len() {
                    1 => members.into_iter().next().unwrap_or(Self::NoRole),
                    _ => Self::Roles(RoleSet {
                        members: Arc::new(members),
                    }),
                }
            }
        }
    }

    fn flatten_into(&self, out: &mut HashSet<Role>) {
        match self {
            Self::Roles(set) => out.extend(set.iter().cloned()),
            other => {
                out.insert(other.clone());
            }
        }
    }
}

impl From<Permission> for Role {
    fn from(permission: Permission) -> Self {
        match permission {
            Permission::AllPermissions => Self::SuperUser,
            Permission::NoPermissions => Self::NoRole,
            Permission::ManageRoles(m) => Self::Management(m),
            other => Self::Permissions(PermissionsRole(other)),
        }
    }
}

impl Level for Role {
    fn join(&self, other: &Self) -> Self {
        Role::join(self, other)
    }

    fn lift(management: &Management<Self>) -> Self {
        Self::Management(Arc::new(management.clone()))
    }
}

impl RoleSet {
    /// Build a set directly, enforcing the invariants.
    ///
    /// Nested sets are flattened and `NoRole` members dropped.
    /// Prefer [`Role::any_of`], which collapses instead of failing.
    pub fn try_new<I>(members: I) -> WardenResult<Self>
    where
        I: IntoIterator<Item = Role>,
    {
        let mut flat = HashSet::new();
        for member in members {
            member.flatten_into(&mut flat);
        }
        flat.remove(&Role::NoRole);
        if flat.contains(&Role::SuperUser) {
            return Err(WardenError::Construction {
                kind: "role set",
                reason: "a set never contains the superuser role".to_string(),
            });
        }
        if flat.len() < 2 {
            return Err(WardenError::Construction {
                kind: "role set",
                reason: format!("a set needs at least two members, got {}", flat.len()),
            });
        }
        Ok(Self {
            members: Arc::new(flat),
        })
    }

    /// Iterate over the member roles in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.members.iter()
    }

    /// Number of member roles. Always at least two.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false for a well-formed set.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True if `role` is one of the members.
    pub fn contains(&self, role: &Role) -> bool {
        self.members.contains(role)
    }

    /// Some member of this set dominates `role`.
    fn covers(&self, role: &Role) -> bool {
        self.iter().any(|ours| is_at_most(role.partial_cmp(ours)))
    }

    fn try_compare(&self, other: &Role) -> Option<Ordering> {
        let theirs: Vec<&Role> = match other {
            Role::Roles(set) if set.members.is_subset(&self.members) => {
                return Some(Ordering::Greater)
            }
            Role::Roles(set) if self.members.is_subset(&set.members) => {
                return Some(Ordering::Less)
            }
            Role::Roles(set) => set.iter().collect(),
            single if self.contains(single) => return Some(Ordering::Greater),
            single => vec![single],
        };

        let ours_dominate = theirs.iter().all(|r| self.covers(r));
        let theirs_dominate = self
            .iter()
            .all(|ours| theirs.iter().any(|r| is_at_most(ours.partial_cmp(r))));
        match (ours_dominate, theirs_dominate) {
            (true, false) => Some(Ordering::Greater),
            (false, true) => Some(Ordering::Less),
            // Unequal sets that dominate each other stay unordered.
            _ => None,
        }
    }
}

impl PartialEq for RoleSet {
    fn eq(&self, other: &Self) -> bool {
        *self.members == *other.members
    }
}

impl Eq for RoleSet {}

impl Hash for RoleSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_unordered(self.members.iter(), state);
    }
}

impl PartialOrd for Role {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }
        match (self, other) {
            (Self::SuperUser, _) | (_, Self::NoRole) => Some(Ordering::Greater),
            (_, Self::SuperUser) | (Self::NoRole, _) => Some(Ordering::Less),
            (Self::Roles(set), _) => set.try_compare(other),
            (_, Self::Roles(set)) => set.try_compare(self).map(Ordering::reverse),
            _ => self.permission().try_compare(&other.permission()),
        }
    }
}

impl BitOr for Role {
    type Output = Role;

    fn bitor(self, rhs: Role) -> Role {
        self.union(&rhs)
    }
}

impl Sub for Role {
    type Output = Role;

    fn sub(self, rhs: Role) -> Role {
        self.difference(&rhs)
    }
}

impl Add for Role {
    type Output = Role;

    fn add(self, rhs: Role) -> Role {
        self.join(&rhs)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SuperUser => f.write_str("superuser"),
            Self::NoRole => f.write_str("no role"),
            Self::Permissions(p) => write!(f, "role({})", p.0),
            Self::Roles(set) => {
                let mut names: Vec<String> = set.iter().map(ToString::to_string).collect();
                names.sort();
                write!(f, "roles[{}]", names.join(" + "))
            }
            Self::Management(m) => m.fmt_subject("roles", f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissible::Operation;

    use ManagementOperation::{Grant, Retrieve, Revoke};

    fn role(ops: &[&str]) -> Role {
        Role::from(Permission::operations(ops))
    }

    fn op(name: &str) -> Permissible {
        Permissible::Operation(Operation::new(name))
    }

    #[test]
    fn constructors_normalise_top_and_bottom() {
        assert_eq!(Role::from(Permission::AllPermissions), Role::SuperUser);
        assert_eq!(Role::from(Permission::NoPermissions), Role::NoRole);
        let m = Role::manager(role(&["a"]), [Grant]);
        assert_eq!(Role::from(m.permission()), m);
    }

    #[test]
    fn roles_union_can_what_any_member_can() {
        let both = role(&["read"]) + role(&["write"]);
        assert!(matches!(both, Role::Roles(_)));
        assert!(both.can(&op("read")));
        assert!(both.can(&op("write")));
        assert!(!both.can(&op("delete")));
    }

    #[test]
    fn multi_bearer_union_flattens_and_collapses() {
        let (a, b, c) = (role(&["a"]), role(&["b"]), role(&["c"]));
        let left = (a.clone() + b.clone()) + c.clone();
        let right = a.clone() + (b.clone() + c.clone());
        assert_eq!(left, right);
        assert_eq!(a.clone() + a.clone(), a);
        assert_eq!(a.clone() + Role::NoRole, a);
        assert_eq!(a.clone() + Role::SuperUser, Role::SuperUser);
    }

    #[test]
    fn permission_level_union_merges_into_one_role() {
        let merged = role(&["a"]) | role(&["b"]);
        assert_eq!(merged, role(&["a", "b"]));
        assert_eq!(role(&["a", "b"]) - role(&["a", "b"]), Role::NoRole);
    }

    #[test]
    fn role_set_try_new_enforces_invariants() {
        assert!(RoleSet::try_new([role(&["a"])]).is_err());
        assert!(RoleSet::try_new([role(&["a"]), Role::SuperUser]).is_err());
        assert!(RoleSet::try_new([role(&["a"]), Role::NoRole]).is_err());
        assert_eq!(RoleSet::try_new([role(&["a"]), role(&["b"])]).unwrap().len(), 2);
    }

    #[test]
    fn roles_order_by_member_domination() {
        let (ab, a, b, c) = (role(&["a", "b"]), role(&["a"]), role(&["b"]), role(&["c"]));
        let pair = a.clone() + c.clone();

        assert!(pair > a);
        assert!(a < pair);
        assert!(ab.clone() + c.clone() > pair);
        assert!(pair < ab.clone() + c.clone());
        assert_eq!(pair.partial_cmp(&(b.clone() + c.clone())), None);
        assert!(Role::SuperUser > pair);
        assert!(Role::NoRole < pair);
    }

    #[test]
    fn plain_roles_order_through_permissions() {
        assert!(role(&["a", "b"]) > role(&["a"]));
        assert_eq!(role(&["a"]).partial_cmp(&role(&["b"])), None);
    }

    #[test]
    fn role_sets_dominating_each_other_are_incomparable() {
        let ab = role(&["a", "b"]);
        let with_a = ab.clone() + role(&["a"]);
        let with_b = ab + role(&["b"]);

        assert_ne!(with_a, with_b);
        assert_eq!(with_a.partial_cmp(&with_b), None);
        assert_eq!(with_b.partial_cmp(&with_a), None);
    }

    #[test]
    fn role_order_is_consistent_with_equality_and_its_reverse() {
        let (a, b, c, ab) = (role(&["a"]), role(&["b"]), role(&["c"]), role(&["a", "b"]));
        let pool = vec![
            Role::SuperUser,
            Role::NoRole,
            a.clone(),
            b.clone(),
            ab.clone(),
            ab.clone() + a.clone(),
            ab.clone() + b.clone(),
            a.clone() + c.clone(),
            a.clone() - b.clone(),
            b.clone() - a.clone(),
            Role::manager(a.clone(), [Grant]),
            Role::manager(ab.clone() + c.clone(), [Grant, Revoke]),
            Role::recursive_manager(a.clone(), [Grant]),
            a.clone() + Role::recursive_manager(a, [Grant]),
        ];

        for x in &pool {
            for y in &pool {
                let forward = x.partial_cmp(y);
                assert_eq!(forward == Some(Ordering::Equal), x == y, "{x} vs {y}");
                assert_eq!(
                    y.partial_cmp(x),
                    forward.map(Ordering::reverse),
                    "{y} vs {x}"
                );
                assert_eq!(x <= y, x < y || x == y, "{x} <= {y}");
            }
        }
    }

    #[test]
    fn manager_grants_roles_up_to_level() {
        let editor = role(&["edit"]);
        let hr = Role::manager(editor.clone() + role(&["view"]), [Grant, Revoke]);

        assert!(hr.can(&Permissible::manage_role(editor.clone(), Grant)));
        assert!(hr.can(&Permissible::manage_role(role(&["view"]), Revoke)));
        assert!(!hr.can(&Permissible::manage_role(editor.clone(), Retrieve)));
        assert!(!hr.can(&Permissible::manage_role(role(&["admin"]), Grant)));
        assert!(!hr.can(&op("edit")));
    }

    #[test]
    fn recursive_manager_covers_self_built_roles() {
        let r = role(&["edit"]);
        let rec = Role::recursive_manager(r.clone(), [Grant]);

        let depth_two = r.clone() + Role::manager(r.clone(), [Grant]);
        let depth_three = r.clone() + Role::manager(depth_two.clone(), [Grant]);
        let with_itself = r.clone() + rec.clone();

        for target in [r.clone(), depth_two.clone(), depth_three, with_itself] {
            assert!(
                rec.can(&Permissible::manage_role(target.clone(), Grant)),
                "recursive manager should reach {target}"
            );
        }

        let plain = Role::manager(r.clone(), [Grant]);
        assert!(!plain.can(&Permissible::manage_role(depth_two, Grant)));
        assert!(rec > plain);

        let foreign = r.clone() + Role::manager(role(&["other"]), [Grant]);
        assert!(!rec.can(&Permissible::manage_role(foreign, Grant)));
    }
}
