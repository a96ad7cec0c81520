//! Union and difference.
//!
//! `union` is symmetric, idempotent and associative up to flattening.
//! `difference` simplifies where it can and otherwise leaves an irreducible
//! `PermissionDifference`.

use std::{
    collections::HashSet,
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use crate::{
    error::{WardenError, WardenResult},
    hashing::hash_unordered,
};

use super::Permission;

/// The flattened union of two or more permissions.
///
/// Never empty, never a singleton, never contains `AllPermissions`,
/// `NoPermissions` or another set. Equality is set equality.
#[derive(Debug, Clone)]
pub struct PermissionSet {
    members: Arc<HashSet<Permission>>,
}

impl PermissionSet {
    /// Build a set directly, enforcing the invariants.
    ///
    /// Nested sets are flattened and `NoPermissions` members are dropped.
    /// Prefer [`Permission::any_of`], which collapses instead of failing.
    pub fn try_new<I>(members: I) -> WardenResult<Self>
    where
        I: IntoIterator<Item = Permission>,
    {
        let mut flat = HashSet::new();
        for member in members {
            member.flatten_into(&mut flat);
        }
        flat.remove(&Permission::NoPermissions);
        if flat.contains(&Permission::AllPermissions) {
            return Err(WardenError::Construction {
                kind: "permission set",
                reason: "a set never contains all permissions".to_string(),
            });
        }
        if flat.len() < 2 {
            return Err(WardenError::Construction {
                kind: "permission set",
                reason: format!("a set needs at least two members, got {}", flat.len()),
            });
        }
        Ok(Self {
            members: Arc::new(flat),
        })
    }

    /// Iterate over the flattened members in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.members.iter()
    }

    /// Number of flattened members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false for a well-formed set.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True if `permission` is one of the flattened members.
    pub fn contains(&self, permission: &Permission) -> bool {
        self.members.contains(permission)
    }

    /// True if every member of `self` is a member of `other`.
    pub fn is_subset(&self, other: &PermissionSet) -> bool {
        self.members.is_subset(&other.members)
    }

    fn difference(&self, x: &Permission) -> Permission {
        let remaining: HashSet<Permission> = match x {
            Permission::Set(other) => self.members.difference(&other.members).cloned().collect(),
            x => self.members.iter().filter(|m| *m != x).cloned().collect(),
        };
        if remaining.is_empty() {
            return Permission::NoPermissions;
        }
        Permission::Difference(PermissionDifference::new(
            Permission::from_members(remaining),
            x.clone(),
        ))
    }
}

impl PartialEq for PermissionSet {
    fn eq(&self, other: &Self) -> bool {
        *self.members == *other.members
    }
}

impl Eq for PermissionSet {}

impl Hash for PermissionSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_unordered(self.members.iter(), state);
    }
}

impl fmt::Display for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.members.iter().map(ToString::to_string).collect();
        names.sort();
        write!(f, "{{{}}}", names.join(" | "))
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct Terms {
    include: Permission,
    exclude: Permission,
}

/// `include` minus `exclude`, left unsimplified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermissionDifference(Arc<Terms>);

impl PermissionDifference {
    /// Pair `include` with `exclude` without simplifying.
    pub fn new(include: Permission, exclude: Permission) -> Self {
        Self(Arc::new(Terms { include, exclude }))
    }

    /// The permission being restricted.
    pub fn include(&self) -> &Permission {
        &self.0.include
    }

    /// The permission carved out of `include`.
    pub fn exclude(&self) -> &Permission {
        &self.0.exclude
    }

    fn union(&self, t: &Permission) -> Permission {
        let (include, exclude) = (self.include(), self.exclude());
        if t == exclude {
            // The excluded piece is restored.
            return include.union(t);
        }
        if t == include {
            return Permission::Difference(self.clone());
        }
        match exclude.difference(t) {
            // `t` covers everything that was excluded.
            Permission::NoPermissions => t.union(include),
            _ => Permission::pairwise(&Permission::Difference(self.clone()), t),
        }
    }

    fn difference(&self, x: &Permission) -> Permission {
        let (include, exclude) = (self.include(), self.exclude());
        if x == include {
            return Permission::NoPermissions;
        }
        if x == exclude {
            return Permission::Difference(self.clone());
        }
        match include.difference(x) {
            Permission::Difference(_) => Permission::Difference(PermissionDifference::new(
                include.clone(),
                exclude.union(x),
            )),
            Permission::NoPermissions => Permission::NoPermissions,
            reduced => Permission::Difference(PermissionDifference::new(reduced, exclude.clone())),
        }
    }
}

impl Permission {
    /// `self | other`.
    pub fn union(&self, other: &Permission) -> Permission {
        if self == other {
            return self.clone();
        }
        match (self, other) {
            (Self::AllPermissions, _) | (_, Self::AllPermissions) => Self::AllPermissions,
            (Self::NoPermissions, _) => other.clone(),
            (_, Self::NoPermissions) => self.clone(),
            (Self::Difference(d), _) => d.union(other),
            (_, Self::Difference(d)) => d.union(self),
            _ => Self::pairwise(self, other),
        }
    }

    /// `self - other`.
    pub fn difference(&self, other: &Permission) -> Permission {
        if self == other {
            return Self::NoPermissions;
        }
        match (self, other) {
            (_, Self::AllPermissions) => Self::NoPermissions,
            (_, Self::NoPermissions) => self.clone(),
            (Self::NoPermissions, _) => Self::NoPermissions,
            // A member of the excluded union is excluded entirely.
            (_, Self::Set(set)) if set.contains(self) => Self::NoPermissions,
            (Self::Set(set), _) => set.difference(other),
            (Self::Difference(d), _) => d.difference(other),
            _ => Self::Difference(PermissionDifference::new(self.clone(), other.clone())),
        }
    }

    /// The flattened members of a union, or just `self`.
    pub fn members(&self) -> Vec<&Permission> {
        match self {
            Self::Set(set) => set.iter().collect(),
            other => vec![other],
        }
    }

    fn pairwise(a: &Permission, b: &Permission) -> Permission {
        let mut members = HashSet::new();
        a.flatten_into(&mut members);
        b.flatten_into(&mut members);
        Self::from_members(members)
    }

    fn flatten_into(&self, out: &mut HashSet<Permission>) {
        match self {
            Self::Set(set) => out.extend(set.iter().cloned()),
            other => {
                out.insert(other.clone());
            }
        }
    }

    /// Collapse a flattened member set into its canonical permission.
    fn from_members(mut members: HashSet<Permission>) -> Permission {
        members.remove(&Self::NoPermissions);
        if members.contains(&Self::AllPermissions) {
            return Self::AllPermissions;
        }
        match members.len() {
            0 => Self::NoPermissions,
            1 => members
                .into_iter()
                .next()
                .unwrap_or(Self::NoPermissions),
            _ => Self::Set(PermissionSet {
                members: Arc::new(members),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissible::Operation;

    fn single(name: &str) -> Permission {
        Permission::from(Operation::new(name))
    }

    #[test]
    fn try_new_rejects_malformed_sets() {
        assert!(PermissionSet::try_new([]).is_err());
        assert!(PermissionSet::try_new([single("a")]).is_err());
        assert!(PermissionSet::try_new([single("a"), single("a")]).is_err());
        assert!(PermissionSet::try_new([single("a"), Permission::NoPermissions]).is_err());
        assert!(PermissionSet::try_new([single("a"), Permission::AllPermissions]).is_err());
        assert!(PermissionSet::try_new([single("a"), single("b")]).is_ok());
    }

    #[test]
    fn try_new_flattens_nested_sets() {
        let ab = single("a") | single("b");
        let set = PermissionSet::try_new([ab, single("c")]).unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.iter().all(|m| !matches!(m, Permission::Set(_))));
    }

    #[test]
    fn difference_union_restores_excluded_piece() {
        let (a, b) = (single("a"), single("b"));
        let d = &a - &b;
        assert!(matches!(d, Permission::Difference(_)));
        assert_eq!(&d | &b, &a | &b);
        assert_eq!(&d | &a, d);
        assert_eq!(&a | &d, d);
    }

    #[test]
    fn difference_union_drops_vacuous_exclusion() {
        let (a, b, c) = (single("a"), single("b"), single("c"));
        let d = &a - &b;
        // `b | c` covers the excluded `b`, so the exclusion disappears.
        assert_eq!(&d | &(&b | &c), Permission::any_of([a, b, c]));
    }

    #[test]
    fn difference_of_difference_folds_exclusions() {
        let (a, b, c) = (single("a"), single("b"), single("c"));
        let d = &(&a - &b) - &c;
        match d {
            Permission::Difference(d) => {
                assert_eq!(d.include(), &a);
                assert_eq!(d.exclude(), &(&b | &c));
            }
            other => panic!("expected a difference, got {other}"),
        }
        assert_eq!(&(&a - &b) - &a, Permission::NoPermissions);
        assert_eq!(&(&a - &b) - &b, &a - &b);
    }

    #[test]
    fn set_difference_removes_members() {
        let (a, b) = (single("a"), single("b"));
        assert_eq!(&(&a | &b) - &(&a | &b), Permission::NoPermissions);
        match &(&a | &b) - &a {
            Permission::Difference(d) => {
                assert_eq!(d.include(), &b);
                assert_eq!(d.exclude(), &a);
            }
            other => panic!("expected a difference, got {other}"),
        }
    }

    #[test]
    fn member_minus_its_union_is_empty() {
        let (a, b) = (single("a"), single("b"));
        assert_eq!(&a - &(&a | &b), Permission::NoPermissions);
        assert!(matches!(&single("c") - &(&a | &b), Permission::Difference(_)));
    }
}
