//! The resource hierarchy and resource-scoped permissions.
//!
//! Resources form a parent-linked tree rooted at `AllResources`. Each node
//! owns its parent by value, so the tree is acyclic by construction and a
//! node can never be its own parent.
//!
//! Resources are partially ordered by containment: a child is less than
//! each of its ancestors, and nodes on unrelated branches are incomparable.

use std::{cmp::Ordering, fmt, iter, sync::Arc};

use crate::{
    error::{WardenError, WardenResult},
    order::product_order,
    permissible::{Operation, Permissible},
    permission::Permission,
};

#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ResourceNode {
    name: String,
    parent: Resource,
}

/// A node in the resource hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    /// The unique root. Every resource is a child of it.
    AllResources,
    Node(Arc<ResourceNode>),
}

impl Resource {
    /// Create the child of `self` called `name`.
    ///
    /// Names must be non-empty and must not contain `/`.
    pub fn child(&self, name: impl Into<String>) -> WardenResult<Resource> {
        let name = name.into();
        if name.is_empty() || name.contains('/') {
            return Err(WardenError::Construction {
                kind: "resource",
                reason: format!("'{name}' is not a valid resource name"),
            });
        }
        Ok(Resource::Node(Arc::new(ResourceNode {
            name,
            parent: self.clone(),
        })))
    }

    /// Build a resource from an absolute path such as `/docs/public`.
    ///
    /// `/` is `AllResources`. A single trailing slash is ignored.
    pub fn parse(path: &str) -> WardenResult<Resource> {
        let Some(rest) = path.strip_prefix('/') else {
            return Err(WardenError::Construction {
                kind: "resource",
                reason: format!("path '{path}' must start with '/'"),
            });
        };
        let rest = rest.strip_suffix('/').unwrap_or(rest);
        if rest.is_empty() {
            return Ok(Resource::AllResources);
        }
        rest.split('/')
            .try_fold(Resource::AllResources, |parent, segment| parent.child(segment))
    }

    /// The last path segment, or `None` for the root.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::AllResources => None,
            Self::Node(node) => Some(&node.name),
        }
    }

    /// The enclosing node, or `None` for the root.
    pub fn parent(&self) -> Option<&Resource> {
        match self {
            Self::AllResources => None,
            Self::Node(node) => Some(&node.parent),
        }
    }

    /// Strict ancestors, nearest first, ending at `AllResources`.
    pub fn ancestors(&self) -> impl Iterator<Item = &Resource> {
        iter::successors(self.parent(), |r| r.parent())
    }

    /// Number of edges between this node and the root.
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// True if `ancestor` is reachable by following `parent` zero or more times.
    pub fn is_child_of(&self, ancestor: &Resource) -> bool {
        iter::successors(Some(self), |r| r.parent()).any(|r| r == ancestor)
    }
}

impl PartialOrd for Resource {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            Some(Ordering::Equal)
        } else if self.is_child_of(other) {
            Some(Ordering::Less)
        } else if other.is_child_of(self) {
            Some(Ordering::Greater)
        } else {
            None
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllResources => f.write_str("/"),
            Self::Node(node) => match &node.parent {
                Self::AllResources => write!(f, "/{}", node.name),
                parent => write!(f, "{parent}/{}", node.name),
            },
        }
    }
}

/// Permits operations on a resource subtree.
///
/// A request is permitted when its resource lies at or below `resource` and
/// its operation is permitted by `operations`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourcePermission {
    resource: Resource,
    operations: Box<Permission>,
}

impl ResourcePermission {
    /// Scope `operations` to the subtree at `resource`.
    pub fn new(resource: Resource, operations: Permission) -> Self {
        Self {
            resource,
            operations: Box::new(operations),
        }
    }

    /// The subtree root.
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// The operations permitted within the subtree.
    pub fn operations(&self) -> &Permission {
        &self.operations
    }

    /// True if `permissible` is a resource access inside the subtree whose
    /// operation is permitted.
    pub fn permits(&self, permissible: &Permissible) -> bool {
        match permissible {
            Permissible::Resource(access) => {
                access.resource.is_child_of(&self.resource)
                    && self
                        .operations
                        .permits(&Permissible::Operation(access.operation.clone()))
            }
            _ => false,
        }
    }

    /// Greater only if neither the resource nor the operation dimension
    /// regresses; incomparable when they disagree in direction.
    pub fn try_compare(&self, other: &Self) -> Option<Ordering> {
        product_order(
            self.resource.partial_cmp(&other.resource),
            self.operations.try_compare(&other.operations),
        )
    }
}

impl fmt::Display for ResourcePermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} under {}", self.operations, self.resource)
    }
}

impl Permission {
    /// Permit `operations` anywhere under `resource`.
    pub fn resource<I, S>(resource: Resource, operations: I) -> Permission
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let operations = Permission::any_of(
            operations
                .into_iter()
                .map(|op| Permission::from(Operation::new(op))),
        );
        Permission::Resource(ResourcePermission::new(resource, operations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> (Resource, Resource, Resource, Resource) {
        let a = Resource::AllResources.child("a").unwrap();
        let b = a.child("b").unwrap();
        let c = b.child("c").unwrap();
        let d = a.child("d").unwrap();
        (a, b, c, d)
    }

    #[test]
    fn child_of_is_reflexive_and_transitive() {
        let (a, b, c, _) = tree();
        assert!(c.is_child_of(&c));
        assert!(c.is_child_of(&b));
        assert!(c.is_child_of(&a));
        assert!(c.is_child_of(&Resource::AllResources));
        assert!(!a.is_child_of(&c));
    }

    #[test]
    fn siblings_and_cousins_are_incomparable() {
        let (a, b, c, d) = tree();
        assert_eq!(d.partial_cmp(&b), None);
        assert_eq!(d.partial_cmp(&c), None);
        assert!(c < a);
        assert!(a > b);
        assert!(Resource::AllResources > d);
    }

    #[test]
    fn parse_matches_manual_construction() {
        let (_, _, c, _) = tree();
        assert_eq!(Resource::parse("/a/b/c").unwrap(), c);
        assert_eq!(Resource::parse("/a/b/c/").unwrap(), c);
        assert_eq!(Resource::parse("/").unwrap(), Resource::AllResources);
        assert_eq!(c.to_string(), "/a/b/c");
        assert_eq!(c.depth(), 3);
        assert_eq!(c.name(), Some("c"));
    }

    #[test]
    fn invalid_paths_are_construction_errors() {
        assert!(Resource::parse("a/b").is_err());
        assert!(Resource::parse("/a//b").is_err());
        assert!(Resource::AllResources.child("x/y").is_err());
        assert!(Resource::AllResources.child("").is_err());
    }

    #[test]
    fn resource_permission_scopes_to_subtree() {
        let (a, b, c, d) = tree();
        let perm = Permission::resource(b.clone(), ["read", "write"]);

        assert!(perm.permits(&Permissible::access(b.clone(), "read")));
        assert!(perm.permits(&Permissible::access(c.clone(), "write")));
        assert!(!perm.permits(&Permissible::access(a, "read")));
        assert!(!perm.permits(&Permissible::access(d, "read")));
        assert!(!perm.permits(&Permissible::access(c, "delete")));
        assert!(!perm.permits(&Permissible::operation("read")));
    }

    #[test]
    fn resource_permissions_compare_on_both_dimensions() {
        let (a, b, _, d) = tree();
        let wide = Permission::resource(a.clone(), ["read", "write"]);
        let narrow = Permission::resource(b.clone(), ["read"]);
        let deeper_but_wider_ops = Permission::resource(b, ["read", "write", "delete"]);

        assert!(wide > narrow);
        assert!(narrow < wide);
        assert_eq!(wide.partial_cmp(&deeper_but_wider_ops), None);
        assert_eq!(
            narrow.partial_cmp(&Permission::resource(d, ["read"])),
            None
        );
        assert!(Permission::resource(a.clone(), ["read"]) < wide);
    }
}
