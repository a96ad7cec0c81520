use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use crate::permissible::Permissible;

/// A permission defined only by its predicate.
///
/// Union, difference and ordering fall back to the generic algebra.
pub trait SimplePermission: fmt::Debug + Send + Sync {
    /// Shown in error messages and permission descriptions.
    fn name(&self) -> &str;

    fn permits(&self, permissible: &Permissible) -> bool;
}

/// Shared handle to a `SimplePermission`. Equality is by identity.
#[derive(Debug, Clone)]
pub struct CustomPermission(Arc<dyn SimplePermission>);

impl CustomPermission {
    /// Share `permission` behind a new handle.
    pub fn new(permission: impl SimplePermission + 'static) -> Self {
        Self(Arc::new(permission))
    }

    /// The wrapped permission's display name.
    pub fn name(&self) -> &str {
        self.0.name()
    }

    /// Delegate to the wrapped predicate.
    pub fn permits(&self, permissible: &Permissible) -> bool {
        self.0.permits(permissible)
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0) as *const ()
    }
}

impl PartialEq for CustomPermission {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for CustomPermission {}

impl Hash for CustomPermission {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}
