//! The two sanctioned evaluation entry points: `secure` and `try_secure`.
//!
//! A `Guard` is anything that can be checked against a `PermissionSource`:
//! a single `Permissible`, an `Operation`, or an `and`/`or` tree. The block
//! passed to `secure` runs only after the check passes, so every effect of
//! guarded work is reachable only through an allowed evaluation.

use std::fmt;

use tracing::{debug, warn};

use warden_policy::{
    Operation, Permissible, PermissibleSet, Requirement, WardenError, WardenResult,
};

use crate::{
    source::PermissionSource,
    traits::Authenticator,
    user::{Credentials, User},
};

/// Something a `PermissionSource` can be asked to allow.
///
/// Implementors provide `check`; `secure` and `try_secure` build on it.
pub trait Guard: fmt::Display {
    /// Evaluate this guard against `source`.
    ///
    /// Returns `UnpermittedOperation` or `UnpermittedOperations` on denial.
    fn check(&self, source: &PermissionSource) -> WardenResult<()>;

    /// Run `block` if `source` permits this guard; fail fast otherwise.
    fn secure<T, F>(&self, source: &PermissionSource, block: F) -> WardenResult<T>
    where
        F: FnOnce() -> T,
    {
        self.check(source)?;
        Ok(block())
    }

    /// Like `secure`, for blocks that are themselves fallible.
    ///
    /// The denial is converted into the caller's error type, so adapters can
    /// branch on one `Result` for both policy and domain failures.
    fn try_secure<T, E, F>(&self, source: &PermissionSource, block: F) -> Result<T, E>
    where
        E: From<WardenError>,
        F: FnOnce() -> Result<T, E>,
    {
        self.check(source)?;
        block()
    }
}

impl Guard for Permissible {
    fn check(&self, source: &PermissionSource) -> WardenResult<()> {
        if source.permits(self) {
            debug!(permissible = %self, authority = %source, "permitted");
            return Ok(());
        }
        warn!(permissible = %self, authority = %source, "operation denied");
        Err(WardenError::UnpermittedOperation {
            permissible: self.clone(),
            authority: source.description(),
        })
    }
}

impl Guard for Operation {
    fn check(&self, source: &PermissionSource) -> WardenResult<()> {
        Permissible::Operation(self.clone()).check(source)
    }
}

impl Guard for PermissibleSet {
    fn check(&self, source: &PermissionSource) -> WardenResult<()> {
        if source.permits_all(self) {
            debug!(guard = %self, authority = %source, "permitted");
            return Ok(());
        }
        warn!(
            guard = %self,
            combinator = %self.combinator(),
            authority = %source,
            "operations denied"
        );
        Err(WardenError::UnpermittedOperations {
            combinator: self.combinator(),
            members: self.members().to_vec(),
            authority: source.description(),
        })
    }
}

impl Guard for Requirement {
    fn check(&self, source: &PermissionSource) -> WardenResult<()> {
        match self {
            Self::One(p) => p.check(source),
            Self::Nested(set) => set.check(source),
        }
    }
}

/// Authenticate `credentials`, then run `block` for the resulting user under
/// `guard`.
///
/// An authentication failure is returned as-is, before any policy
/// evaluation, so callers can tell it apart from a denial with
/// [`WardenError::is_authentication_failure`].
pub fn authorize<A, G, T, F>(
    authenticator: &A,
    credentials: &Credentials,
    guard: &G,
    block: F,
) -> WardenResult<T>
where
    A: Authenticator + ?Sized,
    G: Guard,
    F: FnOnce(&User) -> T,
{
    let user = authenticator.authenticate(credentials)?;
    let source = PermissionSource::from(&user);
    guard.secure(&source, || block(&user))
}
