//! Error types for the WARDEN authorization core.
//!
//! Every fallible operation in the workspace returns `WardenResult<T>`.
//! Denials carry the attempted permissible and a description of the
//! authority that refused it, so adapters can report them verbatim.

use thiserror::Error;

use crate::{
    permissible::Permissible,
    permissible_set::{Combinator, Requirement},
};

/// The unified error type for WARDEN.
#[derive(Debug, Error)]
pub enum WardenError {
    /// A single permissible was denied by the active permission source.
    #[error("operation '{permissible}' is not permitted by {authority}")]
    UnpermittedOperation {
        permissible: Permissible,
        authority: String,
    },

    /// A permissible set was denied by the active permission source.
    #[error("{combinator} of [{}] is not permitted by {authority}", render(.members))]
    UnpermittedOperations {
        combinator: Combinator,
        members: Vec<Requirement>,
        authority: String,
    },

    /// An internal invariant of a set-valued permission or role was violated.
    ///
    /// This signals a defect in a combinator, never a user condition.
    #[error("invalid {kind}: {reason}")]
    Construction { kind: &'static str, reason: String },

    /// The bearer could not be authenticated; policy evaluation never ran.
    #[error("authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    /// A bearer registry lookup found nothing under the given name or id.
    #[error("unknown bearer '{name}'")]
    UnknownBearer { name: String },

    /// A registry mutation collided with existing state.
    #[error("conflict: {reason}")]
    Conflict { reason: String },

    /// A catalog or other configuration input is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

impl WardenError {
    /// True when policy evaluation ran and refused the request.
    #[must_use]
    pub fn is_denial(&self) -> bool {
        matches!(
            self,
            Self::UnpermittedOperation { .. } | Self::UnpermittedOperations { .. }
        )
    }

    /// True when the request failed before reaching policy evaluation.
    #[must_use]
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }
}

fn render(members: &[Requirement]) -> String {
    members
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience alias used throughout the WARDEN crates.
pub type WardenResult<T> = Result<T, WardenError>;
