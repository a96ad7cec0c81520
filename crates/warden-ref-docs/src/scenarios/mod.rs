//! Document service demo scenarios.
//!
//! Each scenario wires a real `InMemoryDirectory` and `DocumentStore`
//! together, prints every step, and returns the recorded outcomes so tests
//! can assert on them.

pub mod delegation;
pub mod document_access;

use std::fmt;

use crate::store::DocumentError;

/// How one scenario step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    /// Policy evaluation refused the request.
    Denied,
    /// Failed before policy evaluation (authentication) or in the store.
    Failed,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allowed => f.write_str("ALLOWED"),
            Self::Denied => f.write_str("DENIED"),
            Self::Failed => f.write_str("FAILED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub label: String,
    pub verdict: Verdict,
}

/// Classify `result`, print it, and append it to `outcomes`.
pub(crate) fn record<T, E>(outcomes: &mut Vec<Outcome>, label: &str, result: &Result<T, E>)
where
    E: Classify + fmt::Display,
{
    let verdict = match result {
        Ok(_) => Verdict::Allowed,
        Err(e) if e.is_denial() => Verdict::Denied,
        Err(_) => Verdict::Failed,
    };
    match result {
        Ok(_) => println!("  {:<44} {}", label, verdict),
        Err(e) => println!("  {:<44} {}: {}", label, verdict, e),
    }
    outcomes.push(Outcome {
        label: label.to_string(),
        verdict,
    });
}

/// Errors that can tell a policy denial from any other failure.
pub(crate) trait Classify {
    fn is_denial(&self) -> bool;
}

impl Classify for DocumentError {
    fn is_denial(&self) -> bool {
        DocumentError::is_denial(self)
    }
}

impl Classify for warden_policy::WardenError {
    fn is_denial(&self) -> bool {
        warden_policy::WardenError::is_denial(self)
    }
}
