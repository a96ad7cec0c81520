//! The partial order on permissions.
//!
//! `try_compare` runs in three layers, each with explicit precedence:
//!
//! 1. Fixed rules: equality, `AllPermissions` on top, `NoPermissions` at the
//!    bottom except against a `Difference`, whose net effect may be empty
//!    and so stays incomparable. A difference is also incomparable with the
//!    term it excludes, whichever side it is on.
//! 2. Variant rules: both operands' variants are asked, the right operand's
//!    answer reversed. A variant may decline. When both decide and disagree
//!    the pair is incomparable.
//! 3. The generic fallback, which inspects `a - b` and `b - a`.
//!
//! Layers 2 and 3 consult both operands in the same way, so
//! `b.try_compare(a)` is always the reverse of `a.try_compare(b)`.

use std::cmp::Ordering;

use crate::order::is_at_most;

use super::{Permission, PermissionDifference, PermissionSet};

/// Outcome of a variant-specific comparison.
#[derive(Clone, Copy)]
enum Verdict {
    Decided(Option<Ordering>),
    Declined,
}

impl Verdict {
    fn reverse(self) -> Self {
        match self {
            Self::Decided(o) => Self::Decided(o.map(Ordering::reverse)),
            Self::Declined => Self::Declined,
        }
    }
}

/// Merge two answers to the same question, one per operand.
///
/// A single answer stands; two answers must agree.
fn reconcile(a: Option<Ordering>, b: Option<Ordering>) -> Option<Ordering> {
    match (a, b) {
        (Some(x), Some(y)) => (x == y).then_some(x),
        (Some(x), None) | (None, Some(x)) => Some(x),
        (None, None) => None,
    }
}

/// True if `excluding` is a difference that excludes exactly `other`.
fn excludes(excluding: &Permission, other: &Permission) -> bool {
    matches!(excluding, Permission::Difference(d) if d.exclude() == other)
}

impl Permission {
    /// Partial comparison: `None` means incomparable.
    pub fn try_compare(&self, other: &Permission) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }
        match (self, other) {
            (Self::AllPermissions, _) => return Some(Ordering::Greater),
            (_, Self::AllPermissions) => return Some(Ordering::Less),
            (Self::NoPermissions, Self::Difference(_))
            | (Self::Difference(_), Self::NoPermissions) => return None,
            (Self::NoPermissions, _) => return Some(Ordering::Less),
            (_, Self::NoPermissions) => return Some(Ordering::Greater),
            _ if excludes(self, other) || excludes(other, self) => return None,
            _ => {}
        }

        match (self.compare_variant(other), other.compare_variant(self).reverse()) {
            (Verdict::Decided(a), Verdict::Decided(b)) => (a == b).then_some(a).flatten(),
            (Verdict::Decided(o), Verdict::Declined)
            | (Verdict::Declined, Verdict::Decided(o)) => o,
            (Verdict::Declined, Verdict::Declined) => reconcile(
                self.compare_by_difference(other),
                other.compare_by_difference(self).map(Ordering::reverse),
            ),
        }
    }

    fn compare_variant(&self, other: &Permission) -> Verdict {
        match (self, other) {
            // A single permissible sits below anything that permits it.
            // Differences order themselves against their included term.
            (Self::Single(p), _)
                if !matches!(other, Self::Difference(_)) && other.permits(p) =>
            {
                Verdict::Decided(Some(Ordering::Less))
            }
            (Self::Set(set), _) => set.compare(other),
            (Self::Difference(d), _) => d.compare(other),
            (Self::Resource(a), Self::Resource(b)) => Verdict::Decided(a.try_compare(b)),
            (Self::ManagePermissions(a), Self::ManagePermissions(b)) => {
                Verdict::Decided(a.try_compare(b))
            }
            (Self::ManageRoles(a), Self::ManageRoles(b)) => Verdict::Decided(a.try_compare(b)),
            _ => Verdict::Declined,
        }
    }

    /// The fallback used by custom permissions and unrelated variants.
    fn compare_by_difference(&self, other: &Permission) -> Option<Ordering> {
        let forward = self.difference(other);
        if forward == *self {
            return Some(Ordering::Greater);
        }
        match forward {
            Self::NoPermissions => Some(Ordering::Less),
            Self::Difference(_) => {
                let backward = other.difference(self);
                if backward == *other {
                    Some(Ordering::Less)
                } else if backward == Self::NoPermissions {
                    Some(Ordering::Greater)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

impl PermissionSet {
    fn compare(&self, other: &Permission) -> Verdict {
        match other {
            Permission::Set(theirs) if theirs.is_subset(self) => {
                return Verdict::Decided(Some(Ordering::Greater))
            }
            Permission::Set(theirs) if self.is_subset(theirs) => {
                return Verdict::Decided(Some(Ordering::Less))
            }
            Permission::Set(_) => {}
            _ if self.contains(other) => return Verdict::Decided(Some(Ordering::Greater)),
            _ => {}
        }

        let theirs = other.members();
        // Every member on one side sits under some member on the other.
        let ours_dominate = theirs
            .iter()
            .all(|m| self.iter().any(|ours| is_at_most(m.try_compare(ours))));
        let theirs_dominate = self
            .iter()
            .all(|ours| theirs.iter().any(|m| is_at_most(ours.try_compare(m))));

        match (ours_dominate, theirs_dominate) {
            (true, false) => Verdict::Decided(Some(Ordering::Greater)),
            (false, true) => Verdict::Decided(Some(Ordering::Less)),
            // Unequal sets that dominate each other stay unordered.
            (true, true) => Verdict::Decided(None),
            (false, false) => Verdict::Declined,
        }
    }
}

impl PermissionDifference {
    fn compare(&self, other: &Permission) -> Verdict {
        if is_at_most(self.include().try_compare(other)) {
            return Verdict::Decided(Some(Ordering::Less));
        }
        Verdict::Declined
    }
}

impl PartialOrd for Permission {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_compare(other)
    }
}
