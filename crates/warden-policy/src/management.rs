//! Management permissions: authority to grant, revoke or retrieve other
//! permissions or roles.
//!
//! A `Management<L>` authorizes `operations` on any subject at or below
//! `level`. The recursive variant also reaches subjects built from the
//! manager itself, so a recursive manager of `R` may hand out `R` together
//! with management of `R`, nested to any depth.
//!
//! Managers are ordered componentwise on `(level, operations)`. A recursive
//! manager additionally dominates every non-recursive manager whose level it
//! can reach.

use std::{cmp::Ordering, collections::BTreeSet, fmt, hash::Hash};

use crate::{
    order::{product_order, subset_order},
    permissible::{ManageRequest, ManagementOperation},
};

/// A subject kind that management permissions can range over.
pub trait Level: Clone + Eq + Hash + PartialOrd + fmt::Display {
    /// Combine two subjects into one that covers both.
    fn join(&self, other: &Self) -> Self;

    /// The subject that carries `management` itself.
    fn lift(management: &Management<Self>) -> Self;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Management<L> {
    level: L,
    operations: BTreeSet<ManagementOperation>,
    recursive: bool,
}

impl<L: Level> Management<L> {
    /// A manager of subjects up to `level`.
    pub fn new<I>(level: L, operations: I) -> Self
    where
        I: IntoIterator<Item = ManagementOperation>,
    {
        Self {
            level,
            operations: operations.into_iter().collect(),
            recursive: false,
        }
    }

    /// A manager that also reaches subjects built from itself.
    pub fn recursive<I>(level: L, operations: I) -> Self
    where
        I: IntoIterator<Item = ManagementOperation>,
    {
        Self {
            recursive: true,
            ..Self::new(level, operations)
        }
    }

    /// The largest subject reachable without recursion.
    pub fn level(&self) -> &L {
        &self.level
    }

    /// The management operations this manager may perform.
    pub fn operations(&self) -> &BTreeSet<ManagementOperation> {
        &self.operations
    }

    /// True if this manager reaches subjects built from itself.
    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    /// The largest subject this manager may act on.
    pub fn reach(&self) -> L {
        if self.recursive {
            self.level.join(&L::lift(self))
        } else {
            self.level.clone()
        }
    }

    /// True if the request's operation is allowed and its target sits at or
    /// below [`Management::reach`].
    pub fn permits_request(&self, request: &ManageRequest<L>) -> bool {
        self.operations.contains(&request.operation) && request.target <= self.reach()
    }

    /// Partial comparison: `None` means incomparable.
    pub fn try_compare(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }
        match (self.recursive, other.recursive) {
            (true, false) => other.is_within(self).then_some(Ordering::Greater),
            (false, true) => self.is_within(other).then_some(Ordering::Less),
            _ => product_order(
                self.level.partial_cmp(&other.level),
                subset_order(&self.operations, &other.operations),
            ),
        }
    }

    /// True if the recursive manager `outer` covers `self`.
    fn is_within(&self, outer: &Self) -> bool {
        self.operations.is_subset(&outer.operations) && self.level <= outer.reach()
    }

    pub(crate) fn fmt_subject(&self, noun: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ops: Vec<&str> = self.operations.iter().map(|op| op.as_str()).collect();
        if self.recursive {
            write!(f, "recursively ")?;
        }
        write!(f, "[{}] {noun} up to {}", ops.join(", "), self.level)
    }
}
