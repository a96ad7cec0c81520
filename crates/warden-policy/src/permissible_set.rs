//! Boolean composition of permissibles.
//!
//! `and` / `or` build `PermissibleSet` trees tagged `AllOf` or `AnyOf`.
//! Combining with a same-tagged set flattens its members into the result;
//! a differently-tagged set is nested as a single member. A bare
//! permissible combined with a set defers to the set's combinator, so the
//! result does not depend on operand order.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use crate::{hashing::hash_unordered, permissible::{Operation, Permissible}};

/// How the members of a `PermissibleSet` combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Every member must be permitted.
    AllOf,
    /// At least one member must be permitted.
    AnyOf,
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllOf => f.write_str("all"),
            Self::AnyOf => f.write_str("any"),
        }
    }
}

/// One member of a `PermissibleSet`: a permissible or a nested set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Requirement {
    One(Permissible),
    Nested(PermissibleSet),
}

impl Requirement {
    /// Evaluate this requirement against `permits`.
    pub fn is_permitted_by<F>(&self, permits: &F) -> bool
    where
        F: Fn(&Permissible) -> bool,
    {
        match self {
            Self::One(p) => permits(p),
            Self::Nested(set) => set.is_permitted_by(permits),
        }
    }
}

impl From<Permissible> for Requirement {
    fn from(p: Permissible) -> Self {
        Self::One(p)
    }
}

impl From<Operation> for Requirement {
    fn from(op: Operation) -> Self {
        Self::One(Permissible::Operation(op))
    }
}

impl From<PermissibleSet> for Requirement {
    fn from(set: PermissibleSet) -> Self {
        Self::Nested(set)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One(p) => write!(f, "{p}"),
            Self::Nested(set) => write!(f, "{set}"),
        }
    }
}

/// An AND/OR tree of permissibles.
///
/// Members behave as a set: duplicates are dropped and equality ignores order.
#[derive(Debug, Clone)]
pub struct PermissibleSet {
    combinator: Combinator,
    members: Vec<Requirement>,
}

impl PermissibleSet {
    /// A set that requires every member.
    pub fn all_of<I, R>(members: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Requirement>,
    {
        Self::collect(Combinator::AllOf, members.into_iter().map(Into::into))
    }

    /// A set that requires at least one member.
    pub fn any_of<I, R>(members: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Requirement>,
    {
        Self::collect(Combinator::AnyOf, members.into_iter().map(Into::into))
    }

    /// How the members combine.
    pub fn combinator(&self) -> Combinator {
        self.combinator
    }

    /// Members in insertion order, without duplicates.
    pub fn members(&self) -> &[Requirement] {
        &self.members
    }

    /// `self AND other`.
    #[must_use]
    pub fn and(self, other: impl Into<Requirement>) -> Self {
        Self::collect(
            Combinator::AllOf,
            [Requirement::Nested(self), other.into()].into_iter(),
        )
    }

    /// `self OR other`.
    #[must_use]
    pub fn or(self, other: impl Into<Requirement>) -> Self {
        Self::collect(
            Combinator::AnyOf,
            [Requirement::Nested(self), other.into()].into_iter(),
        )
    }

    /// Evaluate the tree, recursing into nested sets.
    pub fn is_permitted_by<F>(&self, permits: &F) -> bool
    where
        F: Fn(&Permissible) -> bool,
    {
        match self.combinator {
            Combinator::AllOf => self.members.iter().all(|m| m.is_permitted_by(permits)),
            Combinator::AnyOf => self.members.iter().any(|m| m.is_permitted_by(permits)),
        }
    }

    fn collect(combinator: Combinator, members: impl Iterator<Item = Requirement>) -> Self {
        let mut out = Self {
            combinator,
            members: Vec::new(),
        };
        for member in members {
            match member {
                Requirement::Nested(set) if set.combinator == combinator => {
                    for inner in set.members {
                        out.push(inner);
                    }
                }
                other => out.push(other),
            }
        }
        out
    }

    fn push(&mut self, member: Requirement) {
        if !self.members.contains(&member) {
            self.members.push(member);
        }
    }
}

impl Permissible {
    /// `self AND other`. With a set operand this defers to that set's `and`.
    #[must_use]
    pub fn and(self, other: impl Into<Requirement>) -> PermissibleSet {
        match other.into() {
            Requirement::Nested(set) => set.and(self),
            one => PermissibleSet::all_of([Requirement::One(self), one]),
        }
    }

    /// `self OR other`. With a set operand this defers to that set's `or`.
    #[must_use]
    pub fn or(self, other: impl Into<Requirement>) -> PermissibleSet {
        match other.into() {
            Requirement::Nested(set) => set.or(self),
            one => PermissibleSet::any_of([Requirement::One(self), one]),
        }
    }
}

impl PartialEq for PermissibleSet {
    fn eq(&self, other: &Self) -> bool {
        self.combinator == other.combinator
            && self.members.len() == other.members.len()
            && self.members.iter().all(|m| other.members.contains(m))
    }
}

impl Eq for PermissibleSet {}

impl Hash for PermissibleSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.combinator.hash(state);
        hash_unordered(&self.members, state);
    }
}

impl fmt::Display for PermissibleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.combinator)?;
        for (i, member) in self.members.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{member}")?;
        }
        f.write_str(")")
    }
}
