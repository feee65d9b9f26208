use std::{collections::BTreeSet, fmt::Display};

use serde::{Deserialize, Serialize};

use crate::{substitution::Substitution, term::Term};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    Equals,
    AtMost,
}

impl Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Relation::Equals => write!(f, "="),
            Relation::AtMost => write!(f, "<="),
        }
    }
}

/// A relation between two terms. `Equals` is symmetric, `AtMost` is not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Proposition {
    Equals(Term, Term),
    AtMost(Term, Term),
}

impl Proposition {
    pub fn equals<L: Into<Term>, R: Into<Term>>(left: L, right: R) -> Self {
        Proposition::Equals(left.into(), right.into())
    }

    pub fn at_most<L: Into<Term>, R: Into<Term>>(left: L, right: R) -> Self {
        Proposition::AtMost(left.into(), right.into())
    }

    /// `left >= right`, stored as `right <= left`.
    pub fn at_least<L: Into<Term>, R: Into<Term>>(left: L, right: R) -> Self {
        Proposition::AtMost(right.into(), left.into())
    }

    pub fn from_relation(relation: Relation, left: Term, right: Term) -> Self {
        match relation {
            Relation::Equals => Proposition::Equals(left, right),
            Relation::AtMost => Proposition::AtMost(left, right),
        }
    }

    pub fn relation(&self) -> Relation {
        match self {
            Proposition::Equals(..) => Relation::Equals,
            Proposition::AtMost(..) => Relation::AtMost,
        }
    }

    pub fn lhs(&self) -> &Term {
        match self {
            Proposition::Equals(lhs, _) | Proposition::AtMost(lhs, _) => lhs,
        }
    }

    pub fn rhs(&self) -> &Term {
        match self {
            Proposition::Equals(_, rhs) | Proposition::AtMost(_, rhs) => rhs,
        }
    }

    /// The same relation with its sides swapped, for order-symmetric
    /// relations only.
    pub fn reversed(&self) -> Option<Self> {
        match self {
            Proposition::Equals(lhs, rhs) => Some(Proposition::Equals(rhs.clone(), lhs.clone())),
            Proposition::AtMost(..) => None,
        }
    }

    pub fn has_variable(&self) -> bool {
        self.lhs().has_variable() || self.rhs().has_variable()
    }

    pub fn has_placeholder(&self) -> bool {
        self.lhs().has_placeholder() || self.rhs().has_placeholder()
    }

    pub fn variables(&self) -> BTreeSet<String> {
        let mut variables = self.lhs().variables();
        variables.extend(self.rhs().variables());
        variables
    }

    pub fn substitute(&self, substitution: &Substitution) -> Self {
        Self::from_relation(
            self.relation(),
            self.lhs().substitute(substitution),
            self.rhs().substitute(substitution),
        )
    }

    /// Applies a fallible transformation to both sides.
    pub fn try_map_sides<E>(&self, mut f: impl FnMut(&Term) -> Result<Term, E>) -> Result<Self, E> {
        Ok(Self::from_relation(
            self.relation(),
            f(self.lhs())?,
            f(self.rhs())?,
        ))
    }
}

impl PartialEq for Proposition {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Proposition::Equals(a_1, a_2), Proposition::Equals(b_1, b_2)) => {
                (a_1 == b_1 && a_2 == b_2) || (a_1 == b_2 && a_2 == b_1)
            }
            (Proposition::AtMost(a_1, a_2), Proposition::AtMost(b_1, b_2)) => {
                a_1 == b_1 && a_2 == b_2
            }
            _ => false,
        }
    }
}

impl Eq for Proposition {}

impl Display for Proposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.lhs(), self.relation(), self.rhs())
    }
}
