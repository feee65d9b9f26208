//! Matching of ground terms and propositions against patterns.
//!
//! `Add` and `Mul` are matched by peeling off their last operands pairwise,
//! not by trying every pairing of operands. A pattern like `X+Y` therefore
//! binds `Y` to the last operand of the subject and `X` to the rest, and a
//! pattern whose interior operands only match in another order fails. Rule
//! tables are written with that in mind.

use std::fmt::Debug;

use crate::{
    multiset::same_elements,
    proposition::Proposition,
    substitution::Substitution,
    term::{PlaceholderKind, Term},
};

/// What a rewrite rule looks for: a term with placeholders, or the shape of
/// a term described by a predicate.
#[derive(Clone)]
pub enum Pattern {
    Term(Term),
    Shape(fn(&Term) -> bool),
}

impl Pattern {
    pub fn match_against(&self, subject: &Term, seed: Substitution) -> Option<Substitution> {
        match self {
            Pattern::Term(pattern) => match_term(subject, pattern, seed),
            Pattern::Shape(predicate) => predicate(subject).then_some(seed),
        }
    }
}

impl From<Term> for Pattern {
    fn from(term: Term) -> Self {
        Pattern::Term(term)
    }
}

impl Debug for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pattern::Term(term) => write!(f, "Term({term})"),
            Pattern::Shape(_) => write!(f, "Shape(..)"),
        }
    }
}

/// Extends `seed` so that `pattern` instantiated with it equals `subject`.
/// `None` means no match; an empty substitution is a match without bindings.
pub fn match_term(subject: &Term, pattern: &Term, seed: Substitution) -> Option<Substitution> {
    if subject == pattern {
        return Some(seed);
    }

    match (subject, pattern) {
        (_, Term::Placeholder(placeholder)) => {
            if let Some(bound) = seed.get(&placeholder.name) {
                let bound = bound.clone();
                return match_term(subject, &bound, seed);
            }
            match placeholder.kind {
                PlaceholderKind::ConstantOnly if !subject.is_constant() => None,
                _ => Some(seed.with(&placeholder.name, subject.clone())),
            }
        }
        (Term::Add(subject_operands), Term::Add(pattern_operands)) => {
            match_operands(subject_operands, pattern_operands, Term::Add, seed)
        }
        (Term::Mul(subject_operands), Term::Mul(pattern_operands)) => {
            match_operands(subject_operands, pattern_operands, Term::Mul, seed)
        }
        (Term::Sub(s_1, s_2), Term::Sub(p_1, p_2))
        | (Term::Div(s_1, s_2), Term::Div(p_1, p_2))
        | (Term::Pow(s_1, s_2), Term::Pow(p_1, p_2))
        | (Term::Root(s_1, s_2), Term::Root(p_1, p_2)) => {
            let substitution = match_term(s_1, p_1, seed)?;
            match_term(s_2, p_2, substitution)
        }
        _ => None,
    }
}

/// Matches the operand lists of two variadic operations of the same kind,
/// last operand against last operand, then the remaining prefixes.
fn match_operands(
    subject: &[Term],
    pattern: &[Term],
    wrap: fn(Vec<Term>) -> Term,
    seed: Substitution,
) -> Option<Substitution> {
    match (subject, pattern) {
        ([], []) => Some(seed),
        ([], _) | (_, []) => None,
        ([subject], [pattern]) => match_term(subject, pattern, seed),
        ([_], _) | (_, [_]) => None,
        ([subject_rest @ .., subject_last], [pattern_rest @ .., pattern_last]) => {
            let substitution = match_term(subject_last, pattern_last, seed)?;
            match (subject_rest, pattern_rest) {
                ([subject], [pattern]) => match_term(subject, pattern, substitution),
                ([subject], pattern_rest) => {
                    match_term(subject, &wrap(pattern_rest.to_vec()), substitution)
                }
                (subject_rest, [pattern]) => {
                    match_term(&wrap(subject_rest.to_vec()), pattern, substitution)
                }
                (subject_rest, pattern_rest) => {
                    if same_elements(subject_rest, pattern_rest) {
                        return Some(substitution);
                    }
                    match_operands(subject_rest, pattern_rest, wrap, substitution)
                }
            }
        }
    }
}

/// Matches both sides of a proposition of the same relation, threading one
/// substitution through them so that shared placeholders agree.
pub fn match_proposition(
    subject: &Proposition,
    pattern: &Proposition,
    seed: Substitution,
) -> Option<Substitution> {
    if subject.relation() != pattern.relation() {
        return None;
    }
    let substitution = match_term(subject.lhs(), pattern.lhs(), seed)?;
    match_term(subject.rhs(), pattern.rhs(), substitution)
}
