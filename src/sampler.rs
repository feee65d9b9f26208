//! Random ground terms for property tests.

use proptest::prelude::*;

use crate::term::Term;

fn leaf() -> impl Strategy<Value = Term> {
    prop_oneof![
        (1..=3i64).prop_map(Term::integer),
        Just(Term::Constant(crate::number::Number::Real(0.5))),
        prop::sample::select(vec!["a", "b", "c"]).prop_map(|name| Term::Variable(name.to_string())),
    ]
}

fn small_index() -> impl Strategy<Value = Term> {
    (2..=3i64).prop_map(Term::integer)
}

/// Terms without placeholders, of at most `depth` nested operations. Sums and
/// products have two or three operands.
pub(crate) fn ground_term(depth: u32) -> impl Strategy<Value = Term> {
    leaf().prop_recursive(depth, 64, 3, |inner| {
        prop_oneof![
            4 => prop::collection::vec(inner.clone(), 2..=3).prop_map(Term::Add),
            1 => (inner.clone(), inner.clone()).prop_map(|(left, right)| left - right),
            4 => prop::collection::vec(inner.clone(), 2..=3).prop_map(Term::Mul),
            2 => (inner.clone(), inner.clone()).prop_map(|(left, right)| left / right),
            1 => (inner.clone(), small_index()).prop_map(|(base, exponent)| base.pow(exponent)),
            1 => (inner, small_index()).prop_map(|(radicand, index)| radicand.root(index)),
        ]
    })
}
