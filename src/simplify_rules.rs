//! The built-in rewrite rules, in three tiers that are applied together as
//! one table: syntax normalization, evaluation, and re-nesting.

use crate::{
    error::DomainError,
    number::Number,
    simplify::{evaluate, RewriteRule},
    term::Term,
};

fn term(notation: &str) -> Term {
    notation
        .parse()
        .expect("built-in rewrite rules are well-formed")
}

fn root(radicand: &str, index: &str) -> Term {
    term(radicand).root(term(index))
}

fn is_constant_node(term: &Term) -> bool {
    matches!(term, Term::Constant(_))
}

fn sum_operands(term: &Term) -> &[Term] {
    match term {
        Term::Add(operands) => operands,
        _ => &[],
    }
}

fn product_operands(term: &Term) -> &[Term] {
    match term {
        Term::Mul(operands) => operands,
        _ => &[],
    }
}

fn without_number(operands: &[Term], number: i64) -> Vec<Term> {
    operands
        .iter()
        .filter(|operand| !operand.is_number(number))
        .cloned()
        .collect()
}

fn to_integer(term: &Term) -> Result<Term, DomainError> {
    Ok(match term.constant_value().and_then(|value| value.integral_value()) {
        Some(value) => Term::integer(value),
        None => term.clone(),
    })
}

/// Constant operands of a sum are replaced by their sum, placed last.
fn fold_sum(term: &Term) -> Result<Term, DomainError> {
    let (constants, mut operands): (Vec<Term>, Vec<Term>) =
        sum_operands(term).iter().cloned().partition(is_constant_node);
    operands.push(Term::Constant(evaluate(&Term::Add(constants))?));
    Ok(Term::Add(operands))
}

/// Constant operands of a product are replaced by their product, placed first.
fn fold_product(term: &Term) -> Result<Term, DomainError> {
    let (constants, others): (Vec<Term>, Vec<Term>) =
        product_operands(term).iter().cloned().partition(is_constant_node);
    let mut operands = vec![Term::Constant(evaluate(&Term::Mul(constants))?)];
    operands.extend(others);
    Ok(Term::Mul(operands))
}

fn evaluated(term: &Term) -> Result<Term, DomainError> {
    evaluate(term).map(Term::Constant)
}

fn flatten(term: &Term) -> Result<Term, DomainError> {
    Ok(match term {
        Term::Add(operands) => Term::Add(
            operands
                .iter()
                .flat_map(|operand| match operand {
                    Term::Add(inner) => inner.clone(),
                    operand => vec![operand.clone()],
                })
                .collect(),
        ),
        Term::Mul(operands) => Term::Mul(
            operands
                .iter()
                .flat_map(|operand| match operand {
                    Term::Mul(inner) => inner.clone(),
                    operand => vec![operand.clone()],
                })
                .collect(),
        ),
        term => term.clone(),
    })
}

/// Splits operands into the left sides of the binary operands selected by
/// `split` (other operands count as left sides too) and their right sides.
fn split_operands(
    operands: &[Term],
    split: fn(&Term) -> Option<(&Term, &Term)>,
) -> (Vec<Term>, Vec<Term>) {
    let mut lefts = Vec::with_capacity(operands.len());
    let mut rights = vec![];
    for operand in operands {
        match split(operand) {
            Some((left, right)) => {
                lefts.push(left.clone());
                rights.push(right.clone());
            }
            None => lefts.push(operand.clone()),
        }
    }
    (lefts, rights)
}

/// `a+(b-c)+(d-e)` becomes `(a+b+d)-(c+e)`.
fn pull_out_subtraction(term: &Term) -> Result<Term, DomainError> {
    let (minuends, subtrahends) = split_operands(sum_operands(term), |operand| match operand {
        Term::Sub(left, right) => Some((&**left, &**right)),
        _ => None,
    });
    Ok(Term::Add(minuends) - Term::Add(subtrahends))
}

/// `a*(b/c)*(d/e)` becomes `(a*b*d)/(c*e)`.
fn pull_out_division(term: &Term) -> Result<Term, DomainError> {
    let (numerators, denominators) =
        split_operands(product_operands(term), |operand| match operand {
            Term::Div(left, right) => Some((&**left, &**right)),
            _ => None,
        });
    Ok(Term::Mul(numerators) / Term::Mul(denominators))
}

/// Collapses empty and singleton sums and products and turns integral
/// reals into integers.
pub fn syntax_rules() -> Vec<RewriteRule> {
    vec![
        RewriteRule::shape(
            "integral_real",
            |t| matches!(t, Term::Constant(value @ Number::Real(_)) if value.integral_value().is_some()),
            to_integer,
        ),
        RewriteRule::replace("empty_sum", Term::Add(vec![]), term("0")),
        RewriteRule::replace("empty_product", Term::Mul(vec![]), term("1")),
        RewriteRule::replace("singleton_sum", Term::Add(vec![term("X")]), term("X")),
        RewriteRule::replace("singleton_product", Term::Mul(vec![term("X")]), term("X")),
    ]
}

/// Domain errors, identities with zero and one, trivial powers and roots,
/// and folding of constant operations.
pub fn evaluation_rules() -> Vec<RewriteRule> {
    vec![
        RewriteRule::fail("division_by_zero", term("X/0"), DomainError::DivisionByZero),
        RewriteRule::fail("zero_to_the_zero", term("0^0"), DomainError::ZeroToTheZero),
        RewriteRule::fail("zeroth_root", root("X", "0"), DomainError::ZeroethRoot),
        RewriteRule::shape(
            "add_zero",
            |t| sum_operands(t).iter().any(|o| o.is_number(0)),
            |t| Ok(Term::Add(without_number(sum_operands(t), 0))),
        ),
        RewriteRule::replace("subtract_zero", term("X-0"), term("X")),
        RewriteRule::shape(
            "multiply_zero",
            |t| product_operands(t).iter().any(|o| o.is_number(0)),
            |_| Ok(Term::integer(0)),
        ),
        RewriteRule::replace("divide_zero", term("0/X"), term("0")),
        RewriteRule::shape(
            "multiply_one",
            |t| product_operands(t).iter().any(|o| o.is_number(1)),
            |t| Ok(Term::Mul(without_number(product_operands(t), 1))),
        ),
        RewriteRule::replace("divide_by_one", term("X/1"), term("X")),
        // wrong for negative exponents: 0^(-1) has no value
        RewriteRule::replace("zero_base", term("0^X"), term("0")),
        RewriteRule::replace("one_base", term("1^X"), term("1")),
        RewriteRule::replace("zero_exponent", term("X^0"), term("1")),
        RewriteRule::replace("one_exponent", term("X^1"), term("X")),
        // wrong for negative indices
        RewriteRule::replace("root_of_zero", root("0", "X"), term("0")),
        // 1^(1/0) has no value, zeroth_root must stay above this rule
        RewriteRule::replace("root_of_one", root("1", "X"), term("1")),
        RewriteRule::replace("first_root", root("X", "1"), term("X")),
        RewriteRule::shape(
            "fold_sum",
            |t| sum_operands(t).iter().filter(|o| is_constant_node(o)).count() >= 2,
            fold_sum,
        ),
        RewriteRule::compute("fold_difference", term("#X-#Y"), evaluated),
        RewriteRule::shape(
            "fold_product",
            |t| product_operands(t).iter().filter(|o| is_constant_node(o)).count() >= 2,
            fold_product,
        ),
        RewriteRule::compute("fold_quotient", term("#X/#Y"), evaluated),
        RewriteRule::compute("fold_power", term("#X^#Y"), evaluated),
        RewriteRule::compute("fold_root", root("#X", "#Y"), evaluated),
    ]
}

/// Flattens nested sums and products, pulls subtractions and divisions out
/// of them, and collapses chains of the binary operators.
pub fn nesting_rules() -> Vec<RewriteRule> {
    vec![
        RewriteRule::shape(
            "flatten_sum",
            |t| sum_operands(t).iter().any(|o| matches!(o, Term::Add(_))),
            flatten,
        ),
        RewriteRule::shape(
            "subtraction_in_sum",
            |t| sum_operands(t).iter().any(|o| matches!(o, Term::Sub(..))),
            pull_out_subtraction,
        ),
        RewriteRule::replace("nested_subtraction_left", term("(X-Y)-Z"), term("X-(Y+Z)")),
        RewriteRule::replace("nested_subtraction_right", term("X-(Y-Z)"), term("(X+Z)-Y")),
        RewriteRule::shape(
            "flatten_product",
            |t| product_operands(t).iter().any(|o| matches!(o, Term::Mul(_))),
            flatten,
        ),
        RewriteRule::shape(
            "division_in_product",
            |t| product_operands(t).iter().any(|o| matches!(o, Term::Div(..))),
            pull_out_division,
        ),
        RewriteRule::replace("nested_division_left", term("(X/Y)/Z"), term("X/(Y*Z)")),
        RewriteRule::replace("nested_division_right", term("X/(Y/Z)"), term("(X*Z)/Y")),
        RewriteRule::replace("power_of_power", term("(X^Y)^Z"), term("X^(Y*Z)")),
        RewriteRule::replace(
            "power_of_root",
            root("X", "Y").pow(term("Z")),
            term("X^(Z/Y)"),
        ),
        RewriteRule::replace("root_of_power", root("X^Y", "Z"), term("X^(Y/Z)")),
        RewriteRule::replace(
            "root_of_root",
            root("X", "Y").root(term("Z")),
            root("X", "Y*Z"),
        ),
    ]
}

/// All built-in rewrite rules in the order they are tried.
pub fn rewrite_rules() -> Vec<RewriteRule> {
    let mut rules = syntax_rules();
    rules.extend(evaluation_rules());
    rules.extend(nesting_rules());
    rules
}
