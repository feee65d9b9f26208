use std::{
    cmp::Ordering,
    collections::BTreeSet,
    fmt::{Display, Write},
    ops,
};

use serde::{Deserialize, Serialize};

use crate::{error::TermError, multiset::same_elements, number::Number, substitution::Substitution};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlaceholderKind {
    Any,
    /// Binds only to terms without variables.
    ConstantOnly,
}

/// A pattern variable. Never part of a term that is matched against.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Placeholder {
    pub name: String,
    pub kind: PlaceholderKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OperatorKind {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Root,
}

impl OperatorKind {
    /// `Add` and `Mul` take any number of operands, in any order.
    pub fn is_variadic(&self) -> bool {
        matches!(self, OperatorKind::Add | OperatorKind::Mul)
    }

    pub fn precedence(&self) -> u8 {
        match self {
            OperatorKind::Add | OperatorKind::Sub => 1,
            OperatorKind::Mul | OperatorKind::Div => 2,
            OperatorKind::Pow | OperatorKind::Root => 3,
        }
    }
}

impl Display for OperatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OperatorKind::Add => "Add",
            OperatorKind::Sub => "Sub",
            OperatorKind::Mul => "Mul",
            OperatorKind::Div => "Div",
            OperatorKind::Pow => "Pow",
            OperatorKind::Root => "Root",
        };
        write!(f, "{name}")
    }
}

/// Expression tree over the reals. `Add` and `Mul` compare as multisets of
/// their operands; everything else compares positionally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Term {
    Constant(Number),
    Variable(String),
    Placeholder(Placeholder),
    Add(Vec<Term>),
    Mul(Vec<Term>),
    Sub(Box<Term>, Box<Term>),
    Div(Box<Term>, Box<Term>),
    Pow(Box<Term>, Box<Term>),
    /// `Root(x, n)` is the `n`-th root of `x`.
    Root(Box<Term>, Box<Term>),
}

fn is_valid_name(name: &str) -> bool {
    matches!(name.chars().next(), Some(c) if c.is_alphabetic())
        && name.chars().all(char::is_alphanumeric)
}

impl Term {
    pub fn integer(value: i64) -> Self {
        Term::Constant(Number::Integer(value))
    }

    pub fn real(value: f64) -> Result<Self, TermError> {
        Number::real(value)
            .map(Term::Constant)
            .map_err(|_| TermError::NonReal(value))
    }

    pub fn variable(name: &str) -> Result<Self, TermError> {
        if is_valid_name(name) {
            Ok(Term::Variable(name.to_string()))
        } else {
            Err(TermError::InvalidName(name.to_string()))
        }
    }

    pub fn placeholder(name: &str) -> Result<Self, TermError> {
        Self::placeholder_of_kind(name, PlaceholderKind::Any)
    }

    pub fn constant_placeholder(name: &str) -> Result<Self, TermError> {
        Self::placeholder_of_kind(name, PlaceholderKind::ConstantOnly)
    }

    fn placeholder_of_kind(name: &str, kind: PlaceholderKind) -> Result<Self, TermError> {
        if is_valid_name(name) {
            Ok(Term::Placeholder(Placeholder {
                name: name.to_string(),
                kind,
            }))
        } else {
            Err(TermError::InvalidName(name.to_string()))
        }
    }

    /// Builds an operation, checking the arity of the binary operators.
    pub fn from_operator(operator: OperatorKind, operands: Vec<Term>) -> Result<Self, TermError> {
        let binary = |build: fn(Box<Term>, Box<Term>) -> Term,
                      operands: Vec<Term>|
         -> Result<Term, TermError> {
            let [left, right]: [Term; 2] =
                operands
                    .try_into()
                    .map_err(|operands: Vec<Term>| TermError::Arity {
                        operator,
                        given: operands.len(),
                    })?;
            Ok(build(left.into(), right.into()))
        };

        match operator {
            OperatorKind::Add => Ok(Term::Add(operands)),
            OperatorKind::Mul => Ok(Term::Mul(operands)),
            OperatorKind::Sub => binary(Term::Sub, operands),
            OperatorKind::Div => binary(Term::Div, operands),
            OperatorKind::Pow => binary(Term::Pow, operands),
            OperatorKind::Root => binary(Term::Root, operands),
        }
    }

    pub fn pow(self, exponent: impl Into<Term>) -> Self {
        Term::Pow(self.into(), Box::new(exponent.into()))
    }

    pub fn root(self, index: impl Into<Term>) -> Self {
        Term::Root(self.into(), Box::new(index.into()))
    }

    pub fn operator(&self) -> Option<OperatorKind> {
        match self {
            Term::Constant(_) | Term::Variable(_) | Term::Placeholder(_) => None,
            Term::Add(_) => Some(OperatorKind::Add),
            Term::Mul(_) => Some(OperatorKind::Mul),
            Term::Sub(..) => Some(OperatorKind::Sub),
            Term::Div(..) => Some(OperatorKind::Div),
            Term::Pow(..) => Some(OperatorKind::Pow),
            Term::Root(..) => Some(OperatorKind::Root),
        }
    }

    pub fn operands(&self) -> Vec<&Term> {
        match self {
            Term::Constant(_) | Term::Variable(_) | Term::Placeholder(_) => vec![],
            Term::Add(operands) | Term::Mul(operands) => operands.iter().collect(),
            Term::Sub(left, right)
            | Term::Div(left, right)
            | Term::Pow(left, right)
            | Term::Root(left, right) => vec![left, right],
        }
    }

    /// Rebuilds the operation with every operand transformed; atoms are
    /// returned as they are.
    pub fn try_map_operands<E>(
        &self,
        mut f: impl FnMut(&Term) -> Result<Term, E>,
    ) -> Result<Term, E> {
        Ok(match self {
            Term::Constant(_) | Term::Variable(_) | Term::Placeholder(_) => self.clone(),
            Term::Add(operands) => Term::Add(operands.iter().map(&mut f).collect::<Result<_, _>>()?),
            Term::Mul(operands) => Term::Mul(operands.iter().map(&mut f).collect::<Result<_, _>>()?),
            Term::Sub(left, right) => Term::Sub(f(left)?.into(), f(right)?.into()),
            Term::Div(left, right) => Term::Div(f(left)?.into(), f(right)?.into()),
            Term::Pow(left, right) => Term::Pow(f(left)?.into(), f(right)?.into()),
            Term::Root(left, right) => Term::Root(f(left)?.into(), f(right)?.into()),
        })
    }

    pub fn constant_value(&self) -> Option<Number> {
        match self {
            Term::Constant(value) => Some(*value),
            _ => None,
        }
    }

    pub(crate) fn is_number(&self, number: i64) -> bool {
        matches!(self, Term::Constant(value) if *value == Number::Integer(number))
    }

    /// The term and all of its sub-terms, parents before children.
    pub fn subterms(&self) -> Vec<&Term> {
        let mut subterms = vec![];
        let mut stack = vec![self];
        while let Some(term) = stack.pop() {
            subterms.push(term);
            stack.extend(term.operands().into_iter().rev());
        }
        subterms
    }

    pub fn any(&self, predicate: impl Fn(&Term) -> bool) -> bool {
        self.subterms().into_iter().any(predicate)
    }

    pub fn has_variable(&self) -> bool {
        self.any(|t| matches!(t, Term::Variable(_)))
    }

    pub fn has_placeholder(&self) -> bool {
        self.any(|t| matches!(t, Term::Placeholder(_)))
    }

    pub fn is_ground(&self) -> bool {
        !self.has_placeholder()
    }

    /// Neither variables nor placeholders anywhere in the tree.
    pub fn is_constant(&self) -> bool {
        !self.any(|t| matches!(t, Term::Variable(_) | Term::Placeholder(_)))
    }

    pub fn variables(&self) -> BTreeSet<String> {
        self.subterms()
            .into_iter()
            .filter_map(|t| match t {
                Term::Variable(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// A copy with the operands of every `Add` and `Mul` sorted by the
    /// canonical order. Equal terms have identical canonical forms.
    pub fn canonical(&self) -> Term {
        match self {
            Term::Constant(_) | Term::Variable(_) | Term::Placeholder(_) => self.clone(),
            Term::Add(operands) | Term::Mul(operands) => {
                let mut operands: Vec<Term> = operands.iter().map(Term::canonical).collect();
                operands.sort();
                match self {
                    Term::Add(_) => Term::Add(operands),
                    _ => Term::Mul(operands),
                }
            }
            Term::Sub(left, right) => Term::Sub(left.canonical().into(), right.canonical().into()),
            Term::Div(left, right) => Term::Div(left.canonical().into(), right.canonical().into()),
            Term::Pow(left, right) => Term::Pow(left.canonical().into(), right.canonical().into()),
            Term::Root(left, right) => {
                Term::Root(left.canonical().into(), right.canonical().into())
            }
        }
    }

    /// Replaces every placeholder bound by `substitution` with its value.
    pub fn substitute(&self, substitution: &Substitution) -> Self {
        enum TermType<'a> {
            Leaf(&'a Term),
            Add(usize),
            Mul(usize),
            Binary(fn(Box<Term>, Box<Term>) -> Term),
        }

        if substitution.is_empty() {
            return self.clone();
        }

        let mut parameter_stack = vec![self];
        let mut operation_stack = vec![];

        while let Some(term) = parameter_stack.pop() {
            match term {
                Term::Constant(_) | Term::Variable(_) | Term::Placeholder(_) => {
                    operation_stack.push(TermType::Leaf(term))
                }
                Term::Add(operands) => {
                    operation_stack.push(TermType::Add(operands.len()));
                    parameter_stack.extend(operands.iter());
                }
                Term::Mul(operands) => {
                    operation_stack.push(TermType::Mul(operands.len()));
                    parameter_stack.extend(operands.iter());
                }
                Term::Sub(left, right)
                | Term::Div(left, right)
                | Term::Pow(left, right)
                | Term::Root(left, right) => {
                    let build: fn(Box<Term>, Box<Term>) -> Term = match term {
                        Term::Sub(..) => Term::Sub,
                        Term::Div(..) => Term::Div,
                        Term::Pow(..) => Term::Pow,
                        _ => Term::Root,
                    };
                    operation_stack.push(TermType::Binary(build));
                    parameter_stack.push(left);
                    parameter_stack.push(right);
                }
            }
        }

        let mut return_stack: Vec<Term> = vec![];
        while let Some(operation) = operation_stack.pop() {
            let result = match operation {
                TermType::Leaf(Term::Placeholder(placeholder)) => substitution
                    .get(&placeholder.name)
                    .cloned()
                    .unwrap_or_else(|| Term::Placeholder(placeholder.clone())),
                TermType::Leaf(leaf) => leaf.clone(),
                TermType::Add(count) => {
                    let operands = return_stack.split_off(return_stack.len() - count);
                    Term::Add(operands)
                }
                TermType::Mul(count) => {
                    let operands = return_stack.split_off(return_stack.len() - count);
                    Term::Mul(operands)
                }
                TermType::Binary(build) => {
                    let right = return_stack
                        .pop()
                        .expect("argument was put on stack in previous iteration");
                    let left = return_stack
                        .pop()
                        .expect("argument was put on stack in previous iteration");
                    build(Box::new(left), Box::new(right))
                }
            };
            return_stack.push(result);
        }

        return_stack.pop().expect("result was put on stack")
    }

    fn rank(&self) -> u8 {
        match self {
            Term::Constant(_) => 0,
            Term::Variable(_) => 1,
            Term::Placeholder(_) => 2,
            Term::Add(_) => 3,
            Term::Sub(..) => 4,
            Term::Mul(_) => 5,
            Term::Div(..) => 6,
            Term::Pow(..) => 7,
            Term::Root(..) => 8,
        }
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Term::Constant(a), Term::Constant(b)) => a == b,
            (Term::Variable(a), Term::Variable(b)) => a == b,
            (Term::Placeholder(a), Term::Placeholder(b)) => a == b,
            (Term::Add(a), Term::Add(b)) | (Term::Mul(a), Term::Mul(b)) => same_elements(a, b),
            (Term::Sub(a_1, a_2), Term::Sub(b_1, b_2))
            | (Term::Div(a_1, a_2), Term::Div(b_1, b_2))
            | (Term::Pow(a_1, a_2), Term::Pow(b_1, b_2))
            | (Term::Root(a_1, a_2), Term::Root(b_1, b_2)) => a_1 == b_1 && a_2 == b_2,
            _ => false,
        }
    }
}

impl Eq for Term {}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Total order consistent with equality: commutative operands are compared
/// as sorted lists.
impl Ord for Term {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Term::Constant(a), Term::Constant(b)) => a.total_cmp(b),
            (Term::Variable(a), Term::Variable(b)) => a.cmp(b),
            (Term::Placeholder(a), Term::Placeholder(b)) => a.cmp(b),
            (Term::Add(a), Term::Add(b)) | (Term::Mul(a), Term::Mul(b)) => {
                let mut a: Vec<&Term> = a.iter().collect();
                let mut b: Vec<&Term> = b.iter().collect();
                a.sort();
                b.sort();
                a.cmp(&b)
            }
            (Term::Sub(a_1, a_2), Term::Sub(b_1, b_2))
            | (Term::Div(a_1, a_2), Term::Div(b_1, b_2))
            | (Term::Pow(a_1, a_2), Term::Pow(b_1, b_2))
            | (Term::Root(a_1, a_2), Term::Root(b_1, b_2)) => {
                a_1.cmp(b_1).then_with(|| a_2.cmp(b_2))
            }
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

impl From<i64> for Term {
    fn from(value: i64) -> Self {
        Term::integer(value)
    }
}

impl From<Number> for Term {
    fn from(value: Number) -> Self {
        Term::Constant(value)
    }
}

impl From<Placeholder> for Term {
    fn from(placeholder: Placeholder) -> Self {
        Term::Placeholder(placeholder)
    }
}

impl ops::Add for Term {
    type Output = Term;

    fn add(self, rhs: Self) -> Self::Output {
        Term::Add(vec![self, rhs])
    }
}

impl ops::Sub for Term {
    type Output = Term;

    fn sub(self, rhs: Self) -> Self::Output {
        Term::Sub(self.into(), rhs.into())
    }
}

impl ops::Mul for Term {
    type Output = Term;

    fn mul(self, rhs: Self) -> Self::Output {
        Term::Mul(vec![self, rhs])
    }
}

impl ops::Div for Term {
    type Output = Term;

    fn div(self, rhs: Self) -> Self::Output {
        Term::Div(self.into(), rhs.into())
    }
}

impl ops::Neg for Term {
    type Output = Term;

    fn neg(self) -> Self::Output {
        Term::integer(0) - self
    }
}

const ATOMIC: u8 = u8::MAX;

fn root_glyph(index: &Term) -> Option<char> {
    match index {
        t if t.is_number(2) => Some('√'),
        t if t.is_number(3) => Some('∛'),
        t if t.is_number(4) => Some('∜'),
        _ => None,
    }
}

struct TermDisplay<'a>(&'a Term);

impl TermDisplay<'_> {
    fn precedence(&self) -> u8 {
        match self.0 {
            Term::Constant(value) if value.is_negative() => 1,
            Term::Root(_, index) if root_glyph(index).is_some() => ATOMIC,
            Term::Add(operands) | Term::Mul(operands) if operands.is_empty() => ATOMIC,
            term => term
                .operator()
                .map(|operator| operator.precedence())
                .unwrap_or(ATOMIC),
        }
    }

    /// Writes an operand, parenthesized when it binds no tighter than its parent.
    fn operand(f: &mut std::fmt::Formatter<'_>, operand: &Term, parent: u8) -> std::fmt::Result {
        if TermDisplay(operand).precedence() <= parent {
            write!(f, "({operand})")
        } else {
            write!(f, "{operand}")
        }
    }

    fn joined(
        f: &mut std::fmt::Formatter<'_>,
        operands: &[Term],
        separator: char,
        parent: u8,
    ) -> std::fmt::Result {
        for (i, operand) in operands.iter().enumerate() {
            if i > 0 {
                f.write_char(separator)?;
            }
            Self::operand(f, operand, parent)?;
        }
        Ok(())
    }
}

impl Display for TermDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Term::Constant(value) => write!(f, "{value}"),
            Term::Variable(name) => write!(f, "{name}"),
            Term::Placeholder(Placeholder {
                name,
                kind: PlaceholderKind::Any,
            }) => write!(f, "{name}"),
            Term::Placeholder(Placeholder {
                name,
                kind: PlaceholderKind::ConstantOnly,
            }) => write!(f, "#{name}"),
            Term::Add(operands) if operands.is_empty() => write!(f, "sum()"),
            Term::Mul(operands) if operands.is_empty() => write!(f, "product()"),
            Term::Add(operands) => Self::joined(f, operands, '+', 1),
            Term::Mul(operands) => Self::joined(f, operands, '*', 2),
            Term::Sub(left, right) if left.is_number(0) => {
                f.write_char('-')?;
                Self::operand(f, right, 1)
            }
            Term::Sub(left, right) => {
                Self::operand(f, left, 1)?;
                f.write_char('-')?;
                Self::operand(f, right, 1)
            }
            Term::Div(left, right) => {
                Self::operand(f, left, 2)?;
                f.write_char('/')?;
                Self::operand(f, right, 2)
            }
            Term::Pow(left, right) => {
                Self::operand(f, left, 3)?;
                f.write_char('^')?;
                Self::operand(f, right, 3)
            }
            Term::Root(radicand, index) => match root_glyph(index) {
                Some(glyph) => {
                    f.write_char(glyph)?;
                    Self::operand(f, radicand, 3)
                }
                None => {
                    Self::operand(f, radicand, 3)?;
                    write!(f, "^(1/")?;
                    Self::operand(f, index, 2)?;
                    f.write_char(')')
                }
            },
        }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        TermDisplay(self).fmt(f)
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;
    use crate::sampler::ground_term;

    fn x() -> Term {
        Term::variable("x").unwrap()
    }

    fn y() -> Term {
        Term::variable("y").unwrap()
    }

    #[test]
    fn add_and_mul_are_compared_as_multisets() {
        assert_eq!(x() + y(), y() + x());
        assert_eq!(
            Term::Mul(vec![x(), y(), x()]),
            Term::Mul(vec![x(), x(), y()])
        );
        assert_ne!(
            Term::Mul(vec![x(), y(), y()]),
            Term::Mul(vec![x(), x(), y()])
        );
        assert_ne!(x() + y(), x() * y());
    }

    #[test]
    fn binary_operators_are_positional() {
        assert_ne!(x() - y(), y() - x());
        assert_ne!(x() / y(), y() / x());
        assert_ne!(x().pow(y()), y().pow(x()));
        assert_eq!(x() - x(), x() - x());
    }

    #[test]
    fn structural_equality_is_not_semantic() {
        let a = Term::variable("a").unwrap();
        let b = Term::variable("b").unwrap();
        let c = Term::variable("c").unwrap();
        assert_ne!(
            a.clone() * (b.clone() + c.clone()),
            a.clone() * b + a * c
        );
    }

    #[test]
    fn from_operator_checks_arity() {
        assert_eq!(
            Term::from_operator(OperatorKind::Sub, vec![x()]),
            Err(TermError::Arity {
                operator: OperatorKind::Sub,
                given: 1
            })
        );
        assert_eq!(
            Term::from_operator(OperatorKind::Pow, vec![x(), y()]),
            Ok(x().pow(y()))
        );
        assert_eq!(
            Term::from_operator(OperatorKind::Add, vec![]),
            Ok(Term::Add(vec![]))
        );
        assert_eq!(
            Term::from_operator(OperatorKind::Mul, vec![x()]),
            Ok(Term::Mul(vec![x()]))
        );
    }

    #[test]
    fn names_are_validated() {
        assert!(Term::variable("x1").is_ok());
        assert_eq!(
            Term::variable(""),
            Err(TermError::InvalidName(String::new()))
        );
        assert!(Term::variable("1x").is_err());
        assert!(Term::variable("x_1").is_err());
        assert!(Term::placeholder("X").is_ok());
        assert!(Term::constant_placeholder("a b").is_err());
    }

    #[test]
    fn non_real_constants_are_rejected() {
        assert!(matches!(Term::real(f64::INFINITY), Err(TermError::NonReal(_))));
        assert!(matches!(Term::real(f64::NAN), Err(TermError::NonReal(_))));
        assert!(Term::real(0.5).is_ok());
    }

    #[test]
    fn variable_and_placeholder_predicates() {
        let pattern = x() + Term::placeholder("X").unwrap();
        assert!(pattern.has_variable());
        assert!(pattern.has_placeholder());
        assert!(!pattern.is_ground());
        assert!(!pattern.is_constant());

        let constant = Term::integer(1) + Term::integer(2);
        assert!(constant.is_ground());
        assert!(constant.is_constant());
        assert!(!constant.has_variable());
    }

    #[test]
    fn subterms_are_listed_parents_first() {
        let term = x() + y().pow(Term::integer(2));
        let subterms: Vec<String> = term.subterms().iter().map(|t| t.to_string()).collect();
        assert_eq!(subterms, vec!["x+y^2", "x", "y^2", "y", "2"]);
        assert_eq!(
            term.variables().into_iter().collect::<Vec<_>>(),
            vec!["x", "y"]
        );
    }

    #[test]
    fn display_parenthesizes_lower_or_equal_precedence() {
        assert_eq!((x() + y()).to_string(), "x+y");
        assert_eq!(((x() + y()) * x()).to_string(), "(x+y)*x");
        assert_eq!(((x() * y()) * x()).to_string(), "(x*y)*x");
        assert_eq!((x() - (y() - x())).to_string(), "x-(y-x)");
        assert_eq!((x() / (y() * x())).to_string(), "x/(y*x)");
        assert_eq!(x().pow(y().pow(x())).to_string(), "x^(y^x)");
        assert_eq!((x() * y().pow(Term::integer(2))).to_string(), "x*y^2");
    }

    #[test]
    fn display_negation_and_roots() {
        assert_eq!((-x()).to_string(), "-x");
        assert_eq!((-(x() + y())).to_string(), "-(x+y)");
        assert_eq!(((-x()) * y()).to_string(), "(-x)*y");
        assert_eq!(x().root(Term::integer(2)).to_string(), "√x");
        assert_eq!((x() + y()).root(Term::integer(3)).to_string(), "∛(x+y)");
        assert_eq!(x().root(y()).to_string(), "x^(1/y)");
        assert_eq!(
            (x() + Term::Constant(Number::Integer(-2))).to_string(),
            "x+(-2)"
        );
        assert_eq!(Term::Add(vec![]).to_string(), "sum()");
        assert_eq!(
            Term::constant_placeholder("C").unwrap().to_string(),
            "#C"
        );
    }

    #[test]
    fn canonical_sorts_commutative_operands() {
        let term = Term::Add(vec![y(), Term::integer(1), x() * y()]);
        let canonical = term.canonical();
        assert_eq!(canonical, term);
        assert_eq!(canonical.to_string(), "1+y+x*y");
    }

    #[test]
    fn substitute_replaces_bound_placeholders_only() {
        let pattern = Term::placeholder("X").unwrap() + Term::placeholder("Y").unwrap() * x();
        let substitution = Substitution::from_iter([("X".to_string(), y())]);
        assert_eq!(
            pattern.substitute(&substitution),
            y() + Term::placeholder("Y").unwrap() * x()
        );
    }

    proptest! {
        #[test]
        fn commutative_operations_ignore_operand_order(
            (operands, shuffled) in prop::collection::vec(ground_term(2), 0..5)
                .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
        ) {
            prop_assert_eq!(Term::Add(operands.clone()), Term::Add(shuffled.clone()));
            prop_assert_eq!(Term::Mul(operands), Term::Mul(shuffled));
        }

        #[test]
        fn swapping_binary_operands_breaks_equality(a in ground_term(2), b in ground_term(2)) {
            let swapped_equal = (a.clone() - b.clone()) == (b.clone() - a.clone());
            prop_assert_eq!(swapped_equal, a == b);
            let swapped_equal = a.clone().pow(b.clone()) == b.clone().pow(a.clone());
            prop_assert_eq!(swapped_equal, a == b);
        }

        #[test]
        fn order_is_consistent_with_equality(a in ground_term(3), b in ground_term(3)) {
            prop_assert_eq!(a.cmp(&b) == Ordering::Equal, a == b);
            prop_assert_eq!(a.canonical(), a);
        }

        #[test]
        fn substitute_with_empty_substitution_is_identity(t in ground_term(3)) {
            let substituted = t.substitute(&Substitution::new());
            prop_assert_eq!(substituted.to_string(), t.to_string());
            prop_assert_eq!(substituted, t);
        }
    }
}
