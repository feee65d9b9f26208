use thiserror::Error;

use crate::term::OperatorKind;

/// Malformed input rejected while constructing a term.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TermError {
    #[error("{operator} takes 2 operands but {given} were given")]
    Arity { operator: OperatorKind, given: usize },
    #[error("'{0}' is not a valid name, names must be alphanumeric and start with a letter")]
    InvalidName(String),
    #[error("{0} is not a real number")]
    NonReal(f64),
}

/// Arithmetic that has no real value. Raised while simplifying and only
/// invalidates the term being simplified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("0^0 encountered")]
    ZeroToTheZero,
    #[error("zeroth root encountered")]
    ZeroethRoot,
    #[error("result is not a real number")]
    NonReal,
    #[error("term contains variables or placeholders and has no value")]
    NotConstant,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProblemError {
    #[error("the goal must be an inequality")]
    GoalNotInequality,
    #[error("the goal must not contain placeholders")]
    PlaceholderInGoal,
    #[error("the goal must contain at least one variable")]
    GoalWithoutVariable,
    #[error("assumption {0} contains placeholders")]
    PlaceholderInAssumption(String),
    #[error("assumption {0} contains no variable")]
    AssumptionWithoutVariable(String),
    #[error("variable {0} of the assumptions does not occur in the goal")]
    UnknownVariable(String),
}
