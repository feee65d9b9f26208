use std::sync::OnceLock;

use tracing::trace;

use crate::{
    error::DomainError,
    number::Number,
    pattern::Pattern,
    simplify_rules::rewrite_rules,
    substitution::Substitution,
    term::Term,
};

/// What happens to a term matched by a rewrite rule.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Instantiate the term with the bindings of the match.
    Replace(Term),
    /// Compute the replacement from the matched term itself.
    Compute(fn(&Term) -> Result<Term, DomainError>),
    /// The matched term has no value, simplification fails.
    Fail(DomainError),
}

#[derive(Debug, Clone)]
pub struct RewriteRule {
    pub name: String,
    pub pattern: Pattern,
    pub outcome: Outcome,
}

impl RewriteRule {
    pub fn replace(name: &str, pattern: Term, replacement: Term) -> Self {
        Self {
            name: name.to_string(),
            pattern: Pattern::Term(pattern),
            outcome: Outcome::Replace(replacement),
        }
    }

    pub fn compute(
        name: &str,
        pattern: Term,
        compute: fn(&Term) -> Result<Term, DomainError>,
    ) -> Self {
        Self {
            name: name.to_string(),
            pattern: Pattern::Term(pattern),
            outcome: Outcome::Compute(compute),
        }
    }

    /// A rule for terms of a shape that no single pattern describes.
    pub fn shape(
        name: &str,
        predicate: fn(&Term) -> bool,
        compute: fn(&Term) -> Result<Term, DomainError>,
    ) -> Self {
        Self {
            name: name.to_string(),
            pattern: Pattern::Shape(predicate),
            outcome: Outcome::Compute(compute),
        }
    }

    pub fn fail(name: &str, pattern: Term, error: DomainError) -> Self {
        Self {
            name: name.to_string(),
            pattern: Pattern::Term(pattern),
            outcome: Outcome::Fail(error),
        }
    }

    /// The rewritten term if this rule applies to `term` at the root.
    fn apply(&self, term: &Term) -> Result<Option<Term>, DomainError> {
        let Some(substitution) = self.pattern.match_against(term, Substitution::new()) else {
            return Ok(None);
        };
        let rewritten = match &self.outcome {
            Outcome::Replace(replacement) => replacement.substitute(&substitution),
            Outcome::Compute(compute) => compute(term)?,
            Outcome::Fail(error) => return Err(*error),
        };
        trace!(rule = %self.name, from = %term, to = %rewritten, "rewrote");
        Ok(Some(rewritten))
    }
}

/// One rewriting pass: the first applicable rule at the root, otherwise one
/// pass over every operand. `None` if nothing changed.
fn rewrite_step(term: &Term, rules: &[RewriteRule]) -> Result<Option<Term>, DomainError> {
    for rule in rules {
        if let Some(rewritten) = rule.apply(term)? {
            return Ok(Some(rewritten));
        }
    }

    let mut changed = false;
    let rewritten = term.try_map_operands(|operand| {
        Ok(match rewrite_step(operand, rules)? {
            Some(rewritten) => {
                changed = true;
                rewritten
            }
            None => operand.clone(),
        })
    })?;
    Ok(changed.then_some(rewritten))
}

/// Rewrites `term` with `rules` until no rule applies anywhere.
///
/// Terminates only if the rule table does; the built-in table does for
/// every term built from numbers, variables and the six operators.
pub fn simplify_by_rules(term: &Term, rules: &[RewriteRule]) -> Result<Term, DomainError> {
    let mut current = term.clone();
    while let Some(rewritten) = rewrite_step(&current, rules)? {
        current = rewritten;
    }
    Ok(current)
}

pub(crate) fn default_rewrite_rules() -> &'static [RewriteRule] {
    static RULES: OnceLock<Vec<RewriteRule>> = OnceLock::new();
    RULES.get_or_init(rewrite_rules)
}

/// Simplifies with the built-in rule table.
pub fn simplify(term: &Term) -> Result<Term, DomainError> {
    simplify_by_rules(term, default_rewrite_rules())
}

/// The value of a term without variables and placeholders.
pub fn evaluate(term: &Term) -> Result<Number, DomainError> {
    match term {
        Term::Constant(value) => Ok(*value),
        Term::Variable(_) | Term::Placeholder(_) => Err(DomainError::NotConstant),
        Term::Add(operands) => operands
            .iter()
            .try_fold(Number::Integer(0), |sum, operand| sum.add(evaluate(operand)?)),
        Term::Mul(operands) => operands
            .iter()
            .try_fold(Number::Integer(1), |product, operand| {
                product.mul(evaluate(operand)?)
            }),
        Term::Sub(left, right) => evaluate(left)?.sub(evaluate(right)?),
        Term::Div(left, right) => evaluate(left)?.div(evaluate(right)?),
        Term::Pow(base, exponent) => evaluate(base)?.pow(evaluate(exponent)?),
        Term::Root(radicand, index) => evaluate(radicand)?.root(evaluate(index)?),
    }
}
