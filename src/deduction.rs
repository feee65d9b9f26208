//! Forward chaining over a knowledge base.
//!
//! Each step fires the first rule that yields a new fact and then starts
//! over with the first rule, so facts are always discovered in the same
//! order for the same rule table.

use std::fmt::Display;

use tracing::{debug, trace};

use crate::{
    budget::Budget,
    config::RuleSet,
    pattern::{match_proposition, match_term},
    problem::KnowledgeBase,
    proposition::Proposition,
    simplify::{simplify_by_rules, RewriteRule},
    substitution::Substitution,
    term::Term,
};

/// Derives `conclusion` from facts matching all `assumptions`. Placeholders
/// are shared between the conclusion and the assumptions.
#[derive(Debug, Clone, PartialEq)]
pub struct DeductionRule {
    pub name: String,
    pub conclusion: Proposition,
    pub assumptions: Vec<Proposition>,
}

impl DeductionRule {
    pub fn new(name: &str, conclusion: Proposition, assumptions: Vec<Proposition>) -> Self {
        Self {
            name: name.to_string(),
            conclusion,
            assumptions,
        }
    }
}

impl Display for DeductionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.conclusion)?;
        for (i, assumption) in self.assumptions.iter().enumerate() {
            let separator = if i == 0 { ", assuming: " } else { ", " };
            write!(f, "{separator}{assumption}")?;
        }
        Ok(())
    }
}

/// A fact admitted by one deduction step.
#[derive(Debug, Clone, PartialEq)]
pub struct Deduced {
    pub rule: String,
    pub fact: Proposition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deduction {
    /// The stop condition holds.
    Stopped { steps: usize },
    /// No rule yields a new fact anymore.
    Saturated { steps: usize },
    BudgetExhausted { steps: usize },
}

/// Every substitution under which all assumptions are known facts. Each
/// assumption is matched with the bindings of the ones before it; equations
/// are tried in both directions.
fn assumption_matches(facts: &[Proposition], assumptions: &[Proposition]) -> Vec<Substitution> {
    let mut substitutions = vec![Substitution::new()];
    for assumption in assumptions {
        let mut next = vec![];
        for substitution in &substitutions {
            for fact in facts {
                next.extend(match_proposition(fact, assumption, substitution.clone()));
                if let Some(reversed) = fact.reversed() {
                    next.extend(match_proposition(&reversed, assumption, substitution.clone()));
                }
            }
        }
        substitutions = next;
    }
    substitutions
}

/// Bindings for the placeholders left in `statement`, taken from the terms
/// under consideration. A side without placeholders is not matched.
fn term_matches(terms: &[Term], statement: &Proposition) -> Vec<Substitution> {
    let mut substitutions = vec![Substitution::new()];
    for side in [statement.lhs(), statement.rhs()] {
        if !side.has_placeholder() {
            continue;
        }
        let mut next: Vec<Substitution> = vec![];
        for substitution in &substitutions {
            for term in terms {
                if let Some(matched) = match_term(term, side, substitution.clone()) {
                    if !next.contains(&matched) {
                        next.push(matched);
                    }
                }
            }
        }
        substitutions = next;
    }
    substitutions
}

/// Admits the first new fact `rule` yields, if any.
fn fire_rule(
    knowledge_base: &mut KnowledgeBase,
    rule: &DeductionRule,
    rewrite_rules: &[RewriteRule],
) -> Option<Proposition> {
    for substitution in assumption_matches(knowledge_base.facts(), &rule.assumptions) {
        let partial = rule.conclusion.substitute(&substitution);
        for completion in term_matches(knowledge_base.terms(), &partial) {
            let derived = partial.substitute(&completion);
            if derived.has_placeholder() {
                continue;
            }
            let derived = match derived.try_map_sides(|side| simplify_by_rules(side, rewrite_rules)) {
                Ok(simplified) => simplified,
                Err(error) => {
                    trace!(rule = %rule.name, candidate = %derived, %error, "skipping candidate");
                    continue;
                }
            };
            let message = format!("deduced by {}: {}", rule.name, derived);
            if knowledge_base.add_fact(derived.clone(), &message) {
                debug!(rule = %rule.name, fact = %derived, "admitted fact");
                return Some(derived);
            }
        }
    }
    None
}

/// Admits one new fact, trying the rules in order. `None` at the fixpoint.
pub fn deduce_once(knowledge_base: &mut KnowledgeBase, rules: &RuleSet) -> Option<Deduced> {
    rules.deduction.iter().find_map(|rule| {
        fire_rule(knowledge_base, rule, &rules.rewrite).map(|fact| Deduced {
            rule: rule.name.clone(),
            fact,
        })
    })
}

/// Deduces until no rule fires or the budget runs out.
pub fn deduce(knowledge_base: &mut KnowledgeBase, rules: &RuleSet, budget: Budget) -> Deduction {
    deduce_until(knowledge_base, rules, budget, |_| false)
}

/// Like [`deduce`], but stops as soon as `stop` holds for the knowledge base.
pub fn deduce_until(
    knowledge_base: &mut KnowledgeBase,
    rules: &RuleSet,
    budget: Budget,
    stop: impl Fn(&KnowledgeBase) -> bool,
) -> Deduction {
    let mut clock = budget.start();
    loop {
        if stop(knowledge_base) {
            return Deduction::Stopped {
                steps: clock.steps(),
            };
        }
        if clock.is_exhausted() {
            debug!(steps = clock.steps(), "deduction budget exhausted");
            return Deduction::BudgetExhausted {
                steps: clock.steps(),
            };
        }
        if deduce_once(knowledge_base, rules).is_none() {
            debug!(steps = clock.steps(), "deduction saturated");
            return Deduction::Saturated {
                steps: clock.steps(),
            };
        }
        clock.tick();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::deduction_rules::deduction_rules;

    fn term(s: &str) -> Term {
        s.parse().unwrap()
    }

    fn proposition(s: &str) -> Proposition {
        s.parse().unwrap()
    }

    fn knowledge_base(facts: &[&str], terms: &[&str]) -> KnowledgeBase {
        let mut knowledge_base = KnowledgeBase::new();
        for t in terms {
            knowledge_base.add_term(term(t), "");
        }
        for fact in facts {
            knowledge_base.add_fact(proposition(fact), "");
        }
        knowledge_base
    }

    fn rules(deduction: Vec<DeductionRule>) -> RuleSet {
        RuleSet {
            deduction,
            ..RuleSet::default()
        }
    }

    #[test]
    fn assumptions_thread_one_substitution() {
        let facts = [proposition("0<=x"), proposition("0<=y")];
        let assumptions = [proposition("X1<=Y1"), proposition("X2<=Y2")];
        let substitutions = assumption_matches(&facts, &assumptions);
        assert_eq!(substitutions.len(), 4);
        assert_eq!(substitutions[1].get("Y1"), Some(&term("x")));
        assert_eq!(substitutions[1].get("Y2"), Some(&term("y")));

        let shared = [proposition("X<=Y"), proposition("Y<=Z")];
        let facts = [proposition("x<=y"), proposition("y<=z"), proposition("a<=b")];
        let substitutions = assumption_matches(&facts, &shared);
        assert_eq!(substitutions.len(), 1);
        assert_eq!(substitutions[0].get("Z"), Some(&term("z")));
    }

    #[test]
    fn no_assumptions_give_one_empty_substitution() {
        assert_eq!(
            assumption_matches(&[proposition("0<=x")], &[]),
            vec![Substitution::new()]
        );
    }

    #[test]
    fn equations_are_matched_in_both_directions() {
        let substitutions = assumption_matches(&[proposition("x=y")], &[proposition("X=x")]);
        assert_eq!(substitutions.len(), 1);
        assert_eq!(substitutions[0].get("X"), Some(&term("y")));

        let inequalities = assumption_matches(&[proposition("x<=y")], &[proposition("X<=x")]);
        assert!(inequalities.is_empty());
    }

    #[test]
    fn term_matches_skip_sides_without_placeholders() {
        let terms = [term("x"), term("x^2"), term("y^2")];
        assert_eq!(
            term_matches(&terms, &proposition("0<=x+y")),
            vec![Substitution::new()]
        );
        let substitutions = term_matches(&terms, &proposition("0<=X^2"));
        assert_eq!(substitutions.len(), 2);
        assert_eq!(substitutions[1].get("X"), Some(&term("y")));
    }

    #[test]
    fn term_matches_are_deduplicated() {
        let terms = [term("x+y"), term("y+x")];
        assert_eq!(term_matches(&terms, &proposition("0<=X")).len(), 1);
    }

    #[test]
    fn square_is_positive() {
        let mut knowledge_base = knowledge_base(&[], &["x"]);
        let rules = rules(vec![DeductionRule::new(
            "square_is_positive",
            proposition("0<=X^2"),
            vec![],
        )]);
        assert_eq!(deduce_once(&mut knowledge_base, &rules), None);

        knowledge_base.add_term(term("x^2"), "");
        let deduced = deduce_once(&mut knowledge_base, &rules).unwrap();
        assert_eq!(deduced.rule, "square_is_positive");
        assert_eq!(deduced.fact, proposition("0<=x^2"));
        assert_eq!(
            knowledge_base.history().last().unwrap(),
            "deduced by square_is_positive: 0<=x^2"
        );
    }

    #[test]
    fn add_ineqs_adds_the_sum() {
        let mut knowledge_base = knowledge_base(&["0<=x", "0<=y"], &["x", "y"]);
        let rules = RuleSet::default();

        let first = deduce_once(&mut knowledge_base, &rules).unwrap();
        assert_eq!(first.fact, proposition("0<=x+x"));
        let second = deduce_once(&mut knowledge_base, &rules).unwrap();
        assert_eq!(second.rule, "add_ineqs");
        assert_eq!(second.fact, proposition("0<=x+y"));
    }

    #[test]
    fn candidates_with_domain_errors_are_skipped() {
        let mut knowledge_base = knowledge_base(&["0<=x"], &["x"]);
        let rules = rules(vec![DeductionRule::new(
            "broken",
            proposition("0<=X/0"),
            vec![proposition("0<=X")],
        )]);
        assert_eq!(deduce_once(&mut knowledge_base, &rules), None);
        assert_eq!(knowledge_base.facts().len(), 1);
    }

    #[test]
    fn conclusions_are_simplified() {
        let mut knowledge_base = knowledge_base(&["0<=x+0"], &[]);
        let rules = rules(vec![DeductionRule::new(
            "copy",
            proposition("X*1<=Y"),
            vec![proposition("X<=Y")],
        )]);
        let deduced = deduce_once(&mut knowledge_base, &rules).unwrap();
        assert_eq!(deduced.fact, proposition("0<=x"));
    }

    #[test]
    fn facts_without_variables_are_not_admitted() {
        let mut knowledge_base = knowledge_base(&["0<=x"], &[]);
        let rules = rules(vec![DeductionRule::new(
            "constant",
            proposition("0<=1+1"),
            vec![],
        )]);
        assert_eq!(
            deduce(&mut knowledge_base, &rules, Budget::unlimited()),
            Deduction::Saturated { steps: 0 }
        );
    }

    #[test]
    fn deduction_stops_at_fixpoint() {
        let mut knowledge_base = knowledge_base(&[], &["x", "y", "x^2"]);
        let rules = rules(deduction_rules()[..1].to_vec());
        assert_eq!(
            deduce(&mut knowledge_base, &rules, Budget::unlimited()),
            Deduction::Saturated { steps: 1 }
        );
        assert!(knowledge_base.facts().contains(&proposition("0<=x^2")));
    }

    #[test]
    fn adding_inequalities_needs_a_budget() {
        let mut knowledge_base = knowledge_base(&["0<=x", "0<=y"], &["x", "y"]);
        assert_eq!(
            deduce(&mut knowledge_base, &RuleSet::default(), Budget::steps(5)),
            Deduction::BudgetExhausted { steps: 5 }
        );
        assert_eq!(knowledge_base.facts().len(), 7);
    }

    #[test]
    fn deduction_stops_when_asked() {
        let mut knowledge_base = knowledge_base(&["0<=x", "0<=y"], &["x", "y"]);
        let goal = proposition("0<=x+y");
        assert_eq!(
            deduce_until(&mut knowledge_base, &RuleSet::default(), Budget::unlimited(), |kb| {
                kb.contains_fact(&goal)
            }),
            Deduction::Stopped { steps: 2 }
        );
        assert_eq!(knowledge_base.facts().len(), 4);
    }

    #[test]
    fn deduction_is_deterministic() {
        let run = || {
            let mut knowledge_base = knowledge_base(&["0<=x", "x<=y"], &["x", "y", "y^2"]);
            deduce(&mut knowledge_base, &RuleSet::default(), Budget::steps(8));
            knowledge_base.history().to_vec()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn knowledge_base_only_grows() {
        let mut knowledge_base = knowledge_base(&["0<=x", "x<=y"], &["x", "y", "x^2"]);
        let rules = RuleSet::default();
        let (mut facts, mut terms) = (knowledge_base.facts().len(), knowledge_base.terms().len());
        for _ in 0..8 {
            if deduce_once(&mut knowledge_base, &rules).is_none() {
                break;
            }
            assert!(knowledge_base.facts().len() > facts);
            assert!(knowledge_base.terms().len() >= terms);
            facts = knowledge_base.facts().len();
            terms = knowledge_base.terms().len();
        }
    }

    #[test]
    fn rule_display() {
        let rules = deduction_rules();
        assert_eq!(rules[0].to_string(), "square_is_positive: 0<=X^2");
        assert_eq!(
            rules[1].to_string(),
            "add_ineqs: X1+X2<=Y1+Y2, assuming: X1<=Y1, X2<=Y2"
        );
    }
}
