use std::fmt::Display;

use serde::Serialize;

use crate::{
    budget::Budget,
    config::RuleSet,
    deduction::{deduce_until, Deduction},
    error::ProblemError,
    log::measure,
    proposition::Proposition,
    term::Term,
};

/// An inequality to prove for all values of its variables, under
/// assumptions about the same variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    goal: Proposition,
    assumptions: Vec<Proposition>,
    variables: Vec<String>,
}

impl Problem {
    pub fn new(goal: Proposition, assumptions: Vec<Proposition>) -> Result<Self, ProblemError> {
        if !matches!(goal, Proposition::AtMost(..)) {
            return Err(ProblemError::GoalNotInequality);
        }
        if goal.has_placeholder() {
            return Err(ProblemError::PlaceholderInGoal);
        }
        if !goal.has_variable() {
            return Err(ProblemError::GoalWithoutVariable);
        }

        let variables = goal.variables();
        for assumption in &assumptions {
            if assumption.has_placeholder() {
                return Err(ProblemError::PlaceholderInAssumption(assumption.to_string()));
            }
            if !assumption.has_variable() {
                return Err(ProblemError::AssumptionWithoutVariable(assumption.to_string()));
            }
            if let Some(unknown) = assumption.variables().difference(&variables).next() {
                return Err(ProblemError::UnknownVariable(unknown.clone()));
            }
        }

        Ok(Self {
            goal,
            assumptions,
            variables: variables.into_iter().collect(),
        })
    }

    pub fn goal(&self) -> &Proposition {
        &self.goal
    }

    pub fn assumptions(&self) -> &[Proposition] {
        &self.assumptions
    }

    /// The variables of the goal, sorted.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }
}

fn write_lines<T: Display>(
    f: &mut std::fmt::Formatter<'_>,
    heading: &str,
    items: &[T],
) -> std::fmt::Result {
    writeln!(f, "{heading}:")?;
    if items.is_empty() {
        return writeln!(f, "None");
    }
    for item in items {
        writeln!(f, "{item}")?;
    }
    Ok(())
}

impl Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Variables:")?;
        writeln!(f, "{}", self.variables.join(", "))?;
        write_lines(f, "Assumptions", &self.assumptions)?;
        writeln!(f, "Goal:")?;
        write!(f, "{}", self.goal)
    }
}

/// Facts believed true and terms under consideration during one proof
/// attempt, with a transcript of how they were found. Nothing is ever
/// removed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct KnowledgeBase {
    facts: Vec<Proposition>,
    terms: Vec<Term>,
    history: Vec<String>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn facts(&self) -> &[Proposition] {
        &self.facts
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn contains_fact(&self, fact: &Proposition) -> bool {
        self.facts.contains(fact)
    }

    /// Appends a transcript line; empty messages are dropped.
    pub fn add_history(&mut self, message: &str) {
        if !message.is_empty() {
            self.history.push(message.to_string());
        }
    }

    /// Adds a term with variables that is not yet known. Returns whether
    /// it was added.
    pub fn add_term(&mut self, term: Term, message: &str) -> bool {
        if !term.has_variable() || self.terms.contains(&term) {
            return false;
        }
        self.terms.push(term);
        self.add_history(message);
        true
    }

    /// Adds a fact with variables that is not yet known, together with both
    /// of its sides as terms. Returns whether it was added.
    pub fn add_fact(&mut self, fact: Proposition, message: &str) -> bool {
        if !fact.has_variable() || self.contains_fact(&fact) {
            return false;
        }
        self.add_term(fact.lhs().clone(), "");
        self.add_term(fact.rhs().clone(), "");
        self.facts.push(fact);
        self.add_history(message);
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProofOutcome {
    Proved,
    /// Deduction reached its fixpoint without deriving a goal.
    GoalNotReached,
    BudgetExhausted,
}

impl Display for ProofOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProofOutcome::Proved => write!(f, "proved"),
            ProofOutcome::GoalNotReached => write!(f, "goal not reached"),
            ProofOutcome::BudgetExhausted => write!(f, "no proof found within budget"),
        }
    }
}

/// Puts every sub-term with variables of both sides under consideration,
/// parents before children.
fn add_subterms(knowledge_base: &mut KnowledgeBase, proposition: &Proposition) {
    for side in [proposition.lhs(), proposition.rhs()] {
        for subterm in side.subterms() {
            knowledge_base.add_term(subterm.clone(), "");
        }
    }
}

/// The state of a proof attempt: the goals and everything known so far.
#[derive(Debug, Clone)]
pub struct Solution {
    variables: Vec<String>,
    goals: Vec<Proposition>,
    knowledge_base: KnowledgeBase,
}

impl Solution {
    pub fn new(problem: &Problem) -> Self {
        let mut knowledge_base = KnowledgeBase::new();
        knowledge_base.add_history(&format!(
            "we will prove for all {}:",
            problem.variables().join(", ")
        ));
        knowledge_base.add_history(&problem.goal().to_string());

        for variable in problem.variables() {
            knowledge_base.add_term(Term::Variable(variable.clone()), "");
        }
        for proposition in problem.assumptions().iter().chain([problem.goal()]) {
            add_subterms(&mut knowledge_base, proposition);
        }
        for assumption in problem.assumptions() {
            if knowledge_base.add_fact(assumption.clone(), "") {
                knowledge_base.add_history(&format!("assuming: {assumption}"));
            }
        }
        knowledge_base.add_history("here we go!");

        Self {
            variables: problem.variables().to_vec(),
            goals: vec![problem.goal().clone()],
            knowledge_base,
        }
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn main_goal(&self) -> &Proposition {
        &self.goals[0]
    }

    pub fn goals(&self) -> &[Proposition] {
        &self.goals
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge_base
    }

    pub fn knowledge_base_mut(&mut self) -> &mut KnowledgeBase {
        &mut self.knowledge_base
    }

    /// Adds an alternative goal whose proof also proves the main goal.
    pub fn add_goal(&mut self, goal: Proposition, message: &str) -> Result<bool, ProblemError> {
        if !matches!(goal, Proposition::AtMost(..)) {
            return Err(ProblemError::GoalNotInequality);
        }
        if goal.has_placeholder() {
            return Err(ProblemError::PlaceholderInGoal);
        }
        if self.goals.contains(&goal) {
            return Ok(false);
        }
        add_subterms(&mut self.knowledge_base, &goal);
        self.goals.push(goal);
        self.knowledge_base.add_history(message);
        Ok(true)
    }

    pub fn is_proved(&self) -> bool {
        self.goals
            .iter()
            .any(|goal| self.knowledge_base.contains_fact(goal))
    }

    /// Deduces one fact at a time until a goal is among the facts, deduction
    /// saturates, or the budget runs out.
    pub fn prove(&mut self, rules: &RuleSet, budget: Budget) -> ProofOutcome {
        measure! { self.run_deduction(rules, budget) }
    }

    fn run_deduction(&mut self, rules: &RuleSet, budget: Budget) -> ProofOutcome {
        let goals = &self.goals;
        let is_proved =
            |knowledge_base: &KnowledgeBase| goals.iter().any(|goal| knowledge_base.contains_fact(goal));
        match deduce_until(&mut self.knowledge_base, rules, budget, is_proved) {
            Deduction::Stopped { .. } => ProofOutcome::Proved,
            Deduction::Saturated { .. } => ProofOutcome::GoalNotReached,
            Deduction::BudgetExhausted { .. } => ProofOutcome::BudgetExhausted,
        }
    }

    pub fn report(&self, outcome: ProofOutcome) -> ProofReport {
        ProofReport {
            outcome,
            goal: self.main_goal().to_string(),
            facts: self
                .knowledge_base
                .facts()
                .iter()
                .map(ToString::to_string)
                .collect(),
            history: self.knowledge_base.history().to_vec(),
        }
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Variables:")?;
        writeln!(f, "{}", self.variables.join(", "))?;
        write_lines(f, "Terms under consideration", self.knowledge_base.terms())?;
        write_lines(f, "Facts assumed or derived", self.knowledge_base.facts())?;
        writeln!(f, "Main goal:")?;
        writeln!(f, "{}", self.main_goal())?;
        write_lines(f, "Alternative goals", &self.goals[1..])
    }
}

/// What a proof attempt found, in printable form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProofReport {
    pub outcome: ProofOutcome,
    pub goal: String,
    pub facts: Vec<String>,
    pub history: Vec<String>,
}
