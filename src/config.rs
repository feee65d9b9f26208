use crate::{
    deduction::DeductionRule,
    deduction_rules::deduction_rules,
    error::DomainError,
    simplify::{simplify_by_rules, RewriteRule},
    simplify_rules::rewrite_rules,
    term::Term,
};

/// The rewrite and deduction tables of a run, each tried in order.
/// `RuleSet::default()` holds the built-in tables.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub rewrite: Vec<RewriteRule>,
    pub deduction: Vec<DeductionRule>,
}

impl RuleSet {
    pub fn new(rewrite: Vec<RewriteRule>, deduction: Vec<DeductionRule>) -> Self {
        Self { rewrite, deduction }
    }

    pub fn simplify(&self, term: &Term) -> Result<Term, DomainError> {
        simplify_by_rules(term, &self.rewrite)
    }

    pub fn rewrite_rule(&self, name: &str) -> Option<&RewriteRule> {
        self.rewrite.iter().find(|rule| rule.name == name)
    }

    pub fn deduction_rule(&self, name: &str) -> Option<&DeductionRule> {
        self.deduction.iter().find(|rule| rule.name == name)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(rewrite_rules(), deduction_rules())
    }
}
