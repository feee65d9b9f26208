pub mod budget;
pub mod config;
pub mod deduction;
pub mod deduction_rules;
pub mod error;
mod log;
mod multiset;
pub mod number;
pub mod parse;
pub mod pattern;
pub mod problem;
pub mod proposition;
#[cfg(test)]
mod sampler;
pub mod simplify;
pub mod simplify_rules;
pub mod substitution;
pub mod term;

pub use budget::Budget;
pub use config::RuleSet;
pub use number::Number;
pub use problem::{Problem, ProofOutcome, ProofReport, Solution};
pub use proposition::{Proposition, Relation};
pub use substitution::Substitution;
pub use term::Term;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
}

fn to_js_error(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Tries to prove `goal` from the newline-separated `assumptions` with the
/// built-in rules. Returns the proof history followed by the outcome.
#[wasm_bindgen]
pub fn prove(goal: &str, assumptions: &str, max_steps: Option<usize>) -> Result<js_sys::Array, JsValue> {
    let goal: Proposition = goal.parse().map_err(to_js_error)?;
    let assumptions = assumptions
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::parse)
        .collect::<Result<Vec<Proposition>, _>>()
        .map_err(to_js_error)?;
    let problem = Problem::new(goal, assumptions).map_err(to_js_error)?;

    let mut solution = Solution::new(&problem);
    let budget = match max_steps {
        Some(max_steps) => Budget::steps(max_steps),
        None => Budget::unlimited(),
    };
    let outcome = solution.prove(&RuleSet::default(), budget);

    let lines = js_sys::Array::new();
    for line in solution.knowledge_base().history() {
        lines.push(&JsValue::from_str(line));
    }
    lines.push(&JsValue::from_str(&outcome.to_string()));
    Ok(lines)
}

/// Simplifies `term` with the built-in rules.
#[wasm_bindgen(js_name = simplify)]
pub fn simplify_term(term: &str) -> Result<String, JsValue> {
    let term: Term = term.parse().map_err(to_js_error)?;
    let simplified = simplify::simplify(&term).map_err(to_js_error)?;
    Ok(simplified.to_string())
}
