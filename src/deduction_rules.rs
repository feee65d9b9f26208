use crate::{deduction::DeductionRule, proposition::Proposition};

fn proposition(notation: &str) -> Proposition {
    notation
        .parse()
        .expect("built-in deduction rules are well-formed")
}

/// The built-in deduction rules, cheapest first.
pub fn deduction_rules() -> Vec<DeductionRule> {
    vec![
        DeductionRule::new("square_is_positive", proposition("0<=X^2"), vec![]),
        DeductionRule::new(
            "add_ineqs",
            proposition("X1+X2<=Y1+Y2"),
            vec![proposition("X1<=Y1"), proposition("X2<=Y2")],
        ),
    ]
}
