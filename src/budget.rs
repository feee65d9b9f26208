use serde::{Deserialize, Serialize};

use crate::log::now;

/// Limits for a deduction run. A run that hits a limit stops with a
/// distinct outcome instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Budget {
    /// Maximum number of admitted facts.
    pub max_steps: Option<usize>,
    /// Wall-clock limit in milliseconds.
    pub time_limit_ms: Option<f64>,
}

impl Budget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn steps(max_steps: usize) -> Self {
        Self {
            max_steps: Some(max_steps),
            ..Self::default()
        }
    }

    pub fn millis(time_limit_ms: f64) -> Self {
        Self {
            time_limit_ms: Some(time_limit_ms),
            ..Self::default()
        }
    }

    pub fn with_steps(self, max_steps: usize) -> Self {
        Self {
            max_steps: Some(max_steps),
            ..self
        }
    }

    pub fn with_millis(self, time_limit_ms: f64) -> Self {
        Self {
            time_limit_ms: Some(time_limit_ms),
            ..self
        }
    }

    pub(crate) fn start(self) -> BudgetClock {
        BudgetClock {
            budget: self,
            started_at: now(),
            steps: 0,
        }
    }
}

/// A running budget: counts steps and reads the clock.
#[derive(Debug)]
pub(crate) struct BudgetClock {
    budget: Budget,
    started_at: f64,
    steps: usize,
}

impl BudgetClock {
    pub(crate) fn tick(&mut self) {
        self.steps += 1;
    }

    pub(crate) fn steps(&self) -> usize {
        self.steps
    }

    pub(crate) fn elapsed_ms(&self) -> f64 {
        now() - self.started_at
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.budget
            .max_steps
            .is_some_and(|max_steps| self.steps >= max_steps)
            || self
                .budget
                .time_limit_ms
                .is_some_and(|limit| self.elapsed_ms() >= limit)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unlimited_budget_is_never_exhausted() {
        let mut clock = Budget::unlimited().start();
        for _ in 0..1000 {
            clock.tick();
        }
        assert!(!clock.is_exhausted());
        assert_eq!(clock.steps(), 1000);
    }

    #[test]
    fn step_budget() {
        let mut clock = Budget::steps(2).start();
        assert!(!clock.is_exhausted());
        clock.tick();
        assert!(!clock.is_exhausted());
        clock.tick();
        assert!(clock.is_exhausted());
    }

    #[test]
    fn zero_time_limit_is_exhausted_at_once() {
        assert!(Budget::millis(0.0).start().is_exhausted());
        assert!(!Budget::millis(60_000.0).start().is_exhausted());
    }

    #[test]
    fn limits_combine() {
        let budget = Budget::steps(3).with_millis(10.0);
        assert_eq!(budget.max_steps, Some(3));
        assert_eq!(budget.time_limit_ms, Some(10.0));
        assert_eq!(Budget::millis(1.0).with_steps(4).max_steps, Some(4));
    }

    #[test]
    fn serializes_as_plain_object() {
        let json = serde_json::to_string(&Budget::steps(5)).unwrap();
        assert_eq!(json, r#"{"max_steps":5,"time_limit_ms":null}"#);
        let budget: Budget = serde_json::from_str(&json).unwrap();
        assert_eq!(budget, Budget::steps(5));
    }
}
