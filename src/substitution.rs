use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::term::Term;

/// Bindings from placeholder names to ground terms, built up while matching.
#[derive(PartialEq, Eq, Clone, Debug, Serialize, Deserialize, Default)]
pub struct Substitution(HashMap<String, Term>);

impl Substitution {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn get(&self, name: &str) -> Option<&Term> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// A copy of this substitution that also binds `name`.
    pub fn with(&self, name: &str, term: Term) -> Self {
        let mut substitution = self.clone();
        substitution.0.insert(name.to_string(), term);
        substitution
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Term)> {
        self.0.iter()
    }
}

impl FromIterator<(String, Term)> for Substitution {
    fn from_iter<T: IntoIterator<Item = (String, Term)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<(String, Term)> for Substitution {
    fn extend<T: IntoIterator<Item = (String, Term)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.0.insert(k, v);
        }
    }
}
