//! Bookkeeping of constraint names already used in a document.

use std::collections::{HashMap, HashSet};

/// Names taken in one document plus a suffix counter per base candidate.
///
/// A registry belongs to a single run over a single document. Seed it with
/// the names already present, then [`claim`](Self::claim) one name per
/// unnamed foreign key.
#[derive(Debug, Default, Clone)]
pub struct NameRegistry {
    used: HashSet<String>,
    /// Last suffix handed out for a base candidate.
    counters: HashMap<String, u32>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a name that already exists. Returns `false` if it was known.
    pub fn reserve(&mut self, name: impl Into<String>) -> bool {
        self.used.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    /// Take `candidate` if it is free, otherwise the first free
    /// `candidate_<n>` counting up from this candidate's last suffix.
    ///
    /// Every suffixed form is checked against all used names, so the result
    /// is never a name that was reserved or claimed before.
    pub fn claim(&mut self, candidate: &str) -> String {
        if !self.used.contains(candidate) {
            self.used.insert(candidate.to_string());
            return candidate.to_string();
        }

        let counter = self.counters.entry(candidate.to_string()).or_insert(0);
        loop {
            *counter += 1;
            let name = format!("{}_{}", candidate, counter);
            if !self.used.contains(&name) {
                self.used.insert(name.clone());
                return name;
            }
            tracing::debug!(name = %name, "suffixed candidate already taken");
        }
    }
}

impl<S: Into<String>> FromIterator<S> for NameRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut registry = Self::new();
        registry.extend(iter);
        registry
    }
}

impl<S: Into<String>> Extend<S> for NameRegistry {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for name in iter {
            self.reserve(name);
        }
    }
}
