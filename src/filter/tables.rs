// tables.rs - Per-locus translation/count state and the decision log

use std::collections::BTreeMap;

/// Translation and count tables for the locus currently being filtered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocusTables {
    /// Observed name -> canonical name
    pub translations: BTreeMap<String, String>,
    /// Canonical name -> first-pass observations
    pub counts: BTreeMap<String, usize>,
    /// Ambiguous canonical -> winner chosen during resolution
    pub resolved: BTreeMap<String, String>,
}

impl LocusTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one observation of `canonical`
    pub fn record(&mut self, observed: &str, canonical: &str) {
        self.translations
            .entry(observed.to_string())
            .or_insert_with(|| canonical.to_string());
        *self.counts.entry(canonical.to_string()).or_insert(0) += 1;
    }

    pub fn translation(&self, observed: &str) -> Option<&str> {
        self.translations.get(observed).map(|s| s.as_str())
    }

    pub fn count(&self, canonical: &str) -> usize {
        self.counts.get(canonical).copied().unwrap_or(0)
    }

    /// Point every entry currently targeting `from` at `to`; returns entries changed
    pub fn reassign(&mut self, from: &str, to: &str) -> usize {
        let mut changed = 0;
        for target in self.translations.values_mut() {
            if target == from {
                *target = to.to_string();
                changed += 1;
            }
        }
        changed
    }

    /// First-pass count behind `target`.
    ///
    /// A database-tier winner never observed in the population takes the count
    /// of the ambiguous canonical it replaced.
    pub fn count_for_target(&self, target: &str) -> usize {
        match self.counts.get(target) {
            Some(&count) => count,
            None => self
                .resolved
                .iter()
                .filter(|(_, winner)| winner.as_str() == target)
                .map(|(ambiguous, _)| self.count(ambiguous))
                .sum(),
        }
    }
}

/// One annotated match/resolve decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub locus: String,
    pub allele: String,
    pub note: String,
}

impl Decision {
    pub fn new(locus: &str, allele: &str, note: impl Into<String>) -> Self {
        Self {
            locus: locus.to_string(),
            allele: allele.to_string(),
            note: note.into(),
        }
    }
}

/// Append-only record of every decision made during a run
#[derive(Debug, Clone, Default)]
pub struct DecisionLog {
    entries: Vec<Decision>,
}

impl DecisionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, decision: Decision) {
        self.entries.push(decision);
    }

    pub fn entries(&self) -> &[Decision] {
        &self.entries
    }

    /// Decisions recorded for one locus, in order
    pub fn for_locus<'a>(&'a self, locus: &'a str) -> impl Iterator<Item = &'a Decision> + 'a {
        self.entries.iter().filter(move |d| d.locus == locus)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
