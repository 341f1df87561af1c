// reconciler.rs - Maps observed allele names onto the reference nomenclature

use crate::data::ReferenceTable;
use serde::Serialize;
use std::fmt;

/// Truncate an allele name to at most `width` characters
pub fn truncate_name(name: &str, width: usize) -> &str {
    match name.char_indices().nth(width) {
        Some((idx, _)) => &name[..idx],
        None => name,
    }
}

/// How an observed name was matched against the reference set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchKind {
    /// Full name present verbatim in the reference set
    Exact,
    /// Observed name is the truncated form of longer reference entries
    Expanded,
    /// Observed name is more precise than a reference entry
    Extra,
    /// Reference entries share the observed truncated prefix
    LowestCommon,
    /// Name is the configured untyped sentinel
    Untyped,
    /// Name is shorter than the digit width
    TooShort,
    /// Nothing in the reference set resembles the name
    NotFound,
}

impl MatchKind {
    /// True when the name was found (exactly or by a heuristic)
    pub fn is_match(self) -> bool {
        matches!(
            self,
            MatchKind::Exact | MatchKind::Expanded | MatchKind::Extra | MatchKind::LowestCommon
        )
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MatchKind::Exact => "exact",
            MatchKind::Expanded => "expanded",
            MatchKind::Extra => "extra",
            MatchKind::LowestCommon => "lowest-common",
            MatchKind::Untyped => "untyped",
            MatchKind::TooShort => "too-short",
            MatchKind::NotFound => "not-found",
        };
        write!(f, "{}", label)
    }
}

/// Outcome of reconciling one observed name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub observed: String,
    pub canonical: String,
    pub kind: MatchKind,
    /// Reference entries supporting a heuristic match
    pub candidates: Vec<String>,
}

impl Resolution {
    /// True when the canonical differs from the observed name
    pub fn is_truncated(&self) -> bool {
        self.canonical != self.observed
    }

    /// Human-readable rationale for the decision log.
    ///
    /// With `verbose` off only the final decision is kept.
    pub fn describe(&self, locus: &str, digit_width: usize, verbose: bool) -> String {
        let info = format!("{}:{}", locus, self.observed);
        let mut note = String::new();

        if verbose {
            let detail = match self.kind {
                MatchKind::Exact => format!("[{} exact match]", info),
                MatchKind::Expanded => {
                    format!("[{} close exact matches:{}]", info, join_candidates(&self.candidates))
                }
                MatchKind::Extra => format!(
                    "[{} close matches without trailing zeros:{}]",
                    info,
                    join_candidates(&self.candidates)
                ),
                MatchKind::LowestCommon => format!(
                    "[{} close un-zero-padded matches into:{}]",
                    info,
                    join_candidates(&self.candidates)
                ),
                MatchKind::Untyped => format!("[{} untyped allele, do nothing]", info),
                MatchKind::TooShort => {
                    format!("[{} TOO SHORT must be at least {} digits]", info, digit_width)
                }
                MatchKind::NotFound => format!("[{} NOT FOUND; no close matches!]", info),
            };
            note.push_str(&detail);
        }

        if self.is_truncated() {
            note.push_str(&format!(" -> truncating to: {}", self.canonical));
        } else {
            note.push_str(&format!(" -> no truncation use: {}", self.canonical));
        }
        note
    }
}

fn join_candidates(candidates: &[String]) -> String {
    candidates.iter().map(|c| format!(" {}", c)).collect()
}

/// Reconciles observed names against an owned reference table
#[derive(Debug, Clone)]
pub struct Reconciler {
    reference: ReferenceTable,
    digit_width: usize,
    untyped_allele: String,
}

impl Reconciler {
    pub fn new(reference: ReferenceTable, digit_width: usize, untyped_allele: &str) -> Self {
        Self {
            reference,
            digit_width,
            untyped_allele: untyped_allele.to_string(),
        }
    }

    pub fn reference(&self) -> &ReferenceTable {
        &self.reference
    }

    pub fn digit_width(&self) -> usize {
        self.digit_width
    }

    pub fn untyped_allele(&self) -> &str {
        &self.untyped_allele
    }

    /// Resolve `observed` at `locus` to its canonical truncated form.
    ///
    /// Unmatched names are returned verbatim so they stay visible downstream.
    pub fn resolve(&self, locus: &str, observed: &str) -> Resolution {
        let width = self.digit_width;
        let truncated = truncate_name(observed, width);
        let reference = self.reference.alleles(locus).unwrap_or(&[]);

        if self.reference.contains(locus, observed) {
            return Resolution {
                observed: observed.to_string(),
                canonical: truncated.to_string(),
                kind: MatchKind::Exact,
                candidates: Vec::new(),
            };
        }

        let mut expanded = Vec::new();
        let mut extra = Vec::new();
        let mut lcd = Vec::new();

        for db_allele in reference {
            let db_truncated = truncate_name(db_allele, width);
            if db_truncated == observed {
                expanded.push(db_allele.clone());
            }
            if truncated == db_allele {
                extra.push(db_allele.clone());
            }
            if truncated == db_truncated {
                lcd.push(db_allele.clone());
            }
        }

        let (kind, candidates) = if !expanded.is_empty() {
            (MatchKind::Expanded, expanded)
        } else if !extra.is_empty() {
            (MatchKind::Extra, extra)
        } else if !lcd.is_empty() {
            (MatchKind::LowestCommon, lcd)
        } else if observed == self.untyped_allele {
            (MatchKind::Untyped, Vec::new())
        } else if observed.chars().count() < width {
            (MatchKind::TooShort, Vec::new())
        } else {
            (MatchKind::NotFound, Vec::new())
        };

        let canonical = if kind.is_match() { truncated } else { observed };

        Resolution {
            observed: observed.to_string(),
            canonical: canonical.to_string(),
            kind,
            candidates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconciler(pairs: &[(&str, &str)]) -> Reconciler {
        Reconciler::new(ReferenceTable::from_pairs(pairs.iter().copied()), 4, "****")
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("010101", 4), "0101");
        assert_eq!(truncate_name("01", 4), "01");
        assert_eq!(truncate_name("", 4), "");
    }

    #[test]
    fn test_exact_match() {
        let r = reconciler(&[("A", "0101"), ("A", "0102")]);
        let res = r.resolve("A", "0101");
        assert_eq!(res.kind, MatchKind::Exact);
        assert_eq!(res.canonical, "0101");
        assert!(!res.is_truncated());
    }

    #[test]
    fn test_exact_match_of_long_name_is_truncated() {
        let r = reconciler(&[("A", "010101"), ("A", "010102")]);
        let res = r.resolve("A", "010101");
        assert_eq!(res.kind, MatchKind::Exact);
        assert_eq!(res.canonical, "0101");
        assert!(res.describe("A", 4, true).ends_with(" -> truncating to: 0101"));
    }

    #[test]
    fn test_expanded_takes_precedence() {
        let r = reconciler(&[("A", "03011"), ("A", "03012"), ("A", "0302")]);
        let res = r.resolve("A", "0301");
        assert_eq!(res.kind, MatchKind::Expanded);
        assert_eq!(res.canonical, "0301");
        assert_eq!(res.candidates, vec!["03011", "03012"]);
    }

    #[test]
    fn test_extra_when_observed_is_longer() {
        let r = reconciler(&[("B", "0702"), ("B", "0801")]);
        let res = r.resolve("B", "070201");
        assert_eq!(res.kind, MatchKind::Extra);
        assert_eq!(res.canonical, "0702");
        assert_eq!(res.candidates, vec!["0702"]);
    }

    #[test]
    fn test_lowest_common_prefix() {
        let r = reconciler(&[("B", "070201"), ("B", "070202")]);
        let res = r.resolve("B", "070299");
        assert_eq!(res.kind, MatchKind::LowestCommon);
        assert_eq!(res.canonical, "0702");
        assert_eq!(res.candidates.len(), 2);
    }

    #[test]
    fn test_no_match_passes_name_through() {
        let r = reconciler(&[("A", "0101")]);

        let untyped = r.resolve("A", "****");
        assert_eq!(untyped.kind, MatchKind::Untyped);
        assert_eq!(untyped.canonical, "****");

        let short = r.resolve("A", "01");
        assert_eq!(short.kind, MatchKind::TooShort);
        assert_eq!(short.canonical, "01");
        assert!(short.describe("A", 4, true).contains("TOO SHORT must be at least 4 digits"));

        let missing = r.resolve("A", "990101");
        assert_eq!(missing.kind, MatchKind::NotFound);
        assert_eq!(missing.canonical, "990101");
        assert_eq!(
            missing.describe("A", 4, true),
            "[A:990101 NOT FOUND; no close matches!] -> no truncation use: 990101"
        );
    }

    #[test]
    fn test_unknown_locus_is_not_found() {
        let r = reconciler(&[("A", "0101")]);
        assert_eq!(r.resolve("DPB1", "0401").kind, MatchKind::NotFound);
    }

    #[test]
    fn test_quiet_description_keeps_decision() {
        let r = reconciler(&[("A", "03011")]);
        let res = r.resolve("A", "0301");
        assert_eq!(res.describe("A", 4, false), " -> no truncation use: 0301");
        assert_eq!(
            res.describe("A", 4, true),
            "[A:0301 close exact matches: 03011] -> no truncation use: 0301"
        );
    }

    #[test]
    fn test_resolution_is_repeatable() {
        let r = reconciler(&[("A", "0101"), ("A", "0102")]);
        assert_eq!(r.resolve("A", "0100"), r.resolve("A", "0100"));
    }
}
