// reference.rs - Per-locus reference allele tables loaded from flat files

use crate::error::{FilterError, Result};
use log::{debug, info};
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Record pattern: locus token, literal `*`, allele token; the rest is ignored
pub const RECORD_PATTERN: &str = r"^([0-9a-zA-Z]+)\*([0-9a-zA-Z]+)";

/// Historical locus names folded onto their current form
const LOCUS_ALIASES: &[(&str, &str)] = &[("Cw", "C")];

/// Default locus file stems shipped with the allele database
pub const DEFAULT_LOCUS_FILES: &[&str] = &["a", "b", "c", "dqa", "dqb", "dra", "drb", "dpb", "dpa"];

/// Default file suffix appended to each locus stem
pub const DEFAULT_FILE_SUFFIX: &str = "_pt.txt";

/// Fold a locus alias onto its canonical name
pub fn canonical_locus(name: &str) -> &str {
    LOCUS_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(name)
}

/// Ordered, deduplicated allele list for one locus
#[derive(Debug, Clone, Default)]
struct LocusAlleles {
    ordered: Vec<String>,
    seen: HashSet<String>,
}

impl LocusAlleles {
    fn push(&mut self, allele: &str) {
        if self.seen.insert(allele.to_string()) {
            self.ordered.push(allele.to_string());
        }
    }
}

/// Reference allele names keyed by normalized locus
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    loci: BTreeMap<String, LocusAlleles>,
}

impl ReferenceTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(locus, allele)` pairs, applying alias folding
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut table = Self::new();
        for (locus, allele) in pairs {
            table.insert(locus, allele);
        }
        table
    }

    /// Load every `<stem><suffix>` file under `directory`.
    ///
    /// Any missing or unreadable file aborts the load; no partial table is returned.
    pub fn load<S: AsRef<str>>(directory: &Path, stems: &[S], suffix: &str) -> Result<Self> {
        let pattern = record_regex()?;
        let mut table = Self::new();

        for stem in stems {
            let path = directory.join(format!("{}{}", stem.as_ref(), suffix));
            let file = File::open(&path).map_err(|source| FilterError::ReferenceFile {
                path: path.clone(),
                source,
            })?;

            let before = table.allele_count();
            table.read_records(BufReader::new(file), &pattern).map_err(|source| {
                FilterError::ReferenceFile {
                    path: path.clone(),
                    source,
                }
            })?;
            debug!(
                "Read {} new reference alleles from {}",
                table.allele_count() - before,
                path.display()
            );
        }

        info!(
            "Reference table loaded: {} loci, {} alleles from {}",
            table.loci.len(),
            table.allele_count(),
            directory.display()
        );
        Ok(table)
    }

    /// Parse records from any line source into the table
    fn read_records<R: BufRead>(&mut self, reader: R, pattern: &Regex) -> std::io::Result<()> {
        for line in reader.lines() {
            let line = line?;
            if let Some(caps) = pattern.captures(&line) {
                self.insert(&caps[1], &caps[2]);
            }
        }
        Ok(())
    }

    /// Add one allele under its (alias-folded) locus
    pub fn insert(&mut self, locus: &str, allele: &str) {
        self.loci
            .entry(canonical_locus(locus).to_string())
            .or_default()
            .push(allele);
    }

    /// Alleles for a locus in file order
    pub fn alleles(&self, locus: &str) -> Option<&[String]> {
        self.loci.get(locus).map(|entry| entry.ordered.as_slice())
    }

    /// Check whether the exact allele name exists for a locus
    pub fn contains(&self, locus: &str, allele: &str) -> bool {
        self.loci
            .get(locus)
            .map(|entry| entry.seen.contains(allele))
            .unwrap_or(false)
    }

    pub fn has_locus(&self, locus: &str) -> bool {
        self.loci.contains_key(locus)
    }

    /// Locus identifiers in sorted order
    pub fn loci(&self) -> Vec<&str> {
        self.loci.keys().map(|s| s.as_str()).collect()
    }

    /// Total number of alleles across loci
    pub fn allele_count(&self) -> usize {
        self.loci.values().map(|entry| entry.ordered.len()).sum()
    }
}

fn record_regex() -> Result<Regex> {
    Regex::new(RECORD_PATTERN).map_err(|e| FilterError::InvalidParameter {
        parameter: "record_pattern".to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(text: &str) -> ReferenceTable {
        let mut table = ReferenceTable::new();
        table
            .read_records(Cursor::new(text.as_bytes()), &record_regex().unwrap())
            .unwrap();
        table
    }

    #[test]
    fn test_parses_locus_and_allele_tokens() {
        let table = parse("A*0101 some trailing text\nA*0102\n# comment\n\nB*0702 xyz\n");
        assert_eq!(table.alleles("A").unwrap(), ["0101", "0102"]);
        assert_eq!(table.alleles("B").unwrap(), ["0702"]);
        assert!(table.contains("A", "0101"));
        assert!(!table.contains("A", "0201"));
    }

    #[test]
    fn test_unmatched_lines_are_ignored() {
        let table = parse("   A*0101\nnot a record\n*0101\nA0101\n");
        assert_eq!(table.allele_count(), 0);
    }

    #[test]
    fn test_cw_alias_is_folded_to_c() {
        let table = parse("Cw*0102\nCw*0304\nC*0102\n");
        assert!(table.has_locus("C"));
        assert!(!table.has_locus("Cw"));
        assert_eq!(table.alleles("C").unwrap(), ["0102", "0304"]);
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let table = parse("DRB1*0301\nDRB1*0101\nDRB1*0301\n");
        assert_eq!(table.alleles("DRB1").unwrap(), ["0301", "0101"]);
    }

    #[test]
    fn test_canonical_locus() {
        assert_eq!(canonical_locus("Cw"), "C");
        assert_eq!(canonical_locus("DQB1"), "DQB1");
    }

    #[test]
    fn test_from_pairs() {
        let table = ReferenceTable::from_pairs([("A", "0101"), ("Cw", "0102")]);
        assert_eq!(table.loci(), vec!["A", "C"]);
    }
}
