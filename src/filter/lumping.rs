// lumping.rs - Collapse rare canonical alleles into a single bucket

use super::tables::{Decision, LocusTables};
use super::ResolutionStage;
use crate::data::ReferenceTable;

/// Sentinel target for rare alleles
pub const LUMP_ALLELE: &str = "lump";

/// Reassigns alleles observed at most `threshold` times to [`LUMP_ALLELE`]
#[derive(Debug, Clone)]
pub struct RareAlleleLumper {
    threshold: usize,
}

impl RareAlleleLumper {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

impl ResolutionStage for RareAlleleLumper {
    fn name(&self) -> &'static str {
        "rare-allele-lumper"
    }

    fn apply(&self, locus: &str, _reference: &ReferenceTable, tables: &mut LocusTables) -> Vec<Decision> {
        let counts: Vec<usize> = tables
            .translations
            .values()
            .map(|target| tables.count_for_target(target))
            .collect();
        let mut decisions = Vec::new();

        for ((observed, target), count) in tables.translations.iter_mut().zip(counts) {
            if count <= self.threshold {
                decisions.push(Decision::new(
                    locus,
                    observed,
                    format!(
                        "[{}:{} count {} <= lump threshold {}] -> {} lumped",
                        locus, observed, count, self.threshold, target
                    ),
                ));
                *target = LUMP_ALLELE.to_string();
            }
        }

        decisions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables(counts: &[(&str, usize)]) -> LocusTables {
        let mut tables = LocusTables::new();
        for (allele, times) in counts {
            for _ in 0..*times {
                tables.record(allele, allele);
            }
        }
        tables
    }

    #[test]
    fn test_threshold_boundary() {
        let mut t = tables(&[("0101", 2), ("0102", 3)]);
        let decisions = RareAlleleLumper::new(2).apply("A", &ReferenceTable::new(), &mut t);
        assert_eq!(t.translation("0101"), Some(LUMP_ALLELE));
        assert_eq!(t.translation("0102"), Some("0102"));
        assert_eq!(decisions.len(), 1);
        assert_eq!(decisions[0].allele, "0101");
    }

    #[test]
    fn test_zero_threshold_keeps_everything() {
        let mut t = tables(&[("0101", 1)]);
        let decisions = RareAlleleLumper::new(0).apply("A", &ReferenceTable::new(), &mut t);
        assert!(decisions.is_empty());
        assert_eq!(t.translation("0101"), Some("0101"));
    }

    #[test]
    fn test_winner_keeps_its_own_count() {
        let mut t = tables(&[("0100", 3), ("0102", 5)]);
        t.reassign("0100", "0102");
        t.resolved.insert("0100".to_string(), "0102".to_string());

        RareAlleleLumper::new(6).apply("A", &ReferenceTable::new(), &mut t);
        // 0102 was observed 5 times; absorbed 0100 calls do not count
        assert_eq!(t.translation("0102"), Some(LUMP_ALLELE));
        assert_eq!(t.translation("0100"), Some(LUMP_ALLELE));
        assert_eq!(t.count("0102"), 5);
    }

    #[test]
    fn test_unobserved_database_winner() {
        let mut t = tables(&[("0200", 2), ("0702", 4)]);
        t.reassign("0200", "0201");
        t.resolved.insert("0200".to_string(), "0201".to_string());

        let decisions = RareAlleleLumper::new(2).apply("A", &ReferenceTable::new(), &mut t);
        assert_eq!(t.translation("0200"), Some(LUMP_ALLELE));
        assert_eq!(t.translation("0702"), Some("0702"));
        assert!(decisions[0].note.contains("count 2 <= lump threshold 2"));
    }
}
