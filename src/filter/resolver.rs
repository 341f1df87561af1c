// resolver.rs - Frequency-driven disambiguation of unresolved `..00` alleles

use super::reconciler::truncate_name;
use super::tables::{Decision, LocusTables};
use super::ResolutionStage;
use crate::data::ReferenceTable;

/// Suffix marking a canonical typed below reference resolution
pub const UNRESOLVED_SUFFIX: &str = "00";

/// Highest variant number tried against the reference table (`P01`..`P08`)
pub const MAX_VARIANT: u32 = 8;

/// Minimum population count a variant must exceed to win
pub const POPULATION_FLOOR: usize = 1;

/// Reference entries are compared on this many leading characters in the database tier
pub const DATABASE_MATCH_WIDTH: usize = 4;

/// Re-targets `P00` canonicals using population counts, then reference order
#[derive(Debug, Clone, Default)]
pub struct PopulationResolver;

impl PopulationResolver {
    pub fn new() -> Self {
        Self
    }

    /// Variant of `ambiguous` with the highest count above the floor
    fn population_winner(&self, ambiguous: &str, prefix: &str, tables: &LocusTables) -> Option<(String, usize)> {
        let mut best: Option<(String, usize)> = None;
        let mut max_so_far = POPULATION_FLOOR;

        for (canonical, &count) in &tables.counts {
            if canonical == ambiguous
                || canonical.len() != ambiguous.len()
                || !canonical.starts_with(prefix)
                || canonical.ends_with(UNRESOLVED_SUFFIX)
            {
                continue;
            }
            if count > max_so_far {
                max_so_far = count;
                best = Some((canonical.clone(), count));
            }
        }
        best
    }

    /// First `P0n` with an exact or truncated hit in the reference set
    fn database_winner(&self, prefix: &str, reference: &[String]) -> Option<(String, String, bool)> {
        for variant in 1..=MAX_VARIANT {
            let candidate = format!("{}0{}", prefix, variant);
            for db_allele in reference {
                if *db_allele == candidate {
                    return Some((candidate, db_allele.clone(), true));
                }
                if truncate_name(db_allele, DATABASE_MATCH_WIDTH) == candidate {
                    return Some((candidate, db_allele.clone(), false));
                }
            }
        }
        None
    }
}

impl ResolutionStage for PopulationResolver {
    fn name(&self) -> &'static str {
        "population-resolver"
    }

    fn apply(&self, locus: &str, reference: &ReferenceTable, tables: &mut LocusTables) -> Vec<Decision> {
        let mut decisions = Vec::new();
        let reference = reference.alleles(locus).unwrap_or(&[]);

        let ambiguous: Vec<String> = tables
            .counts
            .keys()
            .filter(|c| c.ends_with(UNRESOLVED_SUFFIX))
            .cloned()
            .collect();

        for allele in ambiguous {
            let prefix = &allele[..allele.len() - UNRESOLVED_SUFFIX.len()];
            let header = format!("[{}:{} unresolved allele]", locus, allele);

            if let Some((winner, count)) = self.population_winner(&allele, prefix, tables) {
                tables.reassign(&allele, &winner);
                tables.resolved.insert(allele.clone(), winner.clone());
                decisions.push(Decision::new(
                    locus,
                    &allele,
                    format!(
                        "{} -> resolved to {}: resolved via highest population count ({})",
                        header, winner, count
                    ),
                ));
            } else if let Some((winner, db_allele, exact)) = self.database_winner(prefix, reference) {
                tables.reassign(&allele, &winner);
                tables.resolved.insert(allele.clone(), winner.clone());
                let how = if exact { "exact" } else { "truncated" };
                decisions.push(Decision::new(
                    locus,
                    &allele,
                    format!(
                        "{} -> resolved to {}: resolved via database, not found in population ({} match {})",
                        header, winner, how, db_allele
                    ),
                ));
            } else {
                decisions.push(Decision::new(
                    locus,
                    &allele,
                    format!("{} -> left unresolved: no variant in population or database", header),
                ));
            }
        }

        decisions
    }
}
