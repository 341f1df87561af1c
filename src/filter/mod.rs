// mod.rs - Allele filtering strategies and the shared lifecycle contract

use crate::data::ReferenceTable;
use crate::error::{FilterError, Result};

pub mod driver;
pub mod factory;
pub mod lumping;
pub mod options;
pub mod passthrough;
pub mod pipeline;
pub mod reconciler;
pub mod resolver;
pub mod tables;

pub use driver::run_filter;
pub use factory::FilterFactory;
pub use lumping::{RareAlleleLumper, LUMP_ALLELE};
pub use options::FilterOptions;
pub use passthrough::PassThroughFilter;
pub use pipeline::{FilterState, ReferenceFilter};
pub use reconciler::{truncate_name, MatchKind, Reconciler, Resolution};
pub use resolver::PopulationResolver;
pub use tables::{Decision, DecisionLog, LocusTables};

/// Two-pass filtering lifecycle shared by every strategy.
///
/// Per locus the caller drives: `start_first_pass`, any number of
/// `check_allele_name`/`add_allele`, `end_first_pass`, `start_filtering`,
/// any number of `filter_allele`, `end_filtering`. `cleanup` ends the run.
///
/// Operations a strategy does not provide fail with
/// [`FilterError::Unsupported`].
pub trait AlleleFilter {
    /// Strategy name used in status output
    fn name(&self) -> &'static str;

    fn start_first_pass(&mut self, _locus: &str) -> Result<()> {
        Err(FilterError::Unsupported { operation: "start_first_pass" })
    }

    /// Canonical form of a name, without counting it
    fn check_allele_name(&mut self, _allele: &str) -> Result<String> {
        Err(FilterError::Unsupported { operation: "check_allele_name" })
    }

    fn add_allele(&mut self, _allele: &str) -> Result<()> {
        Err(FilterError::Unsupported { operation: "add_allele" })
    }

    fn end_first_pass(&mut self) -> Result<()> {
        Err(FilterError::Unsupported { operation: "end_first_pass" })
    }

    fn start_filtering(&mut self) -> Result<()> {
        Err(FilterError::Unsupported { operation: "start_filtering" })
    }

    /// Translated name for an allele seen during the first pass
    fn filter_allele(&mut self, _allele: &str) -> Result<String> {
        Err(FilterError::Unsupported { operation: "filter_allele" })
    }

    fn end_filtering(&mut self) -> Result<()> {
        Err(FilterError::Unsupported { operation: "end_filtering" })
    }

    /// Free-form line in the decision trail
    fn write_to_log(&mut self, _text: &str) -> Result<()> {
        Err(FilterError::Unsupported { operation: "write_to_log" })
    }

    /// Finalize and release the decision log
    fn cleanup(&mut self) -> Result<()> {
        Err(FilterError::Unsupported { operation: "cleanup" })
    }
}

/// Post-first-pass stage rewriting a locus's translation table
pub trait ResolutionStage {
    fn name(&self) -> &'static str;

    /// Rewrite `tables` for `locus`, returning the decisions made
    fn apply(&self, locus: &str, reference: &ReferenceTable, tables: &mut LocusTables) -> Vec<Decision>;
}
