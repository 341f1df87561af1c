// lib.rs - popfilter library root

//! # popfilter - Allele-name reconciliation for population genetics
//!
//! This library reconciles the allele names observed in a population
//! genotype dataset against per-locus reference lists of officially
//! recognized names, resolves ambiguous names using the population's own
//! allele frequencies, and records every decision in a tag-delimited log.
//!
//! ## Features
//!
//! - **Reference reconciliation**: exact, expanded, zero-padded and truncated matches
//! - **Population-aware resolution**: `xx00` names resolved by observed counts or the database
//! - **Rare allele lumping**: alleles at or below a count threshold collapse to `lump`
//! - **Decision log**: every translation recorded as XML
//! - **Haplotype delegation**: filtered data handed to an external estimator
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use popfilter::prelude::*;
//! use std::path::Path;
//!
//! let options = FilterOptions {
//!     reference_directory: "reference".into(),
//!     ..FilterOptions::default()
//! };
//! let matrix = GenotypeMatrix::from_file(Path::new("population.tsv"), &options.untyped_allele)?;
//!
//! let sink = XmlLogSink::create("filter-log.xml")?;
//! let mut filter = FilterFactory::create("reference", &options, Box::new(sink))?;
//! let filtered = run_filter(&matrix, filter.as_mut(), &options.untyped_allele)?;
//! filter.cleanup()?;
//! # Ok::<(), popfilter::error::FilterError>(())
//! ```

// Re-export all main modules
pub mod cli;
pub mod data;
pub mod error;
pub mod filter;
pub mod haplo;
pub mod output;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cli::{validate_args, Args, ValidationResult};
    pub use crate::data::{Genotype, GenotypeMatrix, ReferenceTable, SampleGenotypes};
    pub use crate::error::FilterError;
    pub use crate::filter::{run_filter, AlleleFilter, FilterFactory, FilterOptions};
    pub use crate::filter::{MatchKind, Reconciler, ReferenceFilter, Resolution};
    pub use crate::haplo::{ExternalEstimator, HaplotypeEstimator, HaplotypeReport, LocusGroup};
    pub use crate::output::{write_matrix, LogSink, MemoryLogSink, XmlLogSink};
}

// Re-export main types at the root level for convenience
pub use cli::{Args, ValidationResult};
pub use data::{GenotypeMatrix, ReferenceTable};
pub use error::{FilterError, Result};
pub use filter::{AlleleFilter, FilterFactory, FilterOptions, ReferenceFilter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!(
        "popfilter v{} - Allele-name reconciliation for population genetics",
        VERSION
    )
}
