// options.rs - Configuration for reference-based filtering

use crate::data::reference::{DEFAULT_FILE_SUFFIX, DEFAULT_LOCUS_FILES};
use crate::error::{FilterError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_DIGIT_WIDTH: usize = 4;
pub const DEFAULT_UNTYPED_ALLELE: &str = "****";

/// Options recognized by the reference filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// Directory holding one reference file per locus
    pub reference_directory: PathBuf,
    /// File stems read from the reference directory
    pub reference_files: Vec<String>,
    /// Suffix appended to each stem
    pub file_suffix: String,
    /// Truncation precision for allele names
    pub digit_width: usize,
    /// Marker for a known-untyped call
    pub untyped_allele: String,
    /// Log heuristic match detail
    pub verbose: bool,
    /// Lump alleles observed at most this many times
    pub lump_threshold: Option<usize>,
    /// Source file name recorded on the log root
    pub source_name: Option<String>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            reference_directory: PathBuf::from("."),
            reference_files: DEFAULT_LOCUS_FILES.iter().map(|s| s.to_string()).collect(),
            file_suffix: DEFAULT_FILE_SUFFIX.to_string(),
            digit_width: DEFAULT_DIGIT_WIDTH,
            untyped_allele: DEFAULT_UNTYPED_ALLELE.to_string(),
            verbose: true,
            lump_threshold: None,
            source_name: None,
        }
    }
}

impl FilterOptions {
    pub fn validate(&self) -> Result<()> {
        if self.digit_width == 0 {
            return Err(FilterError::InvalidParameter {
                parameter: "digit_width".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.untyped_allele.is_empty() {
            return Err(FilterError::InvalidParameter {
                parameter: "untyped_allele".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.reference_files.is_empty() {
            return Err(FilterError::InvalidParameter {
                parameter: "reference_files".to_string(),
                reason: "at least one locus file is required".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = FilterOptions::default();
        assert_eq!(options.digit_width, 4);
        assert_eq!(options.untyped_allele, "****");
        assert!(options.verbose);
        assert!(options.lump_threshold.is_none());
        assert_eq!(options.reference_files.len(), 9);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let options: FilterOptions = toml::from_str("digit_width = 6\nlump_threshold = 2\n").unwrap();
        assert_eq!(options.digit_width, 6);
        assert_eq!(options.lump_threshold, Some(2));
        assert_eq!(options.file_suffix, "_pt.txt");
    }

    #[test]
    fn test_zero_digit_width_rejected() {
        let options = FilterOptions {
            digit_width: 0,
            ..FilterOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(FilterError::InvalidParameter { .. })
        ));
    }
}
