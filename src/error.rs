// error.rs - Error types for filtering and estimation

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for popfilter operations
pub type Result<T> = std::result::Result<T, FilterError>;

/// Error type for popfilter operations
#[derive(Error, Debug)]
pub enum FilterError {
    /// A reference allele file could not be opened or read
    #[error("Failed to read reference file '{path}': {source}")]
    ReferenceFile {
        /// Path of the locus file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Locus has no entry in the reference table
    #[error("Locus '{locus}' not found in reference table")]
    UnknownLocus {
        /// The locus identifier
        locus: String,
    },

    /// Allele was never seen during the first pass of its locus
    #[error("Allele '{allele}' at locus '{locus}' was not seen during the first pass")]
    UnknownAllele {
        /// The locus identifier
        locus: String,
        /// The observed allele name
        allele: String,
    },

    /// Operation is not provided by this filtering strategy
    #[error("Unsupported operation '{operation}' for this filter")]
    Unsupported {
        /// Name of the lifecycle operation
        operation: &'static str,
    },

    /// Lifecycle operation called out of order
    #[error("Operation '{operation}' is not allowed in state '{state}'")]
    Protocol {
        /// Name of the lifecycle operation
        operation: &'static str,
        /// State the filter was in
        state: &'static str,
    },

    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// File format error
    #[error("Invalid {file_type} file '{path}': {reason}")]
    InvalidFileFormat {
        /// Type of file (e.g., "genotype TSV")
        file_type: String,
        /// Path to the file
        path: String,
        /// Explanation of the problem
        reason: String,
    },

    /// External haplotype estimator failed
    #[error("Haplotype estimator '{program}' failed: {reason}")]
    Estimator {
        /// Program that was invoked
        program: String,
        /// Explanation of the failure
        reason: String,
    },

    /// Writing to the decision log failed
    #[error("Decision log write failed: {0}")]
    Log(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_names_operation() {
        let error = FilterError::Unsupported { operation: "filter_allele" };
        let msg = format!("{error}");
        assert!(msg.contains("Unsupported operation"));
        assert!(msg.contains("filter_allele"));
    }

    #[test]
    fn test_protocol_message() {
        let error = FilterError::Protocol { operation: "filter_allele", state: "first-pass" };
        let msg = format!("{error}");
        assert!(msg.contains("'filter_allele'"));
        assert!(msg.contains("first-pass"));
    }

    #[test]
    fn test_reference_file_keeps_source() {
        let error = FilterError::ReferenceFile {
            path: PathBuf::from("/data/a_pt.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(format!("{error}").contains("/data/a_pt.txt"));
        assert!(std::error::Error::source(&error).is_some());
    }
}
