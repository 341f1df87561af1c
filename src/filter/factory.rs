// factory.rs - Builds filtering strategies by name

use super::options::FilterOptions;
use super::{AlleleFilter, PassThroughFilter, ReferenceFilter};
use crate::error::{FilterError, Result};
use crate::output::LogSink;

pub struct FilterFactory;

impl FilterFactory {
    /// Create a filter by name.
    ///
    /// Reference filters load the reference directory from `options`; the
    /// pass-through filter ignores both `options` and `sink`.
    pub fn create(kind: &str, options: &FilterOptions, sink: Box<dyn LogSink>) -> Result<Box<dyn AlleleFilter>> {
        match kind {
            "reference" | "anthony-nolan" => Ok(Box::new(ReferenceFilter::from_options(options, sink)?)),
            "pass-through" => Ok(Box::new(PassThroughFilter::new())),
            _ => Err(FilterError::InvalidParameter {
                parameter: "filter".to_string(),
                reason: format!(
                    "unknown filter '{}'. Available: {}",
                    kind,
                    Self::list_available()
                        .iter()
                        .map(|(name, _)| *name)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            }),
        }
    }

    /// List all available filters
    pub fn list_available() -> Vec<(&'static str, &'static str)> {
        vec![
            ("reference", "Reconcile allele names against per-locus reference files, resolve by population counts"),
            ("pass-through", "Leave allele names unchanged"),
        ]
    }

    pub fn is_available(kind: &str) -> bool {
        kind == "anthony-nolan" || Self::list_available().iter().any(|(name, _)| *name == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::MemoryLogSink;

    #[test]
    fn test_pass_through_does_not_log() {
        let sink = MemoryLogSink::new();
        let mut filter =
            FilterFactory::create("pass-through", &FilterOptions::default(), Box::new(sink.clone())).unwrap();
        assert_eq!(filter.name(), "pass-through");
        filter.start_first_pass("A").unwrap();
        filter.add_allele("0100").unwrap();
        filter.end_first_pass().unwrap();
        filter.start_filtering().unwrap();
        assert_eq!(filter.filter_allele("0100").unwrap(), "0100");
        filter.write_to_log("ignored").unwrap();
        filter.cleanup().unwrap();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_reference_filter_requires_files() {
        let options = FilterOptions {
            reference_directory: "/nonexistent/popfilter/reference".into(),
            ..FilterOptions::default()
        };
        let result = FilterFactory::create("reference", &options, Box::new(MemoryLogSink::new()));
        assert!(matches!(result, Err(FilterError::ReferenceFile { .. })));
    }

    #[test]
    fn test_unknown_filter() {
        let result = FilterFactory::create("binning", &FilterOptions::default(), Box::new(MemoryLogSink::new()));
        match result {
            Err(FilterError::InvalidParameter { reason, .. }) => assert!(reason.contains("pass-through")),
            _ => panic!("expected invalid parameter"),
        }
    }

    #[test]
    fn test_list_available() {
        assert!(FilterFactory::is_available("reference"));
        assert!(FilterFactory::is_available("anthony-nolan"));
        assert!(!FilterFactory::is_available("binning"));
        assert_eq!(FilterFactory::list_available().len(), 2);
    }
}
