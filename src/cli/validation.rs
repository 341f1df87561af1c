// validation.rs - Input validation utilities

use crate::cli::args::Args;
use crate::filter::{FilterFactory, FilterOptions};
use crate::haplo::external::DEFAULT_MAX_LOCI;
use crate::haplo::LocusGroup;
use std::path::{Path, PathBuf};

pub const DEFAULT_LOG_FILE: &str = "filter-log.xml";
pub const DEFAULT_HAPLO_OUTPUT: &str = "haplo-report.xml";

/// Haplotype estimation requested on the command line
#[derive(Debug, Clone)]
pub struct HaploPlan {
    pub program: PathBuf,
    pub groups: Vec<LocusGroup>,
    pub all_pairwise: bool,
    /// No groups requested: estimate every locus as one group
    pub whole_matrix: bool,
    pub max_loci: usize,
    pub output: String,
}

pub struct ValidationResult {
    pub filter_options: FilterOptions,
    pub log_file: String,
    pub haplo: Option<HaploPlan>,
}

/// Validate all command line arguments
pub fn validate_args(args: &Args) -> Result<ValidationResult, String> {
    // Validate filter type
    if !FilterFactory::is_available(&args.filter) {
        let names: Vec<&str> = FilterFactory::list_available().iter().map(|(n, _)| *n).collect();
        return Err(format!(
            "Invalid filter '{}'. Available: {}",
            args.filter,
            names.join(", ")
        ));
    }

    // Validate output format
    if args.format != "tsv" && args.format != "csv" {
        return Err(format!("Invalid format '{}'. Available: tsv, csv", args.format));
    }

    // Reference settings only matter for the reference filter
    let uses_reference = args.filter != "pass-through";
    let reference_directory = match &args.reference_dir {
        Some(dir) => {
            if uses_reference && !Path::new(dir).is_dir() {
                return Err(format!("Reference directory '{}' does not exist", dir));
            }
            PathBuf::from(dir)
        }
        None if uses_reference => {
            return Err("--reference-dir is required for the reference filter".to_string());
        }
        None => PathBuf::from("."),
    };

    let mut filter_options = FilterOptions {
        reference_directory,
        file_suffix: args.file_suffix.clone(),
        digit_width: args.digits,
        untyped_allele: args.untyped_allele.clone(),
        verbose: !args.quiet,
        lump_threshold: args.lump_threshold,
        source_name: args.genotypes.clone(),
        ..FilterOptions::default()
    };
    if let Some(files) = &args.reference_files {
        filter_options.reference_files = files
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();
    }
    filter_options.validate().map_err(|e| e.to_string())?;

    // Haplotype estimation
    let haplo = match &args.haplo_program {
        Some(program) => {
            let groups = match &args.haplo_loci {
                Some(keys) => LocusGroup::parse_list(keys).map_err(|e| e.to_string())?,
                None => Vec::new(),
            };
            let whole_matrix = groups.is_empty() && !args.all_pairwise;
            let max_loci = args.max_loci.unwrap_or(DEFAULT_MAX_LOCI);
            if max_loci == 0 {
                return Err("--max-loci must be at least 1".to_string());
            }
            Some(HaploPlan {
                program: PathBuf::from(program),
                groups,
                all_pairwise: args.all_pairwise,
                whole_matrix,
                max_loci,
                output: args
                    .haplo_output
                    .clone()
                    .unwrap_or_else(|| DEFAULT_HAPLO_OUTPUT.to_string()),
            })
        }
        None => {
            if args.haplo_loci.is_some() || args.all_pairwise {
                return Err("haplotype estimation requires --haplo-program".to_string());
            }
            None
        }
    };

    Ok(ValidationResult {
        filter_options,
        log_file: args
            .log_file
            .clone()
            .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
        haplo,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use argh::FromArgs;

    fn parse(args: &[&str]) -> Args {
        Args::from_args(&["popfilter"], args).unwrap()
    }

    #[test]
    fn test_pass_through_needs_no_reference() {
        let result = validate_args(&parse(&["--filter", "pass-through"])).unwrap();
        assert_eq!(result.log_file, DEFAULT_LOG_FILE);
        assert!(result.haplo.is_none());
    }

    #[test]
    fn test_reference_filter_requires_directory() {
        let err = validate_args(&parse(&[])).err().unwrap();
        assert!(err.contains("--reference-dir"));

        let err = validate_args(&parse(&["--reference-dir", "/nonexistent/popfilter"])).err().unwrap();
        assert!(err.contains("does not exist"));
    }

    #[test]
    fn test_options_are_carried_over() {
        let dir = tempfile::tempdir().unwrap();
        let dir_str = dir.path().to_str().unwrap();
        let result = validate_args(&parse(&[
            "--reference-dir",
            dir_str,
            "--reference-files",
            "a, drb",
            "--digits",
            "6",
            "--quiet",
            "--lump-threshold",
            "3",
        ]))
        .unwrap();
        let options = result.filter_options;
        assert_eq!(options.reference_files, vec!["a", "drb"]);
        assert_eq!(options.digit_width, 6);
        assert!(!options.verbose);
        assert_eq!(options.lump_threshold, Some(3));
    }

    #[test]
    fn test_invalid_values() {
        assert!(validate_args(&parse(&["--filter", "binning"])).is_err());
        assert!(validate_args(&parse(&["--filter", "pass-through", "--format", "nexus"])).is_err());
        assert!(validate_args(&parse(&["--filter", "pass-through", "--digits", "0"])).is_err());
    }

    #[test]
    fn test_haplo_plan() {
        let result = validate_args(&parse(&[
            "--filter",
            "pass-through",
            "--haplo-program",
            "emhaplofreq",
            "--haplo-loci",
            "A:B,DRB1:DQB1",
        ]))
        .unwrap();
        let plan = result.haplo.unwrap();
        assert_eq!(plan.groups.len(), 2);
        assert!(!plan.whole_matrix);
        assert_eq!(plan.max_loci, DEFAULT_MAX_LOCI);
        assert_eq!(plan.output, DEFAULT_HAPLO_OUTPUT);

        let plan = validate_args(&parse(&["--filter", "pass-through", "--haplo-program", "emhaplofreq"]))
            .unwrap()
            .haplo
            .unwrap();
        assert!(plan.groups.is_empty());
        assert!(plan.whole_matrix);

        assert!(validate_args(&parse(&["--filter", "pass-through", "--all-pairwise"])).is_err());
    }
}
