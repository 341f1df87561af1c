// merge.rs - Merge configuration file with CLI arguments

use crate::cli::{Args, Config};

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: Config) -> Self {
        // Input/Output
        if self.genotypes.is_none() {
            self.genotypes = config.genotypes;
        }
        if self.output.is_none() {
            self.output = config.output;
        }
        if self.log_file.is_none() {
            self.log_file = config.log_file;
        }

        // Core settings (only override defaults, not explicit CLI values)
        if let Some(format) = config.format {
            if self.format == "tsv" {
                self.format = format;
            }
        }
        if let Some(filter) = config.filter {
            if self.filter == "reference" {
                self.filter = filter;
            }
        }
        if let Some(suffix) = config.file_suffix {
            if self.file_suffix == "_pt.txt" {
                self.file_suffix = suffix;
            }
        }
        if let Some(digits) = config.digits {
            if self.digits == 4 {
                self.digits = digits;
            }
        }
        if let Some(untyped) = config.untyped_allele {
            if self.untyped_allele == "****" {
                self.untyped_allele = untyped;
            }
        }

        // Filter settings
        if self.reference_dir.is_none() {
            self.reference_dir = config.reference_dir;
        }
        if self.reference_files.is_none() {
            self.reference_files = config.reference_files.map(|files| files.join(","));
        }
        if self.lump_threshold.is_none() {
            self.lump_threshold = config.lump_threshold;
        }

        // Haplotype estimation
        if self.haplo_program.is_none() {
            self.haplo_program = config.haplo_program;
        }
        if self.haplo_loci.is_none() {
            self.haplo_loci = config.haplo_loci;
        }
        if self.max_loci.is_none() {
            self.max_loci = config.max_loci;
        }
        if self.haplo_output.is_none() {
            self.haplo_output = config.haplo_output;
        }

        // Flags (CLI flags take precedence, config only sets if not explicitly set)
        if !self.quiet && config.verbose == Some(false) {
            self.quiet = true;
        }
        if !self.all_pairwise && config.all_pairwise.unwrap_or(false) {
            self.all_pairwise = true;
        }
        if !self.dry_run && config.dry_run.unwrap_or(false) {
            self.dry_run = true;
        }

        self
    }

    /// Load configuration and merge with CLI args
    pub fn with_config_file(self, config_path: &str) -> Result<Self, String> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argh::FromArgs;

    fn parse(args: &[&str]) -> Args {
        Args::from_args(&["popfilter"], args).unwrap()
    }

    #[test]
    fn test_config_fills_unset_values() {
        let config = Config {
            genotypes: Some("pop.tsv".to_string()),
            digits: Some(6),
            reference_files: Some(vec!["a".to_string(), "drb".to_string()]),
            verbose: Some(false),
            lump_threshold: Some(1),
            ..Config::new()
        };
        let args = parse(&[]).merge_with_config(config);
        assert_eq!(args.genotypes.as_deref(), Some("pop.tsv"));
        assert_eq!(args.digits, 6);
        assert_eq!(args.reference_files.as_deref(), Some("a,drb"));
        assert!(args.quiet);
        assert_eq!(args.lump_threshold, Some(1));
    }

    #[test]
    fn test_cli_values_win() {
        let config = Config {
            genotypes: Some("config.tsv".to_string()),
            filter: Some("reference".to_string()),
            lump_threshold: Some(5),
            ..Config::new()
        };
        let args = parse(&[
            "--genotypes",
            "cli.tsv",
            "--filter",
            "pass-through",
            "--lump-threshold",
            "2",
        ])
        .merge_with_config(config);
        assert_eq!(args.genotypes.as_deref(), Some("cli.tsv"));
        assert_eq!(args.filter, "pass-through");
        assert_eq!(args.lump_threshold, Some(2));
    }
}
