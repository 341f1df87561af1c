// config.rs - Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    // Input/Output
    pub genotypes: Option<String>,
    pub output: Option<String>,
    pub format: Option<String>,
    pub log_file: Option<String>,

    // Filter settings
    pub filter: Option<String>,
    pub reference_dir: Option<String>,
    pub reference_files: Option<Vec<String>>,
    pub file_suffix: Option<String>,
    pub digits: Option<usize>,
    pub untyped_allele: Option<String>,
    pub verbose: Option<bool>,
    pub lump_threshold: Option<usize>,

    // Haplotype estimation
    pub haplo_program: Option<String>,
    pub haplo_loci: Option<String>,
    pub all_pairwise: Option<bool>,
    pub max_loci: Option<usize>,
    pub haplo_output: Option<String>,

    // Flags
    pub dry_run: Option<bool>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        println!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(path, content)
            .map_err(|e| format!("Failed to write config file '{}': {}", path.display(), e))?;

        println!("📄 Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# popfilter.toml - Configuration file for popfilter
# Command line arguments will override these settings

# =============================================================================
# INPUT/OUTPUT
# =============================================================================

# Genotype matrix (.tsv or .csv), two columns per locus (A_1, A_2, ...)
genotypes = "/path/to/population.tsv"

# Filtered genotype matrix
output = "population.filtered.tsv"

# Output format: tsv, csv
format = "tsv"

# XML log of every allele-name decision
log_file = "filter-log.xml"

# =============================================================================
# FILTER SETTINGS
# =============================================================================

# Filter: reference, pass-through
filter = "reference"

# Directory with one reference allele file per locus
reference_dir = "/path/to/reference"

# Reference file stems, read as <stem><file_suffix>
reference_files = ["a", "b", "c", "dqa", "dqb", "dra", "drb", "dpb", "dpa"]
file_suffix = "_pt.txt"

# Allele name truncation precision
digits = 4

# Marker for an untyped allele call
untyped_allele = "****"

# Log heuristic match detail
verbose = true

# Lump alleles observed at most this many times (omit to disable)
# lump_threshold = 1

# =============================================================================
# HAPLOTYPE ESTIMATION
# =============================================================================

# External estimation program (omit to skip estimation)
# haplo_program = "/usr/local/bin/emhaplofreq"

# Locus groups: blocks separated by ',', loci by ':'
# Without groups or all_pairwise, every locus is estimated as one group
# haplo_loci = "A:B,DRB1:DQB1"

# Estimate LD for every pair of loci
# all_pairwise = false

# Maximum loci per group accepted by the estimator
# max_loci = 7

# Report file
# haplo_output = "haplo-report.xml"

# =============================================================================
# FLAGS
# =============================================================================

# Validate inputs without filtering (dry run)
dry_run = false
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_config_parses() {
        let config: Config = toml::from_str(&Config::generate_sample()).unwrap();
        assert_eq!(config.filter.as_deref(), Some("reference"));
        assert_eq!(config.digits, Some(4));
        assert_eq!(config.reference_files.as_ref().map(|f| f.len()), Some(9));
        assert!(config.lump_threshold.is_none());
    }

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("popfilter.toml");
        let config = Config {
            genotypes: Some("pop.tsv".to_string()),
            lump_threshold: Some(2),
            ..Config::new()
        };
        config.to_file(&path).unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), config);
    }
}
