// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs)]
/// popfilter - Allele-name reconciliation and haplotype estimation front end
pub struct Args {
    /// path to genotype matrix (.tsv or .csv, two columns per locus)
    #[argh(option)]
    pub genotypes: Option<String>,

    /// output file for the filtered genotype matrix
    #[argh(option)]
    pub output: Option<String>,

    /// output format: tsv, csv (default: tsv)
    #[argh(option, default = "String::from(\"tsv\")")]
    pub format: String,

    /// filter: reference, pass-through (default: reference)
    #[argh(option, default = "String::from(\"reference\")")]
    pub filter: String,

    /// directory holding per-locus reference allele files
    #[argh(option)]
    pub reference_dir: Option<String>,

    /// comma-separated reference file stems (default: a,b,c,dqa,dqb,dra,drb,dpb,dpa)
    #[argh(option)]
    pub reference_files: Option<String>,

    /// suffix appended to each reference file stem (default: _pt.txt)
    #[argh(option, default = "String::from(\"_pt.txt\")")]
    pub file_suffix: String,

    /// allele name truncation precision in digits (default: 4)
    #[argh(option, default = "4")]
    pub digits: usize,

    /// marker for an untyped allele call (default: ****)
    #[argh(option, default = "String::from(\"****\")")]
    pub untyped_allele: String,

    /// omit heuristic match detail from the filter log
    #[argh(switch)]
    pub quiet: bool,

    /// lump alleles observed at most this many times into 'lump'
    #[argh(option)]
    pub lump_threshold: Option<usize>,

    /// XML filter decision log (default: filter-log.xml)
    #[argh(option)]
    pub log_file: Option<String>,

    /// external haplotype estimation program
    #[argh(option)]
    pub haplo_program: Option<String>,

    /// locus groups for haplotype estimation, e.g. A:B,DRB1:DQB1 (default: all loci)
    #[argh(option)]
    pub haplo_loci: Option<String>,

    /// estimate linkage disequilibrium for every pair of loci
    #[argh(switch)]
    pub all_pairwise: bool,

    /// maximum loci per haplotype group accepted by the estimator (default: 7)
    #[argh(option)]
    pub max_loci: Option<usize>,

    /// haplotype estimation report file (default: haplo-report.xml)
    #[argh(option)]
    pub haplo_output: Option<String>,

    /// validate inputs without filtering (dry run)
    #[argh(switch)]
    pub dry_run: bool,

    /// list available filters and exit
    #[argh(switch)]
    pub list_filters: bool,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,
}
