// allele_lookup.rs - Reconcile individual allele names against the reference lists

use argh::FromArgs;
use popfilter::data::reference::{DEFAULT_FILE_SUFFIX, DEFAULT_LOCUS_FILES};
use popfilter::filter::options::{DEFAULT_DIGIT_WIDTH, DEFAULT_UNTYPED_ALLELE};
use popfilter::prelude::*;
use std::path::Path;

#[derive(FromArgs)]
/// allele_lookup - Show how allele names reconcile against the reference lists
struct LookupArgs {
    /// directory holding per-locus reference allele files
    #[argh(option)]
    reference_dir: String,

    /// comma-separated reference file stems (default: a,b,c,dqa,dqb,dra,drb,dpb,dpa)
    #[argh(option)]
    reference_files: Option<String>,

    /// suffix appended to each reference file stem (default: _pt.txt)
    #[argh(option, default = "String::from(DEFAULT_FILE_SUFFIX)")]
    file_suffix: String,

    /// allele name truncation precision in digits (default: 4)
    #[argh(option, default = "DEFAULT_DIGIT_WIDTH")]
    digits: usize,

    /// marker for an untyped allele call (default: ****)
    #[argh(option, default = "String::from(DEFAULT_UNTYPED_ALLELE)")]
    untyped_allele: String,

    /// locus the names belong to, e.g. A or DRB1
    #[argh(option)]
    locus: String,

    /// allele names to reconcile
    #[argh(positional)]
    alleles: Vec<String>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: LookupArgs = argh::from_env();

    if args.alleles.is_empty() {
        return Err("at least one allele name is required".to_string());
    }
    if args.digits == 0 {
        return Err("--digits must be at least 1".to_string());
    }

    let stems: Vec<String> = match &args.reference_files {
        Some(files) => files
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => DEFAULT_LOCUS_FILES.iter().map(|s| s.to_string()).collect(),
    };

    let reference = ReferenceTable::load(Path::new(&args.reference_dir), &stems, &args.file_suffix)
        .map_err(|e| e.to_string())?;
    eprintln!(
        "📚 Loaded {} reference alleles over {} loci",
        reference.allele_count(),
        reference.loci().len()
    );

    let reconciler = Reconciler::new(reference, args.digits, &args.untyped_allele);
    let resolutions: Vec<Resolution> = args
        .alleles
        .iter()
        .map(|allele| reconciler.resolve(&args.locus, allele))
        .collect();

    let json = serde_json::to_string_pretty(&resolutions)
        .map_err(|e| format!("Failed to serialize lookup results: {}", e))?;
    println!("{}", json);
    Ok(())
}
