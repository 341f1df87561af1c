// main.rs - CLI entry point

use std::path::Path;
use std::time::Instant;

use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use popfilter::cli::{Config, HaploPlan};
use popfilter::filter::driver::run_filter_with_progress;
use popfilter::prelude::*;

fn main() {
    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run_main() -> Result<(), String> {
    let mut args: Args = argh::from_env();
    let command_line = std::env::args().collect::<Vec<String>>().join(" ");

    // Handle generate config first
    if args.generate_config {
        let sample_config = Config::generate_sample();
        println!("{}", sample_config);
        println!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    if args.list_filters {
        println!("Available filters:");
        for (name, desc) in FilterFactory::list_available() {
            println!("  - {}: {}", name, desc);
        }
        return Ok(());
    }

    // Load configuration file if specified
    if let Some(config_path) = args.config.clone() {
        args = args.with_config_file(&config_path)?;
    }

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let genotypes = args.genotypes.clone().ok_or("--genotypes is required")?;
    let output = if args.dry_run {
        None
    } else {
        Some(args.output.clone().ok_or("--output is required")?)
    };

    println!("🚀 popfilter v{}", env!("CARGO_PKG_VERSION"));
    println!("🧹 Filter: {}", args.filter);

    // Validate all arguments
    let validation = validate_args(&args)?;
    let options = &validation.filter_options;
    let untyped = options.untyped_allele.as_str();

    let total_start = Instant::now();

    let matrix = GenotypeMatrix::from_file(Path::new(&genotypes), untyped)
        .map_err(|e| format!("loading genotypes: {}", e))?;
    println!(
        "📊 Loaded {} samples × {} loci from {}",
        matrix.samples.len(),
        matrix.loci_names.len(),
        genotypes
    );

    if args.dry_run {
        println!("✅ Dry run completed successfully");
        return Ok(());
    }

    if let Some(threshold) = options.lump_threshold {
        println!("🪣 Lumping alleles with count <= {}", threshold);
    }

    let sink = XmlLogSink::create(&validation.log_file)
        .map_err(|e| format!("Failed to create log file '{}': {}", validation.log_file, e))?;
    let mut filter = FilterFactory::create(&args.filter, options, Box::new(sink)).map_err(|e| e.to_string())?;

    let pb = ProgressBar::new(matrix.loci_names.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} loci filtered {msg}")
            .map_err(|e| format!("Progress bar template error: {}", e))?
            .progress_chars("#>-"),
    );
    let filtered = run_filter_with_progress(&matrix, filter.as_mut(), untyped, |locus| {
        pb.set_message(locus.to_string());
        pb.inc(1);
    })
    .map_err(|e| e.to_string())?;
    pb.finish_and_clear();

    filter.cleanup().map_err(|e| e.to_string())?;
    println!("📝 Filter log written to: {}", validation.log_file);

    if let Some(output) = output {
        write_matrix(&output, &filtered, &args.format, &command_line)?;
    }

    if let Some(plan) = &validation.haplo {
        run_haplo(&filtered, plan, untyped)?;
    }

    println!("⏱️  Total time: {:.2}s", total_start.elapsed().as_secs_f64());
    Ok(())
}

fn run_haplo(matrix: &GenotypeMatrix, plan: &HaploPlan, untyped: &str) -> Result<(), String> {
    println!("🧬 Haplotype estimation with {}", plan.program.display());
    let mut estimator = ExternalEstimator::new(plan.program.clone()).with_max_loci(plan.max_loci);
    let mut report = HaplotypeReport::new(matrix, untyped);

    if !plan.groups.is_empty() {
        report
            .estimate_groups(&mut estimator, &plan.groups, false, false)
            .map_err(|e| e.to_string())?;
    }
    if plan.whole_matrix {
        report
            .estimate_whole_matrix(&mut estimator)
            .map_err(|e| e.to_string())?;
    }
    if plan.all_pairwise {
        report
            .estimate_all_pairwise(&mut estimator)
            .map_err(|e| e.to_string())?;
    }

    let mut sink = XmlLogSink::create(&plan.output)
        .map_err(|e| format!("Failed to create haplotype report '{}': {}", plan.output, e))?;
    report.serialize_to(&mut sink).map_err(|e| e.to_string())?;
    sink.finish().map_err(|e| e.to_string())?;

    println!("✅ Haplotype report written to: {}", plan.output);
    Ok(())
}
