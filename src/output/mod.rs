// mod.rs - Output writers module

pub mod log_sink;

pub use log_sink::{escape_attr, escape_text, LogEvent, LogSink, MemoryLogSink, XmlLogSink};

use crate::data::GenotypeMatrix;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Ensure parent directory exists before creating file
pub fn ensure_parent_dir(file_path: &str) -> Result<(), String> {
    if let Some(parent) = Path::new(file_path).parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)
                .map_err(|e| format!("Failed to create parent directory '{}': {}", parent.display(), e))?;
        }
    }
    Ok(())
}

/// Write a genotype matrix with a comment header and the given delimiter
pub fn write_delimited<W: Write>(
    writer: &mut W,
    matrix: &GenotypeMatrix,
    delimiter: char,
    command_line: &str,
) -> Result<(), String> {
    let write_err = |e: std::io::Error| format!("Write error: {}", e);

    // Write command header
    writeln!(writer, "# Command: {}", command_line).map_err(write_err)?;
    writeln!(writer, "# Generated: {}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")).map_err(write_err)?;
    writeln!(writer, "# popfilter v{}", env!("CARGO_PKG_VERSION")).map_err(write_err)?;

    // Write header
    write!(writer, "Sample").map_err(write_err)?;
    for locus in &matrix.loci_names {
        write!(writer, "{d}{l}_1{d}{l}_2", d = delimiter, l = locus).map_err(write_err)?;
    }
    writeln!(writer).map_err(write_err)?;

    // Write genotypes
    for sample in &matrix.samples {
        write!(writer, "{}", sample.sample_id).map_err(write_err)?;
        for genotype in &sample.genotypes {
            write!(writer, "{d}{}{d}{}", genotype.first, genotype.second, d = delimiter).map_err(write_err)?;
        }
        writeln!(writer).map_err(write_err)?;
    }

    writer.flush().map_err(|e| format!("Flush error: {}", e))
}

/// Write the filtered genotype matrix (tsv or csv)
pub fn write_matrix(
    file_path: &str,
    matrix: &GenotypeMatrix,
    format: &str,
    command_line: &str,
) -> Result<(), String> {
    let delimiter = match format {
        "tsv" => '\t',
        "csv" => ',',
        _ => return Err(format!("Unsupported output format: {}", format)),
    };

    ensure_parent_dir(file_path)?;
    let file = File::create(file_path)
        .map_err(|e| format!("Failed to create output file '{}': {}", file_path, e))?;
    let mut writer = BufWriter::new(file);
    write_delimited(&mut writer, matrix, delimiter, command_line)?;

    println!("✅ Filtered genotypes written to: {}", file_path);
    Ok(())
}
