// csv.rs - CSV file loader for genotype matrices

use crate::data::genotypes::{clean_allele, loci_from_header, Genotype, GenotypeMatrix, SampleGenotypes};
use crate::error::{FilterError, Result};
use log::info;
use std::path::Path;

impl GenotypeMatrix {
    /// Load a comma-separated genotype file
    pub fn from_csv(file_path: &Path, untyped: &str) -> Result<Self> {
        let invalid = |reason: String| FilterError::InvalidFileFormat {
            file_type: "genotype CSV".to_string(),
            path: file_path.display().to_string(),
            reason,
        };

        let mut reader = ::csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .trim(::csv::Trim::All)
            .from_path(file_path)
            .map_err(|e| invalid(format!("failed to open: {}", e)))?;

        let headers = reader
            .headers()
            .map_err(|e| invalid(format!("failed to read header: {}", e)))?
            .clone();
        let header_parts: Vec<&str> = headers.iter().collect();
        if header_parts.len() < 3 {
            return Err(invalid("header must have a sample column and at least one locus pair".to_string()));
        }

        let loci_names = loci_from_header(&header_parts[1..], file_path, "genotype CSV")?;
        let mut matrix = GenotypeMatrix::new(loci_names);

        for (row_idx, record) in reader.records().enumerate() {
            let record = record.map_err(|e| invalid(format!("record {}: {}", row_idx + 1, e)))?;
            let fields: Vec<&str> = record.iter().collect();

            let genotypes = fields[1..]
                .chunks(2)
                .map(|pair| Genotype {
                    first: clean_allele(pair[0], untyped),
                    second: clean_allele(pair[1], untyped),
                })
                .collect();

            matrix.samples.push(SampleGenotypes {
                sample_id: fields[0].to_string(),
                genotypes,
            });
        }

        info!(
            "CSV loaded: {} samples, {} loci from {}",
            matrix.samples.len(),
            matrix.loci_names.len(),
            file_path.display()
        );
        Ok(matrix)
    }
}
