// tsv.rs - TSV file loader for genotype matrices

use crate::data::genotypes::{clean_allele, loci_from_header, Genotype, GenotypeMatrix, SampleGenotypes};
use crate::error::{FilterError, Result};
use log::info;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

impl GenotypeMatrix {
    /// Load a tab-separated genotype file.
    ///
    /// Lines starting with `#` and blank lines are skipped.
    pub fn from_tsv(file_path: &Path, untyped: &str) -> Result<Self> {
        let invalid = |reason: String| FilterError::InvalidFileFormat {
            file_type: "genotype TSV".to_string(),
            path: file_path.display().to_string(),
            reason,
        };

        let file = File::open(file_path).map_err(|e| invalid(format!("failed to open: {}", e)))?;
        let reader = BufReader::new(file);
        let mut lines = reader
            .lines()
            .enumerate()
            .filter(|(_, line)| match line {
                Ok(text) => !text.trim().is_empty() && !text.starts_with('#'),
                Err(_) => true,
            });

        // Read header
        let (_, header_line) = lines.next().ok_or_else(|| invalid("empty file".to_string()))?;
        let header_line = header_line.map_err(|e| invalid(format!("failed to read header: {}", e)))?;
        let header_parts: Vec<&str> = header_line.split('\t').collect();
        if header_parts.len() < 3 {
            return Err(invalid("header must have a sample column and at least one locus pair".to_string()));
        }

        let loci_names = loci_from_header(&header_parts[1..], file_path, "genotype TSV")?;
        let mut matrix = GenotypeMatrix::new(loci_names);

        for (line_idx, line) in lines {
            let line_num = line_idx + 1;
            let line = line.map_err(|e| invalid(format!("failed to read line {}: {}", line_num, e)))?;
            let parts: Vec<&str> = line.split('\t').collect();

            if parts.len() != header_parts.len() {
                return Err(invalid(format!(
                    "line {} has {} columns, expected {}",
                    line_num,
                    parts.len(),
                    header_parts.len()
                )));
            }

            let genotypes = parts[1..]
                .chunks(2)
                .map(|pair| {
                    Genotype {
                        first: clean_allele(pair[0], untyped),
                        second: clean_allele(pair[1], untyped),
                    }
                })
                .collect();

            matrix.samples.push(SampleGenotypes {
                sample_id: parts[0].trim().to_string(),
                genotypes,
            });
        }

        info!(
            "TSV loaded: {} samples, {} loci from {}",
            matrix.samples.len(),
            matrix.loci_names.len(),
            file_path.display()
        );
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_tmp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_tsv() {
        let file = write_tmp("# comment\nid\tA_1\tA_2\tB_1\tB_2\ns1\t0101\t0201\t0702\t\ns2\t0100\t0101\t****\t0801\n");
        let matrix = GenotypeMatrix::from_tsv(file.path(), "****").unwrap();
        assert_eq!(matrix.loci_names, vec!["A", "B"]);
        assert_eq!(matrix.samples.len(), 2);
        assert_eq!(matrix.samples[0].genotypes[1], Genotype::new("0702", "****"));
        assert_eq!(matrix.samples[1].sample_id, "s2");
    }

    #[test]
    fn test_ragged_line_is_rejected() {
        let file = write_tmp("id\tA_1\tA_2\ns1\t0101\n");
        let err = GenotypeMatrix::from_tsv(file.path(), "****").unwrap_err();
        assert!(err.to_string().contains("line 2 has 2 columns"));
    }

    #[test]
    fn test_missing_file() {
        let result = GenotypeMatrix::from_tsv(Path::new("/nonexistent/pop.tsv"), "****");
        assert!(matches!(result, Err(FilterError::InvalidFileFormat { .. })));
    }
}
