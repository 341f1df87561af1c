// genotypes.rs - Multi-locus genotype matrix

use super::reference::canonical_locus;
use crate::error::{FilterError, Result};
use std::path::Path;

/// Two allele calls at one locus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genotype {
    pub first: String,
    pub second: String,
}

impl Genotype {
    pub fn new(first: &str, second: &str) -> Self {
        Self {
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    /// True when either call equals the untyped marker
    pub fn is_untyped(&self, untyped: &str) -> bool {
        self.first == untyped || self.second == untyped
    }
}

/// One individual's genotypes, aligned with `GenotypeMatrix::loci_names`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleGenotypes {
    pub sample_id: String,
    pub genotypes: Vec<Genotype>,
}

/// Collection of samples typed at the same loci
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenotypeMatrix {
    pub samples: Vec<SampleGenotypes>,
    pub loci_names: Vec<String>,
}

impl GenotypeMatrix {
    pub fn new(loci_names: Vec<String>) -> Self {
        Self {
            samples: Vec::new(),
            loci_names,
        }
    }

    /// Load a TSV or CSV genotype file, chosen by extension
    pub fn from_file(file_path: &Path, untyped: &str) -> Result<Self> {
        let extension = file_path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("tsv");

        match extension {
            "csv" => Self::from_csv(file_path, untyped),
            _ => Self::from_tsv(file_path, untyped),
        }
    }

    pub fn locus_index(&self, locus: &str) -> Option<usize> {
        self.loci_names.iter().position(|name| name == locus)
    }

    /// All calls at one locus, in sample order (two per sample)
    pub fn alleles_at(&self, locus_idx: usize) -> impl Iterator<Item = &str> + '_ {
        self.samples.iter().flat_map(move |sample| {
            let genotype = &sample.genotypes[locus_idx];
            [genotype.first.as_str(), genotype.second.as_str()]
        })
    }

    /// Genotype rows for the samples typed at every locus of `group`.
    ///
    /// Loci not present in the matrix yield an error.
    pub fn filter_out(&self, group: &[String], untyped: &str) -> Result<Vec<(String, Vec<Genotype>)>> {
        let indices = group
            .iter()
            .map(|locus| {
                self.locus_index(locus).ok_or_else(|| FilterError::InvalidParameter {
                    parameter: "locus".to_string(),
                    reason: format!("'{}' is not a column of the genotype matrix", locus),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(self
            .samples
            .iter()
            .filter(|sample| indices.iter().all(|&i| !sample.genotypes[i].is_untyped(untyped)))
            .map(|sample| {
                let row = indices.iter().map(|&i| sample.genotypes[i].clone()).collect();
                (sample.sample_id.clone(), row)
            })
            .collect())
    }
}

/// Derive locus names from the allele columns of a header.
///
/// Columns come in pairs (`A_1`, `A_2`); the `_1`/`_2` suffix is optional
/// but both columns of a pair must name the same locus.
pub(crate) fn loci_from_header(columns: &[&str], path: &Path, file_type: &str) -> Result<Vec<String>> {
    let invalid = |reason: String| FilterError::InvalidFileFormat {
        file_type: file_type.to_string(),
        path: path.display().to_string(),
        reason,
    };

    if columns.is_empty() || columns.len() % 2 != 0 {
        return Err(invalid(format!(
            "expected two allele columns per locus, found {} allele columns",
            columns.len()
        )));
    }

    columns
        .chunks(2)
        .map(|pair| {
            let first = strip_allele_suffix(pair[0]);
            let second = strip_allele_suffix(pair[1]);
            if first != second {
                return Err(invalid(format!(
                    "columns '{}' and '{}' do not name the same locus",
                    pair[0], pair[1]
                )));
            }
            Ok(canonical_locus(first).to_string())
        })
        .collect()
}

fn strip_allele_suffix(column: &str) -> &str {
    let column = column.trim().trim_matches('"');
    let column = column.strip_prefix('*').unwrap_or(column);
    column
        .strip_suffix("_1")
        .or_else(|| column.strip_suffix("_2"))
        .unwrap_or(column)
}

/// Normalize a raw cell: blank cells become the untyped marker
pub(crate) fn clean_allele(cell: &str, untyped: &str) -> String {
    let cleaned = cell.trim().trim_matches('"');
    if cleaned.is_empty() {
        untyped.to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> GenotypeMatrix {
        let mut m = GenotypeMatrix::new(vec!["A".to_string(), "B".to_string()]);
        m.samples.push(SampleGenotypes {
            sample_id: "s1".to_string(),
            genotypes: vec![Genotype::new("0101", "0201"), Genotype::new("0702", "0801")],
        });
        m.samples.push(SampleGenotypes {
            sample_id: "s2".to_string(),
            genotypes: vec![Genotype::new("0101", "****"), Genotype::new("0702", "1501")],
        });
        m
    }

    #[test]
    fn test_header_pairs() {
        let path = Path::new("pop.tsv");
        let loci = loci_from_header(&["A_1", "A_2", "Cw_1", "Cw_2", "DRB1", "DRB1"], path, "TSV").unwrap();
        assert_eq!(loci, vec!["A", "C", "DRB1"]);

        assert!(loci_from_header(&["A_1", "A_2", "B_1"], path, "TSV").is_err());
        assert!(loci_from_header(&["A_1", "B_2"], path, "TSV").is_err());
    }

    #[test]
    fn test_alleles_at() {
        let m = matrix();
        let calls: Vec<&str> = m.alleles_at(0).collect();
        assert_eq!(calls, vec!["0101", "0201", "0101", "****"]);
    }

    #[test]
    fn test_filter_out_untyped() {
        let m = matrix();
        let rows = m.filter_out(&["A".to_string(), "B".to_string()], "****").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, "s1");

        let rows = m.filter_out(&["B".to_string()], "****").unwrap();
        assert_eq!(rows.len(), 2);

        assert!(m.filter_out(&["DQB1".to_string()], "****").is_err());
    }

    #[test]
    fn test_clean_allele() {
        assert_eq!(clean_allele(" 0101 ", "****"), "0101");
        assert_eq!(clean_allele("", "****"), "****");
        assert_eq!(clean_allele("\"0201\"", "****"), "0201");
    }
}
