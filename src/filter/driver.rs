// driver.rs - Runs a filter over every locus of a genotype matrix

use super::AlleleFilter;
use crate::data::{Genotype, GenotypeMatrix, SampleGenotypes};
use crate::error::Result;
use log::info;

/// Filter every locus of `matrix`, returning the translated matrix.
///
/// Untyped calls bypass the filter in both passes and are copied as-is.
/// `on_locus` is called after each locus completes.
pub fn run_filter_with_progress<F>(
    matrix: &GenotypeMatrix,
    filter: &mut dyn AlleleFilter,
    untyped: &str,
    mut on_locus: F,
) -> Result<GenotypeMatrix>
where
    F: FnMut(&str),
{
    let mut filtered: Vec<Vec<Genotype>> = matrix
        .samples
        .iter()
        .map(|_| Vec::with_capacity(matrix.loci_names.len()))
        .collect();

    for (locus_idx, locus) in matrix.loci_names.iter().enumerate() {
        filter.start_first_pass(locus)?;
        for allele in matrix.alleles_at(locus_idx).filter(|a| *a != untyped) {
            filter.add_allele(allele)?;
        }
        filter.end_first_pass()?;

        filter.start_filtering()?;
        let mut translate = |allele: &str| -> Result<String> {
            if allele == untyped {
                Ok(allele.to_string())
            } else {
                filter.filter_allele(allele)
            }
        };
        for (sample_idx, sample) in matrix.samples.iter().enumerate() {
            let genotype = &sample.genotypes[locus_idx];
            filtered[sample_idx].push(Genotype {
                first: translate(&genotype.first)?,
                second: translate(&genotype.second)?,
            });
        }
        filter.end_filtering()?;
        on_locus(locus);
    }

    info!(
        "Filtered {} loci for {} samples with '{}' filter",
        matrix.loci_names.len(),
        matrix.samples.len(),
        filter.name()
    );

    Ok(GenotypeMatrix {
        samples: matrix
            .samples
            .iter()
            .zip(filtered)
            .map(|(sample, genotypes)| SampleGenotypes {
                sample_id: sample.sample_id.clone(),
                genotypes,
            })
            .collect(),
        loci_names: matrix.loci_names.clone(),
    })
}

/// Filter every locus of `matrix` without progress reporting
pub fn run_filter(matrix: &GenotypeMatrix, filter: &mut dyn AlleleFilter, untyped: &str) -> Result<GenotypeMatrix> {
    run_filter_with_progress(matrix, filter, untyped, |_| {})
}
