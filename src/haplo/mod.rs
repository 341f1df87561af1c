// mod.rs - Haplotype estimation delegated to an external estimator

use crate::data::{Genotype, GenotypeMatrix};
use crate::error::{FilterError, Result};
use crate::output::{escape_attr, escape_text, LogSink};
use log::{debug, warn};
use std::fmt::Write as _;

pub mod external;

pub use external::ExternalEstimator;

/// Loci estimated together, e.g. `DRB1:DQB1`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocusGroup {
    pub loci: Vec<String>,
}

impl LocusGroup {
    /// Parse one `:`-separated block; a leading `*` on each locus is dropped
    pub fn parse(block: &str) -> Result<Self> {
        let loci: Vec<String> = block
            .split(':')
            .map(|locus| locus.trim())
            .map(|locus| locus.strip_prefix('*').unwrap_or(locus).to_string())
            .collect();

        if loci.iter().any(|l| l.is_empty()) {
            return Err(FilterError::InvalidParameter {
                parameter: "haplo_loci".to_string(),
                reason: format!("empty locus in group '{}'", block),
            });
        }
        Ok(Self { loci })
    }

    /// Parse `,`-separated blocks, e.g. `A:B,DRB1:DQB1`
    pub fn parse_list(keys: &str) -> Result<Vec<Self>> {
        keys.split(',')
            .filter(|block| !block.trim().is_empty())
            .map(Self::parse)
            .collect()
    }

    /// Every unordered pair of `loci`, each once, in column order
    pub fn all_pairwise(loci: &[String]) -> Vec<Self> {
        let mut pairs = Vec::new();
        for (i, first) in loci.iter().enumerate() {
            for second in &loci[i + 1..] {
                pairs.push(Self {
                    loci: vec![first.clone(), second.clone()],
                });
            }
        }
        pairs
    }

    /// Every locus of the matrix as one group
    pub fn whole(loci: &[String]) -> Self {
        Self { loci: loci.to_vec() }
    }

    pub fn key(&self) -> String {
        self.loci.join(":")
    }

    pub fn len(&self) -> usize {
        self.loci.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loci.is_empty()
    }
}

/// Filtered genotype data submitted to an estimator
#[derive(Debug, Clone)]
pub struct EstimationRequest<'a> {
    pub group: &'a LocusGroup,
    /// `(sample_id, genotypes in group order)` for fully typed individuals
    pub rows: &'a [(String, Vec<Genotype>)],
    /// Run permutation testing for linkage disequilibrium
    pub permutation: bool,
    /// Suppress the haplotype frequency listing
    pub suppress_haplotypes: bool,
}

/// Narrow interface to the frequency estimation engine
pub trait HaplotypeEstimator {
    fn name(&self) -> &str;

    /// Largest group the estimator accepts
    fn max_loci(&self) -> usize;

    /// Run the estimation and return its raw output
    fn estimate(&mut self, request: &EstimationRequest<'_>) -> Result<String>;
}

/// Accumulates estimator output for several locus groups
pub struct HaplotypeReport<'m> {
    matrix: &'m GenotypeMatrix,
    untyped: String,
    buffer: String,
}

impl<'m> HaplotypeReport<'m> {
    pub fn new(matrix: &'m GenotypeMatrix, untyped: &str) -> Self {
        Self {
            matrix,
            untyped: untyped.to_string(),
            buffer: String::new(),
        }
    }

    /// Estimate each group, appending tagged results to the report
    pub fn estimate_groups(
        &mut self,
        estimator: &mut dyn HaplotypeEstimator,
        groups: &[LocusGroup],
        permutation: bool,
        suppress_haplotypes: bool,
    ) -> Result<()> {
        for group in groups {
            self.estimate_group(estimator, group, permutation, suppress_haplotypes)?;
        }
        Ok(())
    }

    /// Linkage disequilibrium for every pair of loci in the matrix
    pub fn estimate_all_pairwise(&mut self, estimator: &mut dyn HaplotypeEstimator) -> Result<()> {
        let pairs = LocusGroup::all_pairwise(&self.matrix.loci_names);
        debug!("Estimating LD for {} locus pairs", pairs.len());
        self.estimate_groups(estimator, &pairs, true, true)
    }

    /// Haplotypes over every locus of the matrix as a single group
    pub fn estimate_whole_matrix(&mut self, estimator: &mut dyn HaplotypeEstimator) -> Result<()> {
        let group = LocusGroup::whole(&self.matrix.loci_names);
        self.estimate_group(estimator, &group, false, false)
    }

    fn estimate_group(
        &mut self,
        estimator: &mut dyn HaplotypeEstimator,
        group: &LocusGroup,
        permutation: bool,
        suppress_haplotypes: bool,
    ) -> Result<()> {
        let key = group.key();
        let loci_attr = escape_attr(&key);

        if group.len() > estimator.max_loci() {
            warn!(
                "Skipping group {}: {} loci exceeds {} maximum of {}",
                key,
                group.len(),
                estimator.name(),
                estimator.max_loci()
            );
            let _ = writeln!(
                self.buffer,
                "Couldn't estimate haplotypes for {}, num loci: {} exceeded max loci: {}",
                escape_text(&key),
                group.len(),
                estimator.max_loci()
            );
            return Ok(());
        }

        let rows = self.matrix.filter_out(&group.loci, &self.untyped)?;
        let _ = writeln!(self.buffer);

        if rows.is_empty() {
            let _ = writeln!(self.buffer, "<group mode=\"no-data\" loci=\"{}\"/>", loci_attr);
            return Ok(());
        }

        let mode = if permutation { "LD" } else { "haplo" };
        let _ = writeln!(self.buffer, "<group mode=\"{}\" loci=\"{}\">", mode, loci_attr);
        let _ = writeln!(
            self.buffer,
            "<individcount role=\"before-filtering\">{}</individcount>",
            self.matrix.samples.len()
        );
        let _ = writeln!(
            self.buffer,
            "<individcount role=\"after-filtering\">{}</individcount>",
            rows.len()
        );

        let output = estimator.estimate(&EstimationRequest {
            group,
            rows: &rows,
            permutation,
            suppress_haplotypes,
        })?;
        self.buffer.push_str(&output);
        let _ = writeln!(self.buffer, "</group>");
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Wrap the accumulated output in an `emhaplofreq` section
    pub fn serialize_to(&self, sink: &mut dyn LogSink) -> Result<()> {
        sink.open_section("emhaplofreq", &[])?;
        sink.writeln("")?;
        sink.write_markup(&self.buffer)?;
        sink.close_section("emhaplofreq")?;
        sink.writeln("")?;
        Ok(())
    }
}
