// mod.rs - Data structures module

pub mod genotypes;
pub mod loaders;
pub mod reference;

// Re-export main types for convenience
pub use genotypes::{Genotype, GenotypeMatrix, SampleGenotypes};
pub use reference::{canonical_locus, ReferenceTable};
