// mod.rs - Genotype file loaders

pub mod csv;
pub mod tsv;
