// passthrough.rs - Filter that leaves allele names untouched

use super::AlleleFilter;
use crate::error::Result;

/// No lookups, no logging; every allele passes through unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughFilter;

impl PassThroughFilter {
    pub fn new() -> Self {
        Self
    }
}

impl AlleleFilter for PassThroughFilter {
    fn name(&self) -> &'static str {
        "pass-through"
    }

    fn start_first_pass(&mut self, _locus: &str) -> Result<()> {
        Ok(())
    }

    fn check_allele_name(&mut self, allele: &str) -> Result<String> {
        Ok(allele.to_string())
    }

    fn add_allele(&mut self, _allele: &str) -> Result<()> {
        Ok(())
    }

    fn end_first_pass(&mut self) -> Result<()> {
        Ok(())
    }

    fn start_filtering(&mut self) -> Result<()> {
        Ok(())
    }

    fn filter_allele(&mut self, allele: &str) -> Result<String> {
        Ok(allele.to_string())
    }

    fn end_filtering(&mut self) -> Result<()> {
        Ok(())
    }

    fn write_to_log(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_returns_input_unchanged() {
        let mut filter = PassThroughFilter::new();
        filter.start_first_pass("A").unwrap();
        for allele in ["0100", "****", "garbage", ""] {
            filter.add_allele(allele).unwrap();
        }
        filter.end_first_pass().unwrap();
        filter.start_filtering().unwrap();
        for allele in ["0100", "****", "garbage", ""] {
            assert_eq!(filter.filter_allele(allele).unwrap(), allele);
        }
        // never seen during the first pass, still passes
        assert_eq!(filter.filter_allele("9999").unwrap(), "9999");
        filter.end_filtering().unwrap();
        filter.cleanup().unwrap();
    }
}
