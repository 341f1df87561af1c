// pipeline.rs - Reference-based filter driving reconciliation and resolution stages

use super::lumping::RareAlleleLumper;
use super::options::FilterOptions;
use super::reconciler::Reconciler;
use super::resolver::PopulationResolver;
use super::tables::{Decision, DecisionLog, LocusTables};
use super::{AlleleFilter, ResolutionStage};
use crate::data::ReferenceTable;
use crate::error::{FilterError, Result};
use crate::output::LogSink;
use log::{debug, warn};

/// Lifecycle position of a [`ReferenceFilter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterState {
    /// Between loci
    Idle,
    /// Collecting observations for a locus
    FirstPass,
    /// Tables frozen, waiting for the filtering pass
    Resolved,
    /// Translating observations
    Filtering,
    /// Log released; no further operations
    Closed,
}

impl FilterState {
    pub fn label(self) -> &'static str {
        match self {
            FilterState::Idle => "idle",
            FilterState::FirstPass => "first-pass",
            FilterState::Resolved => "resolved",
            FilterState::Filtering => "filtering",
            FilterState::Closed => "closed",
        }
    }
}

/// Tables for the locus being processed
#[derive(Debug)]
struct LocusRun {
    locus: String,
    tables: LocusTables,
}

/// Filters allele calls against a reference allele database.
///
/// The reconciler maps each observed name to a canonical form during the
/// first pass; the configured stages (population resolver, then optional
/// lumper) rewrite the translation table once the pass ends.
pub struct ReferenceFilter {
    reconciler: Reconciler,
    stages: Vec<Box<dyn ResolutionStage>>,
    sink: Box<dyn LogSink>,
    log: DecisionLog,
    verbose: bool,
    state: FilterState,
    run: Option<LocusRun>,
}

impl ReferenceFilter {
    /// Build a filter over an already loaded reference table
    pub fn new(reference: ReferenceTable, options: &FilterOptions, mut sink: Box<dyn LogSink>) -> Result<Self> {
        options.validate()?;

        let filename = options.source_name.clone().unwrap_or_default();
        sink.open_section("filterlog", &[("filename", filename.as_str())])?;
        sink.writeln("")?;

        let mut stages: Vec<Box<dyn ResolutionStage>> =
            vec![Box::new(PopulationResolver::new())];
        if let Some(threshold) = options.lump_threshold {
            stages.push(Box::new(RareAlleleLumper::new(threshold)));
        }

        Ok(Self {
            reconciler: Reconciler::new(reference, options.digit_width, &options.untyped_allele),
            stages,
            sink,
            log: DecisionLog::new(),
            verbose: options.verbose,
            state: FilterState::Idle,
            run: None,
        })
    }

    /// Load the reference directory named in `options` and build the filter
    pub fn from_options(options: &FilterOptions, sink: Box<dyn LogSink>) -> Result<Self> {
        options.validate()?;
        let reference = ReferenceTable::load(
            &options.reference_directory,
            &options.reference_files,
            &options.file_suffix,
        )?;
        Self::new(reference, options, sink)
    }

    /// Append another resolution stage after the configured ones
    pub fn with_stage(mut self, stage: Box<dyn ResolutionStage>) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn state(&self) -> FilterState {
        self.state
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn decisions(&self) -> &DecisionLog {
        &self.log
    }

    /// Tables of the locus in progress, if any
    pub fn tables(&self) -> Option<&LocusTables> {
        self.run.as_ref().map(|run| &run.tables)
    }

    fn require(&self, operation: &'static str, allowed: &[FilterState]) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(FilterError::Protocol {
                operation,
                state: self.state.label(),
            })
        }
    }

    fn run_mut(&mut self, operation: &'static str) -> Result<&mut LocusRun> {
        let state = self.state.label();
        self.run
            .as_mut()
            .ok_or(FilterError::Protocol { operation, state })
    }

    fn record(&mut self, decision: Decision) -> Result<()> {
        self.sink.writeln(&decision.note)?;
        self.log.push(decision);
        Ok(())
    }
}

impl AlleleFilter for ReferenceFilter {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn start_first_pass(&mut self, locus: &str) -> Result<()> {
        self.require("start_first_pass", &[FilterState::Idle])?;
        if !self.reconciler.reference().has_locus(locus) {
            return Err(FilterError::UnknownLocus {
                locus: locus.to_string(),
            });
        }

        self.sink.open_section("firstpass", &[("locus", locus)])?;
        self.sink.writeln("")?;
        self.run = Some(LocusRun {
            locus: locus.to_string(),
            tables: LocusTables::new(),
        });
        self.state = FilterState::FirstPass;
        Ok(())
    }

    fn check_allele_name(&mut self, allele: &str) -> Result<String> {
        self.require("check_allele_name", &[FilterState::FirstPass])?;
        let locus = self.run_mut("check_allele_name")?.locus.clone();

        let resolution = self.reconciler.resolve(&locus, allele);
        let note = resolution.describe(&locus, self.reconciler.digit_width(), self.verbose);
        self.record(Decision::new(&locus, allele, note))?;
        Ok(resolution.canonical)
    }

    fn add_allele(&mut self, allele: &str) -> Result<()> {
        self.require("add_allele", &[FilterState::FirstPass])?;
        let memoized = self
            .run_mut("add_allele")?
            .tables
            .translation(allele)
            .map(|s| s.to_string());

        let canonical = match memoized {
            Some(canonical) => canonical,
            None => self.check_allele_name(allele)?,
        };
        self.run_mut("add_allele")?.tables.record(allele, &canonical);
        Ok(())
    }

    fn end_first_pass(&mut self) -> Result<()> {
        self.require("end_first_pass", &[FilterState::FirstPass])?;

        let mut decisions = Vec::new();
        if let Some(run) = self.run.as_mut() {
            debug!("{} translation table: {:?}", run.locus, run.tables.translations);
            debug!("{} count table: {:?}", run.locus, run.tables.counts);
            for stage in &self.stages {
                decisions.extend(stage.apply(&run.locus, self.reconciler.reference(), &mut run.tables));
            }
            debug!("{} after resolution: {:?}", run.locus, run.tables.translations);
        }

        for decision in decisions {
            self.record(decision)?;
        }
        self.sink.close_section("firstpass")?;
        self.sink.writeln("")?;
        self.state = FilterState::Resolved;
        Ok(())
    }

    fn start_filtering(&mut self) -> Result<()> {
        self.require("start_filtering", &[FilterState::Resolved])?;
        let locus = self.run_mut("start_filtering")?.locus.clone();
        self.sink.open_section("translateTable", &[("locus", locus.as_str())])?;
        self.sink.writeln("")?;
        self.state = FilterState::Filtering;
        Ok(())
    }

    fn filter_allele(&mut self, allele: &str) -> Result<String> {
        self.require("filter_allele", &[FilterState::Filtering])?;
        let run = self.run_mut("filter_allele")?;
        let translated = run
            .tables
            .translation(allele)
            .map(|s| s.to_string())
            .ok_or_else(|| FilterError::UnknownAllele {
                locus: run.locus.clone(),
                allele: allele.to_string(),
            })?;

        if translated != allele {
            self.sink
                .empty_section("translate", &[("input", allele), ("output", translated.as_str())])?;
            self.sink.writeln("")?;
        }
        Ok(translated)
    }

    fn end_filtering(&mut self) -> Result<()> {
        self.require("end_filtering", &[FilterState::Filtering])?;
        self.sink.close_section("translateTable")?;
        self.sink.writeln("")?;
        self.run = None;
        self.state = FilterState::Idle;
        Ok(())
    }

    fn write_to_log(&mut self, text: &str) -> Result<()> {
        self.require(
            "write_to_log",
            &[
                FilterState::Idle,
                FilterState::FirstPass,
                FilterState::Resolved,
                FilterState::Filtering,
            ],
        )?;
        self.sink.writeln(text)?;
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.state == FilterState::Closed {
            return Ok(());
        }
        if self.state == FilterState::Idle {
            self.sink.close_section("filterlog")?;
        }
        self.run = None;
        self.state = FilterState::Closed;
        self.sink.finish()?;
        Ok(())
    }
}

impl Drop for ReferenceFilter {
    fn drop(&mut self) {
        if self.state != FilterState::Closed {
            if let Err(e) = self.cleanup() {
                warn!("Failed to finalize filter log: {}", e);
            }
        }
    }
}
