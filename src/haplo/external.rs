// external.rs - Haplotype estimation through an external program

use super::{EstimationRequest, HaplotypeEstimator};
use crate::error::{FilterError, Result};
use log::debug;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

/// Largest group accepted unless configured otherwise
pub const DEFAULT_MAX_LOCI: usize = 7;

/// Runs an estimation binary once per locus group.
///
/// The program receives `--loci N --individuals M` (plus `--permutation`
/// and `--suppress-haplotypes` when requested) and reads one individual per
/// stdin line: `id a1 a2 b1 b2 ...`. Its stdout is returned verbatim.
#[derive(Debug, Clone)]
pub struct ExternalEstimator {
    program: PathBuf,
    extra_args: Vec<String>,
    max_loci: usize,
}

impl ExternalEstimator {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
            max_loci: DEFAULT_MAX_LOCI,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn with_max_loci(mut self, max_loci: usize) -> Self {
        self.max_loci = max_loci;
        self
    }

    /// Render the request as the program's stdin
    pub fn format_input(request: &EstimationRequest<'_>) -> String {
        let mut input = String::new();
        for (sample_id, genotypes) in request.rows {
            input.push_str(sample_id);
            for genotype in genotypes {
                input.push(' ');
                input.push_str(&genotype.first);
                input.push(' ');
                input.push_str(&genotype.second);
            }
            input.push('\n');
        }
        input
    }

    fn failure(&self, reason: String) -> FilterError {
        FilterError::Estimator {
            program: self.program.display().to_string(),
            reason,
        }
    }
}

impl HaplotypeEstimator for ExternalEstimator {
    fn name(&self) -> &str {
        self.program
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("external")
    }

    fn max_loci(&self) -> usize {
        self.max_loci
    }

    fn estimate(&mut self, request: &EstimationRequest<'_>) -> Result<String> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.extra_args)
            .arg("--loci")
            .arg(request.group.len().to_string())
            .arg("--individuals")
            .arg(request.rows.len().to_string());
        if request.permutation {
            command.arg("--permutation");
        }
        if request.suppress_haplotypes {
            command.arg("--suppress-haplotypes");
        }

        debug!("Running {:?} for group {}", command, request.group.key());
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.failure(format!("failed to start: {}", e)))?;

        // stdin is fed from its own thread while stdout drains here
        let input = Self::format_input(request);
        let writer = child.stdin.take().map(|mut stdin| {
            thread::spawn(move || -> io::Result<()> {
                stdin.write_all(input.as_bytes())?;
                stdin.flush()
            })
        });

        let output = child
            .wait_with_output()
            .map_err(|e| self.failure(format!("failed to wait: {}", e)))?;

        let written = match writer {
            Some(handle) => handle
                .join()
                .unwrap_or_else(|_| Err(io::Error::new(io::ErrorKind::Other, "stdin writer panicked"))),
            None => Ok(()),
        };

        if !output.status.success() {
            return Err(self.failure(format!(
                "exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        match written {
            Err(e) if e.kind() != io::ErrorKind::BrokenPipe => {
                Err(self.failure(format!("failed to write input: {}", e)))
            }
            _ => Ok(String::from_utf8_lossy(&output.stdout).into_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Genotype;
    use crate::haplo::LocusGroup;

    fn request_rows() -> Vec<(String, Vec<Genotype>)> {
        vec![
            ("s1".to_string(), vec![Genotype::new("0101", "0201"), Genotype::new("0702", "0801")]),
            ("s2".to_string(), vec![Genotype::new("0101", "0101"), Genotype::new("1501", "0801")]),
        ]
    }

    #[test]
    fn test_format_input() {
        let group = LocusGroup::parse("A:B").unwrap();
        let rows = request_rows();
        let request = EstimationRequest {
            group: &group,
            rows: &rows,
            permutation: false,
            suppress_haplotypes: false,
        };
        assert_eq!(
            ExternalEstimator::format_input(&request),
            "s1 0101 0201 0702 0801\ns2 0101 0101 1501 0801\n"
        );
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let group = LocusGroup::parse("A:B").unwrap();
        let rows = request_rows();
        let request = EstimationRequest {
            group: &group,
            rows: &rows,
            permutation: true,
            suppress_haplotypes: true,
        };
        let mut estimator = ExternalEstimator::new("/nonexistent/popfilter-estimator");
        assert_eq!(estimator.name(), "popfilter-estimator");
        assert!(matches!(
            estimator.estimate(&request),
            Err(FilterError::Estimator { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_program_and_captures_stdout() {
        let group = LocusGroup::parse("A:B").unwrap();
        let rows = request_rows();
        let request = EstimationRequest {
            group: &group,
            rows: &rows,
            permutation: false,
            suppress_haplotypes: false,
        };
        // `sh -c 'wc -l' sh --loci ...` ignores the trailing arguments
        let mut estimator = ExternalEstimator::new("sh").with_args(vec!["-c".to_string(), "wc -l".to_string(), "sh".to_string()]);
        let output = estimator.estimate(&request).unwrap();
        assert_eq!(output.trim(), "2");
    }

    #[cfg(unix)]
    #[test]
    fn test_large_input_streams_through() {
        let group = LocusGroup::parse("A:B").unwrap();
        let rows: Vec<(String, Vec<Genotype>)> = (0..20_000)
            .map(|i| {
                (
                    format!("s{}", i),
                    vec![Genotype::new("0101", "0201"), Genotype::new("0702", "0801")],
                )
            })
            .collect();
        let request = EstimationRequest {
            group: &group,
            rows: &rows,
            permutation: false,
            suppress_haplotypes: false,
        };
        // `cat` echoes while it reads, so output exceeds the pipe buffer mid-input
        let mut estimator =
            ExternalEstimator::new("sh").with_args(vec!["-c".to_string(), "cat".to_string(), "sh".to_string()]);
        let output = estimator.estimate(&request).unwrap();
        assert_eq!(output.lines().count(), 20_000);
        assert_eq!(output.lines().last(), Some("s19999 0101 0201 0702 0801"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_program_reports_exit_status() {
        let group = LocusGroup::parse("A:B").unwrap();
        let rows = request_rows();
        let request = EstimationRequest {
            group: &group,
            rows: &rows,
            permutation: false,
            suppress_haplotypes: false,
        };
        let mut estimator = ExternalEstimator::new("sh")
            .with_args(vec!["-c".to_string(), "echo broken >&2; exit 3".to_string(), "sh".to_string()]);
        match estimator.estimate(&request) {
            Err(FilterError::Estimator { reason, .. }) => assert!(reason.contains("broken")),
            other => panic!("expected estimator error, got {:?}", other),
        }
    }
}
