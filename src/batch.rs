//! Batch processing of tracker packages
//!
//! Reads (activity code, parameter list) packages from JSON or CSV sources,
//! runs each one through the dispatcher and collects the outcomes into a
//! [`BatchReport`]. Records share no state, so large batches can be processed
//! in parallel without changing the output order.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use uuid::Uuid;

use crate::activity::Summary;
use crate::dispatch::create_record;
use crate::error::{BatchError, RecordError};

/// One tracker reading: an activity code and its positional parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub code: String,
    pub params: Vec<f64>,
}

impl Package {
    pub fn new(code: impl Into<String>, params: Vec<f64>) -> Self {
        Self {
            code: code.into(),
            params,
        }
    }

    /// Reference readings for one swim, one run and one walk
    pub fn sample_dataset() -> Vec<Package> {
        vec![
            Package::new("SWM", vec![720.0, 1.0, 80.0, 25.0, 40.0]),
            Package::new("RUN", vec![15000.0, 1.0, 75.0]),
            Package::new("WLK", vec![9000.0, 1.0, 75.0, 180.0]),
        ]
    }

    /// Build the record and compute its summary
    pub fn summarize(&self) -> Result<Summary, RecordError> {
        create_record(&self.code, &self.params).map(|record| record.summarize())
    }
}

/// Supported batch input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Json,
    Csv,
}

impl InputFormat {
    pub fn from_str(s: &str) -> Result<Self, BatchError> {
        match s.to_lowercase().as_str() {
            "json" => Ok(InputFormat::Json),
            "csv" | "txt" => Ok(InputFormat::Csv),
            _ => Err(BatchError::UnsupportedFormat {
                format: s.to_string(),
            }),
        }
    }

    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, BatchError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| BatchError::UnsupportedFormat {
                format: path.display().to_string(),
            })?;
        Self::from_str(ext)
    }
}

/// Read a JSON array of `{"code": ..., "params": [...]}` objects
pub fn read_json<R: Read>(reader: R) -> Result<Vec<Package>, BatchError> {
    serde_json::from_reader(reader).map_err(|e| BatchError::Parse {
        source_name: "json".to_string(),
        line: e.line(),
        reason: e.to_string(),
    })
}

/// Read headerless CSV rows of `code,param,param,...`
///
/// Rows may have different lengths. Blank rows and rows starting with `#`
/// are skipped.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Package>, BatchError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut packages = Vec::new();

    for (row, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| BatchError::Parse {
            source_name: "csv".to_string(),
            line: e.position().map(|p| p.line() as usize).unwrap_or(row + 1),
            reason: e.to_string(),
        })?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(row + 1);

        let mut fields = record.iter();
        let code = match fields.next() {
            Some(code) if !code.is_empty() => code.to_string(),
            _ => continue,
        };

        let params = fields
            .map(|field| {
                field.parse::<f64>().map_err(|_| BatchError::Parse {
                    source_name: "csv".to_string(),
                    line,
                    reason: format!("'{}' is not a number", field),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        packages.push(Package { code, params });
    }

    Ok(packages)
}

/// Load packages from a file, detecting the format from its extension
/// unless one is given
pub fn load_packages(path: &Path, format: Option<InputFormat>) -> Result<Vec<Package>, BatchError> {
    let format = match format {
        Some(format) => format,
        None => InputFormat::from_path(path)?,
    };

    let file = File::open(path).map_err(|source| BatchError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let packages = match format {
        InputFormat::Json => read_json(reader),
        InputFormat::Csv => read_csv(reader),
    }
    .map_err(|e| match e {
        BatchError::Parse { line, reason, .. } => BatchError::Parse {
            source_name: path.display().to_string(),
            line,
            reason,
        },
        other => other,
    })?;

    tracing::info!(path = %path.display(), count = packages.len(), "Loaded packages");
    Ok(packages)
}

/// What to do with a package that cannot be turned into a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Record the failure and continue with the next package
    #[default]
    Skip,
    /// Stop at the first failing package
    Abort,
}

impl std::str::FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(ErrorPolicy::Skip),
            "abort" => Ok(ErrorPolicy::Abort),
            _ => Err(format!("Invalid error policy: {}", s)),
        }
    }
}

/// Result of processing one package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageOutcome {
    /// Position in the input
    pub index: usize,
    pub code: String,
    pub summary: Option<Summary>,
    pub error: Option<String>,
}

impl PackageOutcome {
    pub fn is_success(&self) -> bool {
        self.summary.is_some()
    }
}

/// Outcomes of a whole batch, in input order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<PackageOutcome>,
}

impl BatchReport {
    fn from_outcomes(outcomes: Vec<PackageOutcome>) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        Self {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            failed: outcomes.len() - succeeded,
            succeeded,
            outcomes,
        }
    }

    /// Summaries of the successful packages
    pub fn summaries(&self) -> impl Iterator<Item = &Summary> {
        self.outcomes.iter().filter_map(|o| o.summary.as_ref())
    }
}

/// Runs packages through the dispatcher
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchProcessor {
    policy: ErrorPolicy,
    parallel: bool,
}

impl BatchProcessor {
    pub fn new(policy: ErrorPolicy, parallel: bool) -> Self {
        Self { policy, parallel }
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Process every package and collect the outcomes
    ///
    /// With [`ErrorPolicy::Abort`] the first failing package (lowest index)
    /// ends the batch with [`BatchError::Aborted`].
    #[tracing::instrument(skip(self, packages), fields(count = packages.len(), policy = ?self.policy))]
    pub fn process(&self, packages: &[Package]) -> Result<BatchReport, BatchError> {
        let results: Vec<Result<Summary, RecordError>> = if self.parallel {
            packages.par_iter().map(Package::summarize).collect()
        } else {
            match self.policy {
                // Sequential abort stops before touching later packages
                ErrorPolicy::Abort => {
                    let mut results = Vec::with_capacity(packages.len());
                    for package in packages {
                        let result = package.summarize();
                        let failed = result.is_err();
                        results.push(result);
                        if failed {
                            break;
                        }
                    }
                    results
                }
                ErrorPolicy::Skip => packages.iter().map(Package::summarize).collect(),
            }
        };

        let mut outcomes = Vec::with_capacity(results.len());
        for (index, (package, result)) in packages.iter().zip(results).enumerate() {
            match result {
                Ok(summary) => outcomes.push(PackageOutcome {
                    index,
                    code: package.code.clone(),
                    summary: Some(summary),
                    error: None,
                }),
                Err(source) => {
                    if self.policy == ErrorPolicy::Abort {
                        tracing::error!(index, code = %package.code, error = %source, "Aborting batch");
                        return Err(BatchError::Aborted { index, source });
                    }
                    tracing::warn!(index, code = %package.code, error = %source, "Skipping package");
                    outcomes.push(PackageOutcome {
                        index,
                        code: package.code.clone(),
                        summary: None,
                        error: Some(source.to_string()),
                    });
                }
            }
        }

        let report = BatchReport::from_outcomes(outcomes);
        tracing::info!(
            succeeded = report.succeeded,
            failed = report.failed,
            "Batch processed"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed_batch() -> Vec<Package> {
        vec![
            Package::new("RUN", vec![15000.0, 1.0, 75.0]),
            Package::new("XYZ", vec![1.0, 1.0, 1.0]),
            Package::new("SWM", vec![720.0, 1.0, 80.0, 25.0, 40.0]),
            Package::new("WLK", vec![9000.0, 1.0, 75.0]),
        ]
    }

    #[test]
    fn test_sample_dataset_processes_cleanly() {
        let report = BatchProcessor::default()
            .process(&Package::sample_dataset())
            .unwrap();

        assert_eq!(report.succeeded, 3);
        assert_eq!(report.failed, 0);
        let names: Vec<_> = report.summaries().map(|s| s.activity_name()).collect();
        assert_eq!(names, vec!["Swimming", "Running", "RaceWalking"]);
    }

    #[test]
    fn test_skip_policy_keeps_going() {
        let report = BatchProcessor::new(ErrorPolicy::Skip, false)
            .process(&mixed_batch())
            .unwrap();

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 2);
        assert!(report.outcomes[1].error.as_ref().unwrap().contains("XYZ"));
        assert!(report.outcomes[3].summary.is_none());
        assert_eq!(report.outcomes[2].index, 2);
    }

    #[test]
    fn test_abort_policy_stops_at_first_failure() {
        let err = BatchProcessor::new(ErrorPolicy::Abort, false)
            .process(&mixed_batch())
            .unwrap_err();

        match err {
            BatchError::Aborted { index, source } => {
                assert_eq!(index, 1);
                assert!(matches!(source, RecordError::InvalidActivityCode { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_overflowing_readings_keep_report_serializable() {
        let packages = vec![
            Package::new("RUN", vec![15000.0, 1e-308, 75.0]),
            Package::new("SWM", vec![0.0, 1.0, 80.0, 1e308, 40.0]),
            Package::new("RUN", vec![15000.0, 1.0, 75.0]),
        ];
        let report = BatchProcessor::default().process(&packages).unwrap();

        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 2);
        assert!(report.outcomes[0].error.as_ref().unwrap().contains("mean_speed_kmh"));

        let json = serde_json::to_string(&report).unwrap();
        let restored: BatchReport = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.failed, 2);
        for (restored, original) in restored.outcomes.iter().zip(&report.outcomes) {
            assert_eq!(restored.error, original.error);
            assert_eq!(restored.is_success(), original.is_success());
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let packages: Vec<Package> = (0..200)
            .map(|i| Package::new("RUN", vec![1000.0 * i as f64, 1.0 + i as f64 / 100.0, 70.0]))
            .chain(mixed_batch())
            .collect();

        let sequential = BatchProcessor::new(ErrorPolicy::Skip, false)
            .process(&packages)
            .unwrap();
        let parallel = BatchProcessor::new(ErrorPolicy::Skip, true)
            .process(&packages)
            .unwrap();

        assert_eq!(sequential.outcomes, parallel.outcomes);

        let err = BatchProcessor::new(ErrorPolicy::Abort, true)
            .process(&packages)
            .unwrap_err();
        assert!(matches!(err, BatchError::Aborted { index: 201, .. }));
    }

    #[test]
    fn test_read_json() {
        let input = r#"[
            {"code": "SWM", "params": [720, 1, 80, 25, 40]},
            {"code": "RUN", "params": [15000, 1, 75]}
        ]"#;
        let packages = read_json(input.as_bytes()).unwrap();

        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0], Package::new("SWM", vec![720.0, 1.0, 80.0, 25.0, 40.0]));
    }

    #[test]
    fn test_read_json_rejects_malformed_input() {
        let err = read_json(r#"[{"code": "RUN"}]"#.as_bytes()).unwrap_err();
        assert!(matches!(err, BatchError::Parse { .. }));
    }

    #[test]
    fn test_read_csv() {
        let input = "# sample readings\nSWM, 720, 1, 80, 25, 40\n\nRUN,15000,1,75\nWLK,9000,1,75,180\n";
        let packages = read_csv(input.as_bytes()).unwrap();

        assert_eq!(packages, Package::sample_dataset());
    }

    #[test]
    fn test_read_csv_rejects_non_numeric() {
        let err = read_csv("RUN,15000,one,75\n".as_bytes()).unwrap_err();
        match err {
            BatchError::Parse { line, reason, .. } => {
                assert_eq!(line, 1);
                assert!(reason.contains("one"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_input_format_detection() {
        assert_eq!(InputFormat::from_path(Path::new("a/b.json")).unwrap(), InputFormat::Json);
        assert_eq!(InputFormat::from_path(Path::new("b.CSV")).unwrap(), InputFormat::Csv);
        assert!(InputFormat::from_path(Path::new("b.fit")).is_err());
        assert!(InputFormat::from_path(Path::new("noext")).is_err());
    }
}
