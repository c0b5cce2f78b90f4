//! Unified error hierarchy for trainsum
//!
//! Record construction errors are recoverable and surface to the caller of
//! the dispatcher; batch and export errors wrap them with context.

use std::path::PathBuf;
use thiserror::Error;

pub use crate::export::ExportError;

/// Top-level error type for all trainsum operations
#[derive(Debug, Error)]
pub enum TrainSumError {
    /// Record construction errors
    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    /// Batch input and processing errors
    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),

    /// Export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while building a training record from a sensor package
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    /// Type code outside the supported set
    #[error("Unknown activity code: {code:?}")]
    InvalidActivityCode { code: String },

    /// Parameter list does not match the activity's field count
    #[error("{code} expects {expected} parameters, got {actual}")]
    InvalidParameterCount {
        code: String,
        expected: usize,
        actual: usize,
    },

    /// Out-of-range or non-finite field value
    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidInputValue {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Batch input and processing errors
#[derive(Debug, Error)]
pub enum BatchError {
    /// Malformed package in an input source
    #[error("Parse error in {source_name} at record {line}: {reason}")]
    Parse {
        source_name: String,
        line: usize,
        reason: String,
    },

    /// Input format could not be determined or is not supported
    #[error("Unsupported batch format: {format}")]
    UnsupportedFormat { format: String },

    /// Processing stopped on the first failing package
    #[error("Batch aborted at package {index}: {source}")]
    Aborted {
        index: usize,
        #[source]
        source: RecordError,
    },

    /// Input file could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TrainSumError {
    /// Get error severity level
    ///
    /// A rejected reading leaves the rest of the input usable; anything that
    /// stops a batch or an export is an error.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TrainSumError::Record(_) => ErrorSeverity::Warning,
            TrainSumError::Batch(BatchError::Parse { .. }) => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }

    /// Emit a tracing event at the level matching [`Self::severity`]
    pub fn log(&self, context: &str) {
        match self.severity() {
            ErrorSeverity::Warning => tracing::warn!(error = %self, "{}", context),
            ErrorSeverity::Error => tracing::error!(error = %self, "{}", context),
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            TrainSumError::Record(RecordError::InvalidActivityCode { code }) => {
                format!("'{}' is not a known activity. Use SWM, RUN or WLK.", code)
            }
            TrainSumError::Record(RecordError::InvalidParameterCount {
                code, expected, ..
            }) => {
                format!("{} readings need exactly {} values.", code, expected)
            }
            TrainSumError::Batch(BatchError::Read { path, .. }) => {
                format!("Could not read batch file: {}", path.display())
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error that prevents operation but system can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        let err = TrainSumError::Record(RecordError::InvalidActivityCode {
            code: "XYZ".to_string(),
        });
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        let err = TrainSumError::from(BatchError::Parse {
            source_name: "packages.csv".to_string(),
            line: 3,
            reason: "not a number".to_string(),
        });
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        let err = TrainSumError::from(BatchError::Aborted {
            index: 0,
            source: RecordError::InvalidActivityCode {
                code: "BIK".to_string(),
            },
        });
        assert_eq!(err.severity(), ErrorSeverity::Error);

        let err = TrainSumError::Io(std::io::Error::new(std::io::ErrorKind::Other, "x"));
        assert_eq!(err.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_user_messages() {
        let err = TrainSumError::from(RecordError::InvalidActivityCode {
            code: "XYZ".to_string(),
        });
        assert!(err.user_message().contains("SWM, RUN or WLK"));

        let err = TrainSumError::from(RecordError::InvalidParameterCount {
            code: "RUN".to_string(),
            expected: 3,
            actual: 2,
        });
        assert_eq!(err.user_message(), "RUN readings need exactly 3 values.");
    }

    #[test]
    fn test_aborted_keeps_source() {
        use std::error::Error as _;

        let err = BatchError::Aborted {
            index: 4,
            source: RecordError::InvalidActivityCode {
                code: "BIK".to_string(),
            },
        };
        assert!(err.to_string().contains("package 4"));
        assert!(err.source().is_some());
    }
}
