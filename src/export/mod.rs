//! Export of training summaries and batch reports

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::activity::Summary;
use crate::batch::BatchReport;

pub mod csv;
pub mod json;
pub mod text;

/// Export format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    Text,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Result<Self, ExportError> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "text" | "txt" => Ok(ExportFormat::Text),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }

    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ExportError::UnsupportedFormat(path.display().to_string()))?;
        Self::from_str(ext)
    }
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] ::csv::Error),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Write summaries to `output_path` in the given format
pub fn export_summaries<P: AsRef<Path>>(
    summaries: &[Summary],
    output_path: P,
    format: ExportFormat,
) -> Result<(), ExportError> {
    let file = std::fs::File::create(output_path.as_ref())?;

    match format {
        ExportFormat::Csv => csv::write_summaries(summaries, file)?,
        ExportFormat::Json => json::write_json(&summaries, file)?,
        ExportFormat::Text => text::write_summaries(summaries, file)?,
    }

    tracing::info!(
        path = %output_path.as_ref().display(),
        count = summaries.len(),
        ?format,
        "Exported summaries"
    );
    Ok(())
}

/// Write a full batch report, including failed packages
pub fn export_report<P: AsRef<Path>>(
    report: &BatchReport,
    output_path: P,
    format: ExportFormat,
) -> Result<(), ExportError> {
    let file = std::fs::File::create(output_path.as_ref())?;

    match format {
        ExportFormat::Csv => csv::write_report(report, file)?,
        ExportFormat::Json => json::write_json(report, file)?,
        ExportFormat::Text => text::write_report(report, file)?,
    }

    tracing::info!(
        path = %output_path.as_ref().display(),
        report = %report.id,
        ?format,
        "Exported batch report"
    );
    Ok(())
}
