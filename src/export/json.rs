use super::ExportError;
use std::io::Write;

/// Pretty-print any serializable value as JSON
pub fn write_json<T, W>(data: &T, mut writer: W) -> Result<(), ExportError>
where
    T: serde::Serialize + ?Sized,
    W: Write,
{
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| ExportError::SerializationError(e.to_string()))?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::Summary;
    use crate::batch::{BatchProcessor, BatchReport, Package};

    #[test]
    fn test_summary_json_round_trip() {
        let summary = Package::new("SWM", vec![720.0, 1.0, 80.0, 25.0, 40.0])
            .summarize()
            .unwrap();

        let mut buffer = Vec::new();
        write_json(&summary, &mut buffer).unwrap();
        let parsed: Summary = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(parsed, summary);
    }

    #[test]
    fn test_report_json_keeps_errors() {
        let packages = vec![Package::new("XYZ", vec![])];
        let report = BatchProcessor::default().process(&packages).unwrap();

        let mut buffer = Vec::new();
        write_json(&report, &mut buffer).unwrap();
        let parsed: BatchReport = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(parsed.id, report.id);
        assert_eq!(parsed.failed, 1);
        assert!(parsed.outcomes[0].error.is_some());
    }
}
