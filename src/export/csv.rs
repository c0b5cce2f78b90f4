use super::ExportError;
use crate::activity::Summary;
use crate::batch::BatchReport;
use serde::Serialize;
use std::io::Write;

/// Flattened outcome row; failed packages leave the numeric columns empty
#[derive(Serialize)]
struct OutcomeRow<'a> {
    index: usize,
    code: &'a str,
    activity_name: Option<&'a str>,
    duration_h: Option<f64>,
    distance_km: Option<f64>,
    mean_speed_kmh: Option<f64>,
    calories_kcal: Option<f64>,
    error: Option<&'a str>,
}

/// Write one CSV row per summary, with a header row
pub fn write_summaries<W: Write>(summaries: &[Summary], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for summary in summaries {
        csv_writer.serialize(summary)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write one CSV row per package outcome
pub fn write_report<W: Write>(report: &BatchReport, writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for outcome in &report.outcomes {
        let summary = outcome.summary.as_ref();
        csv_writer.serialize(OutcomeRow {
            index: outcome.index,
            code: &outcome.code,
            activity_name: summary.map(|s| s.activity_name()),
            duration_h: summary.map(|s| s.duration_h()),
            distance_km: summary.map(|s| s.distance_km()),
            mean_speed_kmh: summary.map(|s| s.mean_speed_kmh()),
            calories_kcal: summary.map(|s| s.calories_kcal()),
            error: outcome.error.as_deref(),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{BatchProcessor, Package};

    #[test]
    fn test_write_summaries() {
        let summaries: Vec<Summary> = Package::sample_dataset()
            .iter()
            .map(|p| p.summarize().unwrap())
            .collect();

        let mut buffer = Vec::new();
        write_summaries(&summaries, &mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(
            lines[0],
            "activity_name,duration_h,distance_km,mean_speed_kmh,calories_kcal"
        );
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("Running,1.0,9.75,9.75,"));
    }

    #[test]
    fn test_write_report_with_failures() {
        let packages = vec![
            Package::new("RUN", vec![15000.0, 1.0, 75.0]),
            Package::new("BIK", vec![1.0]),
        ];
        let report = BatchProcessor::default().process(&packages).unwrap();

        let mut buffer = Vec::new();
        write_report(&report, &mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("index,code,activity_name"));
        assert!(lines[2].starts_with("1,BIK,,,,,,"));
        assert!(lines[2].contains("BIK"));
    }
}
