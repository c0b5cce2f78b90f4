use super::ExportError;
use crate::activity::Summary;
use crate::batch::BatchReport;
use crate::message::render;
use std::io::Write;

/// Write one rendered line per summary
pub fn write_summaries<W: Write>(summaries: &[Summary], mut writer: W) -> Result<(), ExportError> {
    for summary in summaries {
        writeln!(writer, "{}", render(summary))?;
    }
    Ok(())
}

/// Write a human-readable batch report
pub fn write_report<W: Write>(report: &BatchReport, mut writer: W) -> Result<(), ExportError> {
    writeln!(writer, "TRAINING BATCH {}", report.id)?;
    writeln!(
        writer,
        "Generated: {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(
        writer,
        "Packages: {} processed, {} failed",
        report.succeeded, report.failed
    )?;
    writeln!(writer)?;

    for outcome in &report.outcomes {
        match (&outcome.summary, &outcome.error) {
            (Some(summary), _) => writeln!(writer, "[{}] {}", outcome.index, render(summary))?,
            (None, Some(error)) => {
                writeln!(writer, "[{}] {} skipped: {}", outcome.index, outcome.code, error)?
            }
            (None, None) => writeln!(writer, "[{}] {} skipped", outcome.index, outcome.code)?,
        }
    }

    Ok(())
}
