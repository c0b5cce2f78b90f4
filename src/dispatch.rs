//! Builds training records from tracker packages
//!
//! A package is a short activity code plus a flat, positional list of
//! numbers exactly as the tracker reports them.

use std::str::FromStr;

use crate::activity::{ActivityKind, TrainingRecord};
use crate::error::RecordError;

impl ActivityKind {
    /// Tracker code for this activity
    pub fn code(&self) -> &'static str {
        match self {
            ActivityKind::Swimming => "SWM",
            ActivityKind::Running => "RUN",
            ActivityKind::RaceWalking => "WLK",
        }
    }

    /// Number of positional parameters a package of this kind carries
    pub fn param_count(&self) -> usize {
        match self {
            ActivityKind::Running => 3,
            ActivityKind::RaceWalking => 4,
            ActivityKind::Swimming => 5,
        }
    }
}

impl FromStr for ActivityKind {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SWM" => Ok(ActivityKind::Swimming),
            "RUN" => Ok(ActivityKind::Running),
            "WLK" => Ok(ActivityKind::RaceWalking),
            _ => Err(RecordError::InvalidActivityCode {
                code: s.to_string(),
            }),
        }
    }
}

/// Create the record matching `code` from its positional parameters
///
/// Parameter order:
/// - `RUN`: action, duration_h, weight_kg
/// - `WLK`: action, duration_h, weight_kg, height_cm
/// - `SWM`: action, duration_h, weight_kg, pool_length_m, pool_laps
#[tracing::instrument(level = "debug", skip(params), fields(param_count = params.len()))]
pub fn create_record(code: &str, params: &[f64]) -> Result<TrainingRecord, RecordError> {
    let kind: ActivityKind = code.parse()?;

    if params.len() != kind.param_count() {
        return Err(RecordError::InvalidParameterCount {
            code: code.to_string(),
            expected: kind.param_count(),
            actual: params.len(),
        });
    }

    let action = to_count("action", params[0])?;
    let (duration_h, weight_kg) = (params[1], params[2]);

    match kind {
        ActivityKind::Running => TrainingRecord::running(action, duration_h, weight_kg),
        ActivityKind::RaceWalking => {
            TrainingRecord::race_walking(action, duration_h, weight_kg, params[3])
        }
        ActivityKind::Swimming => TrainingRecord::swimming(
            action,
            duration_h,
            weight_kg,
            params[3],
            to_count("pool_laps", params[4])?,
        ),
    }
}

/// Counts arrive as plain numbers and must be whole and non-negative
fn to_count(field: &'static str, value: f64) -> Result<u32, RecordError> {
    let reason = if !value.is_finite() {
        "must be a finite number"
    } else if value < 0.0 {
        "must not be negative"
    } else if value.fract() != 0.0 {
        "must be a whole number"
    } else if value > u32::MAX as f64 {
        "is too large"
    } else {
        return Ok(value as u32);
    };

    Err(RecordError::InvalidInputValue {
        field,
        value,
        reason,
    })
}
