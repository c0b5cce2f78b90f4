//! Fixed coefficients used by the activity formulas
//!
//! These are empirical values for the three supported activities and are
//! deliberately not part of the runtime configuration.

/// Metres in one kilometre
pub const M_IN_KM: f64 = 1000.0;

/// Minutes in one hour
pub const MIN_IN_HOUR: f64 = 60.0;

/// Centimetres in one metre
pub const CM_IN_M: f64 = 100.0;

/// km/h to m/s conversion factor
pub const KMH_TO_MS: f64 = 0.278;

/// Stride length for running and race walking (metres)
pub const STEP_LENGTH_M: f64 = 0.65;

/// Stroke length for swimming (metres)
pub const STROKE_LENGTH_M: f64 = 1.38;

// Running
pub const RUN_SPEED_MULTIPLIER: f64 = 18.0;
pub const RUN_SPEED_SHIFT: f64 = 1.79;

// Race walking
pub const WALK_WEIGHT_MULTIPLIER: f64 = 0.035;
pub const WALK_SPEED_HEIGHT_MULTIPLIER: f64 = 0.029;

// Swimming
pub const SWIM_SPEED_SHIFT: f64 = 1.1;
pub const SWIM_WEIGHT_MULTIPLIER: f64 = 2.0;
