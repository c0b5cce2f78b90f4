//! Training records and the per-activity formulas
//!
//! A [`TrainingRecord`] holds the raw readings of one session. Derived values
//! are computed through a fixed pipeline: [`TrainingRecord::distance_km`]
//! yields a [`DistanceKm`], which is the only way to obtain a [`SpeedKmH`]
//! from [`TrainingRecord::mean_speed_kmh`], which in turn is required by
//! [`TrainingRecord::calories_kcal`]. The ordering is carried by the types
//! rather than by mutable state on the record.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::RecordError;

/// Supported activity types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityKind {
    Running,
    RaceWalking,
    Swimming,
}

impl ActivityKind {
    /// Name shown in rendered summaries
    pub fn display_name(&self) -> &'static str {
        match self {
            ActivityKind::Running => "Running",
            ActivityKind::RaceWalking => "RaceWalking",
            ActivityKind::Swimming => "Swimming",
        }
    }

    /// Distance covered per action (stride or stroke) in metres
    pub fn step_length_m(&self) -> f64 {
        match self {
            ActivityKind::Running | ActivityKind::RaceWalking => STEP_LENGTH_M,
            ActivityKind::Swimming => STROKE_LENGTH_M,
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Activity-specific readings
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Activity {
    Running,
    RaceWalking {
        /// Athlete height in centimetres
        height_cm: f64,
    },
    Swimming {
        /// Pool length in metres
        pool_length_m: f64,
        /// Number of pool lengths swum
        pool_laps: u32,
    },
}

impl Activity {
    pub fn kind(&self) -> ActivityKind {
        match self {
            Activity::Running => ActivityKind::Running,
            Activity::RaceWalking { .. } => ActivityKind::RaceWalking,
            Activity::Swimming { .. } => ActivityKind::Swimming,
        }
    }
}

/// Distance covered in kilometres, produced by [`TrainingRecord::distance_km`]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct DistanceKm(f64);

impl DistanceKm {
    pub fn value(self) -> f64 {
        self.0
    }
}

/// Mean speed in km/h, produced by [`TrainingRecord::mean_speed_kmh`]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SpeedKmH(f64);

impl SpeedKmH {
    pub fn value(self) -> f64 {
        self.0
    }
}

/// Raw readings of one training session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingRecord {
    /// Steps or strokes counted by the tracker
    action: u32,
    /// Session duration in hours
    duration_h: f64,
    /// Body mass in kilograms
    weight_kg: f64,
    /// Step length fixed at construction from the activity kind
    step_length_m: f64,
    activity: Activity,
}

impl TrainingRecord {
    /// Create a running record
    pub fn running(action: u32, duration_h: f64, weight_kg: f64) -> Result<Self, RecordError> {
        Self::new(action, duration_h, weight_kg, Activity::Running)
    }

    /// Create a race walking record
    pub fn race_walking(
        action: u32,
        duration_h: f64,
        weight_kg: f64,
        height_cm: f64,
    ) -> Result<Self, RecordError> {
        let height_cm = require_positive("height_cm", height_cm)?;
        Self::new(action, duration_h, weight_kg, Activity::RaceWalking { height_cm })
    }

    /// Create a swimming record
    pub fn swimming(
        action: u32,
        duration_h: f64,
        weight_kg: f64,
        pool_length_m: f64,
        pool_laps: u32,
    ) -> Result<Self, RecordError> {
        let pool_length_m = require_positive("pool_length_m", pool_length_m)?;
        Self::new(
            action,
            duration_h,
            weight_kg,
            Activity::Swimming {
                pool_length_m,
                pool_laps,
            },
        )
    }

    fn new(
        action: u32,
        duration_h: f64,
        weight_kg: f64,
        activity: Activity,
    ) -> Result<Self, RecordError> {
        let record = Self {
            action,
            duration_h: require_positive("duration_h", duration_h)?,
            weight_kg: require_positive("weight_kg", weight_kg)?,
            step_length_m: activity.kind().step_length_m(),
            activity,
        };
        record.require_finite_results()?;
        Ok(record)
    }

    /// Extreme but positive inputs (a near-zero duration, a huge pool) can
    /// overflow the derived values; such readings are rejected up front.
    fn require_finite_results(&self) -> Result<(), RecordError> {
        let speed = self.mean_speed_kmh(self.distance_km());
        if !speed.0.is_finite() {
            return Err(RecordError::InvalidInputValue {
                field: "mean_speed_kmh",
                value: speed.0,
                reason: "readings produce a non-finite speed",
            });
        }

        let calories = self.calories_kcal(speed);
        if !calories.is_finite() {
            return Err(RecordError::InvalidInputValue {
                field: "calories_kcal",
                value: calories,
                reason: "readings produce a non-finite calorie estimate",
            });
        }
        Ok(())
    }

    pub fn kind(&self) -> ActivityKind {
        self.activity.kind()
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    pub fn action(&self) -> u32 {
        self.action
    }

    pub fn duration_h(&self) -> f64 {
        self.duration_h
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn step_length_m(&self) -> f64 {
        self.step_length_m
    }

    /// Distance from the action count and the step length
    pub fn distance_km(&self) -> DistanceKm {
        DistanceKm(self.action as f64 * self.step_length_m / M_IN_KM)
    }

    /// Mean speed over the whole session
    ///
    /// Swimming speed comes from pool geometry and ignores the stroke-based
    /// distance.
    pub fn mean_speed_kmh(&self, distance: DistanceKm) -> SpeedKmH {
        let speed = match self.activity {
            Activity::Swimming {
                pool_length_m,
                pool_laps,
            } => pool_length_m * pool_laps as f64 / M_IN_KM / self.duration_h,
            Activity::Running | Activity::RaceWalking { .. } => distance.0 / self.duration_h,
        };
        SpeedKmH(speed)
    }

    /// Estimated energy expenditure in kilocalories
    pub fn calories_kcal(&self, speed: SpeedKmH) -> f64 {
        let duration_min = self.duration_h * MIN_IN_HOUR;
        match self.activity {
            Activity::Running => {
                (RUN_SPEED_MULTIPLIER * speed.0 + RUN_SPEED_SHIFT) * self.weight_kg / M_IN_KM
                    * duration_min
            }
            Activity::RaceWalking { height_cm } => {
                let speed_ms = speed.0 * KMH_TO_MS;
                let height_m = height_cm / CM_IN_M;
                (WALK_WEIGHT_MULTIPLIER * self.weight_kg
                    + speed_ms.powi(2) / height_m * WALK_SPEED_HEIGHT_MULTIPLIER * self.weight_kg)
                    * duration_min
            }
            Activity::Swimming { .. } => {
                (speed.0 + SWIM_SPEED_SHIFT) * SWIM_WEIGHT_MULTIPLIER * self.weight_kg
                    * self.duration_h
            }
        }
    }

    /// Run the distance, speed, calories pipeline and snapshot the result
    pub fn summarize(&self) -> Summary {
        let distance = self.distance_km();
        let speed = self.mean_speed_kmh(distance);
        let calories = self.calories_kcal(speed);

        tracing::debug!(
            activity = %self.kind(),
            distance_km = distance.value(),
            speed_kmh = speed.value(),
            calories_kcal = calories,
            "Computed training summary"
        );

        Summary {
            activity_name: self.kind().display_name().to_string(),
            duration_h: self.duration_h,
            distance_km: distance.value(),
            mean_speed_kmh: speed.value(),
            calories_kcal: calories,
        }
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<f64, RecordError> {
    if !value.is_finite() {
        return Err(RecordError::InvalidInputValue {
            field,
            value,
            reason: "must be a finite number",
        });
    }
    if value <= 0.0 {
        return Err(RecordError::InvalidInputValue {
            field,
            value,
            reason: "must be greater than zero",
        });
    }
    Ok(value)
}

/// Computed result of one training session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    activity_name: String,
    duration_h: f64,
    distance_km: f64,
    mean_speed_kmh: f64,
    calories_kcal: f64,
}

impl Summary {
    pub fn activity_name(&self) -> &str {
        &self.activity_name
    }

    pub fn duration_h(&self) -> f64 {
        self.duration_h
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn mean_speed_kmh(&self) -> f64 {
        self.mean_speed_kmh
    }

    pub fn calories_kcal(&self) -> f64 {
        self.calories_kcal
    }
}
