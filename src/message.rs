//! Human-readable rendering of training summaries
//!
//! All quantities are printed with two fractional digits.

use std::fmt;

use crate::activity::Summary;

/// Render a summary as a single display line
pub fn render(summary: &Summary) -> String {
    format!(
        "Activity: {}; Duration: {:.2} h.; Distance: {:.2} km; Avg speed: {:.2} km/h; Calories burned: {:.2}.",
        summary.activity_name(),
        summary.duration_h(),
        summary.distance_km(),
        summary.mean_speed_kmh(),
        summary.calories_kcal(),
    )
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::TrainingRecord;

    #[test]
    fn test_render_swimming() {
        let summary = TrainingRecord::swimming(720, 1.0, 80.0, 25.0, 40)
            .unwrap()
            .summarize();

        assert_eq!(
            render(&summary),
            "Activity: Swimming; Duration: 1.00 h.; Distance: 0.99 km; Avg speed: 1.00 km/h; Calories burned: 336.00."
        );
    }

    #[test]
    fn test_render_running() {
        let summary = TrainingRecord::running(15000, 1.0, 75.0).unwrap().summarize();

        assert_eq!(
            summary.to_string(),
            "Activity: Running; Duration: 1.00 h.; Distance: 9.75 km; Avg speed: 9.75 km/h; Calories burned: 797.80."
        );
    }

    #[test]
    fn test_render_race_walking() {
        let summary = TrainingRecord::race_walking(9000, 1.0, 75.0, 180.0)
            .unwrap()
            .summarize();

        assert_eq!(
            render(&summary),
            "Activity: RaceWalking; Duration: 1.00 h.; Distance: 5.85 km; Avg speed: 5.85 km/h; Calories burned: 349.25."
        );
    }
}
