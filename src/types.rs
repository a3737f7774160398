//! Synchronizable state model
//!
//! This module defines the state categories the phone pushes to the companion
//! device and the shared measurement records reported back. Field names on the
//! wire are camelCase (the contract the companion app parses); Rust field
//! names stay snake_case via serde renames.
//!
//! Everything here is transient: values are built from the phone's
//! authoritative stores, pushed, and discarded. Durability is the stores'
//! concern, not this layer's.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Lower bound of the daily-log ordinal scales (energy, stress, sleep quality).
pub const DAILY_SCALE_MIN: u8 = 1;
/// Upper bound of the daily-log ordinal scales.
pub const DAILY_SCALE_MAX: u8 = 5;

/// Workout lifecycle status as rendered on the companion device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutStatus {
    Scheduled,
    InProgress,
    Completed,
    Skipped,
}

impl WorkoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutStatus::Scheduled => "scheduled",
            WorkoutStatus::InProgress => "in_progress",
            WorkoutStatus::Completed => "completed",
            WorkoutStatus::Skipped => "skipped",
        }
    }
}

/// Unit for prescribed exercise weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Kg,
    Lb,
}

/// A single prescribed exercise inside a watch workout.
///
/// Either side may flip `completed`, but reconciliation is last-write-wins at
/// the phone: the companion's completion report is applied as a state
/// transition on the phone's record, never merged field-by-field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchExercise {
    pub id: String,
    pub name: String,
    /// Prescribed number of sets
    pub sets: u32,
    /// Prescribed repetitions per set
    pub reps: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_unit: Option<WeightUnit>,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Today's workout as pushed to the companion device.
///
/// Owned by the phone; the companion only renders it and reports completions
/// back. It never holds an independent authoritative copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchWorkout {
    pub id: String,
    pub name: String,
    /// Exercises in prescribed order
    pub exercises: Vec<WatchExercise>,
    pub estimated_duration_minutes: u32,
    pub status: WorkoutStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// One calendar day's log entry, pushed wholesale (never diffed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchDailyLog {
    /// Date key; one record per calendar date
    pub date: NaiveDate,
    /// Energy level on the 1-5 scale
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy: Option<u8>,
    /// Stress level on the 1-5 scale
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stress: Option<u8>,
    /// Sleep quality on the 1-5 scale
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_quality: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl WatchDailyLog {
    /// Create an empty log entry for `date`
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            energy: None,
            stress: None,
            sleep_quality: None,
            note: None,
            updated_at: Utc::now(),
        }
    }

    pub fn set_energy(&mut self, value: u8) {
        self.energy = Some(clamp_scale(value));
    }

    pub fn set_stress(&mut self, value: u8) {
        self.stress = Some(clamp_scale(value));
    }

    pub fn set_sleep_quality(&mut self, value: u8) {
        self.sleep_quality = Some(clamp_scale(value));
    }
}

/// Clamp an ordinal scalar to the 1-5 daily-log scale
fn clamp_scale(value: u8) -> u8 {
    value.clamp(DAILY_SCALE_MIN, DAILY_SCALE_MAX)
}

/// Glanceable projection for the companion's idle display.
///
/// Always derived from the phone's stores, never a source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplicationData {
    pub wellness_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_workout_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_workout_time: Option<DateTime<Utc>>,
    /// Current streak length in days
    pub streak_days: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_day: Option<u32>,
}

/// Authentication snapshot pushed to the companion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchAuthState {
    pub is_authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Reproductive-cycle phase snapshot.
///
/// `phase` serializes as an explicit null when absent; the companion treats
/// null as "tracking disabled" rather than "field missing".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenstrualPhaseInfo {
    pub phase: Option<String>,
    pub cycle_day: u32,
}

/// Derived health metrics reported by the companion.
///
/// One cohesive measurement record: downstream consumers receive these three
/// values together (as the nested `healthData` object) rather than as flat
/// fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetrics {
    pub average_heart_rate: f64,
    pub total_calories: f64,
    /// Elapsed duration in seconds. The workout-ended message historically
    /// carries this as `workoutDuration`; both spellings decode.
    #[serde(alias = "workoutDuration")]
    pub duration: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_workout() -> WatchWorkout {
        WatchWorkout {
            id: "w1".to_string(),
            name: "Upper Body".to_string(),
            exercises: vec![WatchExercise {
                id: "e1".to_string(),
                name: "Bench Press".to_string(),
                sets: 3,
                reps: 8,
                weight: Some(60.0),
                weight_unit: Some(WeightUnit::Kg),
                completed: false,
                completed_at: None,
            }],
            estimated_duration_minutes: 45,
            status: WorkoutStatus::Scheduled,
            started_at: None,
            completed_at: None,
        }
    }

    #[test]
    fn test_workout_wire_field_names() {
        let value = serde_json::to_value(sample_workout()).unwrap();

        assert_eq!(value["estimatedDurationMinutes"], 45);
        assert_eq!(value["status"], "scheduled");
        assert_eq!(value["exercises"][0]["weightUnit"], "kg");
        // Absent optionals are omitted, not serialized as null
        assert!(value.get("startedAt").is_none());
        assert!(value["exercises"][0].get("completedAt").is_none());
    }

    #[test]
    fn test_workout_roundtrip() {
        let workout = sample_workout();
        let value = serde_json::to_value(&workout).unwrap();
        let back: WatchWorkout = serde_json::from_value(value).unwrap();
        assert_eq!(back, workout);
    }

    #[test]
    fn test_daily_log_scale_clamping() {
        let mut log = WatchDailyLog::new(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        log.set_energy(0);
        log.set_stress(9);
        log.set_sleep_quality(3);

        assert_eq!(log.energy, Some(1));
        assert_eq!(log.stress, Some(5));
        assert_eq!(log.sleep_quality, Some(3));
    }

    #[test]
    fn test_menstrual_phase_null_is_explicit() {
        let info = MenstrualPhaseInfo {
            phase: None,
            cycle_day: 12,
        };
        let value = serde_json::to_value(&info).unwrap();

        assert!(value["phase"].is_null());
        assert_eq!(value["cycleDay"], 12);
    }

    #[test]
    fn test_health_metrics_accepts_workout_duration_alias() {
        let metrics: HealthMetrics = serde_json::from_value(serde_json::json!({
            "averageHeartRate": 140,
            "totalCalories": 310,
            "workoutDuration": 1800
        }))
        .unwrap();

        assert_eq!(metrics.duration, 1800.0);
        // The event payload always serializes the canonical spelling
        let value = serde_json::to_value(&metrics).unwrap();
        assert_eq!(value["duration"], 1800.0);
    }
}
