//! Planned workout entity.
//!
//! A workout may carry an explicit duration, a structure, or both. When both
//! are present they must agree; when only a structure is given the duration
//! is derived from it. Distance structures only ever derive their duration,
//! from the planned velocity.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{ValidationResult, WorkoutValidationError};
use crate::metrics::planned::{
    calculate_planned_metrics, planned_time_and_distance, ActivityType, AthleteProfile,
    PlannedMetrics,
};
use crate::workouts::duration::validate_structure;
use crate::workouts::structure::{Structure, StructureBuilder};

/// A planned workout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    id: Uuid,
    title: String,
    activity_type: ActivityType,
    workout_day: NaiveDate,
    description: Option<String>,
    /// Planned duration in seconds
    duration: Option<f64>,
    structure: Option<Structure>,
    created_at: DateTime<Utc>,
}

impl Workout {
    /// Create a workout, cross-checking `duration` against `structure`.
    pub fn new(
        title: impl Into<String>,
        activity_type: ActivityType,
        workout_day: NaiveDate,
        duration: Option<f64>,
        structure: Option<Structure>,
    ) -> ValidationResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(WorkoutValidationError::MissingTitle.into());
        }

        let duration = match (duration, structure.as_ref()) {
            (Some(duration), structure) => {
                if !duration.is_finite() || duration < 0.0 {
                    return Err(WorkoutValidationError::InvalidDuration(duration).into());
                }
                validate_structure(duration, structure)?;
                Some(duration)
            }
            (None, Some(structure)) => Some(planned_time_and_distance(structure, activity_type).0),
            (None, None) => None,
        };

        let workout = Self {
            id: Uuid::new_v4(),
            title,
            activity_type,
            workout_day,
            description: None,
            duration,
            structure,
            created_at: Utc::now(),
        };

        tracing::info!(
            id = %workout.id,
            title = %workout.title,
            structured = workout.structure.is_some(),
            "Workout created"
        );
        Ok(workout)
    }

    /// Set a free-text description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn activity_type(&self) -> ActivityType {
        self.activity_type
    }

    pub fn workout_day(&self) -> NaiveDate {
        self.workout_day
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Planned duration in seconds.
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn structure(&self) -> Option<&Structure> {
        self.structure.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Planned metrics for an athlete of `weight_kg`.
    ///
    /// A workout without structure is treated as an empty one.
    pub fn planned_metrics(&self, weight_kg: f64) -> ValidationResult<PlannedMetrics> {
        let athlete = AthleteProfile::new(weight_kg, self.activity_type)?;
        let metrics = match &self.structure {
            Some(structure) => calculate_planned_metrics(structure, &athlete),
            None => calculate_planned_metrics(&StructureBuilder::new().build()?, &athlete),
        };
        Ok(metrics)
    }
}
