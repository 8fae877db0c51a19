//! Planned training metrics derived from a workout structure.
//!
//! Every metric is a free function so it can be computed and tested on its
//! own; [`calculate_planned_metrics`] composes them into one record.
//! IF and TSS follow the planned-workout convention used by the planning
//! API: TSS scales linearly with IF and with the square root of body weight
//! relative to a 70 kg reference athlete.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::workouts::duration::{step_length, total_duration};
use crate::workouts::structure::{Structure, StructureElement};
use crate::workouts::types::LengthMetric;

/// Reference body weight for TSS scaling and the default athlete.
pub const REFERENCE_WEIGHT_KG: f64 = 70.0;

/// Kilocalories to kilojoules.
pub const KCAL_TO_KJ: f64 = 4.184;

/// Elevation gain assumed per planned hour, in meters.
///
/// Placeholder heuristic; the polyline carries intensity, not terrain.
pub const ELEVATION_PER_HOUR_M: f64 = 100.0;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Sport the workout is planned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    #[default]
    Bike,
    Run,
    Swim,
    Other,
}

impl ActivityType {
    /// Typical endurance speed in m/s.
    pub fn base_velocity(&self) -> f64 {
        match self {
            ActivityType::Bike => 8.33,
            ActivityType::Run => 3.33,
            ActivityType::Swim => 1.11,
            ActivityType::Other => 2.78,
        }
    }

    /// Energy expenditure in kcal per kg per hour.
    pub fn burn_rate(&self) -> f64 {
        match self {
            ActivityType::Bike => 400.0,
            ActivityType::Run => 600.0,
            ActivityType::Swim => 500.0,
            ActivityType::Other => 300.0,
        }
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityType::Bike => write!(f, "Bike"),
            ActivityType::Run => write!(f, "Run"),
            ActivityType::Swim => write!(f, "Swim"),
            ActivityType::Other => write!(f, "Other"),
        }
    }
}

impl std::str::FromStr for ActivityType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BIKE" => Ok(ActivityType::Bike),
            "RUN" => Ok(ActivityType::Run),
            "SWIM" => Ok(ActivityType::Swim),
            "OTHER" => Ok(ActivityType::Other),
            other => Err(ValidationError::field(
                "activityType",
                format!("unknown activity type '{other}'"),
            )),
        }
    }
}

/// Athlete parameters the metrics depend on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAthleteProfile")]
pub struct AthleteProfile {
    weight_kg: f64,
    activity_type: ActivityType,
}

#[derive(Deserialize)]
struct RawAthleteProfile {
    #[serde(default = "default_weight")]
    weight_kg: f64,
    #[serde(default)]
    activity_type: ActivityType,
}

fn default_weight() -> f64 {
    REFERENCE_WEIGHT_KG
}

impl TryFrom<RawAthleteProfile> for AthleteProfile {
    type Error = ValidationError;

    fn try_from(raw: RawAthleteProfile) -> Result<Self, Self::Error> {
        AthleteProfile::new(raw.weight_kg, raw.activity_type)
    }
}

impl Default for AthleteProfile {
    fn default() -> Self {
        Self {
            weight_kg: REFERENCE_WEIGHT_KG,
            activity_type: ActivityType::Bike,
        }
    }
}

impl AthleteProfile {
    /// Create a profile; weight must be a positive number of kilograms.
    pub fn new(weight_kg: f64, activity_type: ActivityType) -> ValidationResult<Self> {
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            return Err(ValidationError::field(
                "athleteWeightKg",
                "athlete weight must be a positive number of kilograms",
            ));
        }
        Ok(Self {
            weight_kg,
            activity_type,
        })
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn activity_type(&self) -> ActivityType {
        self.activity_type
    }
}

/// Planned metrics snapshot, field names as expected by the upload API.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedMetrics {
    /// Planned time in hours
    pub total_time_planned: f64,
    pub tss_planned: f64,
    pub if_planned: f64,
    /// Meters per second
    pub velocity_planned: f64,
    /// Kilocalories
    pub calories_planned: f64,
    /// Meters
    pub distance_planned: f64,
    /// Meters
    pub elevation_gain_planned: f64,
    /// Kilojoules
    pub energy_planned: f64,
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Duration-weighted mean intensity of all steps, on a 0-100 scale.
///
/// Each step contributes the midpoint of its targets, weighted by its length
/// and by how often it repeats. Rest and cool-down steps count like any
/// other planned time. An empty or zero-length structure yields 0.
pub fn average_intensity(structure: &Structure) -> f64 {
    let metric = structure.primary_intensity_metric();
    let (weighted, total) =
        structure
            .elements()
            .iter()
            .fold((0.0, 0.0), |(weighted, total), element| {
                let times = match element {
                    StructureElement::Step(_) => 1.0,
                    StructureElement::Repetition(repetition) => repetition.count() as f64,
                };
                element.steps().iter().fold((weighted, total), |(w, t), step| {
                    let length = step_length(step) * times;
                    (w + metric.to_percent(step.mean_target()) * length, t + length)
                })
            });

    if total <= 0.0 {
        return 0.0;
    }
    (weighted / total).clamp(0.0, 100.0)
}

/// Intensity factor from a 0-100 average intensity, 2 decimals.
pub fn intensity_factor(average_intensity: f64) -> f64 {
    round_to(average_intensity / 100.0, 2)
}

/// Training stress score, 1 decimal.
pub fn training_stress_score(duration_seconds: f64, intensity_factor: f64, weight_kg: f64) -> f64 {
    let hours = duration_seconds / SECONDS_PER_HOUR;
    let weight_scale = (weight_kg / REFERENCE_WEIGHT_KG).sqrt();
    round_to(hours * intensity_factor * 100.0 * weight_scale, 1)
}

/// Planned speed in m/s, 3 decimals. Never zero: IF 0 still moves at 70 %
/// of the base speed.
pub fn velocity(activity_type: ActivityType, intensity_factor: f64) -> f64 {
    round_to(
        activity_type.base_velocity() * (0.7 + 0.6 * intensity_factor),
        3,
    )
}

/// Planned distance in whole meters.
pub fn distance(velocity: f64, duration_seconds: f64) -> f64 {
    (velocity * duration_seconds).round()
}

/// Planned kilocalories, rounded to an integer.
pub fn calories(
    duration_seconds: f64,
    weight_kg: f64,
    activity_type: ActivityType,
    intensity_factor: f64,
) -> f64 {
    let hours = duration_seconds / SECONDS_PER_HOUR;
    (hours * weight_kg * activity_type.burn_rate() * (0.8 + 0.4 * intensity_factor)).round()
}

/// Planned elevation gain in whole meters (100 m per planned hour).
pub fn elevation_gain(duration_seconds: f64) -> f64 {
    (duration_seconds / SECONDS_PER_HOUR * ELEVATION_PER_HOUR_M).round()
}

/// Planned energy in whole kilojoules.
pub fn energy(calories: f64) -> f64 {
    (calories * KCAL_TO_KJ).round()
}

/// Planned time in seconds and planned distance in meters.
///
/// Duration structures sum to seconds directly. Distance structures sum to
/// meters, and the planned time is the distance covered at the planned
/// velocity for `activity_type`.
pub fn planned_time_and_distance(
    structure: &Structure,
    activity_type: ActivityType,
) -> (f64, f64) {
    let length = total_duration(structure);
    let if_planned = intensity_factor(average_intensity(structure));
    let velocity_planned = velocity(activity_type, if_planned);

    match structure.primary_length_metric() {
        LengthMetric::Duration => (length, distance(velocity_planned, length)),
        LengthMetric::Distance => (length / velocity_planned, length.round()),
    }
}

/// Compute every planned metric for a structure.
pub fn calculate_planned_metrics(structure: &Structure, athlete: &AthleteProfile) -> PlannedMetrics {
    let if_planned = intensity_factor(average_intensity(structure));
    let velocity_planned = velocity(athlete.activity_type(), if_planned);
    let (duration_seconds, distance_planned) =
        planned_time_and_distance(structure, athlete.activity_type());

    let calories_planned = calories(
        duration_seconds,
        athlete.weight_kg(),
        athlete.activity_type(),
        if_planned,
    );

    let metrics = PlannedMetrics {
        total_time_planned: duration_seconds / SECONDS_PER_HOUR,
        tss_planned: training_stress_score(duration_seconds, if_planned, athlete.weight_kg()),
        if_planned,
        velocity_planned,
        calories_planned,
        distance_planned,
        elevation_gain_planned: elevation_gain(duration_seconds),
        energy_planned: energy(calories_planned),
    };

    tracing::debug!(
        activity = %athlete.activity_type(),
        tss = metrics.tss_planned,
        intensity_factor = metrics.if_planned,
        "Calculated planned metrics"
    );
    metrics
}
