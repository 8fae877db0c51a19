//! Metrics module for planned training load calculations.

pub mod planned;

pub use planned::{
    average_intensity, calculate_planned_metrics, calories, distance, elevation_gain, energy,
    intensity_factor, planned_time_and_distance, training_stress_score, velocity, ActivityType,
    AthleteProfile, PlannedMetrics,
};
