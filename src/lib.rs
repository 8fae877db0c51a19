//! Structured Workouts - planned training structures and metrics
//!
//! Models a structured training session (warm-up, steady efforts, intervals,
//! repetitions, cool-down) as immutable values, derives its total duration,
//! checks it against a declared duration, and computes planned training
//! metrics (TSS, IF, speed, calories, distance, elevation, energy).
//! Everything here is pure computation: no I/O and no shared state.

pub mod config;
pub mod error;
pub mod metrics;
pub mod workouts;

// Re-export commonly used types
pub use error::{ValidationError, ValidationResult, WorkoutValidationError};
pub use metrics::planned::{calculate_planned_metrics, AthleteProfile, PlannedMetrics};
pub use workouts::duration::{total_duration, validate_structure};
pub use workouts::structure::{Structure, StructureBuilder, StructureElement};
pub use workouts::workout::Workout;
