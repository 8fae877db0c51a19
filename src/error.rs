//! Validation error types.
//!
//! Every constructor and factory in this crate fails with [`ValidationError`].
//! Violations that only make sense for a whole workout (duration bookkeeping,
//! missing title) are grouped under [`WorkoutValidationError`] so callers can
//! tell them apart from plain field errors.

use thiserror::Error;

/// Errors raised when a workout value fails validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A single field holds an invalid value.
    #[error("{message}")]
    Field {
        /// Name of the offending field (wire name).
        field: &'static str,
        /// Human readable description.
        message: String,
    },

    /// A workout-level consistency rule was violated.
    #[error(transparent)]
    Workout(#[from] WorkoutValidationError),
}

/// Workout-specific validation failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkoutValidationError {
    /// Declared duration differs from the one implied by the structure.
    #[error("Workout duration ({duration}s) doesn't match structure duration ({structure_duration}s)")]
    DurationMismatch {
        /// Explicitly supplied duration in seconds.
        duration: f64,
        /// Duration computed from the structure.
        structure_duration: f64,
    },

    /// An explicit duration was paired with a distance-based structure.
    #[error("Workout duration ({duration}s) cannot be checked against a distance-based structure")]
    DistanceStructure {
        /// Explicitly supplied duration in seconds.
        duration: f64,
    },

    /// Declared duration is negative or not a number.
    #[error("Workout duration must be a non-negative number, got {0}")]
    InvalidDuration(f64),

    /// Title is empty.
    #[error("Workout title must not be empty")]
    MissingTitle,
}

impl ValidationError {
    /// Build a field error.
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        ValidationError::Field {
            field,
            message: message.into(),
        }
    }

    /// Name of the offending field, when the error concerns one.
    pub fn field_name(&self) -> Option<&'static str> {
        match self {
            ValidationError::Field { field, .. } => Some(field),
            ValidationError::Workout(WorkoutValidationError::DurationMismatch { .. })
            | ValidationError::Workout(WorkoutValidationError::DistanceStructure { .. })
            | ValidationError::Workout(WorkoutValidationError::InvalidDuration(_)) => {
                Some("duration")
            }
            ValidationError::Workout(WorkoutValidationError::MissingTitle) => Some("title"),
        }
    }

    /// Whether this is a workout-level error rather than a field error.
    pub fn is_workout_error(&self) -> bool {
        matches!(self, ValidationError::Workout(_))
    }
}

/// Result type for validating constructors.
pub type ValidationResult<T> = Result<T, ValidationError>;
