//! Duration aggregation and the duration/structure consistency check.

use crate::error::{ValidationResult, WorkoutValidationError};
use crate::workouts::structure::{Structure, StructureElement};
use crate::workouts::types::{LengthMetric, Step};

/// Step length in its family's base unit (seconds or meters).
pub fn step_length(step: &Step) -> f64 {
    step.length().normalized().value()
}

/// Sum of the step lengths in one pass through a repetition cycle.
pub fn cycle_duration(steps: &[Step]) -> f64 {
    steps.iter().map(step_length).sum()
}

/// Elapsed length of a single element, repetitions expanded.
pub fn element_duration(element: &StructureElement) -> f64 {
    match element {
        StructureElement::Step(single) => step_length(single.step()),
        StructureElement::Repetition(repetition) => {
            repetition.count() as f64 * cycle_duration(repetition.steps())
        }
    }
}

/// Total elapsed length of a structure.
///
/// Step lengths are converted to base units first, so a duration structure
/// sums to seconds and a distance structure to meters. An empty structure
/// is 0.
pub fn total_duration(structure: &Structure) -> f64 {
    let total = structure.elements().iter().map(element_duration).sum();
    tracing::debug!(
        elements = structure.elements().len(),
        total,
        "Aggregated structure duration"
    );
    total
}

/// Check that an explicit workout duration agrees with its structure.
///
/// Does nothing when there is no structure. The values must be equal; a NaN
/// duration never is. Distance structures have no intrinsic time, so an
/// explicit duration cannot be checked against them and is refused.
pub fn validate_structure(duration: f64, structure: Option<&Structure>) -> ValidationResult<()> {
    let Some(structure) = structure else {
        return Ok(());
    };

    if structure.primary_length_metric() == LengthMetric::Distance {
        return Err(WorkoutValidationError::DistanceStructure { duration }.into());
    }

    let structure_duration = total_duration(structure);
    if duration != structure_duration {
        return Err(WorkoutValidationError::DurationMismatch {
            duration,
            structure_duration,
        }
        .into());
    }

    Ok(())
}
