//! Unit tests for the workout duration/structure consistency check.

use chrono::NaiveDate;
use structured_workouts::error::{ValidationError, WorkoutValidationError};
use structured_workouts::metrics::planned::ActivityType;
use structured_workouts::workouts::duration::{total_duration, validate_structure};
use structured_workouts::workouts::structure::{Structure, StructureBuilder};
use structured_workouts::workouts::templates::{
    interval, interval_repeats, long_steady, tempo, IntervalParams, LongSteadyParams,
    TempoParams,
};
use structured_workouts::workouts::types::{IntensityClass, Length, LengthMetric, Step, Target};
use structured_workouts::workouts::workout::Workout;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")
}

fn sample_structures() -> Vec<Structure> {
    vec![
        interval(&IntervalParams::default()).expect("valid template"),
        interval(&IntervalParams {
            intervals: 0,
            ..Default::default()
        })
        .expect("valid template"),
        interval_repeats(&IntervalParams::default()).expect("valid template"),
        tempo(&TempoParams::default()).expect("valid template"),
        long_steady(&LongSteadyParams::default()).expect("valid template"),
    ]
}

#[test]
fn test_matching_duration_never_fails() {
    for structure in sample_structures() {
        let duration = total_duration(&structure);
        let workout = Workout::new(
            "Planned",
            ActivityType::Bike,
            day(),
            Some(duration),
            Some(structure),
        )
        .expect("matching duration is accepted");
        assert_eq!(workout.duration(), Some(duration));
    }
}

#[test]
fn test_other_duration_always_fails() {
    for structure in sample_structures() {
        let duration = total_duration(&structure);
        for wrong in [0.0, duration - 1.0, duration + 0.5, duration * 2.0] {
            let err = Workout::new(
                "Planned",
                ActivityType::Bike,
                day(),
                Some(wrong),
                Some(structure.clone()),
            )
            .expect_err("mismatched duration is rejected");

            assert_eq!(
                err,
                ValidationError::Workout(WorkoutValidationError::DurationMismatch {
                    duration: wrong,
                    structure_duration: duration,
                })
            );
            let message = err.to_string();
            assert!(message.contains(&format!("({wrong}s)")));
            assert!(message.contains(&format!("({duration}s)")));
        }
    }
}

#[test]
fn test_validator_message_format() {
    let structure = tempo(&TempoParams::default()).expect("valid template");
    let err = validate_structure(3000.0, Some(&structure)).expect_err("mismatch");
    assert_eq!(
        err.to_string(),
        "Workout duration (3000s) doesn't match structure duration (2700s)"
    );
}

#[test]
fn test_validator_ignores_missing_structure() {
    assert!(validate_structure(0.0, None).is_ok());
    assert!(validate_structure(99_999.0, None).is_ok());
}

#[test]
fn test_workout_serializes_structure() {
    let structure = tempo(&TempoParams::default()).expect("valid template");
    let workout = Workout::new("Tempo", ActivityType::Run, day(), None, Some(structure))
        .expect("valid workout");

    let json = serde_json::to_value(&workout).expect("serializable");
    assert_eq!(json["title"], "Tempo");
    assert_eq!(json["activityType"], "RUN");
    assert_eq!(json["workoutDay"], "2024-06-01");
    assert_eq!(json["duration"], 2700.0);
    assert_eq!(json["structure"]["primaryLengthMetric"], "duration");
}

#[test]
fn test_near_miss_durations_fail() {
    for structure in sample_structures() {
        let duration = total_duration(&structure);
        for wrong in [duration + 5e-7, duration - 5e-7, duration + 1e-3] {
            let result = validate_structure(wrong, Some(&structure));
            assert!(result.is_err(), "{wrong} accepted for {duration}");
        }
    }
}

#[test]
fn test_distance_workout_duration_matches_metrics() {
    let run = Step::new(
        "Run",
        Length::meters(10_000.0).expect("valid length"),
        vec![Target::new(75.0, 85.0).expect("valid target")],
        IntensityClass::Active,
    )
    .expect("valid step");
    let structure = StructureBuilder::new()
        .length_metric(LengthMetric::Distance)
        .step(run)
        .build()
        .expect("valid structure");

    let workout = Workout::new("10k", ActivityType::Run, day(), None, Some(structure.clone()))
        .expect("derived duration");
    let metrics = workout.planned_metrics(65.0).expect("valid weight");
    let seconds = workout.duration().expect("duration derived");
    assert!((seconds - metrics.total_time_planned * 3600.0).abs() < 1e-9);

    let err = Workout::new("10k", ActivityType::Run, day(), Some(3600.0), Some(structure))
        .expect_err("explicit duration refused");
    assert_eq!(
        err,
        ValidationError::Workout(WorkoutValidationError::DistanceStructure { duration: 3600.0 })
    );
}
