//! Unit tests for duration aggregation.

use structured_workouts::workouts::duration::{
    element_duration, total_duration, validate_structure,
};
use structured_workouts::workouts::structure::{Structure, StructureBuilder};
use structured_workouts::workouts::types::{IntensityClass, Length, LengthUnit, Step, Target};

fn step(name: &str, seconds: f64, class: IntensityClass) -> Step {
    Step::new(
        name,
        Length::seconds(seconds).expect("valid length"),
        vec![Target::new(45.0, 55.0).expect("valid target")],
        class,
    )
    .expect("valid step")
}

#[test]
fn test_step_only_structures_are_additive() {
    let lengths = [300.0, 45.5, 1200.0, 60.0, 90.0, 600.0];

    let mut builder = StructureBuilder::new();
    for (i, seconds) in lengths.iter().enumerate() {
        builder = builder.step(step(&format!("Step {i}"), *seconds, IntensityClass::Active));
    }
    let structure = builder.build().expect("valid structure");

    let expected: f64 = lengths.iter().sum();
    assert!((total_duration(&structure) - expected).abs() < 1e-9);
}

#[test]
fn test_four_repetitions_of_interval_and_rest() {
    let structure = StructureBuilder::new()
        .repetition(
            4,
            vec![
                step("Interval", 120.0, IntensityClass::Active),
                step("Rest", 60.0, IntensityClass::Rest),
            ],
        )
        .build()
        .expect("valid structure");

    assert_eq!(total_duration(&structure), 720.0);
}

#[test]
fn test_repetition_is_count_times_cycle() {
    for count in 1..=10u32 {
        let structure = StructureBuilder::new()
            .repetition(
                count,
                vec![
                    step("On", 40.0, IntensityClass::Active),
                    step("Off", 20.0, IntensityClass::Rest),
                    step("Float", 30.0, IntensityClass::Active),
                ],
            )
            .build()
            .expect("valid structure");

        assert_eq!(total_duration(&structure), count as f64 * 90.0);
    }
}

#[test]
fn test_mixed_structure() {
    let structure = StructureBuilder::new()
        .step(step("Warmup", 600.0, IntensityClass::WarmUp))
        .repetition(
            5,
            vec![
                step("On", 30.0, IntensityClass::Active),
                step("Off", 30.0, IntensityClass::Rest),
            ],
        )
        .step(step("Steady", 900.0, IntensityClass::Active))
        .repetition(2, vec![step("Surge", 15.0, IntensityClass::Active)])
        .step(step("Cooldown", 300.0, IntensityClass::CoolDown))
        .build()
        .expect("valid structure");

    let per_element: Vec<f64> = structure.elements().iter().map(element_duration).collect();
    assert_eq!(per_element, vec![600.0, 300.0, 900.0, 30.0, 300.0]);
    assert_eq!(total_duration(&structure), 2130.0);

    // Offsets tile the timeline without gaps
    let last = structure.elements().last().expect("non-empty");
    assert_eq!(last.end(), total_duration(&structure));
}

#[test]
fn test_order_does_not_change_total() {
    let a = StructureBuilder::new()
        .step(step("A", 100.0, IntensityClass::Active))
        .repetition(3, vec![step("B", 50.0, IntensityClass::Active)])
        .build()
        .expect("valid structure");
    let b = StructureBuilder::new()
        .repetition(3, vec![step("B", 50.0, IntensityClass::Active)])
        .step(step("A", 100.0, IntensityClass::Active))
        .build()
        .expect("valid structure");

    assert_eq!(total_duration(&a), total_duration(&b));
    assert_eq!(a.elements()[1].begin(), 100.0);
    assert_eq!(b.elements()[1].begin(), 150.0);
}

#[test]
fn test_empty_structure() {
    let structure = StructureBuilder::new().build().expect("valid structure");
    assert!(structure.is_empty());
    assert_eq!(total_duration(&structure), 0.0);
}

#[test]
fn test_mixed_units_are_normalized() {
    let ten_minutes = Step::new(
        "Block",
        Length::new(10.0, LengthUnit::Minute).expect("valid length"),
        vec![Target::new(45.0, 55.0).expect("valid target")],
        IntensityClass::Active,
    )
    .expect("valid step");
    let structure = StructureBuilder::new()
        .step(ten_minutes)
        .step(step("Minute", 60.0, IntensityClass::Rest))
        .build()
        .expect("valid structure");

    assert_eq!(total_duration(&structure), 660.0);
    let offsets: Vec<(f64, f64)> = structure
        .elements()
        .iter()
        .map(|e| (e.begin(), e.end()))
        .collect();
    assert_eq!(offsets, vec![(0.0, 600.0), (600.0, 660.0)]);
}

#[test]
fn test_hour_step_from_wire_counts_in_seconds() {
    let json = r#"{
        "structure": [{
            "type": "step",
            "length": {"value": 1, "unit": "repetition"},
            "steps": [{
                "name": "Endurance",
                "length": {"value": 1, "unit": "hour"},
                "targets": [{"minValue": 60, "maxValue": 70}],
                "intensityClass": "active",
                "openDuration": false
            }],
            "begin": 0,
            "end": 3600
        }],
        "polyline": [],
        "primaryLengthMetric": "duration",
        "primaryIntensityMetric": "percentOfFtp",
        "primaryIntensityTargetOrRange": "range"
    }"#;
    let structure: Structure = serde_json::from_str(json).expect("valid structure");

    assert_eq!(total_duration(&structure), 3600.0);
    assert!(validate_structure(3600.0, Some(&structure)).is_ok());
}
