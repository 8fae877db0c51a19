//! Unit tests for the structure wire format.

use structured_workouts::workouts::duration::total_duration;
use structured_workouts::workouts::structure::{Structure, StructureElement};
use structured_workouts::workouts::templates::{interval_repeats, IntervalParams};
use structured_workouts::workouts::types::{
    IntensityClass, IntensityMetric, IntensityTargetOrRange, LengthMetric, LengthUnit,
};

/// Structure as returned by the planning API.
const SAMPLE_STRUCTURE: &str = r#"{
    "structure": [
        {
            "type": "step",
            "length": {"value": 1, "unit": "repetition"},
            "steps": [{
                "name": "Warm up",
                "length": {"value": 600, "unit": "second"},
                "targets": [{"minValue": 50, "maxValue": 65}],
                "intensityClass": "warmUp",
                "openDuration": false
            }],
            "begin": 0,
            "end": 600
        },
        {
            "type": "repetition",
            "length": {"value": 4, "unit": "repetition"},
            "steps": [
                {
                    "name": "Hard",
                    "length": {"value": 120, "unit": "second"},
                    "targets": [{"minValue": 95, "maxValue": 100}],
                    "intensityClass": "active",
                    "openDuration": false
                },
                {
                    "name": "Easy",
                    "length": {"value": 60, "unit": "second"},
                    "targets": [{"minValue": 40, "maxValue": 55}],
                    "intensityClass": "rest",
                    "openDuration": false
                }
            ],
            "begin": 600,
            "end": 1320
        },
        {
            "type": "step",
            "length": {"value": 1, "unit": "repetition"},
            "steps": [{
                "name": "Cool down",
                "length": {"value": 300, "unit": "second"},
                "targets": [{"minValue": 40, "maxValue": 50}],
                "intensityClass": "coolDown",
                "openDuration": true
            }],
            "begin": 1320,
            "end": 1620
        }
    ],
    "polyline": [[0, 0], [0, 0.58], [0.37, 0.58], [0.37, 0]],
    "primaryLengthMetric": "duration",
    "primaryIntensityMetric": "percentOfFtp",
    "primaryIntensityTargetOrRange": "range"
}"#;

#[test]
fn test_parse_api_structure() {
    let structure: Structure = serde_json::from_str(SAMPLE_STRUCTURE).expect("valid structure");

    assert_eq!(structure.elements().len(), 3);
    assert_eq!(structure.primary_length_metric(), LengthMetric::Duration);
    assert_eq!(
        structure.primary_intensity_metric(),
        IntensityMetric::PercentOfFtp
    );
    assert_eq!(
        structure.primary_intensity_target_or_range(),
        IntensityTargetOrRange::Range
    );
    assert_eq!(structure.polyline().len(), 4);
    assert_eq!(total_duration(&structure), 1620.0);

    match &structure.elements()[1] {
        StructureElement::Repetition(repetition) => {
            assert_eq!(repetition.count(), 4);
            assert_eq!(repetition.steps()[1].intensity_class(), IntensityClass::Rest);
            assert_eq!(repetition.begin(), 600.0);
            assert_eq!(repetition.end(), 1320.0);
        }
        StructureElement::Step(_) => panic!("expected repetition"),
    }

    let cooldown = &structure.elements()[2].steps()[0];
    assert!(cooldown.open_duration());
    assert_eq!(cooldown.length().unit(), LengthUnit::Second);
}

#[test]
fn test_serialize_keeps_wire_shape() {
    let structure: Structure = serde_json::from_str(SAMPLE_STRUCTURE).expect("valid structure");
    let reparsed: serde_json::Value = serde_json::to_value(&structure).expect("serializable");
    let original: serde_json::Value =
        serde_json::from_str(SAMPLE_STRUCTURE).expect("valid json");

    // Numbers come back as floats, so compare through f64
    let as_f64 = |v: &serde_json::Value| v.as_f64().expect("number");
    let top_level: Vec<&str> = reparsed
        .as_object()
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(top_level.len(), 5);
    for key in [
        "structure",
        "polyline",
        "primaryLengthMetric",
        "primaryIntensityMetric",
        "primaryIntensityTargetOrRange",
    ] {
        assert!(top_level.contains(&key), "missing {key}");
    }

    let element = &reparsed["structure"][1];
    assert_eq!(element["type"], "repetition");
    assert_eq!(as_f64(&element["length"]["value"]), 4.0);
    assert_eq!(element["length"]["unit"], "repetition");
    assert_eq!(element["steps"][0]["intensityClass"], "active");
    assert_eq!(
        as_f64(&element["steps"][1]["targets"][0]["minValue"]),
        as_f64(&original["structure"][1]["steps"][1]["targets"][0]["minValue"])
    );
    assert_eq!(reparsed["structure"][0]["type"], "step");
    assert_eq!(reparsed["structure"][2]["steps"][0]["openDuration"], true);
    assert_eq!(as_f64(&reparsed["polyline"][1][1]), 0.58);
}

#[test]
fn test_built_structure_round_trips() {
    let structure = interval_repeats(&IntervalParams::default()).expect("valid template");
    let json = serde_json::to_string(&structure).expect("serializable");
    let parsed: Structure = serde_json::from_str(&json).expect("parses back");
    assert_eq!(parsed, structure);
}

#[test]
fn test_rejects_invalid_payloads() {
    let bad_target = SAMPLE_STRUCTURE.replace(
        r#"{"minValue": 95, "maxValue": 100}"#,
        r#"{"minValue": 100, "maxValue": 95}"#,
    );
    let err = serde_json::from_str::<Structure>(&bad_target).expect_err("must fail");
    assert!(err.to_string().contains("minValue must be less than maxValue"));

    let over_hundred = SAMPLE_STRUCTURE.replace(
        r#"{"minValue": 95, "maxValue": 100}"#,
        r#"{"minValue": 95, "maxValue": 110}"#,
    );
    assert!(serde_json::from_str::<Structure>(&over_hundred).is_err());

    let negative_length = SAMPLE_STRUCTURE.replace(
        r#"{"value": 120, "unit": "second"}"#,
        r#"{"value": -120, "unit": "second"}"#,
    );
    let err = serde_json::from_str::<Structure>(&negative_length).expect_err("must fail");
    assert!(err.to_string().contains("length value must be non-negative"));

    let bad_repetition_unit = SAMPLE_STRUCTURE.replace(
        r#"{"value": 4, "unit": "repetition"}"#,
        r#"{"value": 4, "unit": "second"}"#,
    );
    assert!(serde_json::from_str::<Structure>(&bad_repetition_unit).is_err());

    let backwards_offsets = SAMPLE_STRUCTURE.replace(r#""end": 1620"#, r#""end": 1000"#);
    assert!(serde_json::from_str::<Structure>(&backwards_offsets).is_err());

    let empty_name = SAMPLE_STRUCTURE.replace(r#""name": "Hard""#, r#""name": """#);
    assert!(serde_json::from_str::<Structure>(&empty_name).is_err());
}

#[test]
fn test_empty_structure_payload() {
    let json = r#"{
        "structure": [],
        "polyline": [],
        "primaryLengthMetric": "duration",
        "primaryIntensityMetric": "percentOfThresholdHr",
        "primaryIntensityTargetOrRange": "target"
    }"#;
    let structure: Structure = serde_json::from_str(json).expect("valid structure");
    assert!(structure.is_empty());
    assert_eq!(total_duration(&structure), 0.0);
    assert_eq!(
        structure.primary_intensity_target_or_range(),
        IntensityTargetOrRange::Target
    );
}
