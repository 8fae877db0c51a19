//! Structured workout model, duration aggregation and templates.

pub mod duration;
pub mod structure;
pub mod templates;
pub mod types;
pub mod workout;

pub use duration::{element_duration, total_duration, validate_structure};
pub use structure::{
    build_polyline, Repetition, SingleStep, Structure, StructureBuilder, StructureElement,
};
pub use templates::{
    interval, interval_repeats, long_steady, target_window, tempo, IntervalParams,
    LongSteadyParams, TemplateKind, TempoParams,
};
pub use types::{
    IntensityClass, IntensityMetric, IntensityTargetOrRange, Length, LengthMetric, LengthUnit,
    Step, Target,
};
pub use workout::Workout;
