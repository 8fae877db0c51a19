//! Composite workout structure: step and repetition elements, and the
//! aggregate [`Structure`] exchanged with the planning API.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::workouts::duration::{cycle_duration, element_duration, step_length};
use crate::workouts::types::{
    IntensityMetric, IntensityTargetOrRange, Length, LengthMetric, LengthUnit, Step,
};

/// Decimal places kept for polyline coordinates.
const POLYLINE_PRECISION: f64 = 10_000.0;

/// A single step placed on the workout timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleStep {
    /// The placed step
    step: Step,
    /// Offset where the step starts
    begin: f64,
    /// Offset where the step ends
    end: f64,
}

impl SingleStep {
    /// The placed step.
    pub fn step(&self) -> &Step {
        &self.step
    }

    /// Start offset in base units.
    pub fn begin(&self) -> f64 {
        self.begin
    }

    /// End offset in base units.
    pub fn end(&self) -> f64 {
        self.end
    }
}

/// A cycle of steps repeated `count` times.
#[derive(Debug, Clone, PartialEq)]
pub struct Repetition {
    /// Number of cycles (at least 1)
    count: u32,
    /// Steps of one cycle
    steps: Vec<Step>,
    /// Offset where the first cycle starts
    begin: f64,
    /// Offset where the last cycle ends
    end: f64,
}

impl Repetition {
    /// Number of cycles.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Steps of one cycle, in order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Start offset of the first cycle.
    pub fn begin(&self) -> f64 {
        self.begin
    }

    /// End offset of the last cycle.
    pub fn end(&self) -> f64 {
        self.end
    }
}

/// Node of a workout structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawElement", into = "RawElement")]
pub enum StructureElement {
    Step(SingleStep),
    Repetition(Repetition),
}

fn check_offsets(begin: f64, end: f64) -> ValidationResult<()> {
    if !begin.is_finite() || !end.is_finite() {
        return Err(ValidationError::field(
            "begin",
            "element offsets must be finite numbers",
        ));
    }
    if begin < 0.0 {
        return Err(ValidationError::field(
            "begin",
            "element begin must be non-negative",
        ));
    }
    if end <= begin {
        return Err(ValidationError::field(
            "end",
            "element end must be greater than begin",
        ));
    }
    Ok(())
}

impl StructureElement {
    /// Place one step between `begin` and `end`.
    pub fn step(step: Step, begin: f64, end: f64) -> ValidationResult<Self> {
        check_offsets(begin, end)?;
        Ok(StructureElement::Step(SingleStep { step, begin, end }))
    }

    /// Repeat `steps` `count` times between `begin` and `end`.
    pub fn repetition(count: u32, steps: Vec<Step>, begin: f64, end: f64) -> ValidationResult<Self> {
        if count == 0 {
            return Err(ValidationError::field(
                "length",
                "repetition count must be at least 1",
            ));
        }
        if steps.is_empty() {
            return Err(ValidationError::field(
                "steps",
                "repetition must contain at least one step",
            ));
        }
        check_offsets(begin, end)?;
        Ok(StructureElement::Repetition(Repetition {
            count,
            steps,
            begin,
            end,
        }))
    }

    pub fn begin(&self) -> f64 {
        match self {
            StructureElement::Step(single) => single.begin,
            StructureElement::Repetition(repetition) => repetition.begin,
        }
    }

    pub fn end(&self) -> f64 {
        match self {
            StructureElement::Step(single) => single.end,
            StructureElement::Repetition(repetition) => repetition.end,
        }
    }

    /// Element length as sent on the wire (a repeat count).
    pub fn length(&self) -> Length {
        match self {
            StructureElement::Step(_) => Length::repetitions(1),
            StructureElement::Repetition(repetition) => Length::repetitions(repetition.count),
        }
    }

    /// Steps as listed in the element (one cycle for repetitions).
    pub fn steps(&self) -> &[Step] {
        match self {
            StructureElement::Step(single) => std::slice::from_ref(&single.step),
            StructureElement::Repetition(repetition) => &repetition.steps,
        }
    }

    /// Steps in execution order, repetitions unrolled.
    pub fn expanded_steps(&self) -> impl Iterator<Item = &Step> + '_ {
        let times = match self {
            StructureElement::Step(_) => 1,
            StructureElement::Repetition(repetition) => repetition.count as usize,
        };
        std::iter::repeat(self.steps()).take(times).flatten()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
enum ElementKind {
    Step,
    Repetition,
}

/// Wire representation of an element.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawElement {
    #[serde(rename = "type")]
    kind: ElementKind,
    length: Length,
    steps: Vec<Step>,
    begin: f64,
    end: f64,
}

impl TryFrom<RawElement> for StructureElement {
    type Error = ValidationError;

    fn try_from(raw: RawElement) -> Result<Self, Self::Error> {
        match raw.kind {
            ElementKind::Step => {
                let mut steps = raw.steps.into_iter();
                match (steps.next(), steps.next()) {
                    (Some(step), None) => StructureElement::step(step, raw.begin, raw.end),
                    _ => Err(ValidationError::field(
                        "steps",
                        "step element must contain exactly one step",
                    )),
                }
            }
            ElementKind::Repetition => {
                let length = raw.length;
                if length.unit() != LengthUnit::Repetition {
                    return Err(ValidationError::field(
                        "length",
                        "repetition length unit must be repetition",
                    ));
                }
                if length.value().fract() != 0.0 || length.value() > u32::MAX as f64 {
                    return Err(ValidationError::field(
                        "length",
                        "repetition count must be a whole number",
                    ));
                }
                StructureElement::repetition(
                    length.value() as u32,
                    raw.steps,
                    raw.begin,
                    raw.end,
                )
            }
        }
    }
}

impl From<StructureElement> for RawElement {
    fn from(element: StructureElement) -> Self {
        let length = element.length();
        match element {
            StructureElement::Step(single) => RawElement {
                kind: ElementKind::Step,
                length,
                steps: vec![single.step],
                begin: single.begin,
                end: single.end,
            },
            StructureElement::Repetition(repetition) => RawElement {
                kind: ElementKind::Repetition,
                length,
                steps: repetition.steps,
                begin: repetition.begin,
                end: repetition.end,
            },
        }
    }
}

/// A complete structured workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawStructure")]
pub struct Structure {
    structure: Vec<StructureElement>,
    polyline: Vec<[f64; 2]>,
    primary_length_metric: LengthMetric,
    primary_intensity_metric: IntensityMetric,
    primary_intensity_target_or_range: IntensityTargetOrRange,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStructure {
    structure: Vec<StructureElement>,
    #[serde(default)]
    polyline: Vec<[f64; 2]>,
    primary_length_metric: LengthMetric,
    primary_intensity_metric: IntensityMetric,
    primary_intensity_target_or_range: IntensityTargetOrRange,
}

impl TryFrom<RawStructure> for Structure {
    type Error = ValidationError;

    fn try_from(raw: RawStructure) -> Result<Self, Self::Error> {
        Structure::new(
            raw.structure,
            raw.polyline,
            raw.primary_length_metric,
            raw.primary_intensity_metric,
            raw.primary_intensity_target_or_range,
        )
    }
}

impl Structure {
    /// Assemble a structure from already placed elements.
    ///
    /// Every step length must belong to the length metric's unit family and
    /// every target must fit the intensity metric. Steps whose targets look
    /// wrong for their intensity class are logged, not rejected.
    pub fn new(
        structure: Vec<StructureElement>,
        polyline: Vec<[f64; 2]>,
        primary_length_metric: LengthMetric,
        primary_intensity_metric: IntensityMetric,
        primary_intensity_target_or_range: IntensityTargetOrRange,
    ) -> ValidationResult<Self> {
        if polyline.iter().flatten().any(|v| !v.is_finite()) {
            return Err(ValidationError::field(
                "polyline",
                "polyline points must be finite numbers",
            ));
        }

        for step in structure.iter().flat_map(StructureElement::steps) {
            let unit = step.length().unit();
            if !primary_length_metric.accepts(unit) {
                return Err(ValidationError::field(
                    "primaryLengthMetric",
                    format!(
                        "step '{}' is measured in {unit}, which does not fit a {:?} structure",
                        step.name(),
                        primary_length_metric
                    ),
                ));
            }
            for target in step.targets() {
                target.check_metric(primary_intensity_metric)?;
            }
            if !step.matches_intensity_class(primary_intensity_metric) {
                tracing::warn!(
                    step = step.name(),
                    class = %step.intensity_class(),
                    "Step targets are high for its intensity class"
                );
            }
        }

        Ok(Self {
            structure,
            polyline,
            primary_length_metric,
            primary_intensity_metric,
            primary_intensity_target_or_range,
        })
    }

    /// Ordered top-level elements.
    pub fn elements(&self) -> &[StructureElement] {
        &self.structure
    }

    pub fn polyline(&self) -> &[[f64; 2]] {
        &self.polyline
    }

    pub fn primary_length_metric(&self) -> LengthMetric {
        self.primary_length_metric
    }

    pub fn primary_intensity_metric(&self) -> IntensityMetric {
        self.primary_intensity_metric
    }

    pub fn primary_intensity_target_or_range(&self) -> IntensityTargetOrRange {
        self.primary_intensity_target_or_range
    }

    pub fn is_empty(&self) -> bool {
        self.structure.is_empty()
    }

    /// Every step in execution order, repetitions unrolled.
    pub fn steps(&self) -> impl Iterator<Item = &Step> + '_ {
        self.structure
            .iter()
            .flat_map(StructureElement::expanded_steps)
    }

    /// Number of steps executed, repetitions unrolled.
    pub fn step_count(&self) -> usize {
        self.structure
            .iter()
            .map(|element| match element {
                StructureElement::Step(_) => 1,
                StructureElement::Repetition(r) => r.count as usize * r.steps.len(),
            })
            .sum()
    }
}

/// Build the visualization polyline for a list of elements.
///
/// Each step is drawn as a rectangle: x is the fraction of total length,
/// y the step's mean target relative to the highest one.
pub fn build_polyline(elements: &[StructureElement]) -> Vec<[f64; 2]> {
    let total: f64 = elements.iter().map(element_duration).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let steps = || elements.iter().flat_map(StructureElement::expanded_steps);
    let peak = steps().map(Step::mean_target).fold(0.0_f64, f64::max);
    if peak <= 0.0 {
        return Vec::new();
    }

    let round = |v: f64| (v * POLYLINE_PRECISION).round() / POLYLINE_PRECISION;
    let mut points = Vec::new();
    let mut x = 0.0;
    for step in steps() {
        let width = step_length(step) / total;
        let y = round(step.mean_target() / peak);
        let (x0, x1) = (round(x), round(x + width));
        points.extend_from_slice(&[[x0, 0.0], [x0, y], [x1, y], [x1, 0.0]]);
        x += width;
    }
    points
}

#[derive(Debug, Clone)]
enum PendingElement {
    Step(Step),
    Repetition(u32, Vec<Step>),
}

/// By-value builder that places elements back to back.
///
/// Every method consumes the builder and returns the updated one, so a
/// partially built structure is never shared or patched.
#[derive(Debug, Clone, Default)]
pub struct StructureBuilder {
    pending: Vec<PendingElement>,
    length_metric: LengthMetric,
    intensity_metric: IntensityMetric,
    target_or_range: IntensityTargetOrRange,
}

impl StructureBuilder {
    /// Start an empty duration / %FTP / range structure.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn length_metric(mut self, metric: LengthMetric) -> Self {
        self.length_metric = metric;
        self
    }

    pub fn intensity_metric(mut self, metric: IntensityMetric) -> Self {
        self.intensity_metric = metric;
        self
    }

    pub fn target_or_range(mut self, mode: IntensityTargetOrRange) -> Self {
        self.target_or_range = mode;
        self
    }

    /// Append a single step.
    pub fn step(mut self, step: Step) -> Self {
        self.pending.push(PendingElement::Step(step));
        self
    }

    /// Append a repeated cycle of steps.
    pub fn repetition(mut self, count: u32, steps: Vec<Step>) -> Self {
        self.pending.push(PendingElement::Repetition(count, steps));
        self
    }

    /// Assign offsets, derive the polyline and validate the result.
    pub fn build(self) -> ValidationResult<Structure> {
        let mut elements = Vec::with_capacity(self.pending.len());
        let mut cursor = 0.0;

        for pending in self.pending {
            let element = match pending {
                PendingElement::Step(step) => {
                    let end = cursor + step_length(&step);
                    StructureElement::step(step, cursor, end)?
                }
                PendingElement::Repetition(count, steps) => {
                    let end = cursor + count as f64 * cycle_duration(&steps);
                    StructureElement::repetition(count, steps, cursor, end)?
                }
            };
            cursor = element.end();
            elements.push(element);
        }

        let polyline = build_polyline(&elements);
        Structure::new(
            elements,
            polyline,
            self.length_metric,
            self.intensity_metric,
            self.target_or_range,
        )
    }
}
