//! Workout building blocks: lengths, intensity targets and steps.
//!
//! All values are immutable once constructed. Constructors validate their
//! input and the same rules are applied when values are deserialized from
//! the JSON wire shape.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};

/// Unit attached to a [`Length`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LengthUnit {
    Second,
    Minute,
    Hour,
    Meter,
    Kilometer,
    Mile,
    /// Repeat count, only meaningful on repetition elements
    Repetition,
}

impl LengthUnit {
    /// Whether this unit measures elapsed time.
    pub fn is_time(&self) -> bool {
        matches!(self, LengthUnit::Second | LengthUnit::Minute | LengthUnit::Hour)
    }

    /// Whether this unit measures distance.
    pub fn is_distance(&self) -> bool {
        matches!(
            self,
            LengthUnit::Meter | LengthUnit::Kilometer | LengthUnit::Mile
        )
    }

    /// Factor to the family's base unit (seconds or meters).
    fn base_factor(&self) -> f64 {
        match self {
            LengthUnit::Second | LengthUnit::Meter | LengthUnit::Repetition => 1.0,
            LengthUnit::Minute => 60.0,
            LengthUnit::Hour => 3600.0,
            LengthUnit::Kilometer => 1000.0,
            LengthUnit::Mile => 1609.344,
        }
    }

    /// Base unit of this unit's family.
    fn base_unit(&self) -> LengthUnit {
        if self.is_time() {
            LengthUnit::Second
        } else if self.is_distance() {
            LengthUnit::Meter
        } else {
            LengthUnit::Repetition
        }
    }
}

impl std::fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LengthUnit::Second => write!(f, "second"),
            LengthUnit::Minute => write!(f, "minute"),
            LengthUnit::Hour => write!(f, "hour"),
            LengthUnit::Meter => write!(f, "meter"),
            LengthUnit::Kilometer => write!(f, "kilometer"),
            LengthUnit::Mile => write!(f, "mile"),
            LengthUnit::Repetition => write!(f, "repetition"),
        }
    }
}

/// A non-negative measurement with a unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLength")]
pub struct Length {
    value: f64,
    unit: LengthUnit,
}

#[derive(Deserialize)]
struct RawLength {
    value: f64,
    unit: LengthUnit,
}

impl TryFrom<RawLength> for Length {
    type Error = ValidationError;

    fn try_from(raw: RawLength) -> Result<Self, Self::Error> {
        Length::new(raw.value, raw.unit)
    }
}

impl Length {
    /// Create a length, rejecting negative or non-finite values.
    pub fn new(value: f64, unit: LengthUnit) -> ValidationResult<Self> {
        if !value.is_finite() {
            return Err(ValidationError::field(
                "value",
                "length value must be a finite number",
            ));
        }
        if value < 0.0 {
            return Err(ValidationError::field(
                "value",
                "length value must be non-negative",
            ));
        }
        Ok(Self { value, unit })
    }

    /// Length in seconds.
    pub fn seconds(seconds: f64) -> ValidationResult<Self> {
        Self::new(seconds, LengthUnit::Second)
    }

    /// Length given in minutes, stored as seconds.
    pub fn minutes(minutes: f64) -> ValidationResult<Self> {
        Self::new(minutes * 60.0, LengthUnit::Second)
    }

    /// Length in meters.
    pub fn meters(meters: f64) -> ValidationResult<Self> {
        Self::new(meters, LengthUnit::Meter)
    }

    /// Repeat count.
    pub fn repetitions(count: u32) -> Self {
        Self {
            value: count as f64,
            unit: LengthUnit::Repetition,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    /// Convert to the base unit of the same family (seconds or meters).
    ///
    /// Repetition counts are returned unchanged.
    pub fn normalized(&self) -> Length {
        Length {
            value: self.value * self.unit.base_factor(),
            unit: self.unit.base_unit(),
        }
    }
}

/// Metric the structure's lengths are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LengthMetric {
    #[default]
    Duration,
    Distance,
}

impl LengthMetric {
    /// Whether a step length unit belongs to this metric.
    pub fn accepts(&self, unit: LengthUnit) -> bool {
        match self {
            LengthMetric::Duration => unit.is_time(),
            LengthMetric::Distance => unit.is_distance(),
        }
    }
}

/// Metric the intensity targets are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntensityMetric {
    #[default]
    PercentOfFtp,
    PercentOfMaxHr,
    PercentOfThresholdHr,
    PercentOfThresholdPace,
    /// Rate of perceived exertion, 0-10 scale
    Rpe,
}

impl IntensityMetric {
    /// Highest value a target may declare.
    pub fn upper_bound(&self) -> f64 {
        match self {
            IntensityMetric::Rpe => 10.0,
            _ => 100.0,
        }
    }

    /// Express a target value on the 0-100 scale.
    pub fn to_percent(&self, value: f64) -> f64 {
        value * 100.0 / self.upper_bound()
    }
}

impl std::fmt::Display for IntensityMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntensityMetric::PercentOfFtp => write!(f, "% FTP"),
            IntensityMetric::PercentOfMaxHr => write!(f, "% max HR"),
            IntensityMetric::PercentOfThresholdHr => write!(f, "% threshold HR"),
            IntensityMetric::PercentOfThresholdPace => write!(f, "% threshold pace"),
            IntensityMetric::Rpe => write!(f, "RPE"),
        }
    }
}

/// Whether targets are shown as a single value or as a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntensityTargetOrRange {
    Target,
    #[default]
    Range,
}

/// Intensity range for a step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawTarget")]
pub struct Target {
    min_value: f64,
    max_value: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTarget {
    min_value: f64,
    max_value: f64,
}

impl TryFrom<RawTarget> for Target {
    type Error = ValidationError;

    fn try_from(raw: RawTarget) -> Result<Self, Self::Error> {
        Target::new(raw.min_value, raw.max_value)
    }
}

impl Target {
    /// Create a target range with `0 <= min < max`.
    pub fn new(min_value: f64, max_value: f64) -> ValidationResult<Self> {
        if !min_value.is_finite() || !max_value.is_finite() {
            return Err(ValidationError::field(
                "targets",
                "target values must be finite numbers",
            ));
        }
        if min_value < 0.0 {
            return Err(ValidationError::field(
                "minValue",
                "target minValue must be non-negative",
            ));
        }
        if min_value >= max_value {
            return Err(ValidationError::field(
                "minValue",
                "target minValue must be less than maxValue",
            ));
        }
        Ok(Self {
            min_value,
            max_value,
        })
    }

    /// Create a target and check it against the metric's upper bound.
    pub fn for_metric(
        min_value: f64,
        max_value: f64,
        metric: IntensityMetric,
    ) -> ValidationResult<Self> {
        let target = Self::new(min_value, max_value)?;
        target.check_metric(metric)?;
        Ok(target)
    }

    /// Fail when `max_value` exceeds what `metric` allows.
    pub fn check_metric(&self, metric: IntensityMetric) -> ValidationResult<()> {
        let bound = metric.upper_bound();
        if self.max_value > bound {
            return Err(ValidationError::field(
                "maxValue",
                format!("target maxValue must not exceed {bound} for {metric} targets"),
            ));
        }
        Ok(())
    }

    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    /// Middle of the range.
    pub fn midpoint(&self) -> f64 {
        (self.min_value + self.max_value) / 2.0
    }
}

/// Training purpose of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntensityClass {
    WarmUp,
    Active,
    Rest,
    CoolDown,
}

impl std::fmt::Display for IntensityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntensityClass::WarmUp => write!(f, "Warm Up"),
            IntensityClass::Active => write!(f, "Active"),
            IntensityClass::Rest => write!(f, "Rest"),
            IntensityClass::CoolDown => write!(f, "Cool Down"),
        }
    }
}

/// Lowest percentage an active effort is expected to start at.
pub const ACTIVE_FLOOR_PERCENT: f64 = 75.0;

/// A named leaf segment of a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawStep")]
pub struct Step {
    name: String,
    length: Length,
    targets: Vec<Target>,
    intensity_class: IntensityClass,
    open_duration: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStep {
    name: String,
    length: Length,
    targets: Vec<Target>,
    intensity_class: IntensityClass,
    #[serde(default)]
    open_duration: bool,
}

impl TryFrom<RawStep> for Step {
    type Error = ValidationError;

    fn try_from(raw: RawStep) -> Result<Self, Self::Error> {
        let step = Step::new(raw.name, raw.length, raw.targets, raw.intensity_class)?;
        Ok(step.with_open_duration(raw.open_duration))
    }
}

impl Step {
    /// Create a step with a fixed length.
    pub fn new(
        name: impl Into<String>,
        length: Length,
        targets: Vec<Target>,
        intensity_class: IntensityClass,
    ) -> ValidationResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::field("name", "step name must not be empty"));
        }
        if length.unit() == LengthUnit::Repetition {
            return Err(ValidationError::field(
                "length",
                "step length must be a time or distance, not a repetition count",
            ));
        }
        if targets.is_empty() {
            return Err(ValidationError::field(
                "targets",
                "step must have at least one target",
            ));
        }

        Ok(Self {
            name,
            length,
            targets,
            intensity_class,
            open_duration: false,
        })
    }

    /// Mark the step as open-ended (athlete presses lap to move on).
    pub fn with_open_duration(mut self, open: bool) -> Self {
        self.open_duration = open;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn length(&self) -> Length {
        self.length
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn intensity_class(&self) -> IntensityClass {
        self.intensity_class
    }

    pub fn open_duration(&self) -> bool {
        self.open_duration
    }

    /// Mean of the target midpoints.
    pub fn mean_target(&self) -> f64 {
        let sum: f64 = self.targets.iter().map(Target::midpoint).sum();
        sum / self.targets.len() as f64
    }

    /// Whether the targets look plausible for the intensity class.
    ///
    /// Rest and cool-down steps should stay below the active floor. This is
    /// advisory only; callers log rather than reject.
    pub fn matches_intensity_class(&self, metric: IntensityMetric) -> bool {
        match self.intensity_class {
            IntensityClass::Rest | IntensityClass::CoolDown => self
                .targets
                .iter()
                .all(|t| metric.to_percent(t.min_value) < ACTIVE_FLOOR_PERCENT),
            IntensityClass::WarmUp | IntensityClass::Active => true,
        }
    }
}
