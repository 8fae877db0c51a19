//! Canonical workout templates.
//!
//! Each template is assembled from the step generators below and returns a
//! complete %FTP, duration-based [`Structure`].

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::workouts::structure::{Structure, StructureBuilder};
use crate::workouts::types::{IntensityClass, Length, Step, Target};

/// Half width of the target window around an intensity.
pub const TARGET_HALF_WIDTH: f64 = 5.0;

/// Lowest and highest intensity a template target may reach.
const INTENSITY_FLOOR: f64 = 0.0;
const INTENSITY_CEILING: f64 = 100.0;

/// Intensities used for the easy steps.
pub const WARMUP_INTENSITY: f64 = 55.0;
pub const RECOVERY_INTENSITY: f64 = 50.0;
pub const COOLDOWN_INTENSITY: f64 = 50.0;

/// Target window of ±5 around `intensity`, each bound clamped on its own.
///
/// At the edges the window shrinks to 5 points: `0 => [0, 5]`,
/// `100 => [95, 100]`. Intensities beyond the edges pin to those windows.
pub fn target_window(intensity: f64) -> ValidationResult<Target> {
    if !intensity.is_finite() {
        return Err(ValidationError::field(
            "intensity",
            "intensity must be a finite number",
        ));
    }
    let min = (intensity - TARGET_HALF_WIDTH)
        .clamp(INTENSITY_FLOOR, INTENSITY_CEILING - TARGET_HALF_WIDTH);
    let max = (intensity + TARGET_HALF_WIDTH)
        .clamp(INTENSITY_FLOOR + TARGET_HALF_WIDTH, INTENSITY_CEILING);
    Target::new(min, max)
}

fn timed_step(
    name: &str,
    minutes: f64,
    intensity: f64,
    class: IntensityClass,
) -> ValidationResult<Step> {
    Step::new(
        name,
        Length::minutes(minutes)?,
        vec![target_window(intensity)?],
        class,
    )
}

pub fn warmup_step(minutes: f64) -> ValidationResult<Step> {
    timed_step("Warmup", minutes, WARMUP_INTENSITY, IntensityClass::WarmUp)
}

pub fn interval_step(minutes: f64, intensity: f64) -> ValidationResult<Step> {
    timed_step("Interval", minutes, intensity, IntensityClass::Active)
}

pub fn recovery_step(minutes: f64) -> ValidationResult<Step> {
    timed_step("Recovery", minutes, RECOVERY_INTENSITY, IntensityClass::Rest)
}

pub fn steady_step(minutes: f64, intensity: f64) -> ValidationResult<Step> {
    timed_step("Steady", minutes, intensity, IntensityClass::Active)
}

pub fn cooldown_step(minutes: f64) -> ValidationResult<Step> {
    timed_step("Cooldown", minutes, COOLDOWN_INTENSITY, IntensityClass::CoolDown)
}

fn check_minutes(field: &'static str, minutes: f64) -> ValidationResult<()> {
    if !minutes.is_finite() || minutes <= 0.0 {
        return Err(ValidationError::field(
            field,
            format!("{field} must be a positive number of minutes"),
        ));
    }
    Ok(())
}

/// Interval session parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntervalParams {
    /// Warm-up length in minutes (default 10)
    pub warmup_minutes: f64,
    /// Work interval length in minutes (default 5)
    pub interval_minutes: f64,
    /// Work interval intensity in percent (default 95)
    pub intensity: f64,
    /// Recovery length in minutes (default 3)
    pub recovery_minutes: f64,
    /// Number of work intervals (default 4)
    pub intervals: u32,
    /// Cool-down length in minutes (default 10)
    pub cooldown_minutes: f64,
}

impl Default for IntervalParams {
    fn default() -> Self {
        Self {
            warmup_minutes: 10.0,
            interval_minutes: 5.0,
            intensity: 95.0,
            recovery_minutes: 3.0,
            intervals: 4,
            cooldown_minutes: 10.0,
        }
    }
}

impl IntervalParams {
    fn validate(&self) -> ValidationResult<()> {
        check_minutes("warmupMinutes", self.warmup_minutes)?;
        check_minutes("cooldownMinutes", self.cooldown_minutes)?;
        if self.intervals > 0 {
            check_minutes("intervalMinutes", self.interval_minutes)?;
            check_minutes("recoveryMinutes", self.recovery_minutes)?;
        }
        Ok(())
    }
}

/// Tempo session parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TempoParams {
    /// Warm-up length in minutes (default 15)
    pub warmup_minutes: f64,
    /// Tempo block length in minutes (default 20)
    pub tempo_minutes: f64,
    /// Tempo intensity in percent (default 85)
    pub intensity: f64,
    /// Cool-down length in minutes (default 10)
    pub cooldown_minutes: f64,
}

impl Default for TempoParams {
    fn default() -> Self {
        Self {
            warmup_minutes: 15.0,
            tempo_minutes: 20.0,
            intensity: 85.0,
            cooldown_minutes: 10.0,
        }
    }
}

/// Long steady session parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LongSteadyParams {
    /// Warm-up length in minutes (default 10)
    pub warmup_minutes: f64,
    /// Steady block length in minutes (default 90)
    pub steady_minutes: f64,
    /// Steady intensity in percent (default 70)
    pub intensity: f64,
    /// Cool-down length in minutes (default 10)
    pub cooldown_minutes: f64,
}

impl Default for LongSteadyParams {
    fn default() -> Self {
        Self {
            warmup_minutes: 10.0,
            steady_minutes: 90.0,
            intensity: 70.0,
            cooldown_minutes: 10.0,
        }
    }
}

/// Warmup, `intervals` work efforts separated by recoveries, Cooldown.
///
/// No recovery follows the last effort, so `intervals = 0` yields just
/// `[Warmup, Cooldown]`.
pub fn interval(params: &IntervalParams) -> ValidationResult<Structure> {
    params.validate()?;

    let mut builder = StructureBuilder::new().step(warmup_step(params.warmup_minutes)?);
    for index in 0..params.intervals {
        builder = builder.step(interval_step(params.interval_minutes, params.intensity)?);
        if index + 1 < params.intervals {
            builder = builder.step(recovery_step(params.recovery_minutes)?);
        }
    }
    let structure = builder.step(cooldown_step(params.cooldown_minutes)?).build()?;

    tracing::debug!(
        intervals = params.intervals,
        elements = structure.elements().len(),
        "Built interval template"
    );
    Ok(structure)
}

/// Interval session written as one repetition block.
///
/// Every cycle is `[Interval, Recovery]`, so a recovery also follows the last
/// effort, unlike [`interval`].
pub fn interval_repeats(params: &IntervalParams) -> ValidationResult<Structure> {
    params.validate()?;

    let mut builder = StructureBuilder::new().step(warmup_step(params.warmup_minutes)?);
    if params.intervals > 0 {
        let cycle = vec![
            interval_step(params.interval_minutes, params.intensity)?,
            recovery_step(params.recovery_minutes)?,
        ];
        builder = builder.repetition(params.intervals, cycle);
    }
    builder.step(cooldown_step(params.cooldown_minutes)?).build()
}

/// Warmup, one steady tempo block, Cooldown.
pub fn tempo(params: &TempoParams) -> ValidationResult<Structure> {
    check_minutes("warmupMinutes", params.warmup_minutes)?;
    check_minutes("tempoMinutes", params.tempo_minutes)?;
    check_minutes("cooldownMinutes", params.cooldown_minutes)?;

    StructureBuilder::new()
        .step(warmup_step(params.warmup_minutes)?)
        .step(steady_step(params.tempo_minutes, params.intensity)?)
        .step(cooldown_step(params.cooldown_minutes)?)
        .build()
}

/// Warmup, one long continuous steady block, Cooldown.
pub fn long_steady(params: &LongSteadyParams) -> ValidationResult<Structure> {
    check_minutes("warmupMinutes", params.warmup_minutes)?;
    check_minutes("steadyMinutes", params.steady_minutes)?;
    check_minutes("cooldownMinutes", params.cooldown_minutes)?;

    StructureBuilder::new()
        .step(warmup_step(params.warmup_minutes)?)
        .step(steady_step(params.steady_minutes, params.intensity)?)
        .step(cooldown_step(params.cooldown_minutes)?)
        .build()
}

/// Available templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateKind {
    Interval,
    IntervalRepeats,
    Tempo,
    LongSteady,
}

impl TemplateKind {
    /// Get display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            TemplateKind::Interval => "Intervals",
            TemplateKind::IntervalRepeats => "Interval Repeats",
            TemplateKind::Tempo => "Tempo",
            TemplateKind::LongSteady => "Long Steady",
        }
    }

    /// Name accepted on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            TemplateKind::Interval => "interval",
            TemplateKind::IntervalRepeats => "interval-repeats",
            TemplateKind::Tempo => "tempo",
            TemplateKind::LongSteady => "long-steady",
        }
    }

    /// Get all templates.
    pub fn all() -> Vec<TemplateKind> {
        vec![
            TemplateKind::Interval,
            TemplateKind::IntervalRepeats,
            TemplateKind::Tempo,
            TemplateKind::LongSteady,
        ]
    }
}

impl std::fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for TemplateKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "interval" | "intervals" => Ok(TemplateKind::Interval),
            "interval-repeats" | "repeats" => Ok(TemplateKind::IntervalRepeats),
            "tempo" => Ok(TemplateKind::Tempo),
            "long-steady" | "longsteady" | "long_steady" => Ok(TemplateKind::LongSteady),
            other => Err(ValidationError::field(
                "template",
                format!("unknown template '{other}'"),
            )),
        }
    }
}
