//! Structured Workouts - command-line planner
//!
//! Builds a template from the configured defaults and prints the workout,
//! its structure and its planned metrics as JSON.
//!
//! Usage: `workout-plan [interval|interval-repeats|tempo|long-steady] [config.toml]`

use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use structured_workouts::config::{load_config, load_config_from, PlannerConfig};
use structured_workouts::workouts::templates::{
    interval, interval_repeats, long_steady, tempo, TemplateKind,
};
use structured_workouts::{calculate_planned_metrics, Structure, Workout};

fn build_template(kind: TemplateKind, config: &PlannerConfig) -> anyhow::Result<Structure> {
    let templates = &config.templates;
    let structure = match kind {
        TemplateKind::Interval => interval(&templates.interval)?,
        TemplateKind::IntervalRepeats => interval_repeats(&templates.interval)?,
        TemplateKind::Tempo => tempo(&templates.tempo)?,
        TemplateKind::LongSteady => long_steady(&templates.long_steady)?,
    };
    Ok(structure)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting workout-plan v{}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1);
    let kind: TemplateKind = match args.next() {
        Some(name) => name.parse::<TemplateKind>().with_context(|| {
            let keys: Vec<&str> = TemplateKind::all().iter().map(TemplateKind::key).collect();
            format!("expected one of: {}", keys.join(", "))
        })?,
        None => TemplateKind::Interval,
    };
    let config = match args.next() {
        Some(path) => load_config_from(&PathBuf::from(path))?,
        None => load_config()?,
    };

    let structure = build_template(kind, &config)
        .with_context(|| format!("failed to build {kind} template"))?;
    let metrics = calculate_planned_metrics(&structure, &config.athlete);

    let workout = Workout::new(
        kind.display_name(),
        config.athlete.activity_type(),
        Utc::now().date_naive(),
        None,
        Some(structure),
    )?;

    let output = serde_json::json!({
        "workout": workout,
        "metrics": metrics,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
