// ABOUTME: Replays a recorded fix file against a course and prints every engine event as JSON lines
// ABOUTME: Uses the fix timestamps as the clock so pause-free replays are deterministic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Replay a run against a course with the default 50 m tolerance
//! runline-replay --course course.json --fixes run.json
//!
//! # Tighter corridor with debug logging on stderr
//! runline-replay --course course.json --fixes run.json --tolerance 25 --verbose
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use runline::clock::ManualClock;
use runline::config::EngineConfig;
use runline::course::CourseTopology;
use runline::errors::TrackingError;
use runline::logging::LoggingConfig;
use runline::models::{
    Coordinate, DeviationAssessment, Fix, NavigationState, RunStats, TrackingState,
    ValidationResult,
};
use runline::navigation::{GuidanceMessage, LoggingSpeechSink};
use runline::session::{RunEvent, RunObserver, RunSession};
use runline::tracking::{FixSender, PositionProvider, SubscriptionHandle};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "runline-replay",
    about = "Replay recorded GPS fixes against a course",
    long_about = "Feeds a recorded fix file through the Runline engine and prints path, validation, navigation and stats events as JSON lines.\n\nDistances that cannot be measured (no usable course geometry, no turn ahead) are infinite and written as null; validation and navigation events carry \"available\": false in that case."
)]
struct Cli {
    /// Course topology file (JSON)
    #[arg(long)]
    course: PathBuf,

    /// Recorded fixes file (JSON array, oldest first)
    #[arg(long)]
    fixes: PathBuf,

    /// On-course tolerance in meters (overrides RUNLINE_TOLERANCE_METERS)
    #[arg(long)]
    tolerance: Option<f64>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// Position provider serving the first recorded fix; the rest are fed directly
struct ReplayProvider {
    first: Option<Fix>,
}

impl PositionProvider for ReplayProvider {
    fn current_fix(&mut self) -> Result<Fix, TrackingError> {
        self.first.ok_or(TrackingError::NoFixAvailable)
    }

    fn subscribe(&mut self, _sink: FixSender) -> Result<SubscriptionHandle, TrackingError> {
        Ok(SubscriptionHandle::new(1))
    }

    fn unsubscribe(&mut self, _handle: SubscriptionHandle) {}
}

/// Observer writing each event to stdout as one JSON object per line
struct JsonLinesObserver;

impl JsonLinesObserver {
    fn write(event: &impl Serialize) {
        let mut out = io::stdout().lock();
        let written = serde_json::to_writer(&mut out, event)
            .map_err(io::Error::from)
            .and_then(|()| writeln!(out));
        if let Err(e) = written {
            warn!("Failed to write event: {e}");
        }
    }
}

impl RunObserver for JsonLinesObserver {
    fn on_path_changed(&mut self, path: &[Coordinate]) {
        Self::write(&RunEvent::path_changed(path));
    }

    fn on_validation(&mut self, result: &ValidationResult, assessment: &DeviationAssessment) {
        Self::write(&RunEvent::validation(result, assessment));
    }

    fn on_navigation(&mut self, state: &NavigationState, message: Option<&GuidanceMessage>) {
        Self::write(&RunEvent::navigation(state, message));
    }

    fn on_stats(&mut self, stats: &RunStats) {
        Self::write(&RunEvent::Stats { stats: *stats });
    }

    fn on_state_changed(&mut self, state: TrackingState) {
        Self::write(&RunEvent::StateChanged { state });
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let logging = LoggingConfig::from_env();
    let logging = if cli.verbose {
        logging.with_level("debug")
    } else {
        logging
    };
    logging.init()?;

    let mut config = EngineConfig::load()?;
    if let Some(tolerance) = cli.tolerance {
        config.validation.tolerance_meters = tolerance;
    }
    config.validate()?;

    let course: CourseTopology = read_json(&cli.course)?;
    let fixes: Vec<Fix> = read_json(&cli.fixes)?;
    let Some(first) = fixes.first().copied() else {
        bail!("{} contains no fixes", cli.fixes.display());
    };
    info!(
        course_id = course.course_id(),
        fixes = fixes.len(),
        tolerance = config.validation.tolerance_meters,
        "Replaying run"
    );

    let clock = ManualClock::new(first.timestamp);
    let mut session = RunSession::new(
        config,
        Box::new(ReplayProvider { first: Some(first) }),
        Box::new(LoggingSpeechSink),
        Arc::new(clock.clone()),
    );
    session.add_observer(Box::new(JsonLinesObserver));
    session.set_course(Some(course));
    let _fixes = session.start()?;

    for fix in fixes.into_iter().skip(1) {
        clock.set(fix.timestamp);
        session.on_fix_received(fix);
        session.on_timer_tick();
    }

    let back_on_course = session.validator().check_course_return();
    if let Some(finished) = session.stop() {
        JsonLinesObserver::write(&serde_json::json!({
            "event": "finished",
            "backOnCourse": back_on_course,
            "run": finished,
        }));
    }
    Ok(())
}
