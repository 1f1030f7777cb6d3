// ABOUTME: Run statistics (distance, pace, calories, net running time) derived from path and timing
// ABOUTME: The aggregator only emits when a derived value changed since the last emission
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Duration, Utc};
use runline_core::config::StatsConfig;
use runline_core::constants::stats::{KCAL_PER_KG_PER_KM, METERS_PER_KM};
use runline_core::models::{Coordinate, RunStats, TrackingState};
use tracing::trace;

use crate::geo::path_length_meters;
use crate::tracking::TrackingTiming;

/// Net running time at `now`, excluding completed and in-progress pauses
///
/// Clamped at zero and truncated to whole seconds.
#[must_use]
pub fn running_time(timing: &TrackingTiming, now: DateTime<Utc>) -> std::time::Duration {
    let Some(started_at) = timing.started_at else {
        return std::time::Duration::ZERO;
    };

    let mut running = now - started_at - timing.paused_time;
    if timing.state == TrackingState::Paused {
        if let Some(pause_started_at) = timing.pause_started_at {
            running -= (now - pause_started_at).max(Duration::zero());
        }
    }

    let seconds = running.num_seconds().max(0);
    std::time::Duration::from_secs(u64::try_from(seconds).unwrap_or(0))
}

/// Statistics of `path` at `now`
#[must_use]
pub fn compute(
    path: &[Coordinate],
    timing: &TrackingTiming,
    now: DateTime<Utc>,
    config: &StatsConfig,
) -> RunStats {
    if timing.started_at.is_none() {
        return RunStats::default();
    }

    let distance_meters = path_length_meters(path);
    let elapsed_running_time = running_time(timing, now);
    let km = distance_meters / METERS_PER_KM;

    let pace_seconds_per_km = if km > 0.0 {
        elapsed_running_time.as_secs_f64() / km
    } else {
        0.0
    };

    RunStats {
        distance_meters,
        calories: config.body_weight_kg * km * KCAL_PER_KG_PER_KM,
        pace_seconds_per_km,
        elapsed_running_time,
    }
}

/// Change-filtered statistics emitter
#[derive(Debug, Clone, Default)]
pub struct StatsAggregator {
    config: StatsConfig,
    last_emitted: Option<RunStats>,
}

impl StatsAggregator {
    /// Create an aggregator that has emitted nothing yet
    #[must_use]
    pub const fn new(config: StatsConfig) -> Self {
        Self {
            config,
            last_emitted: None,
        }
    }

    /// Recompute and return the stats only when they differ from the last emission
    pub fn refresh(
        &mut self,
        path: &[Coordinate],
        timing: &TrackingTiming,
        now: DateTime<Utc>,
    ) -> Option<RunStats> {
        let stats = compute(path, timing, now, &self.config);
        if self.last_emitted == Some(stats) {
            return None;
        }
        trace!(
            distance = stats.distance_meters,
            elapsed_secs = stats.elapsed_running_time.as_secs(),
            "Run stats changed"
        );
        self.last_emitted = Some(stats);
        Some(stats)
    }

    /// Last emitted stats
    #[must_use]
    pub const fn last_emitted(&self) -> Option<RunStats> {
        self.last_emitted
    }

    /// Forget the last emission
    pub fn reset(&mut self) {
        self.last_emitted = None;
    }
}
