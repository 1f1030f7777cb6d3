// ABOUTME: Tracking lifecycle state, derived run statistics and finished run snapshots
// ABOUTME: FinishedRun is what the save flow persists once tracking stops
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use super::Coordinate;

/// Location tracking lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingState {
    /// Not tracking; no path exists
    #[default]
    Idle,
    /// Recording fixes into the path
    Tracking,
    /// Run in progress but fixes are ignored
    Paused,
}

/// Statistics derived from the path and pause accounting
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    /// Total distance along the path (meters)
    pub distance_meters: f64,
    /// Estimated energy expenditure (kcal)
    pub calories: f64,
    /// Average pace (seconds per kilometer, zero before any distance)
    pub pace_seconds_per_km: f64,
    /// Running time excluding every paused interval
    pub elapsed_running_time: Duration,
}

/// Snapshot of a run taken when tracking stops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedRun {
    /// Session identifier
    pub session_id: Uuid,
    /// Time tracking started
    pub started_at: DateTime<Utc>,
    /// Time tracking stopped
    pub ended_at: DateTime<Utc>,
    /// Filtered path
    pub path: Vec<Coordinate>,
    /// Final statistics
    pub stats: RunStats,
}
