// ABOUTME: Location tracking state machine owning the live path and pause accounting
// ABOUTME: Single choke point for path mutation with distance-filtered point admission
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Location Tracking
//!
//! `Idle -> Tracking <-> Paused -> (stop) -> Idle`.
//!
//! The tracker holds at most one position subscription and releases it on
//! `stop()` or drop. Fixes reach the path only through [`LocationTracker::record_fix`],
//! which discards points closer than the configured minimum distance to the
//! previous one.

mod provider;

pub use provider::{FixReceiver, FixSender, PositionProvider, SubscriptionHandle};

use chrono::{DateTime, Duration, Utc};
use runline_core::config::TrackingConfig;
use runline_core::errors::TrackingError;
use runline_core::models::{Coordinate, Fix, TrackingState};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::geo::distance_meters;

/// What happened to a fix handed to [`LocationTracker::record_fix`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixOutcome {
    /// Appended to the path
    Appended,
    /// Within the minimum distance of the last point
    TooClose,
    /// Reported accuracy worse than the configured maximum
    Inaccurate,
    /// NaN or out-of-range coordinate
    InvalidCoordinate,
    /// Tracker is idle or paused
    NotTracking,
}

impl FixOutcome {
    /// True when the path grew
    #[must_use]
    pub const fn path_changed(self) -> bool {
        matches!(self, Self::Appended)
    }
}

/// Timing snapshot used by the statistics aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingTiming {
    /// Lifecycle state
    pub state: TrackingState,
    /// Time tracking started
    pub started_at: Option<DateTime<Utc>>,
    /// Sum of completed pauses
    pub paused_time: Duration,
    /// Start of the pause in progress
    pub pause_started_at: Option<DateTime<Utc>>,
}

impl Default for TrackingTiming {
    fn default() -> Self {
        Self {
            state: TrackingState::Idle,
            started_at: None,
            paused_time: Duration::zero(),
            pause_started_at: None,
        }
    }
}

/// Path and timing of a run whose tracking was stopped
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedTrack {
    /// Filtered path
    pub path: Vec<Coordinate>,
    /// Time tracking started
    pub started_at: DateTime<Utc>,
    /// Time tracking stopped
    pub ended_at: DateTime<Utc>,
    /// Total paused time, including a pause still open at stop
    pub paused_time: Duration,
}

impl CompletedTrack {
    /// Timing equivalent of the finished run, for a final statistics pass
    #[must_use]
    pub const fn timing(&self) -> TrackingTiming {
        TrackingTiming {
            state: TrackingState::Idle,
            started_at: Some(self.started_at),
            paused_time: self.paused_time,
            pause_started_at: None,
        }
    }
}

/// Location tracking state machine
pub struct LocationTracker {
    provider: Box<dyn PositionProvider>,
    clock: Arc<dyn Clock>,
    config: TrackingConfig,
    state: TrackingState,
    path: Vec<Coordinate>,
    started_at: Option<DateTime<Utc>>,
    paused_time: Duration,
    pause_started_at: Option<DateTime<Utc>>,
    subscription: Option<SubscriptionHandle>,
    last_fix: Option<Fix>,
}

impl LocationTracker {
    /// Create an idle tracker
    #[must_use]
    pub fn new(
        provider: Box<dyn PositionProvider>,
        clock: Arc<dyn Clock>,
        config: TrackingConfig,
    ) -> Self {
        Self {
            provider,
            clock,
            config,
            state: TrackingState::Idle,
            path: Vec::new(),
            started_at: None,
            paused_time: Duration::zero(),
            pause_started_at: None,
            subscription: None,
            last_fix: None,
        }
    }

    /// Begin tracking: seed the path with the current fix and subscribe to updates
    ///
    /// The returned receiver yields every fix the provider delivers; feed them
    /// back through [`Self::record_fix`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless idle, and any provider error from
    /// reading the current fix or subscribing. The tracker stays idle on error.
    pub fn start(&mut self) -> Result<FixReceiver, TrackingError> {
        if self.state != TrackingState::Idle {
            return Err(TrackingError::InvalidTransition {
                from: self.state,
                action: "start",
            });
        }

        let first = self.provider.current_fix()?;
        if !first.coordinate.is_valid() {
            warn!(coordinate = ?first.coordinate, "Provider returned an invalid starting fix");
            return Err(TrackingError::NoFixAvailable);
        }

        let (sender, receiver) = mpsc::unbounded_channel();
        let handle = self.provider.subscribe(sender)?;

        let now = self.clock.now();
        self.subscription = Some(handle);
        self.path.clear();
        self.path.push(first.coordinate);
        self.started_at = Some(now);
        self.paused_time = Duration::zero();
        self.pause_started_at = None;
        self.last_fix = Some(first);
        self.state = TrackingState::Tracking;

        info!(
            subscription = handle.id(),
            started_at = %now,
            "Location tracking started"
        );
        Ok(receiver)
    }

    /// Pause a running track or resume a paused one
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` when idle
    pub fn toggle(&mut self) -> Result<TrackingState, TrackingError> {
        let now = self.clock.now();
        match self.state {
            TrackingState::Idle => {
                return Err(TrackingError::InvalidTransition {
                    from: TrackingState::Idle,
                    action: "toggle",
                })
            }
            TrackingState::Tracking => {
                self.pause_started_at = Some(now);
                self.state = TrackingState::Paused;
                info!("Location tracking paused");
            }
            TrackingState::Paused => {
                if let Some(pause_start) = self.pause_started_at.take() {
                    self.paused_time += (now - pause_start).max(Duration::zero());
                }
                self.state = TrackingState::Tracking;
                info!(
                    paused_secs = self.paused_time.num_seconds(),
                    "Location tracking resumed"
                );
            }
        }
        Ok(self.state)
    }

    /// Stop tracking, release the subscription and clear the path
    ///
    /// Returns the completed track, or `None` when already idle.
    pub fn stop(&mut self) -> Option<CompletedTrack> {
        self.release_subscription();
        if self.state == TrackingState::Idle {
            return None;
        }

        let ended_at = self.clock.now();
        let mut paused_time = self.paused_time;
        if let Some(pause_start) = self.pause_started_at {
            paused_time += (ended_at - pause_start).max(Duration::zero());
        }
        let completed = self.started_at.map(|started_at| CompletedTrack {
            path: std::mem::take(&mut self.path),
            started_at,
            ended_at,
            paused_time,
        });

        self.reset();
        info!(
            points = completed.as_ref().map_or(0, |track| track.path.len()),
            "Location tracking stopped"
        );
        completed
    }

    /// Offer a fix to the path
    pub fn record_fix(&mut self, fix: Fix) -> FixOutcome {
        if self.state != TrackingState::Tracking {
            return FixOutcome::NotTracking;
        }
        if !fix.coordinate.is_valid() {
            debug!(coordinate = ?fix.coordinate, "Dropping invalid fix");
            return FixOutcome::InvalidCoordinate;
        }
        if let (Some(max), Some(accuracy)) = (self.config.max_accuracy_meters, fix.accuracy_meters)
        {
            if accuracy > max {
                debug!(accuracy, max, "Dropping inaccurate fix");
                return FixOutcome::Inaccurate;
            }
        }

        self.last_fix = Some(fix);
        if let Some(last) = self.path.last() {
            let moved = distance_meters(last, &fix.coordinate);
            if moved <= self.config.min_distance_meters {
                debug!(moved, "Fix within minimum distance, not appended");
                return FixOutcome::TooClose;
            }
        }

        self.path.push(fix.coordinate);
        debug!(points = self.path.len(), "Fix appended to path");
        FixOutcome::Appended
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> TrackingState {
        self.state
    }

    /// Filtered path, oldest first
    #[must_use]
    pub fn path(&self) -> &[Coordinate] {
        &self.path
    }

    /// Time tracking started
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Sum of completed pauses
    #[must_use]
    pub const fn paused_time(&self) -> Duration {
        self.paused_time
    }

    /// Start of the pause in progress
    #[must_use]
    pub const fn pause_started_at(&self) -> Option<DateTime<Utc>> {
        self.pause_started_at
    }

    /// Most recent accepted-for-position fix (appended or not)
    #[must_use]
    pub const fn last_fix(&self) -> Option<Fix> {
        self.last_fix
    }

    /// True while a provider subscription is held
    #[must_use]
    pub const fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Timing snapshot for statistics
    #[must_use]
    pub const fn timing(&self) -> TrackingTiming {
        TrackingTiming {
            state: self.state,
            started_at: self.started_at,
            paused_time: self.paused_time,
            pause_started_at: self.pause_started_at,
        }
    }

    fn release_subscription(&mut self) {
        if let Some(handle) = self.subscription.take() {
            self.provider.unsubscribe(handle);
            debug!(subscription = handle.id(), "Position subscription released");
        }
    }

    fn reset(&mut self) {
        self.state = TrackingState::Idle;
        self.path.clear();
        self.started_at = None;
        self.paused_time = Duration::zero();
        self.pause_started_at = None;
        self.last_fix = None;
    }
}

impl Drop for LocationTracker {
    fn drop(&mut self) {
        self.release_subscription();
    }
}
