// ABOUTME: Run session pipeline wiring tracker, validator, navigator and stats behind one entry point
// ABOUTME: Every fix flows through on_fix_received in a fixed order and fans out to observers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Run Session
//!
//! A [`RunSession`] owns every stateful component of a run. Fixes are applied
//! in a fixed order:
//!
//! 1. tracker admission, then `on_path_changed` when the path grew
//! 2. course validation, then `on_validation`
//! 3. navigation, then `on_navigation`
//! 4. statistics, then `on_stats` when a value changed
//!
//! Validation and navigation only run while tracking, with a course selected
//! and the feature enabled. They use the fix as the current position even
//! when it was too close to be added to the path.

use runline_core::config::EngineConfig;
use runline_core::errors::TrackingError;
use runline_core::models::{
    Coordinate, DeviationAssessment, FinishedRun, Fix, NavigationState, RunStats, TrackingState,
    ValidationResult,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, info_span, Span};
use uuid::Uuid;

use crate::clock::Clock;
use crate::course::CourseTopology;
use crate::navigation::{GuidanceMessage, NavigationUpdate, Navigator, SpeechSink};
use crate::stats::{compute, StatsAggregator};
use crate::tracking::{FixOutcome, FixReceiver, LocationTracker, PositionProvider};
use crate::validation::CourseValidator;

/// Consumer of session updates (UI layers, overlays, the save flow)
///
/// Every callback defaults to a no-op.
pub trait RunObserver: Send {
    /// The filtered path grew
    fn on_path_changed(&mut self, _path: &[Coordinate]) {}

    /// A position was validated against the course
    fn on_validation(&mut self, _result: &ValidationResult, _assessment: &DeviationAssessment) {}

    /// The navigator processed a position
    fn on_navigation(&mut self, _state: &NavigationState, _message: Option<&GuidanceMessage>) {}

    /// Run statistics changed
    fn on_stats(&mut self, _stats: &RunStats) {}

    /// Tracking state changed
    fn on_state_changed(&mut self, _state: TrackingState) {}
}

/// Owned record of one observer callback
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RunEvent {
    /// Path grew
    PathChanged {
        /// Number of points in the path
        points: usize,
        /// Newest point
        last: Option<Coordinate>,
    },
    /// Validation result
    Validation {
        /// Conformance of the position
        result: ValidationResult,
        /// Deviation classification
        assessment: DeviationAssessment,
        /// False when the course could not be measured; the distance is then
        /// infinite, which `JSON` renders as `null`
        available: bool,
    },
    /// Navigation snapshot
    Navigation {
        /// Navigator state
        state: NavigationState,
        /// Message change, if any
        message: Option<GuidanceMessage>,
        /// False when no turn lies ahead; the distance is then infinite
        available: bool,
    },
    /// Changed statistics
    Stats {
        /// New values
        stats: RunStats,
    },
    /// Lifecycle transition
    StateChanged {
        /// New state
        state: TrackingState,
    },
}

impl RunEvent {
    /// Summarize a path callback
    #[must_use]
    pub fn path_changed(path: &[Coordinate]) -> Self {
        Self::PathChanged {
            points: path.len(),
            last: path.last().copied(),
        }
    }

    /// Record a validation callback
    #[must_use]
    pub fn validation(result: &ValidationResult, assessment: &DeviationAssessment) -> Self {
        Self::Validation {
            result: *result,
            assessment: *assessment,
            available: result.nearest_point_on_course.is_some(),
        }
    }

    /// Record a navigation callback
    #[must_use]
    pub fn navigation(state: &NavigationState, message: Option<&GuidanceMessage>) -> Self {
        Self::Navigation {
            state: *state,
            message: message.cloned(),
            available: state.next_node.is_some(),
        }
    }

    /// Callback name
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PathChanged { .. } => "path",
            Self::Validation { .. } => "validation",
            Self::Navigation { .. } => "navigation",
            Self::Stats { .. } => "stats",
            Self::StateChanged { .. } => "state",
        }
    }
}

/// A single run: tracking lifecycle plus the per-fix processing pipeline
pub struct RunSession {
    id: Uuid,
    span: Span,
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    tracker: LocationTracker,
    validator: CourseValidator,
    navigator: Navigator,
    stats: StatsAggregator,
    course: Option<CourseTopology>,
    validation_enabled: bool,
    navigation_enabled: bool,
    observers: Vec<Box<dyn RunObserver>>,
}

fn session_span(id: Uuid) -> Span {
    info_span!("run_session", session_id = %id)
}

impl RunSession {
    /// Create an idle session with validation and navigation enabled
    #[must_use]
    pub fn new(
        config: EngineConfig,
        provider: Box<dyn PositionProvider>,
        speech: Box<dyn SpeechSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            span: session_span(id),
            tracker: LocationTracker::new(provider, Arc::clone(&clock), config.tracking.clone()),
            validator: CourseValidator::new(config.validation.clone()),
            navigator: Navigator::new(config.navigation.clone(), Arc::clone(&clock), speech),
            stats: StatsAggregator::new(config.stats.clone()),
            config,
            clock,
            course: None,
            validation_enabled: true,
            navigation_enabled: true,
            observers: Vec::new(),
        }
    }

    /// Register an observer
    pub fn add_observer(&mut self, observer: Box<dyn RunObserver>) {
        self.observers.push(observer);
    }

    /// Identifier of the current (or most recent) run
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Tracking state
    #[must_use]
    pub const fn state(&self) -> TrackingState {
        self.tracker.state()
    }

    /// Filtered path of the run in progress
    #[must_use]
    pub fn path(&self) -> &[Coordinate] {
        self.tracker.path()
    }

    /// Selected course
    #[must_use]
    pub const fn course(&self) -> Option<&CourseTopology> {
        self.course.as_ref()
    }

    /// Conformance validator, for history and return-to-course queries
    #[must_use]
    pub const fn validator(&self) -> &CourseValidator {
        &self.validator
    }

    /// Navigator, for the current state and message
    #[must_use]
    pub const fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Engine configuration in use
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Start tracking
    ///
    /// Each start opens a new run with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns the tracker error when tracking cannot start; the session stays idle
    pub fn start(&mut self) -> Result<FixReceiver, TrackingError> {
        if self.tracker.state() == TrackingState::Idle {
            self.id = Uuid::new_v4();
            self.span = session_span(self.id);
        }
        let span = self.span.clone();
        let _entered = span.enter();

        let fixes = self.tracker.start()?;
        self.validator.reset();
        self.stats.reset();
        info!("Run started");

        self.notify(|observer| observer.on_state_changed(TrackingState::Tracking));
        self.notify_path();
        self.refresh_stats();
        Ok(fixes)
    }

    /// Pause or resume tracking
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` when idle
    pub fn toggle_pause(&mut self) -> Result<TrackingState, TrackingError> {
        let span = self.span.clone();
        let _entered = span.enter();

        let state = self.tracker.toggle()?;
        self.notify(|observer| observer.on_state_changed(state));
        self.refresh_stats();
        Ok(state)
    }

    /// Stop tracking and hand back the finished run
    ///
    /// Guidance is cancelled and all per-run state cleared. Returns `None`
    /// when no run was in progress.
    pub fn stop(&mut self) -> Option<FinishedRun> {
        let span = self.span.clone();
        let _entered = span.enter();

        let completed = self.tracker.stop();
        self.reset_navigation();
        self.validator.reset();
        self.stats.reset();
        let completed = completed?;

        let stats = compute(
            &completed.path,
            &completed.timing(),
            completed.ended_at,
            &self.config.stats,
        );
        info!(
            points = completed.path.len(),
            distance = stats.distance_meters,
            elapsed_secs = stats.elapsed_running_time.as_secs(),
            "Run finished"
        );
        self.notify(|observer| observer.on_state_changed(TrackingState::Idle));

        Some(FinishedRun {
            session_id: self.id,
            started_at: completed.started_at,
            ended_at: completed.ended_at,
            path: completed.path,
            stats,
        })
    }

    /// Select a course, or clear it with `None`
    pub fn set_course(&mut self, course: Option<CourseTopology>) {
        let span = self.span.clone();
        let _entered = span.enter();

        self.validator.reset();
        self.reset_navigation();
        match &course {
            Some(topology) => info!(
                course_id = topology.course_id(),
                nodes = topology.nodes().len(),
                "Course selected"
            ),
            None => info!("Course cleared"),
        }
        self.course = course;
    }

    /// Enable or disable course validation
    pub fn set_validation_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.validator.reset();
        }
        self.validation_enabled = enabled;
    }

    /// Enable or disable turn-by-turn navigation
    pub fn set_navigation_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.reset_navigation();
        }
        self.navigation_enabled = enabled;
    }

    /// Apply one position fix
    pub fn on_fix_received(&mut self, fix: Fix) -> FixOutcome {
        let span = self.span.clone();
        let _entered = span.enter();

        let outcome = self.tracker.record_fix(fix);
        if !matches!(outcome, FixOutcome::Appended | FixOutcome::TooClose) {
            debug!(?outcome, "Fix not processed");
            return outcome;
        }

        if outcome.path_changed() {
            self.notify_path();
        }

        let current = fix.coordinate;
        let validation = match (&self.course, self.validation_enabled) {
            (Some(course), true) => {
                let previous = self.validator.last_result();
                let result =
                    self.validator
                        .validate(&current, course, self.config.validation.tolerance_meters);
                let assessment = self.validator.detect_deviation(&result, previous.as_ref());
                Some((result, assessment))
            }
            _ => None,
        };
        if let Some((result, assessment)) = validation {
            self.notify(|observer| observer.on_validation(&result, &assessment));
        }

        let navigation: Option<NavigationUpdate> = match (&self.course, self.navigation_enabled) {
            (Some(course), true) => Some(self.navigator.advance(&current, course)),
            _ => None,
        };
        if let Some(update) = navigation {
            self.notify(|observer| observer.on_navigation(&update.state, update.message.as_ref()));
        }

        self.refresh_stats();
        outcome
    }

    /// Periodic statistics refresh; returns the stats when they changed
    pub fn on_timer_tick(&mut self) -> Option<RunStats> {
        if self.tracker.state() == TrackingState::Idle {
            return None;
        }
        let span = self.span.clone();
        let _entered = span.enter();
        self.refresh_stats()
    }

    fn refresh_stats(&mut self) -> Option<RunStats> {
        let stats = self.stats.refresh(
            self.tracker.path(),
            &self.tracker.timing(),
            self.clock.now(),
        )?;
        self.notify(|observer| observer.on_stats(&stats));
        Some(stats)
    }

    /// Reset the navigator, telling observers to drop a message still on screen
    fn reset_navigation(&mut self) {
        let was_showing = self.navigator.current_message().is_some();
        self.navigator.reset();
        if was_showing {
            debug!("Guidance cleared by reset");
            let state = self.navigator.state();
            self.notify(|observer| {
                observer.on_navigation(&state, Some(&GuidanceMessage::Cleared));
            });
        }
    }

    fn notify_path(&mut self) {
        let path = self.tracker.path();
        for observer in &mut self.observers {
            observer.on_path_changed(path);
        }
    }

    fn notify(&mut self, mut event: impl FnMut(&mut dyn RunObserver)) {
        for observer in &mut self.observers {
            event(observer.as_mut());
        }
    }
}
