// ABOUTME: Test doubles for the engine seams: position provider, speech sink and run observer
// ABOUTME: Clones share state so tests can inspect what the engine did after handing one over
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use runline_core::errors::TrackingError;
use runline_core::models::{
    Coordinate, CourseNode, DeviationAssessment, Fix, NavigationState, RunStats, TrackingState,
    ValidationResult,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::course::CourseTopology;
use crate::navigation::{GuidanceMessage, SpeechSink};
use crate::session::{RunEvent, RunObserver};
use crate::tracking::{FixSender, PositionProvider, SubscriptionHandle};

/// Seconds since the epoch of 2025-06-01T07:00:00Z
const TEST_START_EPOCH_SECS: i64 = 1_748_761_200;

/// Fixed start time shared by tests
#[must_use]
pub fn test_start_time() -> DateTime<Utc> {
    DateTime::from_timestamp(TEST_START_EPOCH_SECS, 0).unwrap_or_default()
}

/// Two-node straight course running north from the origin for about 55 m
#[must_use]
pub fn create_test_corridor() -> CourseTopology {
    CourseTopology::new(
        "corridor",
        vec![
            CourseNode::new(Coordinate::new(0.0, 0.0), 0.0),
            CourseNode::new(Coordinate::new(0.0, 0.0005), 0.0),
        ],
        None,
    )
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct ProviderState {
    current: Option<Fix>,
    denied: Option<String>,
    subscription_failure: Option<String>,
    sinks: HashMap<u64, FixSender>,
    next_id: u64,
    subscribe_calls: usize,
}

/// In-memory position provider
#[derive(Debug, Clone, Default)]
pub struct MockPositionProvider {
    state: Arc<Mutex<ProviderState>>,
}

impl MockPositionProvider {
    /// Provider whose current position is `fix`
    #[must_use]
    pub fn new(fix: Fix) -> Self {
        let provider = Self::default();
        lock(&provider.state).current = Some(fix);
        provider
    }

    /// Provider that has no position yet
    #[must_use]
    pub fn without_fix() -> Self {
        Self::default()
    }

    /// Refuse location access from now on
    pub fn deny_permission(&self, reason: &str) {
        lock(&self.state).denied = Some(reason.to_owned());
    }

    /// Make every subsequent subscribe call fail
    pub fn fail_subscriptions(&self, reason: &str) {
        lock(&self.state).subscription_failure = Some(reason.to_owned());
    }

    /// Replace the one-shot current position
    pub fn set_current_fix(&self, fix: Fix) {
        lock(&self.state).current = Some(fix);
    }

    /// Deliver `fix` to every open subscription, returning how many received it
    pub fn push_fix(&self, fix: Fix) -> usize {
        let mut state = lock(&self.state);
        state.current = Some(fix);
        state.sinks.retain(|_, sink| !sink.is_closed());
        state
            .sinks
            .values()
            .filter(|sink| sink.send(fix).is_ok())
            .count()
    }

    /// Drop every sender so receivers observe a closed channel
    pub fn close_all(&self) {
        lock(&self.state).sinks.clear();
    }

    /// Number of subscriptions not yet released
    #[must_use]
    pub fn active_subscriptions(&self) -> usize {
        lock(&self.state).sinks.len()
    }

    /// Total subscribe calls, successful or not
    #[must_use]
    pub fn subscribe_calls(&self) -> usize {
        lock(&self.state).subscribe_calls
    }
}

impl PositionProvider for MockPositionProvider {
    fn current_fix(&mut self) -> Result<Fix, TrackingError> {
        let state = lock(&self.state);
        if let Some(reason) = &state.denied {
            return Err(TrackingError::PermissionDenied {
                reason: reason.clone(),
            });
        }
        state.current.ok_or(TrackingError::NoFixAvailable)
    }

    fn subscribe(&mut self, sink: FixSender) -> Result<SubscriptionHandle, TrackingError> {
        let mut state = lock(&self.state);
        state.subscribe_calls += 1;
        if let Some(reason) = &state.denied {
            return Err(TrackingError::PermissionDenied {
                reason: reason.clone(),
            });
        }
        if let Some(reason) = &state.subscription_failure {
            return Err(TrackingError::SubscriptionFailed {
                reason: reason.clone(),
            });
        }
        state.next_id += 1;
        let id = state.next_id;
        state.sinks.insert(id, sink);
        Ok(SubscriptionHandle::new(id))
    }

    fn unsubscribe(&mut self, handle: SubscriptionHandle) {
        lock(&self.state).sinks.remove(&handle.id());
    }
}

#[derive(Debug, Default)]
struct SpeechLog {
    spoken: Vec<String>,
    cancellations: usize,
}

/// Speech sink that records what it was asked to say
#[derive(Debug, Clone, Default)]
pub struct RecordingSpeechSink {
    log: Arc<Mutex<SpeechLog>>,
}

impl RecordingSpeechSink {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Texts spoken so far, in order
    #[must_use]
    pub fn spoken(&self) -> Vec<String> {
        lock(&self.log).spoken.clone()
    }

    /// Number of `cancel_all` calls
    #[must_use]
    pub fn cancellations(&self) -> usize {
        lock(&self.log).cancellations
    }
}

impl SpeechSink for RecordingSpeechSink {
    fn speak(&mut self, text: &str) {
        lock(&self.log).spoken.push(text.to_owned());
    }

    fn cancel_all(&mut self) {
        lock(&self.log).cancellations += 1;
    }
}

/// Observer that records every callback as a [`RunEvent`]
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<RunEvent>>>,
}

impl RecordingObserver {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every event received so far, in order
    #[must_use]
    pub fn events(&self) -> Vec<RunEvent> {
        lock(&self.events).clone()
    }

    /// Forget recorded events
    pub fn clear(&self) {
        lock(&self.events).clear();
    }

    /// Validation callbacks received so far
    #[must_use]
    pub fn validations(&self) -> Vec<(ValidationResult, DeviationAssessment)> {
        lock(&self.events)
            .iter()
            .filter_map(|event| match event {
                RunEvent::Validation { result, assessment, .. } => Some((*result, *assessment)),
                _ => None,
            })
            .collect()
    }

    /// Stats callbacks received so far
    #[must_use]
    pub fn stats(&self) -> Vec<RunStats> {
        lock(&self.events)
            .iter()
            .filter_map(|event| match event {
                RunEvent::Stats { stats } => Some(*stats),
                _ => None,
            })
            .collect()
    }

    /// Names of the callbacks received, in order
    #[must_use]
    pub fn event_kinds(&self) -> Vec<&'static str> {
        lock(&self.events).iter().map(RunEvent::kind).collect()
    }

    fn push(&self, event: RunEvent) {
        lock(&self.events).push(event);
    }
}

impl RunObserver for RecordingObserver {
    fn on_path_changed(&mut self, path: &[Coordinate]) {
        self.push(RunEvent::path_changed(path));
    }

    fn on_validation(&mut self, result: &ValidationResult, assessment: &DeviationAssessment) {
        self.push(RunEvent::validation(result, assessment));
    }

    fn on_navigation(&mut self, state: &NavigationState, message: Option<&GuidanceMessage>) {
        self.push(RunEvent::navigation(state, message));
    }

    fn on_stats(&mut self, stats: &RunStats) {
        self.push(RunEvent::Stats { stats: *stats });
    }

    fn on_state_changed(&mut self, state: TrackingState) {
        self.push(RunEvent::StateChanged { state });
    }
}
