// ABOUTME: Turn-by-turn navigator locating the next real turn ahead of the runner
// ABOUTME: Emits throttled guidance messages and spoken announcements through a SpeechSink
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Turn-by-Turn Navigation
//!
//! [`Navigator::advance`] runs once per position:
//!
//! 1. nearest course node by linear scan
//! 2. forward scan from that node for the first node that is ahead of the
//!    runner's heading and carries a real turn
//! 3. an [`Instruction`] for that node, flagged as approaching inside the
//!    warning distance
//!
//! While approaching, a guidance message is emitted and spoken. Message and
//! speech cadence are throttled independently, and both throttles are fields
//! of the navigator so [`Navigator::reset`] clears them with the session.

mod message;
mod speech;

pub use message::{guidance_text, GuidanceMessage};
pub use speech::{LoggingSpeechSink, NullSpeechSink, SpeechSink};

use chrono::{DateTime, Duration, Utc};
use runline_core::config::NavigationConfig;
use runline_core::models::{
    Coordinate, CourseNode, Instruction, NavigationState, TurnDirection, TurnScale,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::course::CourseTopology;
use crate::geo::{angular_difference_degrees, bearing_degrees, distance_meters};

/// Result of one navigator step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationUpdate {
    /// Navigation snapshot for the position
    pub state: NavigationState,
    /// Message change to show, if any
    pub message: Option<GuidanceMessage>,
    /// True when the message was also handed to the speech sink
    pub announced: bool,
}

impl NavigationUpdate {
    const fn silent(state: NavigationState) -> Self {
        Self {
            state,
            message: None,
            announced: false,
        }
    }
}

/// Stateful turn-by-turn navigator
pub struct Navigator {
    config: NavigationConfig,
    clock: Arc<dyn Clock>,
    speech: Box<dyn SpeechSink>,
    course_id: Option<String>,
    last_position: Option<Coordinate>,
    state: NavigationState,
    showing: Option<String>,
    last_emission: Option<(String, DateTime<Utc>)>,
    last_announcement_at: Option<DateTime<Utc>>,
}

impl Navigator {
    /// Create a navigator with no course context
    #[must_use]
    pub fn new(
        config: NavigationConfig,
        clock: Arc<dyn Clock>,
        speech: Box<dyn SpeechSink>,
    ) -> Self {
        Self {
            config,
            clock,
            speech,
            course_id: None,
            last_position: None,
            state: NavigationState::default(),
            showing: None,
            last_emission: None,
            last_announcement_at: None,
        }
    }

    /// Process a position against `topology`
    pub fn advance(&mut self, current: &Coordinate, topology: &CourseTopology) -> NavigationUpdate {
        if self.course_id.as_deref() != Some(topology.course_id()) {
            if self.course_id.is_some() {
                debug!(course_id = topology.course_id(), "Course changed, navigator reset");
                self.reset();
            }
            self.course_id = Some(topology.course_id().to_owned());
        }

        if let Some(last) = self.last_position {
            if last.is_near(current, self.config.jitter_epsilon_degrees) {
                return NavigationUpdate::silent(self.state);
            }
        }

        let state = if current.is_valid() {
            self.locate(current, topology.nodes())
        } else {
            warn!(coordinate = ?current, "Cannot navigate from an invalid position");
            NavigationState::default()
        };

        let mut update = NavigationUpdate::silent(state);
        match (state.is_approaching_turn, state.instruction) {
            (true, Some(instruction)) => {
                let text = guidance_text(&instruction);
                if self.should_emit(&text) {
                    update.announced = self.announce(&text);
                    self.emit(&text);
                    update.message = Some(GuidanceMessage::Emitted(text));
                }
            }
            _ => {
                if self.showing.take().is_some() {
                    self.last_emission = None;
                    debug!("Turn passed, guidance cleared");
                    update.message = Some(GuidanceMessage::Cleared);
                }
            }
        }

        self.state = state;
        if current.is_valid() {
            self.last_position = Some(*current);
        }
        update
    }

    /// Navigation snapshot of the last processed position
    #[must_use]
    pub const fn state(&self) -> NavigationState {
        self.state
    }

    /// Message currently on screen
    #[must_use]
    pub fn current_message(&self) -> Option<&str> {
        self.showing.as_deref()
    }

    /// Cancel pending speech and clear message, throttle and dedup state
    pub fn reset(&mut self) {
        self.speech.cancel_all();
        self.course_id = None;
        self.last_position = None;
        self.state = NavigationState::default();
        self.showing = None;
        self.last_emission = None;
        self.last_announcement_at = None;
    }

    /// Nearest node, heading and the next real turn ahead
    fn locate(&self, current: &Coordinate, nodes: &[CourseNode]) -> NavigationState {
        let Some((nearest_index, _)) = nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.location.is_valid())
            .map(|(index, node)| (index, distance_meters(current, &node.location)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
        else {
            return NavigationState::default();
        };

        // Bearing from the node the runner came from to where they are now
        let heading = nearest_index
            .checked_sub(1)
            .map(|previous| nodes[previous].location)
            .filter(|previous| previous.is_valid() && distance_meters(previous, current) > 0.0)
            .map(|previous| bearing_degrees(&previous, current));

        let tolerance = self.config.heading_tolerance_degrees;
        let next = nodes[nearest_index..].iter().find(|node| {
            if !node.location.is_valid()
                || node.bearing_change_degrees.abs() < self.config.straight_threshold_degrees
            {
                return false;
            }
            match heading {
                None => true,
                Some(heading) => {
                    let difference = angular_difference_degrees(
                        heading,
                        bearing_degrees(current, &node.location),
                    );
                    difference <= tolerance || difference >= 360.0 - tolerance
                }
            }
        });

        let Some(next) = next.copied() else {
            return NavigationState {
                current_node_index: nearest_index,
                ..NavigationState::default()
            };
        };

        let distance = distance_meters(current, &next.location);
        let instruction = self.instruction_for(&next, distance);
        NavigationState {
            current_node_index: nearest_index,
            next_node: Some(next),
            distance_to_next_node_meters: distance,
            is_approaching_turn: distance <= self.config.warning_distance_meters,
            instruction: Some(instruction),
        }
    }

    fn instruction_for(&self, node: &CourseNode, distance: f64) -> Instruction {
        let change = node.bearing_change_degrees;
        Instruction {
            direction: if change > 0.0 {
                TurnDirection::Left
            } else {
                TurnDirection::Right
            },
            scale: if change.abs() > self.config.uturn_threshold_degrees {
                TurnScale::UTurn
            } else {
                TurnScale::Turn
            },
            distance_meters: distance.round().clamp(0.0, f64::from(u32::MAX)) as u32,
        }
    }

    fn should_emit(&self, text: &str) -> bool {
        let cooldown = Duration::seconds(secs_i64(self.config.message_cooldown_secs));
        match &self.last_emission {
            None => true,
            Some((last_text, at)) => last_text != text || self.clock.now() - *at >= cooldown,
        }
    }

    fn emit(&mut self, text: &str) {
        self.showing = Some(text.to_owned());
        self.last_emission = Some((text.to_owned(), self.clock.now()));
    }

    fn announce(&mut self, text: &str) -> bool {
        let now = self.clock.now();
        let cooldown = Duration::seconds(secs_i64(self.config.speech_cooldown_secs));
        if let Some(at) = self.last_announcement_at {
            if now - at < cooldown {
                debug!(text, "Announcement throttled");
                return false;
            }
        }
        self.speech.speak(text);
        self.last_announcement_at = Some(now);
        info!(text, "Guidance announced");
        true
    }
}

fn secs_i64(secs: u64) -> i64 {
    i64::try_from(secs).unwrap_or(i64::MAX)
}
