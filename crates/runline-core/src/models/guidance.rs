// ABOUTME: Course node and turn-by-turn guidance types
// ABOUTME: Instruction direction/scale and the navigator state snapshot
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// A waypoint of a course with the bearing change the runner makes there
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseNode {
    /// Waypoint position
    pub location: Coordinate,
    /// Signed bearing change at this node (degrees, positive turns left)
    pub bearing_change_degrees: f64,
}

impl CourseNode {
    /// Create a node
    #[must_use]
    pub const fn new(location: Coordinate, bearing_change_degrees: f64) -> Self {
        Self {
            location,
            bearing_change_degrees,
        }
    }
}

/// Side of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnDirection {
    /// Turn to the left
    Left,
    /// Turn to the right
    Right,
}

/// Magnitude of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnScale {
    /// Regular turn
    Turn,
    /// Reversal of direction
    #[serde(rename = "uturn")]
    UTurn,
}

/// Guidance for the next turn ahead of the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    /// Side of the turn
    pub direction: TurnDirection,
    /// Regular turn or U-turn
    pub scale: TurnScale,
    /// Distance to the turn, rounded to whole meters
    pub distance_meters: u32,
}

/// Snapshot of the navigator after processing a position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    /// Index of the course node nearest to the runner
    pub current_node_index: usize,
    /// Next node that represents a turn ahead of the runner
    pub next_node: Option<CourseNode>,
    /// Distance to `next_node` (meters, infinite when there is none)
    pub distance_to_next_node_meters: f64,
    /// True when a turn is within the warning distance
    pub is_approaching_turn: bool,
    /// Instruction for `next_node`
    pub instruction: Option<Instruction>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            current_node_index: 0,
            next_node: None,
            distance_to_next_node_meters: f64::INFINITY,
            is_approaching_turn: false,
            instruction: None,
        }
    }
}
