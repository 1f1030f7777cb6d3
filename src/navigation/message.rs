// ABOUTME: Guidance message text for turn instructions and the emitted/cleared message event
// ABOUTME: Text is what is shown on screen and handed to the speech sink
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use runline_core::models::{Instruction, TurnDirection, TurnScale};
use serde::Serialize;

/// Change to the guidance message shown to the runner
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum GuidanceMessage {
    /// Show (or re-show) this text
    Emitted(String),
    /// Remove the message on screen
    Cleared,
}

impl GuidanceMessage {
    /// Text of an emitted message
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Emitted(text) => Some(text),
            Self::Cleared => None,
        }
    }
}

/// Human readable guidance for an instruction
#[must_use]
pub fn guidance_text(instruction: &Instruction) -> String {
    let side = match instruction.direction {
        TurnDirection::Left => "left",
        TurnDirection::Right => "right",
    };
    match instruction.scale {
        TurnScale::Turn => format!("Turn {side} in {} m", instruction.distance_meters),
        TurnScale::UTurn => format!(
            "Make a U-turn to the {side} in {} m",
            instruction.distance_meters
        ),
    }
}
