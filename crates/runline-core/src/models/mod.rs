// ABOUTME: Core data models shared by every Runline engine component
// ABOUTME: Coordinates, fixes, course nodes, validation, guidance and run statistics types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Core data models
//!
//! Plain value types exchanged between the tracker, the validator, the
//! navigator, the statistics aggregator and the observers of a run session.

/// Coordinates and GPS fixes
pub mod coordinate;
/// Course conformance results and deviation classification
pub mod conformance;
/// Course nodes and turn-by-turn guidance state
pub mod guidance;
/// Tracking lifecycle, run statistics and finished runs
pub mod run;

pub use conformance::{DeviationAssessment, DeviationSeverity, DeviationTrend, ValidationResult};
pub use coordinate::{Coordinate, Fix};
pub use guidance::{CourseNode, Instruction, NavigationState, TurnDirection, TurnScale};
pub use run::{FinishedRun, RunStats, TrackingState};
