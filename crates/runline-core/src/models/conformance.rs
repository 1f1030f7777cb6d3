// ABOUTME: Course conformance result types produced by the validator
// ABOUTME: ValidationResult, deviation severity buckets and deviation trend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// Outcome of a single course conformance check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Whether the runner is within tolerance of the course
    pub is_on_course: bool,
    /// Distance to the nearest point of the course (meters, infinite when unknown)
    pub distance_from_course_meters: f64,
    /// Nearest point of the course geometry, if any geometry was usable
    pub nearest_point_on_course: Option<Coordinate>,
}

impl ValidationResult {
    /// Soft "cannot validate" result for missing or unusable geometry
    #[must_use]
    pub const fn unavailable() -> Self {
        Self {
            is_on_course: false,
            distance_from_course_meters: f64::INFINITY,
            nearest_point_on_course: None,
        }
    }
}

/// Coarse bucket for how far off the course the runner is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviationSeverity {
    /// Within the low bucket (50 m by default)
    Low,
    /// Within the medium bucket (100 m by default)
    Medium,
    /// Beyond the medium bucket
    High,
}

/// Direction the deviation is moving compared with the previous check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviationTrend {
    /// Distance to the course shrank
    Approaching,
    /// Distance to the course grew
    Receding,
    /// No meaningful change, or nothing to compare with
    Steady,
}

/// Deviation classification derived from a validation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviationAssessment {
    /// True when the runner is off course
    pub is_deviating: bool,
    /// Severity bucket of the current distance
    pub severity: DeviationSeverity,
    /// Movement relative to the previous validated position
    pub trend: DeviationTrend,
}
