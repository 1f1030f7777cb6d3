// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Default tuning values for geodesy, tracking, validation, navigation and statistics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Every tuning value of the engine lives here as a named constant. The
//! defaults of [`crate::config::EngineConfig`] are built from these.

/// Geodesic constants
pub mod geodesy {
    /// Mean Earth radius used by the haversine formula (meters)
    pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
}

/// Location tracking defaults
pub mod tracking {
    /// Minimum distance between consecutive path points (meters)
    pub const MIN_DISTANCE_METERS: f64 = 5.0;
}

/// Course conformance defaults
pub mod validation {
    /// Maximum distance from the course that still counts as on course (meters)
    pub const TOLERANCE_METERS: f64 = 50.0;
    /// Number of validation results retained for trend queries
    pub const HISTORY_CAPACITY: usize = 10;
    /// Consecutive on-course results required to report a return to the course
    pub const RECOVERY_WINDOW: usize = 3;
    /// Upper bound (meters) of the low deviation bucket
    pub const LOW_SEVERITY_MAX_METERS: f64 = 50.0;
    /// Upper bound (meters) of the medium deviation bucket
    pub const MEDIUM_SEVERITY_MAX_METERS: f64 = 100.0;
    /// Distance change (meters) below which a deviation trend counts as steady
    pub const TREND_STEADY_METERS: f64 = 1.0;
}

/// Position jitter handling
pub mod jitter {
    /// Positions closer than this on both axes are treated as the same (degrees, ~0.1 m)
    pub const EPSILON_DEGREES: f64 = 1e-6;
}

/// Turn-by-turn navigation defaults
pub mod navigation {
    /// Bearing changes below this are straight continuations (degrees)
    pub const STRAIGHT_THRESHOLD_DEGREES: f64 = 10.0;
    /// Bearing changes above this are U-turns (degrees)
    pub const UTURN_THRESHOLD_DEGREES: f64 = 150.0;
    /// Maximum angle between heading and candidate node for it to count as ahead (degrees)
    pub const HEADING_TOLERANCE_DEGREES: f64 = 90.0;
    /// Distance to a turn at which guidance is shown (meters)
    pub const WARNING_DISTANCE_METERS: f64 = 5.0;
    /// Minimum interval before an unchanged guidance message is re-emitted (seconds)
    pub const MESSAGE_COOLDOWN_SECS: u64 = 5;
    /// Minimum interval between spoken announcements (seconds)
    pub const SPEECH_COOLDOWN_SECS: u64 = 3;
}

/// Run statistics defaults
pub mod stats {
    /// Statistics refresh interval while tracking (seconds)
    pub const REFRESH_INTERVAL_SECS: u64 = 1;
    /// Body weight assumed when the runner has not provided one (kg)
    pub const DEFAULT_BODY_WEIGHT_KG: f64 = 70.0;
    /// Running energy cost (kcal per kg per km)
    pub const KCAL_PER_KG_PER_KM: f64 = 1.036;
    /// Meters per kilometer
    pub const METERS_PER_KM: f64 = 1000.0;
}

/// Environment variable names read by [`crate::config::EngineConfig::load`]
pub mod env_config {
    /// Minimum path point spacing (meters)
    pub const MIN_DISTANCE_METERS: &str = "RUNLINE_MIN_DISTANCE_METERS";
    /// Maximum accepted fix accuracy (meters)
    pub const MAX_ACCURACY_METERS: &str = "RUNLINE_MAX_ACCURACY_METERS";
    /// On-course tolerance (meters)
    pub const TOLERANCE_METERS: &str = "RUNLINE_TOLERANCE_METERS";
    /// Validation history capacity
    pub const HISTORY_CAPACITY: &str = "RUNLINE_HISTORY_CAPACITY";
    /// Turn warning distance (meters)
    pub const WARNING_DISTANCE_METERS: &str = "RUNLINE_WARNING_DISTANCE_METERS";
    /// Guidance message cooldown (seconds)
    pub const MESSAGE_COOLDOWN_SECS: &str = "RUNLINE_MESSAGE_COOLDOWN_SECS";
    /// Speech cooldown (seconds)
    pub const SPEECH_COOLDOWN_SECS: &str = "RUNLINE_SPEECH_COOLDOWN_SECS";
    /// Runner body weight (kg)
    pub const BODY_WEIGHT_KG: &str = "RUNLINE_BODY_WEIGHT_KG";
    /// Statistics refresh interval override (seconds)
    pub const REFRESH_INTERVAL_SECS: &str = "RUNLINE_REFRESH_INTERVAL_SECS";
}

/// Service names used in structured logging
pub mod service_names {
    /// Engine service name
    pub const RUNLINE_ENGINE: &str = "runline-engine";
}
