// ABOUTME: Engine configuration with defaults from named constants and environment overrides
// ABOUTME: Groups tracking, validation, navigation and statistics tuning into EngineConfig
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Engine configuration
//!
//! Configuration is environment-only: [`EngineConfig::load`] starts from the
//! defaults in [`crate::constants`], applies any `RUNLINE_*` overrides and
//! validates the result.

mod error;

pub use error::ConfigError;

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::constants::{env_config, jitter, navigation, stats, tracking, validation};

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Location tracking settings
    pub tracking: TrackingConfig,
    /// Course conformance settings
    pub validation: ValidationConfig,
    /// Turn-by-turn navigation settings
    pub navigation: NavigationConfig,
    /// Run statistics settings
    pub stats: StatsConfig,
}

/// Location tracking settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Minimum great-circle distance between consecutive path points (meters)
    pub min_distance_meters: f64,
    /// Fixes reporting a worse accuracy than this are dropped (meters, disabled when `None`)
    pub max_accuracy_meters: Option<f64>,
}

/// Course conformance settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Maximum distance from the course that still counts as on course (meters)
    pub tolerance_meters: f64,
    /// Number of results retained in the validation history
    pub history_capacity: usize,
    /// Consecutive on-course results needed to report a return to the course
    pub recovery_window: usize,
    /// Positions closer than this to the last validated one are skipped (degrees)
    pub jitter_epsilon_degrees: f64,
    /// Upper bound of the low severity bucket (meters)
    pub low_severity_max_meters: f64,
    /// Upper bound of the medium severity bucket (meters)
    pub medium_severity_max_meters: f64,
}

/// Turn-by-turn navigation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Bearing changes below this are straight continuations (degrees)
    pub straight_threshold_degrees: f64,
    /// Bearing changes above this are U-turns (degrees)
    pub uturn_threshold_degrees: f64,
    /// Maximum heading difference for a node to count as ahead (degrees)
    pub heading_tolerance_degrees: f64,
    /// Distance to the next turn at which guidance is shown (meters)
    pub warning_distance_meters: f64,
    /// Minimum interval before an unchanged message is re-emitted (seconds)
    pub message_cooldown_secs: u64,
    /// Minimum interval between spoken announcements (seconds)
    pub speech_cooldown_secs: u64,
    /// Positions closer than this to the last computed one are skipped (degrees)
    pub jitter_epsilon_degrees: f64,
}

/// Run statistics settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Timer refresh interval while tracking (seconds)
    pub refresh_interval_secs: u64,
    /// Runner body weight used for calorie estimates (kg)
    pub body_weight_kg: f64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            min_distance_meters: tracking::MIN_DISTANCE_METERS,
            max_accuracy_meters: None,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            tolerance_meters: validation::TOLERANCE_METERS,
            history_capacity: validation::HISTORY_CAPACITY,
            recovery_window: validation::RECOVERY_WINDOW,
            jitter_epsilon_degrees: jitter::EPSILON_DEGREES,
            low_severity_max_meters: validation::LOW_SEVERITY_MAX_METERS,
            medium_severity_max_meters: validation::MEDIUM_SEVERITY_MAX_METERS,
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            straight_threshold_degrees: navigation::STRAIGHT_THRESHOLD_DEGREES,
            uturn_threshold_degrees: navigation::UTURN_THRESHOLD_DEGREES,
            heading_tolerance_degrees: navigation::HEADING_TOLERANCE_DEGREES,
            warning_distance_meters: navigation::WARNING_DISTANCE_METERS,
            message_cooldown_secs: navigation::MESSAGE_COOLDOWN_SECS,
            speech_cooldown_secs: navigation::SPEECH_COOLDOWN_SECS,
            jitter_epsilon_degrees: jitter::EPSILON_DEGREES,
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: stats::REFRESH_INTERVAL_SECS,
            body_weight_kg: stats::DEFAULT_BODY_WEIGHT_KG,
        }
    }
}

impl StatsConfig {
    /// Timer refresh interval as a `Duration`
    #[must_use]
    pub const fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

impl EngineConfig {
    /// Load configuration from defaults plus environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable holds an unparseable value
    /// or the resulting configuration fails validation
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::default().apply_env_overrides()?;
        config.validate()?;
        info!(
            tolerance_meters = config.validation.tolerance_meters,
            min_distance_meters = config.tracking.min_distance_meters,
            refresh_interval_secs = config.stats.refresh_interval_secs,
            "Engine configuration loaded"
        );
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any value is outside its acceptable range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_non_negative(self.tracking.min_distance_meters) {
            return Err(ConfigError::InvalidRange(
                "min_distance_meters must be >= 0",
            ));
        }
        if matches!(self.tracking.max_accuracy_meters, Some(max) if !is_positive(max)) {
            return Err(ConfigError::InvalidRange(
                "max_accuracy_meters must be > 0 when set",
            ));
        }
        if !is_non_negative(self.validation.tolerance_meters) {
            return Err(ConfigError::InvalidRange("tolerance_meters must be >= 0"));
        }
        if self.validation.history_capacity == 0 {
            return Err(ConfigError::InvalidRange("history_capacity must be > 0"));
        }
        if self.validation.recovery_window == 0
            || self.validation.recovery_window > self.validation.history_capacity
        {
            return Err(ConfigError::InvalidRange(
                "recovery_window must be between 1 and history_capacity",
            ));
        }
        if self.validation.low_severity_max_meters >= self.validation.medium_severity_max_meters {
            return Err(ConfigError::InvalidRange(
                "low_severity_max_meters must be < medium_severity_max_meters",
            ));
        }
        if self.navigation.straight_threshold_degrees >= self.navigation.uturn_threshold_degrees {
            return Err(ConfigError::InvalidRange(
                "straight_threshold_degrees must be < uturn_threshold_degrees",
            ));
        }
        if !is_positive(self.navigation.warning_distance_meters) {
            return Err(ConfigError::InvalidRange(
                "warning_distance_meters must be > 0",
            ));
        }
        if self.stats.refresh_interval_secs == 0 {
            return Err(ConfigError::InvalidRange(
                "refresh_interval_secs must be > 0",
            ));
        }
        if !is_positive(self.stats.body_weight_kg) {
            return Err(ConfigError::InvalidRange("body_weight_kg must be > 0"));
        }
        Ok(())
    }

    fn apply_env_var<T: FromStr>(key: &'static str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(value) = env::var(key) {
            *target = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Parse {
                    key,
                    value: value.clone(),
                })?;
            debug!(key, value = %value.trim(), "Applied configuration override");
        }
        Ok(())
    }

    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        Self::apply_env_var(
            env_config::MIN_DISTANCE_METERS,
            &mut self.tracking.min_distance_meters,
        )?;
        if let Ok(value) = env::var(env_config::MAX_ACCURACY_METERS) {
            self.tracking.max_accuracy_meters = match value.trim() {
                "" | "off" | "none" => None,
                raw => Some(raw.parse().map_err(|_| ConfigError::Parse {
                    key: env_config::MAX_ACCURACY_METERS,
                    value: value.clone(),
                })?),
            };
            debug!(
                key = env_config::MAX_ACCURACY_METERS,
                value = %value.trim(),
                "Applied configuration override"
            );
        }
        Self::apply_env_var(
            env_config::TOLERANCE_METERS,
            &mut self.validation.tolerance_meters,
        )?;
        Self::apply_env_var(
            env_config::HISTORY_CAPACITY,
            &mut self.validation.history_capacity,
        )?;
        Self::apply_env_var(
            env_config::WARNING_DISTANCE_METERS,
            &mut self.navigation.warning_distance_meters,
        )?;
        Self::apply_env_var(
            env_config::MESSAGE_COOLDOWN_SECS,
            &mut self.navigation.message_cooldown_secs,
        )?;
        Self::apply_env_var(
            env_config::SPEECH_COOLDOWN_SECS,
            &mut self.navigation.speech_cooldown_secs,
        )?;
        Self::apply_env_var(
            env_config::REFRESH_INTERVAL_SECS,
            &mut self.stats.refresh_interval_secs,
        )?;
        Self::apply_env_var(env_config::BODY_WEIGHT_KG, &mut self.stats.body_weight_kg)?;
        Ok(self)
    }
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
