// ABOUTME: WGS84 coordinate value type and GPS fix sample
// ABOUTME: Provides validity checks used to drop NaN or out-of-range positions before geometry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longitude/latitude pair in degrees (WGS84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Longitude in degrees, east positive
    pub longitude: f64,
    /// Latitude in degrees, north positive
    pub latitude: f64,
}

impl Coordinate {
    /// Create a coordinate from longitude and latitude
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// True when both axes are finite and inside the WGS84 range
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && self.longitude.abs() <= 180.0
            && self.latitude.abs() <= 90.0
    }

    /// True when both axes differ from `other` by at most `epsilon_degrees`
    #[must_use]
    pub fn is_near(&self, other: &Self, epsilon_degrees: f64) -> bool {
        (self.longitude - other.longitude).abs() <= epsilon_degrees
            && (self.latitude - other.latitude).abs() <= epsilon_degrees
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((longitude, latitude): (f64, f64)) -> Self {
        Self::new(longitude, latitude)
    }
}

/// A single GPS position sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fix {
    /// Reported position
    pub coordinate: Coordinate,
    /// Time the provider took the sample
    pub timestamp: DateTime<Utc>,
    /// Horizontal accuracy radius reported by the provider (meters)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy_meters: Option<f64>,
}

impl Fix {
    /// Create a fix without accuracy information
    #[must_use]
    pub const fn new(coordinate: Coordinate, timestamp: DateTime<Utc>) -> Self {
        Self {
            coordinate,
            timestamp,
            accuracy_meters: None,
        }
    }

    /// Attach the provider's accuracy estimate
    #[must_use]
    pub const fn with_accuracy(mut self, accuracy_meters: f64) -> Self {
        self.accuracy_meters = Some(accuracy_meters);
        self
    }
}
