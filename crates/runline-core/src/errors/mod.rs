// ABOUTME: Unified error handling for the Runline engine with standard error codes
// ABOUTME: Defines ErrorCode, AppError and AppResult plus domain-specific error re-exports
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Hard failures of the engine are rare: geometry problems and missing inputs
//! degrade to neutral results instead of errors. What remains (provider
//! failures, invalid lifecycle transitions, bad configuration, unknown courses)
//! is reported through [`AppError`] carrying a stable [`ErrorCode`].

/// Location tracking and position provider errors
pub mod tracking;

pub use tracking::TrackingError;

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use thiserror::Error;

use crate::config::ConfigError;

/// Standard error codes used throughout the engine
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Input failed validation
    InvalidInput = 3000,
    /// Value outside the acceptable range
    ValueOutOfRange = 3003,

    // Resources (4000-4999)
    /// Requested resource does not exist
    ResourceNotFound = 4000,
    /// Operation not allowed in the current state
    InvalidState = 4004,

    // External collaborators (5000-5999)
    /// Position provider refused access
    PermissionDenied = 5004,
    /// External collaborator failed or is unavailable
    ExternalServiceUnavailable = 5001,

    // Configuration (6000-6999)
    /// Configuration is invalid
    ConfigInvalid = 6002,

    // Internal (9000-9999)
    /// Unexpected internal failure
    InternalError = 9000,
    /// Data serialization/deserialization failed
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::ValueOutOfRange => "The provided value is outside the acceptable range",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::InvalidState => "The operation is not allowed in the current state",
            Self::PermissionDenied => "Access to the position provider was denied",
            Self::ExternalServiceUnavailable => "An external collaborator is unavailable",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::InternalError => "An internal error occurred",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }
}

/// Unified error type for the engine
#[derive(Debug, Error)]
#[error("{}: {message}", .code.description())]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl From<TrackingError> for AppError {
    fn from(error: TrackingError) -> Self {
        let code = match &error {
            TrackingError::PermissionDenied { .. } => ErrorCode::PermissionDenied,
            TrackingError::SubscriptionFailed { .. } | TrackingError::NoFixAvailable => {
                ErrorCode::ExternalServiceUnavailable
            }
            TrackingError::InvalidTransition { .. } => ErrorCode::InvalidState,
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        Self::config(error.to_string()).with_source(error)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}
