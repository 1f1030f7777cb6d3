// ABOUTME: Configuration error types for engine configuration validation
// ABOUTME: Defines error variants for invalid ranges and unparseable environment values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Value outside acceptable range (e.g., negative tolerance)
    #[error("Invalid range: {0}")]
    InvalidRange(&'static str),

    /// Environment variable present but not parseable
    #[error("Invalid value '{value}' for {key}")]
    Parse {
        /// Environment variable name
        key: &'static str,
        /// Raw value found in the environment
        value: String,
    },
}
