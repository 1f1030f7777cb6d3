// ABOUTME: Core types and constants for the Runline course-tracking engine
// ABOUTME: Foundation crate with error handling, constants, configuration and data models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Runline Core
//!
//! Foundation crate providing shared types and constants for the Runline
//! course-tracking engine. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `TrackingError`
//! - **constants**: Engine constants organized by domain
//! - **config**: Environment-driven `EngineConfig` built on those constants
//! - **models**: Plain data model shared by every engine component

/// Unified error handling system with standard error codes
pub mod errors;

/// Engine constants and default tuning values organized by domain
pub mod constants;

/// Engine configuration (tracking, validation, navigation, statistics)
pub mod config;

/// Core data models (Coordinate, Fix, CourseNode, ValidationResult, RunStats, etc.)
pub mod models;
