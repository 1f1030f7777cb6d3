// ABOUTME: Main library entry point for the Runline course-tracking engine
// ABOUTME: Live GPS path recording, course conformance, turn guidance and run statistics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Runline
//!
//! Real-time course tracking for runners. Given a stream of GPS fixes and a
//! predefined course, the engine records a jitter-filtered path, checks that
//! the runner stays within a tolerance corridor of the course, announces
//! upcoming turns and keeps distance, pace and calorie statistics current.
//!
//! ## Architecture
//!
//! - **geo**: haversine distance, bearings and segment projection
//! - **tracking**: `Idle -> Tracking <-> Paused` state machine owning the path
//! - **course**: immutable course topology and the `CourseSource` seam
//! - **validation**: distance-to-course checks with a bounded history
//! - **navigation**: next-turn search with throttled messages and speech
//! - **stats**: change-filtered run statistics
//! - **session**: the per-fix pipeline and observer fan-out
//! - **runtime**: async driver feeding a session from a fix channel and a timer
//!
//! Shared types, errors and configuration live in [`runline_core`].
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use runline::clock::SystemClock;
//! use runline::navigation::NullSpeechSink;
//! use runline::session::RunSession;
//! use runline::test_utils::MockPositionProvider;
//! use runline::config::EngineConfig;
//! use runline::models::{Coordinate, Fix};
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let provider = MockPositionProvider::new(Fix::new(
//!     Coordinate::new(126.9780, 37.5665),
//!     chrono::Utc::now(),
//! ));
//! let mut session = RunSession::new(
//!     EngineConfig::load()?,
//!     Box::new(provider),
//!     Box::new(NullSpeechSink),
//!     Arc::new(SystemClock),
//! );
//! let _fixes = session.start()?;
//! let finished = session.stop();
//! # Ok(())
//! # }
//! ```

/// Wall clock abstraction
pub mod clock;

/// Course topology and course sources
pub mod course;

/// Geodesic math core
pub mod geo;

/// Logging configuration and subscriber setup
pub mod logging;

/// Turn-by-turn navigation and guidance messages
pub mod navigation;

/// Async session driver
pub mod runtime;

/// Run session pipeline and observer interface
pub mod session;

/// Run statistics aggregation
pub mod stats;

/// Location tracking state machine and position provider seam
pub mod tracking;

/// Course conformance validation
pub mod validation;

/// Test doubles for the engine seams (position provider, speech sink, observer)
pub mod test_utils;

pub use runline_core::{config, constants, errors, models};
