// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides quiet logging, fixed clocks and session builders over the mock seams
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `runline`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use chrono::Duration;
use runline::clock::ManualClock;
use runline::config::EngineConfig;
use runline::models::{Coordinate, Fix};
use runline::session::RunSession;
use runline::test_utils::{
    test_start_time, MockPositionProvider, RecordingObserver, RecordingSpeechSink,
};
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Fix at the given position, `offset_secs` after the test start time
pub fn fix_at(longitude: f64, latitude: f64, offset_secs: i64) -> Fix {
    Fix::new(
        Coordinate::new(longitude, latitude),
        test_start_time() + Duration::seconds(offset_secs),
    )
}

/// Session wired to mock seams, with handles to inspect them
pub struct TestSession {
    pub session: RunSession,
    pub provider: MockPositionProvider,
    pub speech: RecordingSpeechSink,
    pub observer: RecordingObserver,
    pub clock: ManualClock,
}

/// Build an idle session whose provider reports `start` as the current position
pub fn create_test_session(start: Coordinate, config: EngineConfig) -> TestSession {
    init_test_logging();
    let provider = MockPositionProvider::new(Fix::new(start, test_start_time()));
    let speech = RecordingSpeechSink::new();
    let observer = RecordingObserver::new();
    let clock = ManualClock::new(test_start_time());

    let mut session = RunSession::new(
        config,
        Box::new(provider.clone()),
        Box::new(speech.clone()),
        Arc::new(clock.clone()),
    );
    session.add_observer(Box::new(observer.clone()));

    TestSession {
        session,
        provider,
        speech,
        observer,
        clock,
    }
}
