// ABOUTME: Integration tests for the async session driver
// ABOUTME: Covers channel close, shutdown signalling and timer-driven stats refresh
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{create_test_session, fix_at};
use runline::config::EngineConfig;
use runline::models::{Coordinate, TrackingState};
use runline::runtime::drive_session;
use runline::test_utils::create_test_corridor;
use std::time::Duration;
use tokio::sync::oneshot;

#[tokio::test]
async fn test_driver_stops_when_fix_stream_closes() {
    let mut t = create_test_session(Coordinate::new(0.0, 0.0), EngineConfig::default());
    t.session.set_course(Some(create_test_corridor()));
    let fixes = t.session.start().unwrap();

    assert_eq!(t.provider.push_fix(fix_at(0.0, 0.0001, 1)), 1);
    assert_eq!(t.provider.push_fix(fix_at(0.0, 0.0002, 2)), 1);
    assert_eq!(t.provider.push_fix(fix_at(0.0, 0.0003, 3)), 1);
    t.provider.close_all();

    let (_shutdown_tx, shutdown_rx) = oneshot::channel();
    let finished = drive_session(&mut t.session, fixes, shutdown_rx).await.unwrap();

    assert_eq!(finished.path.len(), 4);
    assert_eq!(t.observer.validations().len(), 3);
    assert_eq!(t.session.state(), TrackingState::Idle);
}

#[tokio::test]
async fn test_driver_stops_on_shutdown_signal() {
    let mut t = create_test_session(Coordinate::new(0.0, 0.0), EngineConfig::default());
    let fixes = t.session.start().unwrap();

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    shutdown_tx.send(()).unwrap();

    let finished = drive_session(&mut t.session, fixes, shutdown_rx).await;
    assert!(finished.is_some());
    assert_eq!(t.provider.active_subscriptions(), 0);
}

#[tokio::test]
async fn test_dropped_shutdown_sender_stops_driver() {
    let mut t = create_test_session(Coordinate::new(0.0, 0.0), EngineConfig::default());
    let fixes = t.session.start().unwrap();

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    drop(shutdown_tx);

    let finished = drive_session(&mut t.session, fixes, shutdown_rx).await;
    assert!(finished.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_timer_ticks_refresh_stats() {
    let mut t = create_test_session(Coordinate::new(0.0, 0.0), EngineConfig::default());
    let fixes = t.session.start().unwrap();
    let emitted_at_start = t.observer.stats().len();

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let clock = t.clock.clone();
    let controller = async move {
        for _ in 0..3 {
            clock.advance(chrono::Duration::seconds(1));
            tokio::time::sleep(Duration::from_millis(1000)).await;
        }
        shutdown_tx.send(()).unwrap();
    };

    let driver = drive_session(&mut t.session, fixes, shutdown_rx);
    let (finished, ()) = tokio::join!(driver, controller);

    let finished = finished.unwrap();
    assert_eq!(finished.stats.elapsed_running_time.as_secs(), 3);
    assert!(t.observer.stats().len() >= emitted_at_start + 1);
}

#[tokio::test(start_paused = true)]
async fn test_tick_period_follows_stats_config() {
    let mut config = EngineConfig::default();
    config.stats.refresh_interval_secs = 2;
    let mut t = create_test_session(Coordinate::new(0.0, 0.0), config);
    let fixes = t.session.start().unwrap();
    let emitted_at_start = t.observer.stats().len();

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let clock = t.clock.clone();
    let controller = async move {
        for _ in 0..3 {
            clock.advance(chrono::Duration::seconds(1));
            tokio::time::sleep(Duration::from_millis(1000)).await;
        }
        shutdown_tx.send(()).unwrap();
    };

    let driver = drive_session(&mut t.session, fixes, shutdown_rx);
    let (finished, ()) = tokio::join!(driver, controller);

    assert!(finished.is_some());
    // Only the tick at 2 s falls inside the 3 s run
    assert_eq!(t.observer.stats().len(), emitted_at_start + 1);
}
