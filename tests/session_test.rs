// ABOUTME: Integration tests for the run session pipeline
// ABOUTME: Covers the end-to-end corridor scenario, callback order, feature toggles and stop
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::Duration;
use common::{create_test_session, fix_at};
use runline::config::EngineConfig;
use runline::course::CourseTopology;
use runline::errors::TrackingError;
use runline::models::{Coordinate, CourseNode, DeviationSeverity, TrackingState};
use runline::navigation::GuidanceMessage;
use runline::session::RunEvent;
use runline::test_utils::create_test_corridor;
use runline::tracking::FixOutcome;

#[test]
fn test_corridor_run_goes_off_course() {
    let mut t = create_test_session(Coordinate::new(0.0, 0.0), EngineConfig::default());
    t.session.set_course(Some(create_test_corridor()));
    let _fixes = t.session.start().unwrap();

    t.clock.advance(Duration::seconds(5));
    t.session.on_fix_received(fix_at(0.0, 0.000_25, 5));
    t.clock.advance(Duration::seconds(5));
    t.session.on_fix_received(fix_at(0.001, 0.0005, 10));

    let validations = t.observer.validations();
    assert_eq!(validations.len(), 2);

    let (on_course, assessment) = validations[0];
    assert!(on_course.is_on_course);
    assert!(on_course.distance_from_course_meters < 0.01);
    assert!(!assessment.is_deviating);

    let (off_course, assessment) = validations[1];
    assert!(!off_course.is_on_course);
    assert!(off_course.distance_from_course_meters > 100.0);
    assert!(assessment.is_deviating);
    assert_eq!(assessment.severity, DeviationSeverity::High);
}

#[test]
fn test_fix_pipeline_callback_order() {
    let mut t = create_test_session(Coordinate::new(0.0, 0.0), EngineConfig::default());
    t.session.set_course(Some(create_test_corridor()));
    let _fixes = t.session.start().unwrap();
    assert_eq!(t.observer.event_kinds(), vec!["state", "path", "stats"]);
    t.observer.clear();

    t.clock.advance(Duration::seconds(3));
    let outcome = t.session.on_fix_received(fix_at(0.0, 0.0001, 3));
    assert_eq!(outcome, FixOutcome::Appended);
    assert_eq!(
        t.observer.event_kinds(),
        vec!["path", "validation", "navigation", "stats"]
    );
}

#[test]
fn test_close_fix_still_validates_without_path_change() {
    let mut t = create_test_session(Coordinate::new(0.0, 0.0), EngineConfig::default());
    t.session.set_course(Some(create_test_corridor()));
    let _fixes = t.session.start().unwrap();
    t.observer.clear();

    let outcome = t.session.on_fix_received(fix_at(0.000_01, 0.000_01, 1));
    assert_eq!(outcome, FixOutcome::TooClose);
    assert_eq!(t.observer.event_kinds(), vec!["validation", "navigation"]);
    assert_eq!(t.session.path().len(), 1);
}

#[test]
fn test_disabled_features_are_skipped() {
    let mut t = create_test_session(Coordinate::new(0.0, 0.0), EngineConfig::default());
    t.session.set_course(Some(create_test_corridor()));
    t.session.set_validation_enabled(false);
    t.session.set_navigation_enabled(false);
    let _fixes = t.session.start().unwrap();
    t.observer.clear();

    t.clock.advance(Duration::seconds(2));
    t.session.on_fix_received(fix_at(0.0, 0.0001, 2));
    assert_eq!(t.observer.event_kinds(), vec!["path", "stats"]);
}

#[test]
fn test_no_course_means_no_validation() {
    let mut t = create_test_session(Coordinate::new(0.0, 0.0), EngineConfig::default());
    let _fixes = t.session.start().unwrap();
    t.clock.advance(Duration::seconds(2));
    t.session.on_fix_received(fix_at(0.0, 0.0001, 2));
    assert!(t.observer.validations().is_empty());
}

#[test]
fn test_paused_session_ignores_fixes() {
    let mut t = create_test_session(Coordinate::new(0.0, 0.0), EngineConfig::default());
    t.session.set_course(Some(create_test_corridor()));
    let _fixes = t.session.start().unwrap();
    assert_eq!(t.session.toggle_pause().unwrap(), TrackingState::Paused);
    t.observer.clear();

    let outcome = t.session.on_fix_received(fix_at(0.0, 0.0002, 1));
    assert_eq!(outcome, FixOutcome::NotTracking);
    assert!(t.observer.events().is_empty());
}

#[test]
fn test_stop_returns_finished_run_and_releases_everything() {
    let mut t = create_test_session(Coordinate::new(0.0, 0.0), EngineConfig::default());
    t.session.set_course(Some(create_test_corridor()));
    let _fixes = t.session.start().unwrap();
    let run_id = t.session.id();
    assert_eq!(t.provider.active_subscriptions(), 1);

    t.clock.advance(Duration::seconds(10));
    t.session.on_fix_received(fix_at(0.0, 0.0002, 10));
    t.session.toggle_pause().unwrap();
    t.clock.advance(Duration::seconds(5));
    t.session.toggle_pause().unwrap();
    t.clock.advance(Duration::seconds(10));
    t.session.on_fix_received(fix_at(0.0, 0.0004, 25));

    let finished = t.session.stop().unwrap();
    assert_eq!(finished.session_id, run_id);
    assert_eq!(finished.path.len(), 3);
    assert_eq!(finished.stats.elapsed_running_time.as_secs(), 20);
    assert!((finished.stats.distance_meters - 44.48).abs() < 0.1);
    assert_eq!(finished.ended_at - finished.started_at, Duration::seconds(25));

    assert_eq!(t.session.state(), TrackingState::Idle);
    assert!(t.session.path().is_empty());
    assert_eq!(t.provider.active_subscriptions(), 0);
    assert_eq!(t.session.validator().history_len(), 0);
    assert!(t.speech.cancellations() >= 1);
    assert_eq!(
        t.observer.events().last(),
        Some(&RunEvent::StateChanged {
            state: TrackingState::Idle
        })
    );
    assert!(t.session.stop().is_none());
}

#[test]
fn test_restart_uses_new_run_id() {
    let mut t = create_test_session(Coordinate::new(0.0, 0.0), EngineConfig::default());
    let _fixes = t.session.start().unwrap();
    let first = t.session.stop().unwrap().session_id;
    let _fixes = t.session.start().unwrap();
    let second = t.session.stop().unwrap().session_id;
    assert_ne!(first, second);
}

#[test]
fn test_start_failure_reports_error() {
    let t = create_test_session(Coordinate::new(0.0, 0.0), EngineConfig::default());
    t.provider.deny_permission("denied in settings");
    let mut session = t.session;

    let error = session.start().unwrap_err();
    assert!(matches!(error, TrackingError::PermissionDenied { .. }));
    assert_eq!(session.state(), TrackingState::Idle);
    assert!(t.observer.events().is_empty());
    assert!(session.toggle_pause().is_err());
}

#[test]
fn test_timer_tick_is_change_filtered() {
    let mut t = create_test_session(Coordinate::new(0.0, 0.0), EngineConfig::default());
    assert!(t.session.on_timer_tick().is_none());

    let _fixes = t.session.start().unwrap();
    assert!(t.session.on_timer_tick().is_none());

    t.clock.advance(Duration::seconds(1));
    let stats = t.session.on_timer_tick().unwrap();
    assert_eq!(stats.elapsed_running_time.as_secs(), 1);
    assert!(t.session.on_timer_tick().is_none());
}

#[test]
fn test_turn_guidance_reaches_observers() {
    let course = CourseTopology::new(
        "corner",
        vec![
            CourseNode::new(Coordinate::new(0.0, 0.0), 0.0),
            CourseNode::new(Coordinate::new(0.0002, 0.0), -90.0),
            CourseNode::new(Coordinate::new(0.0002, -0.0005), 0.0),
        ],
        None,
    );
    let mut t = create_test_session(Coordinate::new(0.0, 0.0), EngineConfig::default());
    t.session.set_course(Some(course));
    let _fixes = t.session.start().unwrap();

    t.clock.advance(Duration::seconds(4));
    t.session.on_fix_received(fix_at(0.000_17, 0.0, 4));

    let message = t.observer.events().into_iter().find_map(|event| match event {
        RunEvent::Navigation { message, .. } => message,
        _ => None,
    });
    assert_eq!(
        message,
        Some(GuidanceMessage::Emitted("Turn right in 3 m".to_owned()))
    );
    assert_eq!(t.speech.spoken(), vec!["Turn right in 3 m".to_owned()]);
}

#[test]
fn test_course_change_clears_guidance() {
    let mut t = create_test_session(Coordinate::new(0.0, 0.0), EngineConfig::default());
    t.session.set_course(Some(create_test_corridor()));
    let _fixes = t.session.start().unwrap();
    t.clock.advance(Duration::seconds(2));
    t.session.on_fix_received(fix_at(0.0, 0.0001, 2));
    assert_eq!(t.session.validator().history_len(), 1);

    t.session.set_course(None);
    assert_eq!(t.session.validator().history_len(), 0);
    assert!(t.session.navigator().current_message().is_none());
    assert!(t.session.course().is_none());
}

fn corner_course() -> CourseTopology {
    CourseTopology::new(
        "corner",
        vec![
            CourseNode::new(Coordinate::new(0.0, 0.0), 0.0),
            CourseNode::new(Coordinate::new(0.0002, 0.0), -90.0),
            CourseNode::new(Coordinate::new(0.0002, -0.0005), 0.0),
        ],
        None,
    )
}

fn navigation_messages(t: &common::TestSession) -> Vec<Option<GuidanceMessage>> {
    t.observer
        .events()
        .into_iter()
        .filter_map(|event| match event {
            RunEvent::Navigation { message, .. } => Some(message),
            _ => None,
        })
        .collect()
}

fn session_showing_turn() -> common::TestSession {
    let mut t = create_test_session(Coordinate::new(0.0, 0.0), EngineConfig::default());
    t.session.set_course(Some(corner_course()));
    let _fixes = t.session.start().unwrap();
    t.clock.advance(Duration::seconds(4));
    t.session.on_fix_received(fix_at(0.000_17, 0.0, 4));
    assert_eq!(
        t.session.navigator().current_message(),
        Some("Turn right in 3 m")
    );
    t.observer.clear();
    t
}

#[test]
fn test_disabling_navigation_clears_message_on_observers() {
    let mut t = session_showing_turn();

    t.session.set_navigation_enabled(false);
    assert_eq!(navigation_messages(&t), vec![Some(GuidanceMessage::Cleared)]);

    // Nothing left to clear on the second reset
    t.session.set_course(None);
    t.session.stop();
    assert_eq!(navigation_messages(&t), vec![Some(GuidanceMessage::Cleared)]);
}

#[test]
fn test_clearing_course_clears_message_on_observers() {
    let mut t = session_showing_turn();

    t.session.set_course(None);
    assert_eq!(navigation_messages(&t), vec![Some(GuidanceMessage::Cleared)]);
    assert_eq!(t.speech.cancellations(), 2);
}

#[test]
fn test_stop_clears_message_before_going_idle() {
    let mut t = session_showing_turn();

    t.session.stop().unwrap();
    assert_eq!(t.observer.event_kinds(), vec!["navigation", "state"]);
    assert_eq!(navigation_messages(&t), vec![Some(GuidanceMessage::Cleared)]);
}
