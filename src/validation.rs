// ABOUTME: Course conformance validator measuring the runner's distance from the course geometry
// ABOUTME: Keeps a bounded result history for deviation classification and return-to-course checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Course Conformance
//!
//! The validator answers "is the runner on the course?" for each position.
//! Geometry problems never surface as errors: a course with nothing usable to
//! measure against yields [`ValidationResult::unavailable`] and a `warn!` log.

use runline_core::config::ValidationConfig;
use runline_core::constants::validation::TREND_STEADY_METERS;
use runline_core::models::{
    Coordinate, DeviationAssessment, DeviationSeverity, DeviationTrend, ValidationResult,
};
use std::collections::VecDeque;
use tracing::{debug, warn};

use crate::course::CourseTopology;
use crate::geo::{distance_meters, nearest_point_on_segment};

/// Nearest point of the course geometry to `current` and its distance (meters)
///
/// Returns `None` when the topology has no usable geometry.
#[must_use]
pub fn nearest_point_on_course(
    current: &Coordinate,
    topology: &CourseTopology,
) -> Option<(Coordinate, f64)> {
    let mut best: Option<(Coordinate, f64)> = None;
    for line in topology.conformance_lines() {
        if let [only] = line.as_slice() {
            offer(&mut best, *only, distance_meters(current, only));
            continue;
        }
        for pair in line.windows(2) {
            let (point, distance) = nearest_point_on_segment(current, &pair[0], &pair[1]);
            offer(&mut best, point, distance);
        }
    }
    best
}

fn offer(best: &mut Option<(Coordinate, f64)>, point: Coordinate, distance: f64) {
    if !matches!(best, Some((_, nearest)) if *nearest <= distance) {
        *best = Some((point, distance));
    }
}

/// Stateful course conformance validator
#[derive(Debug, Clone)]
pub struct CourseValidator {
    config: ValidationConfig,
    history: VecDeque<ValidationResult>,
    course_id: Option<String>,
    last_position: Option<Coordinate>,
    last_result: Option<ValidationResult>,
}

impl CourseValidator {
    /// Create a validator with an empty history
    #[must_use]
    pub fn new(config: ValidationConfig) -> Self {
        let capacity = config.history_capacity;
        Self {
            config,
            history: VecDeque::with_capacity(capacity),
            course_id: None,
            last_position: None,
            last_result: None,
        }
    }

    /// Validate `current` against `topology`
    ///
    /// A position within the jitter epsilon of the last validated one on the
    /// same course reuses the previous distance without touching the history;
    /// only the tolerance check is re-applied.
    /// An invalid position yields an unavailable result that is not recorded.
    pub fn validate(
        &mut self,
        current: &Coordinate,
        topology: &CourseTopology,
        tolerance_meters: f64,
    ) -> ValidationResult {
        if self.course_id.as_deref() != Some(topology.course_id()) {
            if self.course_id.is_some() {
                debug!(course_id = topology.course_id(), "Course changed, validator reset");
            }
            self.reset();
            self.course_id = Some(topology.course_id().to_owned());
        }

        if !current.is_valid() {
            warn!(coordinate = ?current, "Cannot validate an invalid position");
            return ValidationResult::unavailable();
        }

        if let (Some(last), Some(result)) = (self.last_position, self.last_result) {
            if last.is_near(current, self.config.jitter_epsilon_degrees) {
                // Distance is reused; the tolerance may differ from the cached call
                return ValidationResult {
                    is_on_course: result.distance_from_course_meters <= tolerance_meters,
                    ..result
                };
            }
        }

        let result = match nearest_point_on_course(current, topology) {
            Some((nearest, distance)) => ValidationResult {
                is_on_course: distance <= tolerance_meters,
                distance_from_course_meters: distance,
                nearest_point_on_course: Some(nearest),
            },
            None => {
                warn!(
                    course_id = topology.course_id(),
                    "Course has no usable geometry, reporting off course"
                );
                ValidationResult::unavailable()
            }
        };

        debug!(
            on_course = result.is_on_course,
            distance = result.distance_from_course_meters,
            "Position validated"
        );
        self.record(result);
        self.last_position = Some(*current);
        self.last_result = Some(result);
        result
    }

    /// Classify a result, comparing against the previous one when given
    #[must_use]
    pub fn detect_deviation(
        &self,
        current: &ValidationResult,
        previous: Option<&ValidationResult>,
    ) -> DeviationAssessment {
        let distance = current.distance_from_course_meters;
        let severity = if distance <= self.config.low_severity_max_meters {
            DeviationSeverity::Low
        } else if distance <= self.config.medium_severity_max_meters {
            DeviationSeverity::Medium
        } else {
            DeviationSeverity::High
        };

        let trend = previous.map_or(DeviationTrend::Steady, |previous| {
            let before = previous.distance_from_course_meters;
            if !distance.is_finite() || !before.is_finite() {
                return DeviationTrend::Steady;
            }
            let delta = distance - before;
            if delta.abs() < TREND_STEADY_METERS {
                DeviationTrend::Steady
            } else if delta < 0.0 {
                DeviationTrend::Approaching
            } else {
                DeviationTrend::Receding
            }
        });

        DeviationAssessment {
            is_deviating: !current.is_on_course,
            severity,
            trend,
        }
    }

    /// True when the most recent results covering the recovery window are all on course
    #[must_use]
    pub fn check_course_return(&self) -> bool {
        let window = self.config.recovery_window;
        window > 0
            && self.history.len() >= window
            && self
                .history
                .iter()
                .rev()
                .take(window)
                .all(|result| result.is_on_course)
    }

    /// Recorded results, oldest first
    pub fn history(&self) -> impl Iterator<Item = &ValidationResult> {
        self.history.iter()
    }

    /// Number of recorded results
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Most recent computed result
    #[must_use]
    pub const fn last_result(&self) -> Option<ValidationResult> {
        self.last_result
    }

    /// Clear history and dedup state
    pub fn reset(&mut self) {
        self.history.clear();
        self.course_id = None;
        self.last_position = None;
        self.last_result = None;
    }

    fn record(&mut self, result: ValidationResult) {
        while self.history.len() >= self.config.history_capacity.max(1) {
            self.history.pop_front();
        }
        self.history.push_back(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runline_core::models::CourseNode;

    fn corridor() -> CourseTopology {
        CourseTopology::new(
            "corridor",
            vec![
                CourseNode::new(Coordinate::new(0.0, 0.0), 0.0),
                CourseNode::new(Coordinate::new(0.0, 0.0005), 0.0),
            ],
            None,
        )
    }

    fn result(distance: f64, tolerance: f64) -> ValidationResult {
        ValidationResult {
            is_on_course: distance <= tolerance,
            distance_from_course_meters: distance,
            nearest_point_on_course: None,
        }
    }

    #[test]
    fn test_position_on_segment_is_on_course() {
        let mut validator = CourseValidator::new(ValidationConfig::default());
        let result = validator.validate(&Coordinate::new(0.0, 0.00025), &corridor(), 50.0);
        assert!(result.is_on_course);
        assert!(result.distance_from_course_meters < 0.01);
        assert_eq!(validator.history_len(), 1);
    }

    #[test]
    fn test_jitter_returns_cached_result() {
        let mut validator = CourseValidator::new(ValidationConfig::default());
        let first = validator.validate(&Coordinate::new(0.0001, 0.0002), &corridor(), 50.0);
        let second =
            validator.validate(&Coordinate::new(0.000_100_5, 0.0002), &corridor(), 50.0);
        assert_eq!(first, second);
        assert_eq!(validator.history_len(), 1);
    }

    #[test]
    fn test_jitter_hit_reapplies_tolerance() {
        let mut validator = CourseValidator::new(ValidationConfig::default());
        // ~30 m east of the corridor
        let position = Coordinate::new(0.00027, 0.0002);
        let loose = validator.validate(&position, &corridor(), 50.0);
        let tight = validator.validate(&position, &corridor(), 10.0);

        assert!(loose.is_on_course);
        assert!(!tight.is_on_course);
        assert_eq!(
            loose.distance_from_course_meters,
            tight.distance_from_course_meters
        );
        assert_eq!(validator.history_len(), 1);
    }

    #[test]
    fn test_history_is_bounded() {
        let config = ValidationConfig {
            history_capacity: 3,
            ..ValidationConfig::default()
        };
        let mut validator = CourseValidator::new(config);
        for step in 0..5 {
            let latitude = f64::from(step) * 0.0001;
            validator.validate(&Coordinate::new(0.0, latitude), &corridor(), 50.0);
        }
        assert_eq!(validator.history_len(), 3);
    }

    #[test]
    fn test_empty_geometry_is_unavailable() {
        let mut validator = CourseValidator::new(ValidationConfig::default());
        let empty = CourseTopology::new("empty", Vec::new(), None);
        let result = validator.validate(&Coordinate::new(0.0, 0.0), &empty, 50.0);
        assert!(!result.is_on_course);
        assert!(result.distance_from_course_meters.is_infinite());
        assert!(result.nearest_point_on_course.is_none());
    }

    #[test]
    fn test_single_point_geometry_measures_to_point() {
        let topology = CourseTopology::new(
            "dot",
            vec![CourseNode::new(Coordinate::new(0.0, 0.0), 0.0)],
            None,
        );
        let mut validator = CourseValidator::new(ValidationConfig::default());
        let result = validator.validate(&Coordinate::new(0.0, 0.0003), &topology, 50.0);
        assert!(result.is_on_course);
        assert_eq!(result.nearest_point_on_course, Some(Coordinate::new(0.0, 0.0)));
    }

    #[test]
    fn test_severity_buckets() {
        let validator = CourseValidator::new(ValidationConfig::default());
        let low = validator.detect_deviation(&result(30.0, 50.0), None);
        let medium = validator.detect_deviation(&result(80.0, 50.0), None);
        let high = validator.detect_deviation(&result(101.0, 50.0), None);
        assert_eq!(low.severity, DeviationSeverity::Low);
        assert!(!low.is_deviating);
        assert_eq!(medium.severity, DeviationSeverity::Medium);
        assert!(medium.is_deviating);
        assert_eq!(high.severity, DeviationSeverity::High);
    }

    #[test]
    fn test_trend_against_previous() {
        let validator = CourseValidator::new(ValidationConfig::default());
        let closer = validator.detect_deviation(&result(60.0, 50.0), Some(&result(80.0, 50.0)));
        let further = validator.detect_deviation(&result(90.0, 50.0), Some(&result(80.0, 50.0)));
        let same = validator.detect_deviation(&result(80.4, 50.0), Some(&result(80.0, 50.0)));
        assert_eq!(closer.trend, DeviationTrend::Approaching);
        assert_eq!(further.trend, DeviationTrend::Receding);
        assert_eq!(same.trend, DeviationTrend::Steady);
    }

    #[test]
    fn test_course_change_resets_history() {
        let mut validator = CourseValidator::new(ValidationConfig::default());
        validator.validate(&Coordinate::new(0.0, 0.0001), &corridor(), 50.0);
        let other = CourseTopology::new(
            "other",
            vec![
                CourseNode::new(Coordinate::new(1.0, 1.0), 0.0),
                CourseNode::new(Coordinate::new(1.0, 1.001), 0.0),
            ],
            None,
        );
        validator.validate(&Coordinate::new(1.0, 1.0001), &other, 50.0);
        assert_eq!(validator.history_len(), 1);
    }
}
