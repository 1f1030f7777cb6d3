// ABOUTME: Immutable course topology (ordered turn nodes plus optional boundary rings)
// ABOUTME: Includes the CourseSource seam and an in-memory source keyed by course id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Course Topology
//!
//! A [`CourseTopology`] is built once per selected course and never mutated.
//! Switching courses means building a new topology and handing it to the
//! session, which resets the validator and navigator.

use runline_core::errors::{AppError, AppResult};
use runline_core::models::{Coordinate, CourseNode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Static description of a selected course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseTopology {
    course_id: String,
    nodes: Vec<CourseNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    boundary: Option<Vec<Vec<Coordinate>>>,
}

impl CourseTopology {
    /// Build a topology from stored nodes and optional boundary rings
    #[must_use]
    pub fn new(
        course_id: impl Into<String>,
        nodes: Vec<CourseNode>,
        boundary: Option<Vec<Vec<Coordinate>>>,
    ) -> Self {
        Self {
            course_id: course_id.into(),
            nodes,
            boundary,
        }
    }

    /// Identifier of the course this topology describes
    #[must_use]
    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    /// Ordered waypoint nodes
    #[must_use]
    pub fn nodes(&self) -> &[CourseNode] {
        &self.nodes
    }

    /// Raw boundary rings as loaded
    #[must_use]
    pub fn boundary(&self) -> Option<&[Vec<Coordinate>]> {
        self.boundary.as_deref()
    }

    /// Node locations in course order, skipping invalid coordinates
    #[must_use]
    pub fn polyline(&self) -> Vec<Coordinate> {
        self.nodes
            .iter()
            .map(|node| node.location)
            .filter(Coordinate::is_valid)
            .collect()
    }

    /// Boundary rings with invalid points removed
    ///
    /// Rings left with fewer than two points cannot form a segment and are
    /// dropped. Returns `None` when the course has no boundary at all.
    #[must_use]
    pub fn valid_rings(&self) -> Option<Vec<Vec<Coordinate>>> {
        let rings = self.boundary.as_ref()?;
        let cleaned: Vec<Vec<Coordinate>> = rings
            .iter()
            .filter_map(|ring| {
                let points: Vec<Coordinate> =
                    ring.iter().copied().filter(Coordinate::is_valid).collect();
                if points.len() < ring.len() {
                    warn!(
                        course_id = %self.course_id,
                        dropped = ring.len() - points.len(),
                        "Dropped invalid boundary points"
                    );
                }
                (points.len() >= 2).then_some(points)
            })
            .collect();
        Some(cleaned)
    }

    /// Geometry the validator measures against: boundary rings when the
    /// course has a boundary, otherwise the node polyline as a single line
    ///
    /// Rings are returned closed (last point equal to the first); the node
    /// polyline stays open.
    #[must_use]
    pub fn conformance_lines(&self) -> Vec<Vec<Coordinate>> {
        match self.valid_rings() {
            Some(rings) => rings.into_iter().map(close_ring).collect(),
            None => {
                let line = self.polyline();
                if line.is_empty() {
                    Vec::new()
                } else {
                    vec![line]
                }
            }
        }
    }

    /// True when there is any usable geometry to validate against
    #[must_use]
    pub fn has_geometry(&self) -> bool {
        !self.conformance_lines().is_empty()
    }
}

fn close_ring(mut ring: Vec<Coordinate>) -> Vec<Coordinate> {
    if let (Some(first), Some(last)) = (ring.first().copied(), ring.last()) {
        if *last != first {
            ring.push(first);
        }
    }
    ring
}

/// Supplier of course topologies for a selected course id
pub trait CourseSource {
    /// Load the topology of `course_id`
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when the course is unknown
    fn load(&self, course_id: &str) -> AppResult<CourseTopology>;
}

/// Course source backed by a map of preloaded topologies
#[derive(Debug, Clone, Default)]
pub struct InMemoryCourseSource {
    courses: HashMap<String, CourseTopology>,
}

impl InMemoryCourseSource {
    /// Create an empty source
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a course
    pub fn insert(&mut self, topology: CourseTopology) {
        debug!(course_id = %topology.course_id, "Registered course topology");
        self.courses.insert(topology.course_id.clone(), topology);
    }
}

impl CourseSource for InMemoryCourseSource {
    fn load(&self, course_id: &str) -> AppResult<CourseTopology> {
        self.courses
            .get(course_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Course {course_id}")))
    }
}
