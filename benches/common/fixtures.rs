// ABOUTME: Benchmark fixtures generating deterministic courses and recorded paths
// ABOUTME: Courses zigzag with alternating turns so the navigator has real work to do
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Duration, Utc};
use runline::course::CourseTopology;
use runline::models::{Coordinate, CourseNode, Fix};

/// Degrees of latitude per leg of a generated course (~55 m)
const LEG_DEGREES: f64 = 0.0005;

/// Predefined course sizes for benchmark scenarios
#[derive(Debug, Clone, Copy)]
pub enum CourseSize {
    /// Short loop (20 nodes)
    Small,
    /// Typical 10k course (200 nodes)
    Medium,
    /// Marathon-scale course (2000 nodes)
    Large,
}

impl CourseSize {
    #[must_use]
    pub const fn nodes(self) -> usize {
        match self {
            Self::Small => 20,
            Self::Medium => 200,
            Self::Large => 2000,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

/// Staircase course heading north-east with alternating left and right turns
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn generate_course(nodes: usize) -> CourseTopology {
    let course_nodes = (0..nodes)
        .map(|index| {
            let step = (index / 2) as f64 * LEG_DEGREES;
            let (longitude, latitude) = if index % 2 == 0 {
                (step, step)
            } else {
                (step + LEG_DEGREES, step)
            };
            let change = if index == 0 || index + 1 == nodes {
                0.0
            } else if index % 2 == 0 {
                -90.0
            } else {
                90.0
            };
            CourseNode::new(Coordinate::new(longitude, latitude), change)
        })
        .collect();
    CourseTopology::new(format!("bench-{nodes}"), course_nodes, None)
}

/// Fixes walking along the course legs with a small lateral wobble, one per second
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
pub fn generate_fixes(course: &CourseTopology, per_leg: usize, start: DateTime<Utc>) -> Vec<Fix> {
    let nodes = course.nodes();
    let mut fixes = Vec::with_capacity(nodes.len() * per_leg);
    for pair in nodes.windows(2) {
        let (a, b) = (pair[0].location, pair[1].location);
        for step in 0..per_leg {
            let t = step as f64 / per_leg as f64;
            let wobble = if step % 2 == 0 { 0.000_02 } else { -0.000_02 };
            let coordinate = Coordinate::new(
                t.mul_add(b.longitude - a.longitude, a.longitude) + wobble,
                t.mul_add(b.latitude - a.latitude, a.latitude),
            );
            let offset = Duration::seconds(fixes.len() as i64);
            fixes.push(Fix::new(coordinate, start + offset));
        }
    }
    fixes
}
