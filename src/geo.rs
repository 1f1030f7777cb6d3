// ABOUTME: Geodesic math core for distance, bearing and segment projection on a sphere
// ABOUTME: Every geometric decision of the engine derives distance and bearing from here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Geodesic math
//!
//! Pure functions over [`Coordinate`] values. Distances use the haversine
//! formula on a sphere of radius [`EARTH_RADIUS_METERS`].

use runline_core::constants::geodesy::EARTH_RADIUS_METERS;
use runline_core::models::Coordinate;

/// Squared planar segment length below which a segment is treated as a point
const DEGENERATE_SEGMENT_SQ: f64 = 1e-20;

/// Haversine great-circle distance between two coordinates (meters)
#[must_use]
pub fn distance_meters(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    // Rounding can push h marginally above 1 for antipodal points
    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

/// Initial bearing from `a` to `b` in degrees, normalized to `[0, 360)`
#[must_use]
pub fn bearing_degrees(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    normalize_degrees(y.atan2(x).to_degrees())
}

/// Absolute difference between two bearings, in `[0, 360)`
///
/// Not folded to `[0, 180]`: callers that accept "ahead" headings test for
/// `<= tolerance || >= 360 - tolerance`.
#[must_use]
pub fn angular_difference_degrees(a: f64, b: f64) -> f64 {
    normalize_degrees((a - b).abs())
}

/// Normalize an angle to `[0, 360)`
#[must_use]
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Nearest point to `p` on segment `a -> b` and its distance from `p` (meters)
///
/// The projection uses an equirectangular plane scaled by the cosine of the
/// segment's mean latitude, accurate for the sub-kilometer segments of a course.
#[must_use]
pub fn nearest_point_on_segment(
    p: &Coordinate,
    a: &Coordinate,
    b: &Coordinate,
) -> (Coordinate, f64) {
    let cos_lat = ((a.latitude + b.latitude) / 2.0).to_radians().cos();

    let dx = (b.longitude - a.longitude) * cos_lat;
    let dy = b.latitude - a.latitude;
    let px = (p.longitude - a.longitude) * cos_lat;
    let py = p.latitude - a.latitude;

    let seg_len_sq = dx.mul_add(dx, dy * dy);
    if seg_len_sq < DEGENERATE_SEGMENT_SQ {
        return (*a, distance_meters(p, a));
    }

    let t = (px.mul_add(dx, py * dy) / seg_len_sq).clamp(0.0, 1.0);
    let nearest = Coordinate::new(
        t.mul_add(b.longitude - a.longitude, a.longitude),
        t.mul_add(b.latitude - a.latitude, a.latitude),
    );
    (nearest, distance_meters(p, &nearest))
}

/// Total length of a polyline (meters)
#[must_use]
pub fn path_length_meters(points: &[Coordinate]) -> f64 {
    points
        .windows(2)
        .map(|pair| distance_meters(&pair[0], &pair[1]))
        .sum()
}
