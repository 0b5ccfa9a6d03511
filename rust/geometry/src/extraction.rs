// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scan primitives to floorplan geometry
//!
//! All functions here are total. Output length and ids always match the
//! input one-to-one so renderers can correlate results with scan entries;
//! a primitive that cannot be placed yields a zero-length segment or an
//! empty polygon instead.

use nalgebra::Point3;
use smallvec::SmallVec;

use crate::scan::ScanPrimitive;
use crate::transform::Transform4x4;
use crate::types::{Point2D, Polygon2D, Segment2D, MIN_POLYGON_POINTS};

/// Depth assumed for openings whose export omits it (meters)
pub const DEFAULT_OPENING_DEPTH: f64 = 0.08;

/// A dimension usable for placement: present, finite and non-zero
fn usable(value: f64) -> bool {
    value.is_finite() && value != 0.0
}

/// Four footprint corners of a `width` x `depth` box centred on the local
/// origin, transformed to world space and projected to the floorplan.
fn box_footprint(t: &Transform4x4, width: f64, depth: f64) -> SmallVec<[Point2D; 4]> {
    let hx = width / 2.0;
    let hz = depth / 2.0;
    [(-hx, -hz), (hx, -hz), (hx, hz), (-hx, hz)]
        .into_iter()
        .map(|(x, z)| Point2D::from_world(&t.apply(Point3::new(x, 0.0, z))))
        .collect()
}

/// Convert walls to floorplan segments.
///
/// The wall's length runs along its local X axis, centred on the origin.
pub fn make_2d_walls(walls: &[ScanPrimitive]) -> Vec<Segment2D> {
    walls
        .iter()
        .enumerate()
        .map(|(idx, wall)| {
            let id = wall.id_or("wall", idx);
            let length = wall.dimension(0).unwrap_or(0.0);
            let transform = wall.transform_slice().and_then(Transform4x4::from_column_slice);

            match transform {
                Some(t) if usable(length) => {
                    let half = length / 2.0;
                    let p0 = t.apply(Point3::new(-half, 0.0, 0.0));
                    let p1 = t.apply(Point3::new(half, 0.0, 0.0));
                    Segment2D {
                        id,
                        start: Point2D::from_world(&p0),
                        end: Point2D::from_world(&p1),
                    }
                }
                _ => Segment2D::degenerate(id),
            }
        })
        .collect()
}

/// Convert furniture and other objects to floorplan rectangles.
///
/// Uses width (dimension 0) and length (dimension 2).
pub fn make_2d_objects(objects: &[ScanPrimitive]) -> Vec<Polygon2D> {
    objects
        .iter()
        .enumerate()
        .map(|(idx, obj)| {
            let width = obj.dimension(0).unwrap_or(0.0);
            let length = obj.dimension(2).unwrap_or(0.0);
            footprint(obj, obj.id_or("obj", idx), width, length)
        })
        .collect()
}

/// Convert doors and windows to floorplan rectangles.
///
/// Uses width (dimension 0) and depth (dimension 2). Exports often carry only
/// two dimensions for openings, in which case the depth defaults to
/// [`DEFAULT_OPENING_DEPTH`].
pub fn make_2d_openings(openings: &[ScanPrimitive]) -> Vec<Polygon2D> {
    openings
        .iter()
        .enumerate()
        .map(|(idx, op)| {
            let (width, depth) = match op.dimensions {
                Some(_) => (
                    op.dimension(0).unwrap_or(0.0),
                    op.dimension(2).unwrap_or(DEFAULT_OPENING_DEPTH),
                ),
                None => (0.0, 0.0),
            };
            footprint(op, op.id_or("op", idx), width, depth)
        })
        .collect()
}

/// Convert floors to floorplan outlines.
///
/// Prefers the explicit `polygonCorners` outline. Without one, the floor is
/// treated as a width x length rectangle from dimensions 0 and 1.
pub fn make_2d_floors(floors: &[ScanPrimitive]) -> Vec<Polygon2D> {
    floors
        .iter()
        .enumerate()
        .map(|(idx, floor)| {
            let id = floor.id_or("floor", idx);
            let transform = floor.transform_slice().and_then(Transform4x4::from_column_slice);

            match (&floor.polygon_corners, transform) {
                (Some(raw), Some(t)) => {
                    let corners: SmallVec<[Point2D; 4]> = raw
                        .iter()
                        .filter(|c| c.len() >= 3)
                        .map(|c| Point2D::from_world(&t.apply(Point3::new(c[0], c[1], c[2]))))
                        .collect();
                    if corners.len() < MIN_POLYGON_POINTS {
                        return Polygon2D::empty(id, floor.category.clone());
                    }
                    Polygon2D {
                        id,
                        corners,
                        category: floor.category.clone(),
                    }
                }
                _ => {
                    let width = floor.dimension(0).unwrap_or(0.0);
                    let length = floor.dimension(1).unwrap_or(0.0);
                    footprint(floor, id, width, length)
                }
            }
        })
        .collect()
}

fn footprint(primitive: &ScanPrimitive, id: String, width: f64, depth: f64) -> Polygon2D {
    let transform = primitive.transform_slice().and_then(Transform4x4::from_column_slice);
    match transform {
        Some(t) if usable(width) && usable(depth) => Polygon2D {
            id,
            corners: box_footprint(&t, width, depth),
            category: primitive.category.clone(),
        },
        _ => Polygon2D::empty(id, primitive.category.clone()),
    }
}
