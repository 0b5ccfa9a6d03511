// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floorplan-space primitives
//!
//! Floorplan space is the horizontal plane of the scan: world X stays X and
//! world Z becomes the second coordinate. The vertical axis is dropped.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::scan::Category;

/// Minimum number of corners for a polygon to enclose any area
pub const MIN_POLYGON_POINTS: usize = 3;

/// A point on the floorplan plane
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Project a world-space point onto the floorplan plane (keeps X and Z)
    pub fn from_world(p: &Point3<f64>) -> Self {
        Self { x: p.x, y: p.z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned bounding box on the floorplan plane
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bounds2D {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds2D {
    /// Bounding box of the finite points in `points`, `None` if there are none
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point2D>,
    {
        let mut bounds: Option<Bounds2D> = None;
        for p in points.into_iter().filter(|p| p.is_finite()) {
            match bounds.as_mut() {
                Some(b) => b.expand(p),
                None => {
                    bounds = Some(Bounds2D {
                        min_x: p.x,
                        min_y: p.y,
                        max_x: p.x,
                        max_y: p.y,
                    })
                }
            }
        }
        bounds
    }

    pub fn expand(&mut self, p: &Point2D) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Inclusive containment test
    pub fn contains(&self, p: &Point2D) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// A wall reduced to a floorplan line segment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Segment2D {
    pub id: String,
    pub start: Point2D,
    pub end: Point2D,
}

impl Segment2D {
    /// Zero-length segment at the origin, used for unreadable walls
    pub fn degenerate(id: String) -> Self {
        Self {
            id,
            start: Point2D::default(),
            end: Point2D::default(),
        }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}

/// Closed footprint of an object, opening or floor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Polygon2D {
    pub id: String,
    /// Corners in drawing order; the last corner connects back to the first
    pub corners: SmallVec<[Point2D; 4]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl Polygon2D {
    /// Polygon without corners, used for unreadable primitives
    pub fn empty(id: String, category: Option<Category>) -> Self {
        Self {
            id,
            corners: SmallVec::new(),
            category,
        }
    }

    /// True when the polygon has enough corners to enclose an area
    pub fn is_valid(&self) -> bool {
        self.corners.len() >= MIN_POLYGON_POINTS
    }

    pub fn bounds(&self) -> Option<Bounds2D> {
        Bounds2D::from_points(&self.corners)
    }

    /// Unsigned area by the shoelace formula (0 for degenerate polygons)
    pub fn area(&self) -> f64 {
        polygon_area(&self.corners)
    }
}

/// Unsigned shoelace area of a closed ring of points
pub fn polygon_area(points: &[Point2D]) -> f64 {
    let n = points.len();
    if n < MIN_POLYGON_POINTS {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].y;
        area -= points[j].x * points[i].y;
    }

    (area / 2.0).abs()
}

/// Arithmetic mean of the points, `None` for an empty slice
pub fn centroid(points: &[Point2D]) -> Option<Point2D> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point2D::new(sx / n, sy / n))
}
