// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point-in-polygon membership.
//!
//! Runs once per tracking tick against every zone, so an axis-aligned bounds
//! check rejects most zones before the exact even-odd ray crossing test.

use locus_geometry::{Bounds2D, Point2D, MIN_POLYGON_POINTS};

/// Even-odd membership test with a bounding-box pre-filter.
///
/// Polygons with fewer than 3 vertices never contain anything. Points on the
/// bounding box edge pass the pre-filter and are then decided by the ray test.
pub fn point_in_polygon(point: &Point2D, polygon: &[Point2D]) -> bool {
    if polygon.len() < MIN_POLYGON_POINTS {
        return false;
    }

    match Bounds2D::from_points(polygon) {
        Some(bounds) if bounds.contains(point) => crosses_odd(point, polygon),
        _ => false,
    }
}

/// Ray crossing without the pre-filter.
///
/// For each edge (current vertex `i`, previous vertex `j`, wrapping), toggle
/// when the edge straddles `point.y` and the crossing lies right of `point.x`.
fn crosses_odd(point: &Point2D, polygon: &[Point2D]) -> bool {
    let n = polygon.len();
    let mut inside = false;

    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (polygon[i].x, polygon[i].y);
        let (xj, yj) = (polygon[j].x, polygon[j].y);

        if ((yi > point.y) != (yj > point.y))
            && (point.x < (xj - xi) * (point.y - yi) / (yj - yi) + xi)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}
