// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floorplan to viewport projection
//!
//! The projection is a uniform scale plus offset with the vertical axis
//! flipped, so larger floorplan Y values appear higher on screen. It is
//! exactly invertible, which lets a click on the viewport be turned back into
//! a floorplan coordinate (used when placing zone corners).

use serde::{Deserialize, Serialize};

use crate::types::{Bounds2D, Point2D, Polygon2D, Segment2D};

/// Default margin kept free around the scene (pixels)
pub const DEFAULT_PADDING: f64 = 16.0;

/// Target drawing surface size in pixels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// World to viewport mapping: `vx = x*scale + offset_x`, `vy = -y*scale + offset_y`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", try_from = "RawViewTransform")]
pub struct ViewTransform {
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

/// Unchecked wire form of [`ViewTransform`]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawViewTransform {
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl TryFrom<RawViewTransform> for ViewTransform {
    type Error = &'static str;

    fn try_from(raw: RawViewTransform) -> Result<Self, Self::Error> {
        Self::new(raw.scale, raw.offset_x, raw.offset_y)
            .ok_or("view transform scale must be finite and greater than zero")
    }
}

impl ViewTransform {
    /// Returns `None` unless `scale` is finite and strictly positive.
    pub fn new(scale: f64, offset_x: f64, offset_y: f64) -> Option<Self> {
        if scale.is_finite() && scale > 0.0 {
            Some(Self {
                scale,
                offset_x,
                offset_y,
            })
        } else {
            None
        }
    }

    /// Unit scale centred on the viewport, used when there is nothing to fit
    pub fn centered(viewport: Viewport) -> Self {
        Self {
            scale: 1.0,
            offset_x: viewport.width / 2.0,
            offset_y: viewport.height / 2.0,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset_x(&self) -> f64 {
        self.offset_x
    }

    pub fn offset_y(&self) -> f64 {
        self.offset_y
    }

    /// Floorplan point to viewport pixels
    pub fn to_view(&self, p: Point2D) -> Point2D {
        Point2D::new(
            p.x * self.scale + self.offset_x,
            -p.y * self.scale + self.offset_y,
        )
    }

    /// Viewport pixels back to a floorplan point
    pub fn from_view(&self, v: Point2D) -> Point2D {
        Point2D::new(
            (v.x - self.offset_x) / self.scale,
            -(v.y - self.offset_y) / self.scale,
        )
    }

    /// Fit the given bounds into the viewport, keeping aspect ratio.
    ///
    /// Zero-extent axes are treated as one unit wide. Falls back to
    /// [`ViewTransform::centered`] when the padded viewport leaves no
    /// positive drawing area.
    pub fn fit(bounds: &Bounds2D, viewport: Viewport, padding: f64) -> Self {
        let world_width = non_zero(bounds.width());
        let world_height = non_zero(bounds.height());

        let sx = (viewport.width - 2.0 * padding) / world_width;
        let sy = (viewport.height - 2.0 * padding) / world_height;
        let scale = sx.min(sy);

        let offset_x = padding - bounds.min_x * scale;
        let offset_y = padding + bounds.max_y * scale;

        Self::new(scale, offset_x, offset_y).unwrap_or_else(|| Self::centered(viewport))
    }
}

fn non_zero(extent: f64) -> f64 {
    if extent == 0.0 {
        1.0
    } else {
        extent
    }
}

/// Every vertex of the extracted geometry. Polygons with fewer than three
/// corners enclose nothing and are left out.
fn scene_points<'a>(
    walls: &'a [Segment2D],
    polygons: impl IntoIterator<Item = &'a Polygon2D>,
) -> impl Iterator<Item = &'a Point2D> {
    walls.iter().flat_map(|w| [&w.start, &w.end]).chain(
        polygons
            .into_iter()
            .filter(|p| p.is_valid())
            .flat_map(|p| p.corners.iter()),
    )
}

/// Compute the view transform that fits walls, objects and openings into the
/// viewport with `padding` pixels of margin on the tighter axis.
///
/// An empty scene yields a unit scale centred on the viewport.
pub fn compute_transform(
    walls: &[Segment2D],
    objects: &[Polygon2D],
    openings: &[Polygon2D],
    viewport: Viewport,
    padding: f64,
) -> ViewTransform {
    compute_transform_with(walls, objects.iter().chain(openings), viewport, padding)
}

/// Same as [`compute_transform`] over an arbitrary set of polygons
/// (objects, openings and floors alike).
pub fn compute_transform_with<'a>(
    walls: &'a [Segment2D],
    polygons: impl IntoIterator<Item = &'a Polygon2D>,
    viewport: Viewport,
    padding: f64,
) -> ViewTransform {
    match Bounds2D::from_points(scene_points(walls, polygons)) {
        Some(bounds) => ViewTransform::fit(&bounds, viewport, padding),
        None => ViewTransform::centered(viewport),
    }
}

/// Floorplan `(x, y)` to viewport `(vx, vy)`
pub fn to_view_point(x: f64, y: f64, transform: &ViewTransform) -> (f64, f64) {
    let v = transform.to_view(Point2D::new(x, y));
    (v.x, v.y)
}

/// Viewport `(vx, vy)` to floorplan `(x, y)`
pub fn from_view_point(vx: f64, vy: f64, transform: &ViewTransform) -> (f64, f64) {
    let p = transform.from_view(Point2D::new(vx, vy));
    (p.x, p.y)
}
