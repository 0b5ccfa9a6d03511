// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Named zones and the corner-capture draft used to create them.

use locus_geometry::{centroid, polygon_area, Bounds2D, Point2D, ViewTransform, MIN_POLYGON_POINTS};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::polygon::point_in_polygon;

/// Corner clicks accepted by a draft unless configured otherwise
pub const DEFAULT_MAX_CORNERS: usize = 4;

/// A user-labelled area of the floorplan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Zone {
    pub id: String,
    pub name: String,
    /// Closed outline in floorplan coordinates (`y` is world Z)
    pub points: Vec<Point2D>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Zone {
    pub fn new(id: impl Into<String>, name: impl Into<String>, points: Vec<Point2D>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            points,
            color: None,
        }
    }

    /// Zones with fewer than 3 points are kept but never matched
    pub fn is_valid(&self) -> bool {
        self.points.len() >= MIN_POLYGON_POINTS
    }

    pub fn contains(&self, point: &Point2D) -> bool {
        point_in_polygon(point, &self.points)
    }

    /// Label anchor: the mean of the outline points
    pub fn centroid(&self) -> Option<Point2D> {
        centroid(&self.points)
    }

    pub fn area(&self) -> f64 {
        polygon_area(&self.points)
    }

    pub fn bounds(&self) -> Option<Bounds2D> {
        Bounds2D::from_points(&self.points)
    }
}

/// A finished draft, ready to be sent to the zone store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewZone {
    pub name: String,
    pub points: Vec<Point2D>,
}

/// Corner capture in progress.
///
/// Each click on the floorplan adds one corner until the cap is reached. A
/// draft can be finished once it has at least 3 corners.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneDraft {
    corners: Vec<Point2D>,
    max_corners: usize,
}

impl Default for ZoneDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoneDraft {
    pub fn new() -> Self {
        Self::with_max_corners(DEFAULT_MAX_CORNERS)
    }

    /// A cap below 3 is raised to 3.
    pub fn with_max_corners(max_corners: usize) -> Self {
        let max_corners = max_corners.max(MIN_POLYGON_POINTS);
        Self {
            corners: Vec::with_capacity(max_corners),
            max_corners,
        }
    }

    /// Add a corner. Returns `false` if the draft is full or the point is not
    /// finite.
    pub fn push(&mut self, corner: Point2D) -> bool {
        if self.is_complete() || !corner.is_finite() {
            return false;
        }
        self.corners.push(corner);
        true
    }

    /// Add a corner from a click at viewport pixel `(vx, vy)`.
    pub fn push_view_click(&mut self, vx: f64, vy: f64, view: &ViewTransform) -> bool {
        self.push(view.from_view(Point2D::new(vx, vy)))
    }

    /// Remove the last corner
    pub fn undo(&mut self) -> Option<Point2D> {
        self.corners.pop()
    }

    pub fn clear(&mut self) {
        self.corners.clear();
    }

    pub fn corners(&self) -> &[Point2D] {
        &self.corners
    }

    pub fn max_corners(&self) -> usize {
        self.max_corners
    }

    /// All corners captured; further clicks are ignored
    pub fn is_complete(&self) -> bool {
        self.corners.len() >= self.max_corners
    }

    pub fn can_finish(&self) -> bool {
        self.corners.len() >= MIN_POLYGON_POINTS
    }

    /// Turn the draft into a zone request, leaving the draft empty.
    ///
    /// On error the draft is left untouched so the user can fix it.
    pub fn finish(&mut self, name: &str) -> Result<NewZone> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyZoneName);
        }
        if !self.can_finish() {
            return Err(Error::DegenerateZone(self.corners.len()));
        }
        Ok(NewZone {
            name: name.to_string(),
            points: std::mem::take(&mut self.corners),
        })
    }
}
