// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extracted floorplan geometry together with its active view transform.

use locus_geometry::{
    compute_transform_with, make_2d_floors, make_2d_objects, make_2d_openings, make_2d_walls,
    Bounds2D, Point2D, Polygon2D, RoomData, Segment2D, ViewTransform, Viewport, DEFAULT_PADDING,
};
use locus_zones::{AgentPosition, Zone};

use crate::error::Result;

/// Floorplan ready to draw: 2D geometry plus the transform that fits it
/// into the current viewport.
#[derive(Debug, Clone)]
pub struct FloorplanView {
    walls: Vec<Segment2D>,
    objects: Vec<Polygon2D>,
    openings: Vec<Polygon2D>,
    floors: Vec<Polygon2D>,
    viewport: Viewport,
    padding: f64,
    transform: ViewTransform,
}

impl FloorplanView {
    pub fn from_room(room: &RoomData, viewport: Viewport) -> Self {
        Self::with_padding(room, viewport, DEFAULT_PADDING)
    }

    pub fn with_padding(room: &RoomData, viewport: Viewport, padding: f64) -> Self {
        let mut view = Self {
            walls: make_2d_walls(&room.walls),
            objects: make_2d_objects(&room.objects),
            openings: make_2d_openings(&room.openings),
            floors: make_2d_floors(&room.floors),
            viewport,
            padding,
            transform: ViewTransform::centered(viewport),
        };
        view.refit();

        tracing::debug!(
            walls = view.walls.len(),
            objects = view.objects.len(),
            openings = view.openings.len(),
            floors = view.floors.len(),
            scale = view.transform.scale(),
            "Built floorplan view"
        );
        view
    }

    /// Parse a room-scan export and build its view.
    pub fn from_json_str(json: &str, viewport: Viewport) -> Result<Self> {
        let room = RoomData::from_json_str(json)?;
        Ok(Self::from_room(&room, viewport))
    }

    /// Refit the geometry into a new viewport size.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.refit();
    }

    fn refit(&mut self) {
        let polygons = self.objects.iter().chain(&self.openings).chain(&self.floors);
        self.transform = compute_transform_with(&self.walls, polygons, self.viewport, self.padding);
    }

    pub fn walls(&self) -> &[Segment2D] {
        &self.walls
    }

    pub fn objects(&self) -> &[Polygon2D] {
        &self.objects
    }

    pub fn openings(&self) -> &[Polygon2D] {
        &self.openings
    }

    pub fn floors(&self) -> &[Polygon2D] {
        &self.floors
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    /// Extent of all drawable geometry, `None` for an empty scan
    pub fn bounds(&self) -> Option<Bounds2D> {
        let wall_points = self.walls.iter().flat_map(|w| [&w.start, &w.end]);
        let polygon_points = self
            .objects
            .iter()
            .chain(&self.openings)
            .chain(&self.floors)
            .flat_map(|p| p.corners.iter());
        Bounds2D::from_points(wall_points.chain(polygon_points))
    }

    pub fn to_view(&self, p: Point2D) -> Point2D {
        self.transform.to_view(p)
    }

    /// Viewport click to floorplan coordinates
    pub fn to_world(&self, vx: f64, vy: f64) -> Point2D {
        self.transform.from_view(Point2D::new(vx, vy))
    }

    /// Zone outline in viewport pixels
    pub fn zone_outline(&self, zone: &Zone) -> Vec<Point2D> {
        zone.points.iter().map(|p| self.to_view(*p)).collect()
    }

    /// Where the zone's name label goes, in viewport pixels
    pub fn zone_label_anchor(&self, zone: &Zone) -> Option<Point2D> {
        zone.centroid().map(|c| self.to_view(c))
    }

    pub fn agent_marker(&self, position: &AgentPosition) -> Point2D {
        self.to_view(position.floorplan_point())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ROOM: &str = r#"{
      "walls": [
        {"identifier": "w", "dimensions": [4.0, 2.5, 0.1],
         "transform": [1,0,0,0, 0,1,0,0, 0,0,1,0, 0,1.25,0,1]}
      ],
      "floors": [
        {"identifier": "f", "polygonCorners": [[-2,0,-2],[2,0,-2],[2,0,2],[-2,0,2]],
         "transform": [1,0,0,0, 0,1,0,0, 0,0,1,0, 0,0,0,1]}
      ]
    }"#;

    #[test]
    fn test_floors_participate_in_fit() {
        let view = FloorplanView::from_json_str(ROOM, Viewport::new(432.0, 432.0)).unwrap();
        let bounds = view.bounds().unwrap();
        assert_eq!((bounds.min_x, bounds.max_x), (-2.0, 2.0));
        assert_eq!((bounds.min_y, bounds.max_y), (-2.0, 2.0));
        // 4 x 4 world into 400 x 400 usable pixels
        assert_relative_eq!(view.transform().scale(), 100.0);
    }

    #[test]
    fn test_resize_refits() {
        let mut view = FloorplanView::from_json_str(ROOM, Viewport::new(432.0, 432.0)).unwrap();
        view.resize(Viewport::new(232.0, 832.0));
        assert_relative_eq!(view.transform().scale(), 50.0);
        assert_eq!(view.viewport(), Viewport::new(232.0, 832.0));
    }

    #[test]
    fn test_click_round_trip() {
        let view = FloorplanView::from_json_str(ROOM, Viewport::new(640.0, 480.0)).unwrap();
        let v = view.to_view(Point2D::new(1.25, -0.5));
        let p = view.to_world(v.x, v.y);
        assert_relative_eq!(p.x, 1.25, epsilon = 1e-9);
        assert_relative_eq!(p.y, -0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_room_is_centered() {
        let view = FloorplanView::from_json_str("{}", Viewport::new(800.0, 600.0)).unwrap();
        assert!(view.bounds().is_none());
        assert_eq!(*view.transform(), ViewTransform::centered(Viewport::new(800.0, 600.0)));
        let agent = AgentPosition::new(0.0, -0.9, 0.0).unwrap();
        assert_eq!(view.agent_marker(&agent), Point2D::new(400.0, 300.0));
    }

    #[test]
    fn test_zone_overlay() {
        let view = FloorplanView::from_json_str(ROOM, Viewport::new(432.0, 432.0)).unwrap();
        let zone = Zone::new(
            "z",
            "Corner",
            vec![Point2D::new(-2.0, 2.0), Point2D::new(0.0, 2.0), Point2D::new(0.0, 0.0), Point2D::new(-2.0, 0.0)],
        );
        let outline = view.zone_outline(&zone);
        assert_relative_eq!(outline[0].x, 16.0);
        assert_relative_eq!(outline[0].y, 16.0);
        let anchor = view.zone_label_anchor(&zone).unwrap();
        assert_relative_eq!(anchor.x, 116.0);
        assert_relative_eq!(anchor.y, 116.0);
    }
}
