// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Locus Floorplan Geometry
//!
//! Turns room-scan primitives (walls, objects, openings, floors) into 2D
//! floorplan geometry using nalgebra for the placement transforms, and
//! projects that geometry into a viewport with an exact inverse.
//!
//! ```rust,ignore
//! use locus_geometry::{compute_transform, make_2d_walls, RoomData, Viewport};
//!
//! let room = RoomData::from_json_str(&json)?;
//! let walls = make_2d_walls(&room.walls);
//! let objects = make_2d_objects(&room.objects);
//! let openings = make_2d_openings(&room.openings);
//! let view = compute_transform(&walls, &objects, &openings, Viewport::new(800.0, 600.0), 16.0);
//! ```

pub mod error;
pub mod extraction;
pub mod scan;
pub mod transform;
pub mod types;
pub mod view;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point3};

pub use error::{Error, Result};
pub use extraction::{make_2d_floors, make_2d_objects, make_2d_openings, make_2d_walls};
pub use scan::{Category, RoomData, ScanPrimitive};
pub use transform::{apply_transform, Transform4x4};
pub use types::{centroid, polygon_area, Bounds2D, Point2D, Polygon2D, Segment2D, MIN_POLYGON_POINTS};
pub use view::{
    compute_transform, compute_transform_with, from_view_point, to_view_point, ViewTransform,
    Viewport, DEFAULT_PADDING,
};
