// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Locus Zones
//!
//! Named floorplan zones, the calibration that maps live tracker samples onto
//! the floorplan, and the engine that answers "which zone is the agent in".
//!
//! ```rust,ignore
//! use locus_zones::{CalibrationStore, DiskBackend, ZoneEngine};
//!
//! let calibration = CalibrationStore::open(DiskBackend::new("./.cache"), "home-1");
//! let mut engine = ZoneEngine::new(calibration);
//! engine.set_zones(zones);
//! if let Some(zone) = engine.apply_sample(Some(raw)) {
//!     println!("in {}", zone.name);
//! }
//! ```

pub mod calibration;
pub mod engine;
pub mod error;
pub mod polygon;
pub mod store;
pub mod zone;
pub mod zone_store;

pub use calibration::{calibrate, AgentPosition, CalibrationConfig, FIXED_VERTICAL_OFFSET};
pub use engine::{resolve_zone, OverlapPolicy, ZoneEngine};
pub use error::{Error, Result};
pub use polygon::point_in_polygon;
pub use store::{CalibrationBackend, CalibrationStore, DiskBackend, MemoryBackend};
pub use zone::{NewZone, Zone, ZoneDraft, DEFAULT_MAX_CORNERS};
pub use zone_store::{MemoryZoneStore, ZoneStore};
