// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Locus Engine
//!
//! Composes the floorplan view, zone editing and live tracking into one
//! session for a home.

pub mod config;
pub mod editor;
pub mod error;
pub mod floorplan;
pub mod session;

pub use config::MonitorConfig;
pub use editor::ZoneEditor;
pub use error::{Error, Result};
pub use floorplan::FloorplanView;
pub use session::{LiveSession, SessionUpdate};
