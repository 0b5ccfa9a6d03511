// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Locus Backend Client
//!
//! reqwest client for the Locus REST API. [`LocusClient`] is both the live
//! [`PositionSource`](locus_tracking::PositionSource) polled by the tracker
//! and the [`ZoneStore`](locus_zones::ZoneStore) holding a home's zones.

pub mod client;
pub mod config;
pub mod dto;
pub mod error;

pub use client::LocusClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
pub use dto::{parse_latest, CreateLabel, LabelPoint, RoomLabel};
pub use error::{Error, Result};
