// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Locus Live Tracking
//!
//! Polls a [`PositionSource`] on a fixed interval while connected, keeps the
//! newest reading and publishes [`TrackerEvent`]s to subscribers.
//!
//! ```rust,ignore
//! use locus_tracking::{Tracker, TrackerConfig, TrackerEvent};
//!
//! let mut tracker = Tracker::new(client, TrackerConfig::from_env());
//! let mut events = tracker.subscribe();
//! tracker.connect();
//! while let Ok(event) = events.recv().await {
//!     if let TrackerEvent::Sample(sample) = event {
//!         println!("{:?}", sample.position);
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod source;
pub mod tracker;

pub use config::{TrackerConfig, DEFAULT_EVENT_CAPACITY, DEFAULT_POLL_INTERVAL};
pub use error::{Error, Result};
pub use source::{PositionReading, PositionSource, TrackingSample};
pub use tracker::{Subscription, Tracker, TrackerEvent};
