// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Live position sources and the samples the tracker keeps.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use locus_geometry::Point3;
use tokio::time::Instant;

/// One raw reading from a position source (tracker frame, uncalibrated)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionReading {
    /// Components other than X may be NaN when the source omitted them
    pub position: Point3<f64>,
    /// Reported accuracy in metres, 0 when unknown
    pub accuracy: f64,
}

impl PositionReading {
    pub fn new(x: f64, y: f64, z: f64, accuracy: f64) -> Self {
        Self {
            position: Point3::new(x, y, z),
            accuracy,
        }
    }
}

/// Something that can be asked for the latest live position.
///
/// `Ok(None)` means the source answered but had no usable position (empty
/// body, missing or non-numeric `x`); the tracker keeps its previous state.
pub trait PositionSource: Send + Sync + 'static {
    type Error: Display + Send + 'static;

    fn latest(&self) -> impl Future<Output = Result<Option<PositionReading>, Self::Error>> + Send;
}

impl<S: PositionSource> PositionSource for Arc<S> {
    type Error = S::Error;

    fn latest(&self) -> impl Future<Output = Result<Option<PositionReading>, Self::Error>> + Send {
        (**self).latest()
    }
}

/// The latest applied reading with its bookkeeping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingSample {
    pub position: Point3<f64>,
    pub accuracy: f64,
    /// When the response was applied
    pub received_at: Instant,
    /// Sequence number of the request that produced it
    pub seq: u64,
}
