// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the composed engine.

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Engine errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Floorplan error: {0}")]
    Geometry(#[from] locus_geometry::Error),

    #[error("Zone error: {0}")]
    Zones(#[from] locus_zones::Error),

    #[error("Tracking error: {0}")]
    Tracking(#[from] locus_tracking::Error),

    /// The zone store rejected or failed a request.
    #[error("Zone store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub(crate) fn store(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::Store(Box::new(err))
    }
}
