// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for zone and calibration operations.

/// Result type alias for zone operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by explicit user actions and persistence.
///
/// Per-tick work (calibration, membership) never fails; it yields "no
/// position" or "no zone" instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A calibration with a non-positive or non-finite parameter.
    #[error("invalid calibration: {0}")]
    InvalidCalibration(String),

    /// A zone outline with fewer than 3 usable corners.
    #[error("zone needs at least 3 corners, got {0}")]
    DegenerateZone(usize),

    /// A zone name that is empty after trimming.
    #[error("zone name must not be empty")]
    EmptyZoneName,

    /// No zone with the given id.
    #[error("zone not found: {0}")]
    ZoneNotFound(String),

    /// The persistence backend failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Stored data could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<cacache::Error> for Error {
    fn from(err: cacache::Error) -> Self {
        Error::Storage(err.to_string())
    }
}
