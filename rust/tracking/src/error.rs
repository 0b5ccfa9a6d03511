// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for live tracking.

/// Result type alias for tracking operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Tracking errors.
///
/// Fetch failures are reported to observers and never stop polling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The position source failed (network, HTTP status or decode error).
    #[error("position source failed: {0}")]
    Source(String),

    /// The tracker that fed this subscription is gone.
    #[error("tracker event stream closed")]
    Closed,
}
