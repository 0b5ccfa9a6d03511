// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for backend calls.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Backend client errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure, timeout or unreadable body.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL is not usable.
    #[error("Invalid base URL '{url}': {reason}")]
    Url { url: String, reason: String },

    /// The configured token cannot be sent as a header.
    #[error("Invalid API token")]
    InvalidToken,

    /// A zone request rejected before it was sent.
    #[error(transparent)]
    Zones(#[from] locus_zones::Error),
}
