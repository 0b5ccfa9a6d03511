// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading room-scan documents.
///
/// Extraction and projection never fail; only document decoding does.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid room-scan document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Room-scan document has an empty rooms list")]
    MissingRoom,

    #[error("Room-scan room is not a JSON object")]
    NotAnObject,
}
