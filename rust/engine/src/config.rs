// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Monitor configuration loaded from environment variables.

use std::path::PathBuf;

use locus_geometry::Viewport;
use locus_zones::OverlapPolicy;

/// Monitor configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Home whose zones are tracked; also the calibration key.
    pub home_id: String,
    /// Directory for the calibration store.
    pub cache_dir: PathBuf,
    /// Room-scan export to build the floorplan from, if any.
    pub room_file: Option<PathBuf>,
    /// Viewport the floorplan is fitted into.
    pub viewport: Viewport,
    /// Zone choice when zones overlap.
    pub overlap_policy: OverlapPolicy,
}

impl MonitorConfig {
    /// Load configuration from `LOCUS_HOME_ID`, `LOCUS_CACHE_DIR`,
    /// `LOCUS_ROOM_FILE`, `LOCUS_VIEWPORT` (`WIDTHxHEIGHT`) and
    /// `LOCUS_OVERLAP_POLICY` (`first` or `smallest`).
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            home_id: lookup("LOCUS_HOME_ID").unwrap_or_else(|| "default".into()),
            cache_dir: lookup("LOCUS_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./.cache")),
            room_file: lookup("LOCUS_ROOM_FILE").map(PathBuf::from),
            viewport: lookup("LOCUS_VIEWPORT")
                .and_then(|v| parse_viewport(&v))
                .unwrap_or(Viewport::new(800.0, 600.0)),
            overlap_policy: match lookup("LOCUS_OVERLAP_POLICY").as_deref().map(str::trim) {
                Some("smallest") | Some("smallest_area") => OverlapPolicy::SmallestArea,
                _ => OverlapPolicy::FirstDeclared,
            },
        }
    }
}

fn parse_viewport(value: &str) -> Option<Viewport> {
    let (w, h) = value.trim().split_once(['x', 'X'])?;
    let width: f64 = w.trim().parse().ok()?;
    let height: f64 = h.trim().parse().ok()?;
    (width > 0.0 && height > 0.0).then(|| Viewport::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::from_lookup(|_| None);
        assert_eq!(config.home_id, "default");
        assert_eq!(config.cache_dir, PathBuf::from("./.cache"));
        assert_eq!(config.viewport, Viewport::new(800.0, 600.0));
        assert_eq!(config.overlap_policy, OverlapPolicy::FirstDeclared);
        assert!(config.room_file.is_none());
    }

    #[test]
    fn test_values() {
        let config = MonitorConfig::from_lookup(|name| match name {
            "LOCUS_HOME_ID" => Some("home-42".into()),
            "LOCUS_VIEWPORT" => Some("1024x768".into()),
            "LOCUS_OVERLAP_POLICY" => Some("smallest".into()),
            "LOCUS_ROOM_FILE" => Some("scan.json".into()),
            _ => None,
        });
        assert_eq!(config.home_id, "home-42");
        assert_eq!(config.viewport, Viewport::new(1024.0, 768.0));
        assert_eq!(config.overlap_policy, OverlapPolicy::SmallestArea);
        assert_eq!(config.room_file, Some(PathBuf::from("scan.json")));
    }

    #[test]
    fn test_bad_viewport() {
        assert!(parse_viewport("800").is_none());
        assert!(parse_viewport("0x600").is_none());
        assert!(parse_viewport("wide x tall").is_none());
    }
}
