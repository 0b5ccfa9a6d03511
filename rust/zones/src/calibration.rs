// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mapping raw live-position samples into floorplan space.
//!
//! The tracker reports positions in its own frame. A user-tuned calibration
//! scales the horizontal components, rotates them about the origin and then
//! shifts them onto the floorplan:
//!
//! ```text
//! (sx, sz) = (raw_x * scale, raw_z * scale)
//! rot_x    = sx * cos(theta) - sz * sin(theta)
//! rot_z    = sx * sin(theta) + sz * cos(theta)
//! result   = (rot_x + offset_x, FIXED_VERTICAL_OFFSET, rot_z + offset_z)
//! ```

use locus_geometry::{Point2D, Point3};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Height at which calibrated positions are placed (floor level of the model)
pub const FIXED_VERTICAL_OFFSET: f64 = -0.9;

/// User-tunable calibration, persisted per home/session key
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationConfig {
    /// Uniform horizontal scale, must be > 0
    pub scale: f64,
    /// Rotation of the sample frame about the vertical axis, degrees
    pub data_rotate_deg: f64,
    /// Rotation applied to the rendered model, degrees. Carried for the
    /// renderer; not part of the sample mapping.
    pub model_rotation_y: f64,
    pub offset_x: f64,
    pub offset_z: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            scale: 0.5,
            data_rotate_deg: 240.0,
            model_rotation_y: -5.0,
            offset_x: 0.0,
            offset_z: 0.0,
        }
    }
}

impl CalibrationConfig {
    /// Calibration that passes samples through unchanged
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            data_rotate_deg: 0.0,
            model_rotation_y: 0.0,
            offset_x: 0.0,
            offset_z: 0.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(Error::InvalidCalibration(format!(
                "scale must be a positive number, got {}",
                self.scale
            )));
        }
        let fields = [
            ("dataRotateDeg", self.data_rotate_deg),
            ("modelRotationY", self.model_rotation_y),
            ("offsetX", self.offset_x),
            ("offsetZ", self.offset_z),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(Error::InvalidCalibration(format!("{} is not finite", name)));
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Map a raw sample into floorplan space.
    ///
    /// Returns `None` when the sample's X or Z is not finite, or when the
    /// calibration itself is invalid. The raw Y is ignored.
    pub fn apply(&self, raw: &Point3<f64>) -> Option<AgentPosition> {
        if !(raw.x.is_finite() && raw.z.is_finite()) || !self.is_valid() {
            return None;
        }

        let scaled_x = raw.x * self.scale;
        let scaled_z = raw.z * self.scale;
        let (sin, cos) = self.data_rotate_deg.to_radians().sin_cos();
        let rot_x = scaled_x * cos - scaled_z * sin;
        let rot_z = scaled_x * sin + scaled_z * cos;

        AgentPosition::new(rot_x + self.offset_x, FIXED_VERTICAL_OFFSET, rot_z + self.offset_z)
    }
}

/// Map a raw sample with the given calibration; see [`CalibrationConfig::apply`].
pub fn calibrate(config: &CalibrationConfig, raw: &Point3<f64>) -> Option<AgentPosition> {
    config.apply(raw)
}

/// A calibrated agent position in floorplan space.
///
/// Only constructed from finite coordinates.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct AgentPosition {
    x: f64,
    y: f64,
    z: f64,
}

impl AgentPosition {
    /// Returns `None` unless all coordinates are finite.
    pub fn new(x: f64, y: f64, z: f64) -> Option<Self> {
        if x.is_finite() && y.is_finite() && z.is_finite() {
            Some(Self { x, y, z })
        } else {
            None
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    /// The position on the floorplan plane, for zone membership
    pub fn floorplan_point(&self) -> Point2D {
        Point2D::new(self.x, self.z)
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}
