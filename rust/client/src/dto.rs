// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire shapes of the backend API.
//!
//! Zones are called "labels" on the wire and their points are `{x, z}` pairs
//! in floorplan space.

use locus_geometry::Point2D;
use locus_tracking::PositionReading;
use locus_zones::{NewZone, Zone};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LabelPoint {
    pub x: f64,
    pub z: f64,
}

impl From<LabelPoint> for Point2D {
    fn from(p: LabelPoint) -> Self {
        Point2D::new(p.x, p.z)
    }
}

impl From<&Point2D> for LabelPoint {
    fn from(p: &Point2D) -> Self {
        Self { x: p.x, z: p.y }
    }
}

/// A stored zone as returned by `GET /homes/{homeId}/labels`
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomLabel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color_hex: Option<String>,
    #[serde(default)]
    pub points: Vec<LabelPoint>,
}

impl From<RoomLabel> for Zone {
    fn from(label: RoomLabel) -> Self {
        let mut zone = Zone::new(
            label.id,
            label.name,
            label.points.into_iter().map(Point2D::from).collect(),
        );
        zone.color = label.color_hex;
        zone
    }
}

/// Body of `POST /homes/{homeId}/labels`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateLabel {
    pub name: String,
    pub points: Vec<LabelPoint>,
}

impl From<&NewZone> for CreateLabel {
    fn from(zone: &NewZone) -> Self {
        Self {
            name: zone.name.clone(),
            points: zone.points.iter().map(LabelPoint::from).collect(),
        }
    }
}

/// Interpret a `GET /log/latest` body.
///
/// Only a numeric `x` makes a usable reading. Missing `y`/`z` become NaN and
/// are left to calibration to reject. Accuracy comes from
/// `rawPayloadJson.accuracy`, where `rawPayloadJson` may be an object or a
/// JSON-encoded string, and defaults to 0.
pub fn parse_latest(body: &Value) -> Option<PositionReading> {
    let x = body.get("x")?.as_f64()?;
    let coord = |key: &str| body.get(key).and_then(Value::as_f64).unwrap_or(f64::NAN);
    Some(PositionReading::new(x, coord("y"), coord("z"), accuracy(body)))
}

fn accuracy(body: &Value) -> f64 {
    let from_payload = |payload: &Value| payload.get("accuracy").and_then(Value::as_f64);
    let accuracy = match body.get("rawPayloadJson") {
        Some(Value::String(raw)) => serde_json::from_str::<Value>(raw)
            .ok()
            .as_ref()
            .and_then(from_payload),
        Some(payload) => from_payload(payload),
        None => None,
    };
    accuracy.filter(|a| a.is_finite()).unwrap_or(0.0)
}
