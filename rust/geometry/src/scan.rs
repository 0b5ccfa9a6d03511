// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room-scan documents as exported by the capture app
//!
//! Every field is optional. Scans are frequently partial, and extraction
//! decides how to degrade, so decoding only rejects documents that are not
//! JSON objects at all. A mistyped field reads as absent, a non-numeric
//! dimension reads as NaN, and an entry that is not an object becomes an
//! empty primitive so lists keep their length.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Semantic tag attached to objects and openings.
///
/// Exports encode it either as a plain string (`"door"`) or as a tagged
/// object whose single key is the name (`{"table": {}}`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Category {
    Name(String),
    Tagged(Map<String, Value>),
}

impl Category {
    /// The category name, if one can be read
    pub fn name(&self) -> Option<&str> {
        match self {
            Category::Name(name) => Some(name.as_str()),
            Category::Tagged(map) => map.keys().next().map(String::as_str),
        }
    }
}

/// A wall, object, opening or floor as captured by the scanner
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScanPrimitive {
    /// Walls: `[length, height, thickness]`; objects: `[width, height, length]`;
    /// openings: `[width, height, depth]`
    #[serde(default, deserialize_with = "lenient_dimensions")]
    pub dimensions: Option<Vec<f64>>,
    /// Column-major 4x4 placement
    #[serde(default, deserialize_with = "lenient_transform")]
    pub transform: Option<Vec<f64>>,
    #[serde(default, deserialize_with = "lenient_identifier")]
    pub identifier: Option<String>,
    #[serde(default, deserialize_with = "lenient_category")]
    pub category: Option<Category>,
    /// Floors only: outline corners as `[x, y, z]` in local space
    #[serde(default, deserialize_with = "lenient_corners")]
    pub polygon_corners: Option<Vec<Vec<f64>>>,
}

impl ScanPrimitive {
    /// Dimension at `index`, `None` when the vector or the entry is missing
    /// or not a finite number
    pub fn dimension(&self, index: usize) -> Option<f64> {
        self.dimensions
            .as_ref()?
            .get(index)
            .copied()
            .filter(|d| d.is_finite())
    }

    pub fn transform_slice(&self) -> Option<&[f64]> {
        self.transform.as_deref()
    }

    /// Identifier, or `{prefix}-{index}` when the scan did not provide one
    pub fn id_or(&self, prefix: &str, index: usize) -> String {
        self.identifier
            .clone()
            .unwrap_or_else(|| format!("{}-{}", prefix, index))
    }
}

fn numbers(values: &[Value]) -> Option<Vec<f64>> {
    values.iter().map(Value::as_f64).collect()
}

fn lenient_dimensions<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_array).map(|dims| {
        dims.iter()
            .map(|d| d.as_f64().unwrap_or(f64::NAN))
            .collect()
    }))
}

/// A transform with any non-numeric entry cannot place anything
fn lenient_transform<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_array).and_then(|m| numbers(m)))
}

fn lenient_identifier<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(id)) => Some(id),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    })
}

fn lenient_category<'de, D>(deserializer: D) -> std::result::Result<Option<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(name)) => Some(Category::Name(name)),
        Some(Value::Object(map)) => Some(Category::Tagged(map)),
        _ => None,
    })
}

/// Corners that are not all-numeric arrays are dropped
fn lenient_corners<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Vec<Vec<f64>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_array).map(|corners| {
        corners
            .iter()
            .filter_map(|c| c.as_array().and_then(|c| numbers(c)))
            .collect()
    }))
}

fn lenient_primitives<'de, D>(deserializer: D) -> std::result::Result<Vec<ScanPrimitive>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(entries)) => entries
            .into_iter()
            .map(|entry| serde_json::from_value(entry).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    })
}

/// A single captured room
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RoomData {
    #[serde(default, deserialize_with = "lenient_primitives")]
    pub walls: Vec<ScanPrimitive>,
    #[serde(default, deserialize_with = "lenient_primitives")]
    pub objects: Vec<ScanPrimitive>,
    #[serde(default, deserialize_with = "lenient_primitives")]
    pub openings: Vec<ScanPrimitive>,
    #[serde(default, deserialize_with = "lenient_primitives")]
    pub floors: Vec<ScanPrimitive>,
}

impl RoomData {
    /// Parse a room-scan export.
    ///
    /// Accepts a multi-room export (`{"rooms": [...]}`, first room wins) or a
    /// bare room object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(mut value: Value) -> Result<Self> {
        let first = match value.get_mut("rooms").and_then(Value::as_array_mut) {
            Some(rooms) if rooms.is_empty() => return Err(Error::MissingRoom),
            Some(rooms) => Some(rooms.swap_remove(0)),
            None => None,
        };
        let room = first.unwrap_or(value);
        if !room.is_object() {
            return Err(Error::NotAnObject);
        }
        Ok(serde_json::from_value(room)?)
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
            && self.objects.is_empty()
            && self.openings.is_empty()
            && self.floors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_room() {
        let json = r#"{
            "walls": [{"dimensions": [4.0, 2.5, 0.1], "identifier": "W1"}],
            "objects": [{"category": {"table": {}}}]
        }"#;
        let room = RoomData::from_json_str(json).unwrap();
        assert_eq!(room.walls.len(), 1);
        assert_eq!(room.walls[0].dimension(0), Some(4.0));
        assert_eq!(room.objects[0].category.as_ref().unwrap().name(), Some("table"));
        assert!(room.openings.is_empty());
        assert!(room.floors.is_empty());
    }

    #[test]
    fn test_parse_multi_room_uses_first() {
        let json = r#"{"rooms": [
            {"openings": [{"category": "door"}]},
            {"walls": [{}, {}]}
        ]}"#;
        let room = RoomData::from_json_str(json).unwrap();
        assert!(room.walls.is_empty());
        assert_eq!(room.openings[0].category, Some(Category::Name("door".into())));
    }

    #[test]
    fn test_empty_rooms_rejected() {
        let err = RoomData::from_json_str(r#"{"rooms": []}"#).unwrap_err();
        assert!(matches!(err, Error::MissingRoom));
    }

    #[test]
    fn test_floor_corners_and_unknown_fields() {
        let json = r#"{"floors": [{"polygonCorners": [[0,0,0],[1,0,0],[1,1,0]], "story": 0}]}"#;
        let room = RoomData::from_json_str(json).unwrap();
        assert_eq!(room.floors[0].polygon_corners.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn test_mistyped_fields_degrade() {
        let json = r#"{"walls": [
            {"dimensions": [4.0, 2.5, 0.1], "identifier": "W1"},
            {"dimensions": [3.0, null, 0.1], "identifier": 7},
            {"transform": [1, "x"], "category": 5, "polygonCorners": [[0,0,0], [1, null, 0], "c"]},
            42,
            null
        ], "objects": "none"}"#;
        let room = RoomData::from_json_str(json).unwrap();
        assert_eq!(room.walls.len(), 5);
        assert!(room.objects.is_empty());

        let second = &room.walls[1];
        assert_eq!(second.dimension(0), Some(3.0));
        assert_eq!(second.dimension(1), None);
        assert_eq!(second.dimension(2), Some(0.1));
        assert_eq!(second.id_or("wall", 1), "7");

        let third = &room.walls[2];
        assert!(third.transform.is_none());
        assert!(third.category.is_none());
        assert_eq!(third.polygon_corners.as_ref().map(Vec::len), Some(1));

        assert_eq!(room.walls[3], ScanPrimitive::default());
        assert_eq!(room.walls[4].id_or("wall", 4), "wall-4");
    }

    #[test]
    fn test_non_object_room_rejected() {
        assert!(matches!(
            RoomData::from_json_str("[1, 2]").unwrap_err(),
            Error::NotAnObject
        ));
        assert!(matches!(
            RoomData::from_json_str(r#"{"rooms": ["kitchen"]}"#).unwrap_err(),
            Error::NotAnObject
        ));
        assert!(matches!(
            RoomData::from_json_str("{walls").unwrap_err(),
            Error::Json(_)
        ));
    }

    #[test]
    fn test_id_fallback() {
        let p = ScanPrimitive::default();
        assert_eq!(p.id_or("wall", 3), "wall-3");
    }
}
