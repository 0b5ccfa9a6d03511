// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Draw a zone on the floorplan, then follow a polled agent through it.

use std::collections::VecDeque;
use std::sync::Mutex;

use locus_engine::{Error, FloorplanView, LiveSession, ZoneEditor};
use locus_geometry::{Point2D, Viewport};
use locus_tracking::{PositionReading, PositionSource, Tracker, TrackerConfig};
use locus_zones::{
    CalibrationConfig, CalibrationStore, MemoryBackend, MemoryZoneStore, NewZone, Zone, ZoneEngine,
    ZoneStore,
};

const ROOM: &str = r#"{
  "rooms": [{
    "floors": [
      {"identifier": "floor", "polygonCorners": [[0,0,0],[6,0,0],[6,0,4],[0,0,4]],
       "transform": [1,0,0,0, 0,1,0,0, 0,0,1,0, 0,0,0,1]}
    ]
  }]
}"#;

/// Walks the agent along a fixed path, one point per poll.
struct Walk(Mutex<VecDeque<(f64, f64)>>);

impl Walk {
    fn new(path: &[(f64, f64)]) -> Self {
        Self(Mutex::new(path.iter().copied().collect()))
    }
}

impl PositionSource for Walk {
    type Error = String;

    async fn latest(&self) -> Result<Option<PositionReading>, String> {
        let next = self.0.lock().unwrap().pop_front();
        match next {
            Some((x, z)) => Ok(Some(PositionReading::new(x, 1.0, z, 0.3))),
            None => Err("walk finished".into()),
        }
    }
}

/// Store that refuses every write
struct ReadOnlyStore;

#[derive(Debug, thiserror::Error)]
#[error("read-only")]
struct ReadOnly;

impl ZoneStore for ReadOnlyStore {
    type Error = ReadOnly;

    async fn list(&self, _home_id: &str) -> Result<Vec<Zone>, ReadOnly> {
        Ok(Vec::new())
    }

    async fn create(&self, _home_id: &str, _zone: NewZone) -> Result<Zone, ReadOnly> {
        Err(ReadOnly)
    }

    async fn delete(&self, _zone_id: &str) -> Result<(), ReadOnly> {
        Err(ReadOnly)
    }
}

fn identity_engine() -> ZoneEngine<MemoryBackend> {
    let mut calibration = CalibrationStore::open(MemoryBackend::new(), "home");
    calibration.set(CalibrationConfig::identity()).unwrap();
    ZoneEngine::new(calibration)
}

fn click_rect<Z: ZoneStore>(editor: &mut ZoneEditor<Z>, view: &FloorplanView, x0: f64, y0: f64, x1: f64, y1: f64) {
    for (x, y) in [(x0, y0), (x1, y0), (x1, y1), (x0, y1)] {
        let v = view.to_view(Point2D::new(x, y));
        assert!(editor.click(v.x, v.y, view));
    }
}

#[tokio::test(start_paused = true)]
async fn test_agent_walks_through_drawn_zone() {
    let view = FloorplanView::from_json_str(ROOM, Viewport::new(640.0, 480.0)).unwrap();
    let mut engine = identity_engine();
    let mut editor = ZoneEditor::new(MemoryZoneStore::new(), "home");

    click_rect(&mut editor, &view, 0.0, 0.0, 3.0, 4.0);
    let kitchen = editor.finish("Kitchen", &mut engine).await.unwrap();
    assert!(editor.draft().corners().is_empty());
    assert_eq!(editor.store().list("home").await.unwrap().len(), 1);

    let walk = Walk::new(&[(5.0, 2.0), (1.0, 2.0), (2.0, 1.0), (5.0, 1.0)]);
    let mut session = LiveSession::new(Tracker::new(walk, TrackerConfig::default()), engine);
    session.start();

    let connected = session.next_update().await.unwrap();
    assert!(connected.connected);

    let outside = session.next_update().await.unwrap();
    assert!(outside.zone.is_none());
    assert_eq!(outside.position.unwrap().y(), locus_zones::FIXED_VERTICAL_OFFSET);

    let entered = session.next_update().await.unwrap();
    assert!(entered.zone_changed);
    assert_eq!(entered.zone.as_ref().map(|z| z.id.as_str()), Some(kitchen.id.as_str()));
    assert_eq!(entered.accuracy, 0.3);

    let stayed = session.next_update().await.unwrap();
    assert!(!stayed.zone_changed);

    let left = session.next_update().await.unwrap();
    assert!(left.zone_changed);
    assert!(left.zone.is_none());

    // Path exhausted: failures keep the last position
    let failed = session.next_update().await.unwrap();
    assert_eq!(failed.position, left.position);
    assert!(failed.connected);

    session.stop();
    let stopped = session.next_update().await.unwrap();
    assert!(!stopped.connected);
}

#[tokio::test]
async fn test_rejected_zone_keeps_draft() {
    let view = FloorplanView::from_json_str(ROOM, Viewport::new(640.0, 480.0)).unwrap();
    let mut engine = identity_engine();
    let mut editor = ZoneEditor::new(ReadOnlyStore, "home");

    click_rect(&mut editor, &view, 0.0, 0.0, 1.0, 1.0);
    let err = editor.finish("Closet", &mut engine).await.unwrap_err();
    assert!(matches!(err, Error::Store(_)));
    assert_eq!(editor.draft().corners().len(), 4);
    assert!(engine.zones().is_empty());

    // Validation errors come from the draft itself
    editor.draft_mut().clear();
    let err = editor.finish("Closet", &mut engine).await.unwrap_err();
    assert!(matches!(err, Error::Zones(locus_zones::Error::DegenerateZone(0))));
}

#[tokio::test]
async fn test_reload_and_delete() {
    let store = MemoryZoneStore::new();
    let square = NewZone {
        name: "Hall".into(),
        points: vec![Point2D::new(0.0, 0.0), Point2D::new(2.0, 0.0), Point2D::new(2.0, 2.0)],
    };
    let hall = store.create("home", square).await.unwrap();

    let mut engine = identity_engine();
    let editor = ZoneEditor::new(store, "home");
    assert_eq!(editor.reload(&mut engine).await.unwrap(), 1);

    engine.apply_sample(Some(locus_geometry::Point3::new(1.5, 0.0, 0.5)));
    assert_eq!(engine.current_zone_name(), Some("Hall"));

    editor.delete(&hall.id, &mut engine).await.unwrap();
    assert!(engine.current_zone().is_none());
    assert!(matches!(
        editor.delete(&hall.id, &mut engine).await,
        Err(Error::Store(_))
    ));
}
