// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Live session: tracker events drive the zone engine.

use locus_tracking::{PositionSource, Subscription, Tracker, TrackerEvent};
use locus_zones::{AgentPosition, CalibrationBackend, CalibrationConfig, Zone, ZoneEngine};
use serde::Serialize;

use crate::error::Result;

/// State after one tracker event or calibration edit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionUpdate {
    /// Calibrated agent position, `None` without a usable sample
    pub position: Option<AgentPosition>,
    pub zone: Option<Zone>,
    /// Accuracy reported with the last applied sample
    pub accuracy: f64,
    pub connected: bool,
    /// The current zone differs from the previous update
    pub zone_changed: bool,
}

impl SessionUpdate {
    pub fn zone_name(&self) -> Option<&str> {
        self.zone.as_ref().map(|z| z.name.as_str())
    }
}

/// A tracker wired into a zone engine.
///
/// Samples are applied in the order the tracker publishes them; the engine
/// only ever sees the newest sample.
pub struct LiveSession<S, B> {
    tracker: Tracker<S>,
    engine: ZoneEngine<B>,
    events: Subscription,
    connected: bool,
    accuracy: f64,
    last_zone: Option<String>,
}

impl<S: PositionSource, B: CalibrationBackend> LiveSession<S, B> {
    pub fn new(tracker: Tracker<S>, engine: ZoneEngine<B>) -> Self {
        let events = tracker.subscribe();
        let last_zone = engine.current_zone().map(|z| z.id.clone());
        Self {
            connected: tracker.is_connected(),
            accuracy: tracker.accuracy(),
            tracker,
            engine,
            events,
            last_zone,
        }
    }

    /// Start polling (idempotent)
    pub fn start(&mut self) {
        self.tracker.connect();
    }

    /// Stop polling (idempotent)
    pub fn stop(&mut self) {
        self.tracker.disconnect();
    }

    pub fn tracker(&self) -> &Tracker<S> {
        &self.tracker
    }

    pub fn engine(&self) -> &ZoneEngine<B> {
        &self.engine
    }

    /// Direct engine access for zone and calibration edits; call
    /// [`LiveSession::snapshot`] afterwards to observe the result.
    pub fn engine_mut(&mut self) -> &mut ZoneEngine<B> {
        &mut self.engine
    }

    /// Wait for the next tracker event and apply it.
    ///
    /// Fails only once the tracker's event stream is closed.
    pub async fn next_update(&mut self) -> Result<SessionUpdate> {
        let event = self.events.recv().await?;
        Ok(self.handle(event))
    }

    /// Apply one tracker event to the engine.
    pub fn handle(&mut self, event: TrackerEvent) -> SessionUpdate {
        match event {
            TrackerEvent::Connected => self.connected = true,
            TrackerEvent::Disconnected => self.connected = false,
            TrackerEvent::Sample(sample) => {
                self.accuracy = sample.accuracy;
                self.engine.apply_sample(Some(sample.position));
            }
            TrackerEvent::FetchFailed { seq, error } => {
                tracing::debug!(seq, error = %error, "Keeping last position after failed fetch");
            }
        }
        self.snapshot()
    }

    /// Edit the calibration live; the agent position is recomputed from the
    /// last sample.
    pub fn update_calibration(&mut self, edit: impl FnOnce(&mut CalibrationConfig)) -> Result<SessionUpdate> {
        self.engine.update_calibration(edit)?;
        Ok(self.snapshot())
    }

    /// Current state; marks the zone as seen.
    pub fn snapshot(&mut self) -> SessionUpdate {
        let zone = self.engine.current_zone().cloned();
        let zone_id = zone.as_ref().map(|z| z.id.clone());
        let zone_changed = zone_id != self.last_zone;
        if zone_changed {
            tracing::info!(
                from = self.last_zone.as_deref().unwrap_or("-"),
                to = zone.as_ref().map_or("-", |z| z.name.as_str()),
                "Agent changed zone"
            );
        }
        self.last_zone = zone_id;

        SessionUpdate {
            position: self.engine.position().copied(),
            zone,
            accuracy: self.accuracy,
            connected: self.connected,
            zone_changed,
        }
    }
}
