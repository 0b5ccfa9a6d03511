// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Zone editing against a [`ZoneStore`], mirrored into a [`ZoneEngine`].

use locus_zones::{CalibrationBackend, Zone, ZoneDraft, ZoneEngine, ZoneStore};

use crate::error::{Error, Result};
use crate::floorplan::FloorplanView;

/// Draws, saves and deletes the zones of one home.
///
/// The store is the source of truth; the engine only receives a zone after
/// the store accepted it.
#[derive(Debug)]
pub struct ZoneEditor<Z> {
    store: Z,
    home_id: String,
    draft: ZoneDraft,
}

impl<Z: ZoneStore> ZoneEditor<Z> {
    pub fn new(store: Z, home_id: impl Into<String>) -> Self {
        Self {
            store,
            home_id: home_id.into(),
            draft: ZoneDraft::new(),
        }
    }

    pub fn home_id(&self) -> &str {
        &self.home_id
    }

    pub fn store(&self) -> &Z {
        &self.store
    }

    pub fn draft(&self) -> &ZoneDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ZoneDraft {
        &mut self.draft
    }

    /// Replace the engine's zones with the stored ones.
    pub async fn reload<B: CalibrationBackend>(&self, engine: &mut ZoneEngine<B>) -> Result<usize> {
        let zones = self.store.list(&self.home_id).await.map_err(Error::store)?;
        let count = zones.len();
        engine.set_zones(zones);
        tracing::info!(home_id = %self.home_id, count, "Loaded zones");
        Ok(count)
    }

    /// Record a corner from a click on the floorplan view.
    pub fn click(&mut self, vx: f64, vy: f64, view: &FloorplanView) -> bool {
        self.draft.push_view_click(vx, vy, view.transform())
    }

    /// Save the draft as a named zone.
    ///
    /// If the store rejects it the draft is restored so the user can retry.
    pub async fn finish<B: CalibrationBackend>(&mut self, name: &str, engine: &mut ZoneEngine<B>) -> Result<Zone> {
        let request = self.draft.finish(name)?;
        match self.store.create(&self.home_id, request.clone()).await {
            Ok(zone) => {
                tracing::info!(home_id = %self.home_id, zone_id = %zone.id, name = %zone.name, "Saved zone");
                engine.add_zone(zone.clone());
                Ok(zone)
            }
            Err(e) => {
                for corner in request.points {
                    self.draft.push(corner);
                }
                Err(Error::store(e))
            }
        }
    }

    pub async fn delete<B: CalibrationBackend>(&self, zone_id: &str, engine: &mut ZoneEngine<B>) -> Result<()> {
        self.store.delete(zone_id).await.map_err(Error::store)?;
        engine.remove_zone(zone_id);
        tracing::info!(zone_id = %zone_id, "Removed zone");
        Ok(())
    }
}
