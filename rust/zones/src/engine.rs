// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The zone engine: zones + calibration + latest sample -> current zone.
//!
//! Every mutation (new sample, zone added or removed, calibration edited)
//! recomputes the calibrated position and the current zone synchronously, so
//! readers never observe a position and a zone from different inputs.

use locus_geometry::{Point2D, Point3};
use serde::{Deserialize, Serialize};

use crate::calibration::{AgentPosition, CalibrationConfig};
use crate::error::Result;
use crate::store::{CalibrationBackend, CalibrationStore};
use crate::zone::Zone;

/// How to pick a zone when the position lies inside several.
///
/// Zones are expected not to overlap, but nothing enforces it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// The earliest declared zone wins
    #[default]
    FirstDeclared,
    /// The zone with the smallest area wins (nested rooms); ties go to the
    /// earliest declared
    SmallestArea,
}

/// Index of the zone containing `point` under `policy`.
///
/// Zones with fewer than 3 points are skipped.
pub fn resolve_zone(zones: &[Zone], point: &Point2D, policy: OverlapPolicy) -> Option<usize> {
    let mut matches = zones
        .iter()
        .enumerate()
        .filter(|(_, z)| z.is_valid() && z.contains(point));

    match policy {
        OverlapPolicy::FirstDeclared => matches.next().map(|(i, _)| i),
        OverlapPolicy::SmallestArea => matches
            .fold(None, |best: Option<(usize, f64)>, (i, z)| {
                let area = z.area();
                match best {
                    Some((_, best_area)) if best_area <= area => best,
                    _ => Some((i, area)),
                }
            })
            .map(|(i, _)| i),
    }
}

/// Zones, calibration and the derived agent state for one home
#[derive(Debug)]
pub struct ZoneEngine<B> {
    zones: Vec<Zone>,
    calibration: CalibrationStore<B>,
    policy: OverlapPolicy,
    raw: Option<Point3<f64>>,
    position: Option<AgentPosition>,
    current: Option<usize>,
}

impl<B: CalibrationBackend> ZoneEngine<B> {
    pub fn new(calibration: CalibrationStore<B>) -> Self {
        Self {
            zones: Vec::new(),
            calibration,
            policy: OverlapPolicy::default(),
            raw: None,
            position: None,
            current: None,
        }
    }

    pub fn with_policy(mut self, policy: OverlapPolicy) -> Self {
        self.set_policy(policy);
        self
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: OverlapPolicy) {
        self.policy = policy;
        self.refresh();
    }

    // --- Zones ---

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Replace the zone set (e.g. after loading from the store)
    pub fn set_zones(&mut self, zones: Vec<Zone>) {
        self.zones = zones;
        self.refresh();
    }

    /// Append a newly created zone; it is declared last
    pub fn add_zone(&mut self, zone: Zone) {
        self.zones.push(zone);
        self.refresh();
    }

    pub fn remove_zone(&mut self, zone_id: &str) -> Option<Zone> {
        let index = self.zones.iter().position(|z| z.id == zone_id)?;
        let removed = self.zones.remove(index);
        self.refresh();
        Some(removed)
    }

    pub fn zone(&self, zone_id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == zone_id)
    }

    // --- Calibration ---

    pub fn calibration(&self) -> &CalibrationConfig {
        self.calibration.config()
    }

    pub fn calibration_store(&self) -> &CalibrationStore<B> {
        &self.calibration
    }

    /// Replace the working calibration and re-apply it to the last sample.
    pub fn set_calibration(&mut self, config: CalibrationConfig) -> Result<()> {
        self.calibration.set(config)?;
        self.refresh();
        Ok(())
    }

    pub fn update_calibration(&mut self, edit: impl FnOnce(&mut CalibrationConfig)) -> Result<()> {
        self.calibration.update(edit)?;
        self.refresh();
        Ok(())
    }

    pub fn save_calibration(&mut self) -> Result<()> {
        self.calibration.save()
    }

    /// Return to the default calibration and forget the stored one
    pub fn reset_calibration(&mut self) -> Result<()> {
        self.calibration.reset()?;
        self.refresh();
        Ok(())
    }

    // --- Tracking ---

    /// Feed the latest raw sample (or its absence) and return the current zone.
    pub fn apply_sample(&mut self, raw: Option<Point3<f64>>) -> Option<&Zone> {
        self.raw = raw;
        self.refresh();
        self.current_zone()
    }

    /// Last raw sample fed to the engine
    pub fn raw_sample(&self) -> Option<&Point3<f64>> {
        self.raw.as_ref()
    }

    /// Calibrated agent position, `None` without a usable sample
    pub fn position(&self) -> Option<&AgentPosition> {
        self.position.as_ref()
    }

    pub fn current_zone(&self) -> Option<&Zone> {
        self.current.and_then(|i| self.zones.get(i))
    }

    pub fn current_zone_name(&self) -> Option<&str> {
        self.current_zone().map(|z| z.name.as_str())
    }

    fn refresh(&mut self) {
        let config = *self.calibration.config();
        self.position = self.raw.as_ref().and_then(|raw| config.apply(raw));

        let previous = self.current_zone().map(|z| z.id.clone());
        self.current = match (&self.position, self.zones.is_empty()) {
            (Some(pos), false) => resolve_zone(&self.zones, &pos.floorplan_point(), self.policy),
            _ => None,
        };

        let now = self.current_zone().map(|z| z.id.as_str());
        if previous.as_deref() != now {
            tracing::debug!(
                from = previous.as_deref().unwrap_or("-"),
                to = now.unwrap_or("-"),
                zone = self.current_zone_name().unwrap_or("-"),
                "Current zone changed"
            );
        }
    }
}
