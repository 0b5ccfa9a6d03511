// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Persisted zone collection.
//!
//! The zone list lives in a remote store; the engine keeps an in-memory
//! mirror. Implementations exist for HTTP (`locus-client`) and in memory.

use std::future::Future;
use std::sync::{PoisonError, RwLock};

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::zone::{NewZone, Zone};

/// External zone persistence, scoped by home id
pub trait ZoneStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// All zones of a home in declaration order
    fn list(&self, home_id: &str) -> impl Future<Output = std::result::Result<Vec<Zone>, Self::Error>> + Send;

    /// Persist a new zone and return it with its assigned id
    fn create(
        &self,
        home_id: &str,
        zone: NewZone,
    ) -> impl Future<Output = std::result::Result<Zone, Self::Error>> + Send;

    fn delete(&self, zone_id: &str) -> impl Future<Output = std::result::Result<(), Self::Error>> + Send;
}

/// Zone store held in process memory, ids are random UUIDs
#[derive(Debug, Default)]
pub struct MemoryZoneStore {
    homes: RwLock<FxHashMap<String, Vec<Zone>>>,
}

impl MemoryZoneStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ZoneStore for MemoryZoneStore {
    type Error = Error;

    async fn list(&self, home_id: &str) -> Result<Vec<Zone>> {
        let homes = self.homes.read().unwrap_or_else(PoisonError::into_inner);
        Ok(homes.get(home_id).cloned().unwrap_or_default())
    }

    async fn create(&self, home_id: &str, zone: NewZone) -> Result<Zone> {
        let created = Zone::new(uuid::Uuid::new_v4().to_string(), zone.name, zone.points);
        let mut homes = self.homes.write().unwrap_or_else(PoisonError::into_inner);
        homes
            .entry(home_id.to_string())
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn delete(&self, zone_id: &str) -> Result<()> {
        let mut homes = self.homes.write().unwrap_or_else(PoisonError::into_inner);
        for zones in homes.values_mut() {
            if let Some(pos) = zones.iter().position(|z| z.id == zone_id) {
                zones.remove(pos);
                return Ok(());
            }
        }
        Err(Error::ZoneNotFound(zone_id.to_string()))
    }
}
