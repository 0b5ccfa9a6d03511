// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! locus-monitor - follow a tracked agent through the zones of a home.
//!
//! Loads the home's zones and stored calibration, polls the backend for the
//! latest position and logs every zone change until interrupted.
//!
//! Configuration comes from the environment:
//!
//! - `LOCUS_API_URL`, `LOCUS_API_TOKEN`, `LOCUS_REQUEST_TIMEOUT_SECS`
//! - `LOCUS_HOME_ID`, `LOCUS_CACHE_DIR`, `LOCUS_ROOM_FILE`, `LOCUS_VIEWPORT`,
//!   `LOCUS_OVERLAP_POLICY`
//! - `LOCUS_POLL_INTERVAL_MS`
//! - `RUST_LOG`

use anyhow::Context;
use locus_client::{ClientConfig, LocusClient};
use locus_engine::{FloorplanView, LiveSession, MonitorConfig, ZoneEditor};
use locus_tracking::{Tracker, TrackerConfig};
use locus_zones::{CalibrationStore, DiskBackend, ZoneEngine};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,locus_engine=debug,locus_monitor=debug".into()),
        )
        .init();

    let config = MonitorConfig::from_env();
    let client_config = ClientConfig::from_env();
    let tracker_config = TrackerConfig::from_env();

    tracing::info!(
        home_id = %config.home_id,
        api = %client_config.base_url,
        cache_dir = %config.cache_dir.display(),
        poll_ms = tracker_config.poll_interval.as_millis() as u64,
        policy = ?config.overlap_policy,
        "Starting Locus monitor"
    );

    let floorplan = match &config.room_file {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading room scan {}", path.display()))?;
            Some(FloorplanView::from_json_str(&json, config.viewport)?)
        }
        None => None,
    };

    let client = LocusClient::new(&client_config)?;
    let calibration = CalibrationStore::open(DiskBackend::new(&config.cache_dir), config.home_id.clone());
    let mut engine = ZoneEngine::new(calibration).with_policy(config.overlap_policy);

    let editor = ZoneEditor::new(client.clone(), config.home_id.clone());
    editor
        .reload(&mut engine)
        .await
        .context("loading zones for home")?;

    let mut session = LiveSession::new(Tracker::new(client, tracker_config), engine);
    session.start();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            update = session.next_update() => {
                let update = update?;
                if !update.zone_changed {
                    continue;
                }
                let marker = match (&floorplan, &update.position) {
                    (Some(view), Some(position)) => Some(view.agent_marker(position)),
                    _ => None,
                };
                tracing::info!(
                    zone = update.zone_name().unwrap_or("-"),
                    x = update.position.map(|p| p.x()),
                    z = update.position.map(|p| p.z()),
                    accuracy = update.accuracy,
                    view = ?marker,
                    "Zone"
                );
            }
            _ = &mut shutdown => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    session.stop();
    Ok(())
}
