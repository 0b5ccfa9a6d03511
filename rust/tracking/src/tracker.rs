// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interval polling of a [`PositionSource`].
//!
//! Requests are issued on the interval, not after the previous response, so
//! a slow response may still be in flight when the next request starts. Each
//! request carries a sequence number and a response is only applied if it is
//! newer than the last applied one. Every connection gets a fresh epoch;
//! responses from an older epoch are ignored even if they race the abort.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{interval, Instant, MissedTickBehavior};

use crate::config::TrackerConfig;
use crate::error::{Error, Result};
use crate::source::{PositionReading, PositionSource, TrackingSample};

/// Notifications published to every subscriber
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    Connected,
    Disconnected,
    /// A newer reading was applied
    Sample(TrackingSample),
    /// A fetch failed; polling continues and the last sample is kept
    FetchFailed { seq: u64, error: Error },
}

#[derive(Debug, Default)]
struct Shared {
    epoch: u64,
    connected: bool,
    issued_seq: u64,
    applied_seq: u64,
    latest: Option<TrackingSample>,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Aborts the poll loop (and with it every in-flight fetch) when dropped
#[derive(Debug)]
struct PollTask(JoinHandle<()>);

impl Drop for PollTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Polls a position source while connected and fans results out to
/// subscribers.
///
/// `connect` must be called from within a tokio runtime.
#[derive(Debug)]
pub struct Tracker<S> {
    source: Arc<S>,
    config: TrackerConfig,
    shared: Arc<Mutex<Shared>>,
    events: broadcast::Sender<TrackerEvent>,
    task: Option<PollTask>,
}

impl<S: PositionSource> Tracker<S> {
    pub fn new(source: S, config: TrackerConfig) -> Self {
        let (events, _) = broadcast::channel(config.effective_capacity());
        Self {
            source: Arc::new(source),
            config,
            shared: Arc::new(Mutex::new(Shared::default())),
            events,
            task: None,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Start polling: one fetch now, then one per interval.
    ///
    /// Calling it while connected does nothing.
    pub fn connect(&mut self) {
        if self.task.is_some() {
            return;
        }

        let epoch = {
            let mut shared = lock(&self.shared);
            shared.epoch += 1;
            shared.connected = true;
            shared.epoch
        };

        let period = self.config.effective_interval();
        tracing::info!(epoch, interval_ms = period.as_millis() as u64, "Tracker connected");
        let _ = self.events.send(TrackerEvent::Connected);

        let handle = tokio::spawn(poll_loop(
            Arc::clone(&self.source),
            Arc::clone(&self.shared),
            self.events.clone(),
            epoch,
            period,
        ));
        self.task = Some(PollTask(handle));
    }

    /// Stop polling. Responses still in flight are dropped.
    ///
    /// Calling it while disconnected does nothing.
    pub fn disconnect(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };

        {
            let mut shared = lock(&self.shared);
            shared.epoch += 1;
            shared.connected = false;
        }
        drop(task);

        tracing::info!("Tracker disconnected");
        let _ = self.events.send(TrackerEvent::Disconnected);
    }

    pub fn is_connected(&self) -> bool {
        lock(&self.shared).connected
    }

    /// Last applied sample, kept across failures and reconnects
    pub fn latest(&self) -> Option<TrackingSample> {
        lock(&self.shared).latest
    }

    /// Accuracy of the last applied sample, 0 before the first one
    pub fn accuracy(&self) -> f64 {
        self.latest().map_or(0.0, |s| s.accuracy)
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription(self.events.subscribe())
    }
}

type FetchOutcome = (u64, std::result::Result<Option<PositionReading>, String>);

async fn poll_loop<S: PositionSource>(
    source: Arc<S>,
    shared: Arc<Mutex<Shared>>,
    events: broadcast::Sender<TrackerEvent>,
    epoch: u64,
    period: std::time::Duration,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut in_flight: JoinSet<FetchOutcome> = JoinSet::new();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let seq = {
                    let mut state = lock(&shared);
                    if state.epoch != epoch {
                        break;
                    }
                    state.issued_seq += 1;
                    state.issued_seq
                };
                let source = Arc::clone(&source);
                in_flight.spawn(async move {
                    let result = source.latest().await.map_err(|e| e.to_string());
                    (seq, result)
                });
            }
            Some(joined) = in_flight.join_next() => match joined {
                Ok((seq, result)) => {
                    if !apply(&shared, &events, epoch, seq, result) {
                        break;
                    }
                }
                Err(e) if e.is_cancelled() => {}
                Err(e) => tracing::warn!(error = %e, "Position fetch task panicked"),
            },
        }
    }
}

/// Apply one response. Returns `false` once the connection epoch has moved on.
fn apply(
    shared: &Mutex<Shared>,
    events: &broadcast::Sender<TrackerEvent>,
    epoch: u64,
    seq: u64,
    result: std::result::Result<Option<PositionReading>, String>,
) -> bool {
    let mut state = lock(shared);
    if state.epoch != epoch {
        return false;
    }

    match result {
        Ok(Some(reading)) => {
            if seq <= state.applied_seq {
                tracing::warn!(seq, applied = state.applied_seq, "Discarding stale position response");
                return true;
            }
            let sample = TrackingSample {
                position: reading.position,
                accuracy: reading.accuracy,
                received_at: Instant::now(),
                seq,
            };
            state.applied_seq = seq;
            state.latest = Some(sample);
            drop(state);

            tracing::debug!(
                seq,
                x = sample.position.x,
                y = sample.position.y,
                z = sample.position.z,
                accuracy = sample.accuracy,
                "Applied position sample"
            );
            let _ = events.send(TrackerEvent::Sample(sample));
        }
        Ok(None) => {
            tracing::debug!(seq, "Position source returned no usable position");
        }
        Err(message) => {
            drop(state);
            tracing::warn!(seq, error = %message, "Position fetch failed");
            let _ = events.send(TrackerEvent::FetchFailed {
                seq,
                error: Error::Source(message),
            });
        }
    }
    true
}

/// Receiving end of a tracker's event stream
#[derive(Debug)]
pub struct Subscription(broadcast::Receiver<TrackerEvent>);

impl Subscription {
    /// Next event. Events missed by a lagging subscriber are skipped.
    pub async fn recv(&mut self) -> Result<TrackerEvent> {
        loop {
            match self.0.recv().await {
                Ok(event) => return Ok(event),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Tracker subscriber lagged, skipping events");
                }
                Err(broadcast::error::RecvError::Closed) => return Err(Error::Closed),
            }
        }
    }

    /// Next buffered event without waiting
    pub fn try_recv(&mut self) -> Option<TrackerEvent> {
        loop {
            match self.0.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }

    /// Drain everything currently buffered
    pub fn drain(&mut self) -> Vec<TrackerEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}
