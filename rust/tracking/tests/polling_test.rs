// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Poll loop behaviour on a paused (simulated) clock.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use locus_tracking::{
    Error, PositionReading, PositionSource, Tracker, TrackerConfig, TrackerEvent,
};
use tokio::time::{sleep, sleep_until, Instant};

enum Reply {
    Position(f64),
    Empty,
    Fail(&'static str),
}

/// Replays scripted replies (each after a delay) and records when it was asked.
struct ScriptedSource {
    start: Instant,
    calls: Mutex<Vec<Duration>>,
    script: Mutex<VecDeque<(u64, Reply)>>,
}

impl ScriptedSource {
    fn new(script: Vec<(u64, Reply)>) -> Arc<Self> {
        Arc::new(Self {
            start: Instant::now(),
            calls: Mutex::new(Vec::new()),
            script: Mutex::new(script.into()),
        })
    }

    fn call_times_ms(&self) -> Vec<u128> {
        self.calls.lock().unwrap().iter().map(|d| d.as_millis()).collect()
    }
}

impl PositionSource for ScriptedSource {
    type Error = String;

    async fn latest(&self) -> Result<Option<PositionReading>, String> {
        let elapsed = self.start.elapsed();
        self.calls.lock().unwrap().push(elapsed);
        let next = self.script.lock().unwrap().pop_front();
        let (delay_ms, reply) = next.unwrap_or((0, Reply::Empty));

        if delay_ms > 0 {
            sleep(Duration::from_millis(delay_ms)).await;
        }
        match reply {
            Reply::Position(x) => Ok(Some(PositionReading::new(x, 0.0, x * 2.0, 0.5))),
            Reply::Empty => Ok(None),
            Reply::Fail(message) => Err(message.to_string()),
        }
    }
}

fn at(source: &ScriptedSource, ms: u64) -> Instant {
    source.start + Duration::from_millis(ms)
}

fn config() -> TrackerConfig {
    TrackerConfig::default().with_poll_interval(Duration::from_millis(500))
}

#[tokio::test(start_paused = true)]
async fn test_fetch_now_then_every_interval() {
    let source = ScriptedSource::new(vec![]);
    let mut tracker = Tracker::new(source.clone(), config());
    tracker.connect();

    sleep_until(at(&source, 499)).await;
    assert_eq!(source.call_times_ms(), vec![0]);

    sleep_until(at(&source, 750)).await;
    assert_eq!(source.call_times_ms(), vec![0, 500]);

    sleep_until(at(&source, 1600)).await;
    assert_eq!(source.call_times_ms(), vec![0, 500, 1000, 1500]);

    tracker.disconnect();
}

#[tokio::test(start_paused = true)]
async fn test_slow_older_response_is_discarded() {
    let source = ScriptedSource::new(vec![(800, Reply::Position(1.0)), (10, Reply::Position(2.0))]);
    let mut tracker = Tracker::new(source.clone(), config());
    let mut events = tracker.subscribe();
    tracker.connect();

    sleep_until(at(&source, 600)).await;
    let sample = tracker.latest().unwrap();
    assert_eq!((sample.seq, sample.position.x), (2, 2.0));

    // Request 1 answers at t=800, after request 2 was applied
    sleep_until(at(&source, 900)).await;
    let sample = tracker.latest().unwrap();
    assert_eq!((sample.seq, sample.position.x), (2, 2.0));
    assert_eq!(sample.position.z, 4.0);
    assert_eq!(tracker.accuracy(), 0.5);

    let seen = events.drain();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], TrackerEvent::Connected);
    assert!(matches!(&seen[1], TrackerEvent::Sample(s) if s.seq == 2));
}

#[tokio::test(start_paused = true)]
async fn test_late_failure_is_reported_but_keeps_newer_sample() {
    let source = ScriptedSource::new(vec![(800, Reply::Fail("timeout")), (10, Reply::Position(2.0))]);
    let mut tracker = Tracker::new(source.clone(), config());
    let mut events = tracker.subscribe();
    tracker.connect();

    // Request 1 fails at t=800, after request 2 was applied
    sleep_until(at(&source, 900)).await;
    let sample = tracker.latest().unwrap();
    assert_eq!((sample.seq, sample.position.x), (2, 2.0));
    assert!(tracker.is_connected());

    let seen = events.drain();
    assert_eq!(seen.len(), 3);
    assert!(matches!(&seen[1], TrackerEvent::Sample(s) if s.seq == 2));
    assert_eq!(
        seen[2],
        TrackerEvent::FetchFailed {
            seq: 1,
            error: Error::Source("timeout".into()),
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_disconnect_drops_in_flight_response() {
    let source = ScriptedSource::new(vec![(300, Reply::Position(7.0))]);
    let mut tracker = Tracker::new(source.clone(), config());
    let mut events = tracker.subscribe();
    tracker.connect();
    assert!(tracker.is_connected());

    sleep_until(at(&source, 100)).await;
    tracker.disconnect();
    assert!(!tracker.is_connected());

    sleep_until(at(&source, 1200)).await;
    assert_eq!(source.call_times_ms(), vec![0]);
    assert!(tracker.latest().is_none());
    assert_eq!(events.drain(), vec![TrackerEvent::Connected, TrackerEvent::Disconnected]);
}

#[tokio::test(start_paused = true)]
async fn test_failures_do_not_stop_polling() {
    let source = ScriptedSource::new(vec![
        (0, Reply::Position(1.0)),
        (0, Reply::Fail("connection refused")),
        (0, Reply::Empty),
        (0, Reply::Position(3.0)),
    ]);
    let mut tracker = Tracker::new(source.clone(), config());
    let mut events = tracker.subscribe();
    tracker.connect();

    sleep_until(at(&source, 750)).await;
    // Failure keeps the last state
    assert_eq!(tracker.latest().unwrap().position.x, 1.0);

    sleep_until(at(&source, 1750)).await;
    assert_eq!(tracker.latest().unwrap().position.x, 3.0);

    let seen = events.drain();
    assert!(seen.contains(&TrackerEvent::FetchFailed {
        seq: 2,
        error: Error::Source("connection refused".into()),
    }));
    let samples: Vec<u64> = seen
        .iter()
        .filter_map(|e| match e {
            TrackerEvent::Sample(s) => Some(s.seq),
            _ => None,
        })
        .collect();
    assert_eq!(samples, vec![1, 4]);
}

#[tokio::test(start_paused = true)]
async fn test_connect_and_disconnect_are_idempotent() {
    let source = ScriptedSource::new(vec![(0, Reply::Position(5.0))]);
    let mut tracker = Tracker::new(source.clone(), config());
    let mut events = tracker.subscribe();

    tracker.disconnect();
    tracker.connect();
    tracker.connect();
    sleep_until(at(&source, 100)).await;
    assert_eq!(source.call_times_ms(), vec![0]);

    tracker.disconnect();
    tracker.disconnect();
    assert_eq!(
        events.drain().iter().filter(|e| !matches!(e, TrackerEvent::Sample(_))).count(),
        2
    );

    // Reconnecting fetches immediately and keeps the previous sample meanwhile
    sleep_until(at(&source, 300)).await;
    tracker.connect();
    assert_eq!(tracker.latest().unwrap().position.x, 5.0);
    sleep_until(at(&source, 350)).await;
    assert_eq!(source.call_times_ms(), vec![0, 300]);
    tracker.disconnect();
}

#[tokio::test(start_paused = true)]
async fn test_dropping_tracker_stops_polling() {
    let source = ScriptedSource::new(vec![]);
    let mut tracker = Tracker::new(source.clone(), config());
    let mut events = tracker.subscribe();
    tracker.connect();
    sleep_until(at(&source, 10)).await;
    drop(tracker);

    sleep_until(at(&source, 2000)).await;
    assert_eq!(source.call_times_ms(), vec![0]);
    events.drain();
    assert_eq!(events.recv().await, Err(Error::Closed));
}
