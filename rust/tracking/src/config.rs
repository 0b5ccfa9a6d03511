// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tracker configuration loaded from environment variables.

use std::time::Duration;

/// Poll cadence used when nothing else is configured
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Buffered tracker events per subscriber before it starts lagging
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Tracker configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Time between fetches; the first fetch happens on connect.
    pub poll_interval: Duration,
    /// Event channel capacity.
    pub event_capacity: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl TrackerConfig {
    /// Load configuration from `LOCUS_POLL_INTERVAL_MS` and
    /// `LOCUS_EVENT_CAPACITY`, falling back to the defaults on missing or
    /// unparsable values.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let poll_interval = lookup("LOCUS_POLL_INTERVAL_MS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_POLL_INTERVAL);
        let event_capacity = lookup("LOCUS_EVENT_CAPACITY")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_EVENT_CAPACITY);

        Self {
            poll_interval,
            event_capacity,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Interval actually used by the poll loop (zero is not a valid period)
    pub(crate) fn effective_interval(&self) -> Duration {
        if self.poll_interval.is_zero() {
            DEFAULT_POLL_INTERVAL
        } else {
            self.poll_interval
        }
    }

    pub(crate) fn effective_capacity(&self) -> usize {
        self.event_capacity.max(1)
    }
}
