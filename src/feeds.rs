//! Change-detecting event feeds.
//!
//! The producers on the device sample their hardware periodically; these
//! feeds turn the samples into events, so the face only hears about minute
//! boundaries and actual transitions.

use chrono::{NaiveDateTime, Timelike};

use crate::battery::BatteryChargeState;

/// Yields one tick per minute boundary.
#[derive(Default)]
pub struct MinuteTicker {
    last: Option<NaiveDateTime>,
}

impl MinuteTicker {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Feed the current time. Returns it when it lies in a different
    /// minute than the last delivered tick. The first poll always ticks.
    pub fn poll(&mut self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let minute = truncate_to_minute(now);
        if self.last.map(truncate_to_minute) == Some(minute) {
            return None;
        }
        self.last = Some(now);
        Some(now)
    }

}

fn truncate_to_minute(time: NaiveDateTime) -> NaiveDateTime {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}

/// Yields on connect/disconnect transitions.
#[derive(Default)]
pub struct ConnectivityFeed {
    last: Option<bool>,
}

impl ConnectivityFeed {
    pub const fn new() -> Self {
        Self { last: None }
    }

    pub fn update(&mut self, connected: bool) -> Option<bool> {
        if self.last == Some(connected) {
            return None;
        }
        self.last = Some(connected);
        Some(connected)
    }

    /// Last state seen, if any.
    pub fn peek(&self) -> Option<bool> {
        self.last
    }
}

/// Yields when any part of the battery record changes.
#[derive(Default)]
pub struct BatteryFeed {
    last: Option<BatteryChargeState>,
}

impl BatteryFeed {
    pub const fn new() -> Self {
        Self { last: None }
    }

    pub fn update(&mut self, state: BatteryChargeState) -> Option<BatteryChargeState> {
        if self.last == Some(state) {
            return None;
        }
        self.last = Some(state);
        Some(state)
    }

}
