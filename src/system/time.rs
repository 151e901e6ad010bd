//! Time keeping module for PineTime

use core::cell::Cell;

use chrono::NaiveDateTime;
use cloudface::{config::TIMEZONE_OFFSET_SECS, time::TimeReference, Result};
use embassy_sync::blocking_mutex::{raw::ThreadModeRawMutex, Mutex};
use embassy_time::Instant;

// Current UTC epoch at compile time
include!(concat!(env!("OUT_DIR"), "/utc.rs"));

static REFERENCE: Mutex<ThreadModeRawMutex, Cell<Option<TimeReference>>> =
    Mutex::new(Cell::new(None));

/// Wall clock shared by the tasks.
pub struct Clock;

impl Clock {
    /// Start the clock from the build time.
    pub fn init() -> Result<()> {
        let reference = TimeReference::from_timestamp(
            BUILD_UTC_SECS,
            TIMEZONE_OFFSET_SECS,
            Instant::now().as_micros(),
        )?;
        Self::set(reference);
        Ok(())
    }

    /// Current local time
    pub fn now() -> NaiveDateTime {
        let reference = REFERENCE.lock(|r| r.get()).unwrap_or_default();
        reference.now(Instant::now().as_micros())
    }

    /// Replace the time reference, e.g. with phone-provided time
    pub fn set(reference: TimeReference) {
        REFERENCE.lock(|r| r.set(Some(reference)));
    }

    /// Set the clock from a Current Time Service write
    pub fn set_from_cts(bytes: &[u8]) -> Result<()> {
        let reference = TimeReference::from_cts_bytes(bytes, Instant::now().as_micros())?;
        Self::set(reference);
        defmt::info!("clock set by phone");
        Ok(())
    }
}
