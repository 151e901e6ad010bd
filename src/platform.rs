//! Live queries the watchface makes against the platform.

use chrono::NaiveDateTime;

use crate::battery::BatteryChargeState;
use crate::format::ClockStyle;

/// Current platform state, peeked at load time and at each minute tick.
pub trait Platform {
    /// Local wall-clock time.
    fn now(&self) -> NaiveDateTime;

    /// 12/24-hour preference from the clock settings.
    fn clock_style(&self) -> ClockStyle;

    /// Whether a phone is connected.
    fn bluetooth_connected(&self) -> bool;

    /// Latest battery reading.
    fn battery_state(&self) -> BatteryChargeState;
}
