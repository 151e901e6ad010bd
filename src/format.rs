//! Text formatting for the watchface labels.
//!
//! Output follows the C `strftime` conventions the face was designed
//! around: `%H:%M` / `%I:%M` for the time and `%b %e` for the date.

use core::fmt::Write;

use chrono::{Datelike, NaiveDateTime, Timelike};
use heapless::String;

use crate::error::{Error, Result};

/// `HH:MM`.
pub const TIME_LEN: usize = 5;

/// Longest `%b %e` output: three-letter month, a space, two-column day.
pub const DATE_LEN: usize = 6;

/// `100`.
pub const BATTERY_LEN: usize = 3;

/// Longest connectivity string, `No BT`.
pub const BLUETOOTH_LEN: usize = 5;

pub type TimeText = String<TIME_LEN>;
pub type DateText = String<DATE_LEN>;
pub type BatteryText = String<BATTERY_LEN>;

/// Hour display preference, read from the platform at each update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockStyle {
    TwelveHour,
    TwentyFourHour,
}

impl ClockStyle {
    pub fn from_24h(is_24h: bool) -> Self {
        if is_24h {
            ClockStyle::TwentyFourHour
        } else {
            ClockStyle::TwelveHour
        }
    }

    /// Decode the clock format setting written by the phone. Zero selects
    /// the 12-hour clock, anything else the 24-hour clock.
    pub fn from_setting(value: u8) -> Self {
        Self::from_24h(value != 0)
    }

    /// Encoding of [`ClockStyle::from_setting`].
    pub fn setting(self) -> u8 {
        match self {
            ClockStyle::TwelveHour => 0,
            ClockStyle::TwentyFourHour => 1,
        }
    }
}

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Three-letter month abbreviation (`%b` in the C locale).
pub fn month_abbrev(time: &NaiveDateTime) -> &'static str {
    // month0() is always 0..=11
    MONTHS[time.month0() as usize]
}

/// Format the time of day as `HH:MM`.
///
/// 24-hour mode zero-pads the hour (`%H`), 12-hour mode maps 0 and 12 to
/// `12` and zero-pads the rest (`%I`).
pub fn format_time(time: &NaiveDateTime, style: ClockStyle) -> Result<TimeText> {
    let hour = match style {
        ClockStyle::TwentyFourHour => time.hour(),
        ClockStyle::TwelveHour => time.hour12().1,
    };
    let mut text = TimeText::new();
    write!(text, "{:02}:{:02}", hour, time.minute()).map_err(|_| Error::BufferOverflow)?;
    Ok(text)
}

/// Format the date as `%b %e`: month abbreviation, a space, and the day
/// of month space-padded to two columns (`Mar  7`, `Mar 17`).
pub fn format_date(time: &NaiveDateTime) -> Result<DateText> {
    let mut text = DateText::new();
    write!(text, "{} {:>2}", month_abbrev(time), time.day()).map_err(|_| Error::BufferOverflow)?;
    Ok(text)
}

/// Format a charge percentage as a plain decimal. Values above 100 are
/// clamped.
pub fn format_battery(charge_percent: u8) -> Result<BatteryText> {
    let mut text = BatteryText::new();
    write!(text, "{}", charge_percent.min(100)).map_err(|_| Error::BufferOverflow)?;
    Ok(text)
}

/// Connectivity label text.
pub fn bluetooth_text(connected: bool) -> &'static str {
    if connected {
        "BT"
    } else {
        "No BT"
    }
}
