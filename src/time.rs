//! Wall clock keeping.
//!
//! The watch has no battery-backed calendar; the wall clock is a
//! reference point (build time or a phone-provided time) plus the uptime
//! elapsed since.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

use crate::error::{Error, Result};

/// Length of a Current Time characteristic (0x2A2B) value.
pub const CTS_LEN: usize = 10;

/// A known wall-clock time and the uptime at which it was valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeReference {
    /// Clock time
    time: NaiveDateTime,
    /// Uptime when `time` was taken, in microseconds
    uptime_micros: u64,
}

impl Default for TimeReference {
    fn default() -> Self {
        Self {
            time: DateTime::UNIX_EPOCH.naive_utc(),
            uptime_micros: 0,
        }
    }
}

impl TimeReference {
    /// Create a reference from a wall-clock time.
    pub fn new(time: NaiveDateTime, uptime_micros: u64) -> Self {
        Self {
            time,
            uptime_micros,
        }
    }

    /// Create a reference from a UNIX timestamp (UTC) shifted by a fixed
    /// offset into local time.
    pub fn from_timestamp(secs: i64, offset_secs: i32, uptime_micros: u64) -> Result<Self> {
        let utc = DateTime::from_timestamp(secs, 0).ok_or(Error::InvalidTimestamp)?;
        let local = utc
            .naive_utc()
            .checked_add_signed(Duration::seconds(offset_secs as i64))
            .ok_or(Error::InvalidTimestamp)?;
        Ok(Self::new(local, uptime_micros))
    }

    /// Create a reference from Current Time Service data.
    ///
    /// Layout: year (u16 LE), month, day, hours, minutes, seconds,
    /// day of week, fractions of 1/256 s, adjust reason.
    pub fn from_cts_bytes(bytes: &[u8], uptime_micros: u64) -> Result<Self> {
        if bytes.len() < CTS_LEN {
            return Err(Error::InvalidTimestamp);
        }
        let year = u16::from_le_bytes([bytes[0], bytes[1]]) as i32;
        let month = bytes[2] as u32;
        let day = bytes[3] as u32;
        let hour = bytes[4] as u32;
        let min = bytes[5] as u32;
        let sec = bytes[6] as u32;
        // Convert fractions_256 to milliseconds
        let milli = bytes[8] as u32 * 1000 / 256;

        let time = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_milli_opt(hour, min, sec, milli))
            .ok_or(Error::InvalidTimestamp)?;

        Ok(Self::new(time, uptime_micros))
    }

    /// Wall-clock time at the given uptime.
    pub fn now(&self, uptime_micros: u64) -> NaiveDateTime {
        let elapsed = uptime_micros.saturating_sub(self.uptime_micros);
        self.time
            .checked_add_signed(Duration::microseconds(elapsed as i64))
            .unwrap_or(self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn extrapolates_from_reference() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(23, 59, 30)
            .unwrap();
        let reference = TimeReference::new(start, 5_000_000);
        assert_eq!(reference.now(5_000_000), start);
        let later = reference.now(5_000_000 + 45_000_000);
        assert_eq!(later.date(), NaiveDate::from_ymd_opt(2024, 3, 8).unwrap());
        assert_eq!((later.hour(), later.minute(), later.second()), (0, 0, 15));
    }

    #[test]
    fn uptime_before_reference_does_not_go_back() {
        let epoch = DateTime::UNIX_EPOCH.naive_utc();
        let reference = TimeReference::new(epoch, 1_000);
        assert_eq!(reference.now(0), epoch);
    }

    #[test]
    fn default_reference_is_the_epoch() {
        let reference = TimeReference::default();
        assert_eq!(
            reference.now(0),
            NaiveDate::from_ymd_opt(1970, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn timestamp_with_offset() {
        // 2024-03-07 12:00:00 UTC
        let reference = TimeReference::from_timestamp(1_709_812_800, 3_600, 0).unwrap();
        assert_eq!(reference.now(0).hour(), 13);
    }

    #[test]
    fn decodes_current_time_service() {
        let bytes = [0xE8, 0x07, 3, 7, 9, 41, 12, 4, 128, 0];
        let reference = TimeReference::from_cts_bytes(&bytes, 0).unwrap();
        let time = reference.now(0);
        assert_eq!(
            time,
            NaiveDate::from_ymd_opt(2024, 3, 7)
                .unwrap()
                .and_hms_milli_opt(9, 41, 12, 500)
                .unwrap()
        );
    }

    #[test]
    fn rejects_bad_current_time_service() {
        let month_13 = [0xE8, 0x07, 13, 7, 9, 41, 12, 4, 0, 0];
        assert_eq!(
            TimeReference::from_cts_bytes(&month_13, 0),
            Err(Error::InvalidTimestamp)
        );
        assert_eq!(
            TimeReference::from_cts_bytes(&[0xE8, 0x07, 3], 0),
            Err(Error::InvalidTimestamp)
        );
    }
}
