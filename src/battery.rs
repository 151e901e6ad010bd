//! Battery charge record and conversion from raw measurements.
//!
//! Conversion based upon https://github.com/dbrgn/pinetime-rtic/blob/master/pinetime-rtic/src/battery.rs
//! and https://wiki.pine64.org/wiki/PineTime.

use crate::error::{Error, Result};

/// Battery state as delivered by the battery feed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryChargeState {
    /// Charge in percent (0–100)
    pub charge_percent: u8,
    /// Charger is actively charging
    pub is_charging: bool,
    /// Charger is connected
    pub is_plugged: bool,
}

impl BatteryChargeState {
    /// Value of the Battery Level characteristic, which is limited to 0–100.
    pub fn level(&self) -> u8 {
        self.charge_percent.min(100)
    }
}

/// Convert a 12-bit SAADC sample into the battery voltage in millivolts.
///
/// The battery is measured through a 1:2 divider against a 3.3 V reference.
pub fn millivolts_from_adc(raw: i16) -> Result<u16> {
    match raw {
        0..=4095 => {
            // keep as 32 bit for the multiplication
            let adc = raw as u32;
            Ok((adc * 2000 / 1241) as u16)
        }
        _ => Err(Error::InvalidMeasurement),
    }
}

/// Estimate the remaining capacity from the battery voltage.
///
/// Fixed data points with linear interpolation in between.
pub fn percent_from_millivolts(millivolts: u16) -> u8 {
    (match millivolts {
        0..=3449 => 0,
        3450..=3699 => (millivolts - 3450) / 5,
        3700..=4199 => 50 + (millivolts - 3700) / 10,
        _ => 100,
    }) as u8
}
