//! Battery status check
//!
//! Implementation based upon https://github.com/dbrgn/pinetime-rtic/blob/master/pinetime-rtic/src/battery.rs
//! and https://wiki.pine64.org/wiki/PineTime.

use cloudface::{
    battery::{millivolts_from_adc, percent_from_millivolts},
    BatteryChargeState, Result,
};
use embassy_nrf::{
    gpio::Input,
    peripherals::{P0_12, P0_19},
    saadc::Saadc,
};

/// Battery API
pub struct Battery {
    /// ADC instance for battery voltage measurement (P0.31)
    adc: Saadc<'static, 1>,
    /// Charge indication pin:
    /// high = battery, low = charging
    pin_charge_indication: Input<'static, P0_12>,
    /// Power presence pin:
    /// high = on battery, low = charger connected
    pin_power_presence: Input<'static, P0_19>,
}

impl Battery {
    /// Configure battery settings on boot
    pub fn init(
        adc: Saadc<'static, 1>,
        charge_pin: Input<'static, P0_12>,
        power_pin: Input<'static, P0_19>,
    ) -> Self {
        Self {
            adc,
            pin_charge_indication: charge_pin,
            pin_power_presence: power_pin,
        }
    }

    /// Read the current charge record from the hardware.
    pub async fn sample(&mut self) -> Result<BatteryChargeState> {
        let millivolts = self.millivolts().await?;
        Ok(BatteryChargeState {
            charge_percent: percent_from_millivolts(millivolts),
            is_charging: self.pin_charge_indication.is_low(),
            is_plugged: self.pin_power_presence.is_low(),
        })
    }

    /// Battery voltage in millivolts
    async fn millivolts(&mut self) -> Result<u16> {
        let mut buf = [0; 1];
        self.adc.sample(&mut buf).await;
        millivolts_from_adc(buf[0])
    }
}
