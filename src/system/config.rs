//! nRF52 peripheral configuration

use embassy_nrf::{config::Config, interrupt::Priority};

/// Peripheral configuration for running next to the SoftDevice.
///
/// The SoftDevice owns the clocks and reserves interrupt priorities 0, 1
/// and 4, so the embassy drivers are moved to priority 2.
pub fn peripheral_config() -> Config {
    let mut config = Config::default();
    config.gpiote_interrupt_priority = Priority::P2;
    config.time_interrupt_priority = Priority::P2;
    config
}
