//! Application-wide constants and compile-time configuration.
//!
//! Face geometry, sampling periods and defaults live here so they can be
//! tuned in one place.

use crate::format::ClockStyle;

// Face

/// Width of the watchface in pixels.
pub const FACE_WIDTH: u32 = 144;

/// Height of the watchface in pixels.
pub const FACE_HEIGHT: u32 = 168;

/// Physical LCD size of the PineTime (ST7789, square).
pub const LCD_W: u16 = 240;
pub const LCD_H: u16 = 240;

/// Clock style used until the user picks one. Settings are not persisted.
pub const DEFAULT_CLOCK_STYLE: ClockStyle = ClockStyle::TwentyFourHour;

// Time

/// Offset of local time from UTC (seconds).
pub const TIMEZONE_OFFSET_SECS: i32 = 3_600;

/// How often the clock task checks for a minute boundary (ms).
pub const CLOCK_POLL_MS: u64 = 1_000;

// Battery

/// Battery sampling period (seconds).
pub const BATTERY_POLL_SECS: u64 = 10;

// BLE

/// Advertised device name.
pub const BLE_DEVICE_NAME: &str = "Cloudface";

// Event loop

/// Depth of the queue between the producer tasks and the display task.
pub const EVENT_QUEUE_DEPTH: usize = 8;
