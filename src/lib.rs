//! Cloudface watchface.
//!
//! Everything here is independent of the hardware so it can be tested on
//! the host: label formatting, the watchface state machine, resource
//! lifetimes, event feeds and rendering into a 1-bit framebuffer.
//!
//! The firmware in `main.rs` (feature `embedded`) supplies the platform:
//! clock, battery, Bluetooth and the LCD.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod assets;
pub mod battery;
pub mod config;
pub mod error;
pub mod feeds;
pub mod format;
pub mod framebuffer;
pub mod layout;
pub mod platform;
pub mod resources;
pub mod state;
pub mod time;
pub mod ui;
pub mod window;

pub use battery::BatteryChargeState;
pub use error::{Error, Result};
pub use format::ClockStyle;
pub use platform::Platform;
pub use resources::{ResourceBundle, ResourceId};
pub use state::{Dirty, Event, FaceState, Field};
pub use ui::Watchface;
pub use window::MainWindow;
