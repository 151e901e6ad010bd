//! Device side of the platform contract.
//!
//! Producer tasks record the latest readings here and post change events
//! to the queue drained by the display task.

use core::cell::{Cell, RefCell};
use core::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDateTime;
use cloudface::{
    config::{DEFAULT_CLOCK_STYLE, EVENT_QUEUE_DEPTH},
    feeds::{BatteryFeed, ConnectivityFeed},
    BatteryChargeState, ClockStyle, Event, Platform,
};
use embassy_sync::{
    blocking_mutex::{raw::ThreadModeRawMutex, Mutex},
    channel::Channel,
};

use super::{bluetooth, time::Clock};

/// Events waiting for the display task, in arrival order.
pub static EVENTS: Channel<ThreadModeRawMutex, Event, EVENT_QUEUE_DEPTH> = Channel::new();

static CLOCK_24H: AtomicBool = AtomicBool::new(matches!(
    DEFAULT_CLOCK_STYLE,
    ClockStyle::TwentyFourHour
));

static CONNECTIVITY: Mutex<ThreadModeRawMutex, RefCell<ConnectivityFeed>> =
    Mutex::new(RefCell::new(ConnectivityFeed::new()));

static BATTERY: Mutex<ThreadModeRawMutex, RefCell<BatteryFeed>> =
    Mutex::new(RefCell::new(BatteryFeed::new()));

static LAST_BATTERY: Mutex<ThreadModeRawMutex, Cell<BatteryChargeState>> =
    Mutex::new(Cell::new(BatteryChargeState {
        charge_percent: 0,
        is_charging: false,
        is_plugged: false,
    }));

/// Change the hour display. Posts a tick so the time label follows at once.
pub fn set_clock_style(style: ClockStyle) {
    CLOCK_24H.store(style == ClockStyle::TwentyFourHour, Ordering::Relaxed);
    defmt::info!("clock style: {}", style);
    if EVENTS.try_send(Event::tick_now(&DevicePlatform)).is_err() {
        defmt::warn!("event queue full, clock style applies at the next tick");
    }
}

pub fn clock_style() -> ClockStyle {
    ClockStyle::from_24h(CLOCK_24H.load(Ordering::Relaxed))
}

/// Record a connectivity sample; posts an event on transitions.
pub async fn set_connected(connected: bool) {
    let changed = CONNECTIVITY.lock(|feed| feed.borrow_mut().update(connected));
    if let Some(connected) = changed {
        defmt::info!("bluetooth connected: {}", connected);
        EVENTS.send(Event::Connectivity(connected)).await;
    }
}

/// Record a battery sample; posts an event when the record changed.
pub async fn set_battery(state: BatteryChargeState) {
    LAST_BATTERY.lock(|last| last.set(state));
    let changed = BATTERY.lock(|feed| feed.borrow_mut().update(state));
    if let Some(state) = changed {
        bluetooth::publish_battery_level(state.level());
        defmt::info!(
            "battery: {}% ({})",
            state.charge_percent,
            if state.is_charging {
                "charging"
            } else {
                "discharging"
            }
        );
        EVENTS.send(Event::Battery(state)).await;
    }
}

pub fn battery_state() -> BatteryChargeState {
    LAST_BATTERY.lock(|last| last.get())
}

/// Live queries served from the latest readings.
pub struct DevicePlatform;

impl Platform for DevicePlatform {
    fn now(&self) -> NaiveDateTime {
        Clock::now()
    }

    fn clock_style(&self) -> ClockStyle {
        clock_style()
    }

    fn bluetooth_connected(&self) -> bool {
        CONNECTIVITY.lock(|feed| feed.borrow().peek().unwrap_or(false))
    }

    fn battery_state(&self) -> BatteryChargeState {
        battery_state()
    }
}
