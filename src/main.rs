#![no_std]
#![no_main]

mod peripherals;
mod system;

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Device
use core::cell::RefCell;

use embassy_executor::Spawner;
use embassy_nrf::{
    bind_interrupts,
    gpio::{Input, Level, Output, OutputDrive, Pull},
    peripherals::SPI2,
    saadc::{self, ChannelConfig, Resolution, Saadc},
    spim,
};
use embassy_time::{Duration, Ticker};
use nrf_softdevice::Softdevice;
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use cloudface::{
    assets::BundledAssets,
    config::{BATTERY_POLL_SECS, CLOCK_POLL_MS},
    feeds::MinuteTicker,
    framebuffer::Framebuffer,
    ui, Dirty, Event, MainWindow, Platform,
};
use peripherals::{
    battery::Battery,
    display::{BacklightPins, Display},
};
use system::{
    bluetooth::{self, Server},
    config::peripheral_config,
    platform::{self, DevicePlatform, EVENTS},
    time::Clock,
};

static SERVER: StaticCell<Server> = StaticCell::new();

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

/// Advertise and track the connection to the phone.
#[embassy_executor::task]
async fn bluetooth_task(sd: &'static Softdevice, server: &'static Server) -> ! {
    bluetooth::run(sd, server).await
}

/// Post a tick on every minute boundary.
#[embassy_executor::task]
async fn update_time() {
    let mut ticker = MinuteTicker::new();
    let mut tick = Ticker::every(Duration::from_millis(CLOCK_POLL_MS));
    loop {
        if ticker.poll(DevicePlatform.now()).is_some() {
            EVENTS.send(Event::tick_now(&DevicePlatform)).await;
        }

        tick.next().await;
    }
}

/// Fetch the battery status from the hardware.
#[embassy_executor::task]
async fn update_battery_status(mut battery: Battery) {
    let mut tick = Ticker::every(Duration::from_secs(BATTERY_POLL_SECS));
    loop {
        match battery.sample().await {
            Ok(state) => platform::set_battery(state).await,
            Err(e) => defmt::warn!("battery sample skipped: {}", e),
        }

        tick.next().await;
    }
}

/// Owns the screen. Handles one event at a time, to completion.
#[embassy_executor::task]
async fn update_lcd(mut display: Display<SPI2>) {
    let bundle = RefCell::new(BundledAssets::new());
    let mut window = MainWindow::new(&bundle);
    let mut face = Framebuffer::new();

    if let Err(e) = window.push(&DevicePlatform) {
        let _ = ui::draw_error(&mut face, &e);
        if let Err(e) = display.flush(&face) {
            defmt::error!("display flush failed: {}", e);
        }
        return;
    }

    let _ = window.render(&mut face, Dirty::all());
    if let Err(e) = display.flush(&face) {
        defmt::error!("display flush failed: {}", e);
    }

    loop {
        let event = EVENTS.receive().await;
        let dirty = match window.dispatch(&event) {
            Ok(dirty) => dirty,
            Err(e) => {
                defmt::warn!("event not applied: {}", e);
                continue;
            }
        };
        if dirty.is_empty() {
            continue;
        }

        let _ = window.render(&mut face, dirty);
        if let Err(e) = display.flush(&face) {
            defmt::error!("display flush failed: {}", e);
        }
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(peripheral_config());
    defmt::info!("Initializing");

    // Initialize Bluetooth
    let sd = Softdevice::enable(&bluetooth::generate_config());
    let server = SERVER.init(unwrap!(Server::new(sd)));
    unwrap!(spawner.spawn(softdevice_task(sd)));

    // Initialize clock
    unwrap!(Clock::init());

    // Initialize SAADC
    let mut saadc_config = saadc::Config::default();
    // Set resolution to 12bit, necessary for correct battery status calculation
    saadc_config.resolution = Resolution::_12BIT;
    // Pin P0.31: Voltage level
    let channel_config = ChannelConfig::single_ended(p.P0_31);
    let saadc = Saadc::new(p.SAADC, Irqs, saadc_config, [channel_config]);
    saadc.calibrate().await;

    // Initialize Battery and take a first reading before the face loads
    let mut battery = Battery::init(
        saadc,
        Input::new(p.P0_12, Pull::None),
        Input::new(p.P0_19, Pull::None),
    );
    if let Ok(state) = battery.sample().await {
        platform::set_battery(state).await;
    }
    platform::set_connected(false).await;

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;

    let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let backlight = BacklightPins::init(
        Output::new(p.P0_14, Level::High, OutputDrive::Standard),
        Output::new(p.P0_22, Level::High, OutputDrive::Standard),
        Output::new(p.P0_23, Level::High, OutputDrive::Standard),
    );
    let display = unwrap!(Display::init(
        spim,
        Output::new(p.P0_25, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
        backlight,
    ));

    // The startup readings above were queued as events; the face reads
    // live state on load instead.
    while EVENTS.try_receive().is_ok() {}

    defmt::info!("Initialization finished");

    // Schedule tasks
    unwrap!(spawner.spawn(update_lcd(display)));
    unwrap!(spawner.spawn(update_time()));
    unwrap!(spawner.spawn(update_battery_status(battery)));
    unwrap!(spawner.spawn(bluetooth_task(sd, server)));
}
