//! Bluetooth module
//!
//! Advertises as a connectable peripheral exposing the battery level and a
//! writable Current Time characteristic. Connection state feeds the
//! watchface's Bluetooth label.

// Core
use core::cell::{Cell, RefCell};
use core::mem;
use core::sync::atomic::{AtomicBool, Ordering};

// BLE
use nrf_softdevice::{
    self,
    ble::{
        advertisement_builder::{
            Flag, LegacyAdvertisementBuilder, LegacyAdvertisementPayload, ServiceList,
            ServiceUuid16,
        },
        gatt_server, peripheral, Connection,
    },
    raw, Config, Softdevice,
};

// Crate
use cloudface::{config::BLE_DEVICE_NAME, time::CTS_LEN, ClockStyle};
use embassy_sync::blocking_mutex::{raw::ThreadModeRawMutex, Mutex};

use super::{platform, time::Clock};

pub static ADV_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .flags(&[Flag::GeneralDiscovery, Flag::LE_Only])
    .services_16(ServiceList::Complete, &[ServiceUuid16::BATTERY])
    .full_name(BLE_DEVICE_NAME)
    .build();

pub static SCAN_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .services_16(ServiceList::Complete, &[ServiceUuid16::BATTERY])
    .build();

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub bas: BatteryService,
    pub cts: CurrentTimeService,
    pub clock: ClockSettingsService,
}

#[nrf_softdevice::gatt_service(uuid = "180f")]
pub struct BatteryService {
    #[characteristic(uuid = "2a19", read, notify)]
    pub battery_level: u8,
}

#[nrf_softdevice::gatt_service(uuid = "1805")]
pub struct CurrentTimeService {
    #[characteristic(uuid = "2a2b", read, write)]
    pub current_time: [u8; CTS_LEN],
}

#[nrf_softdevice::gatt_service(uuid = "7a1e0001-3c5d-4f0b-9e62-1d8c4b2f6a90")]
pub struct ClockSettingsService {
    /// 0 = 12-hour, anything else = 24-hour
    #[characteristic(uuid = "7a1e0002-3c5d-4f0b-9e62-1d8c4b2f6a90", read, write)]
    pub clock_format: u8,
}

/// Server registered by [`run`], for updates from other tasks.
static SERVER: Mutex<ThreadModeRawMutex, Cell<Option<&'static Server>>> =
    Mutex::new(Cell::new(None));

/// Connection currently being served.
static CONNECTION: Mutex<ThreadModeRawMutex, RefCell<Option<Connection>>> =
    Mutex::new(RefCell::new(None));

/// Phone subscribed to battery level notifications.
static BATTERY_NOTIFY: AtomicBool = AtomicBool::new(false);

/// Store the new battery level and notify a subscribed phone.
pub fn publish_battery_level(level: u8) {
    let Some(server) = SERVER.lock(|s| s.get()) else {
        return;
    };
    if let Err(e) = server.bas.battery_level_set(&level) {
        defmt::warn!("battery level not stored: {:?}", e);
    }
    if !BATTERY_NOTIFY.load(Ordering::Relaxed) {
        return;
    }
    CONNECTION.lock(|conn| {
        if let Some(conn) = conn.borrow().as_ref() {
            if let Err(e) = server.bas.battery_level_notify(conn, &level) {
                defmt::warn!("battery notification failed: {:?}", e);
            }
        }
    });
}

pub fn generate_config() -> Config {
    Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_XTAL as u8,
            rc_ctiv: 0,
            rc_temp_ctiv: 0,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_20_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 256 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: BLE_DEVICE_NAME.as_ptr() as _,
            current_len: BLE_DEVICE_NAME.len() as u16,
            max_len: BLE_DEVICE_NAME.len() as u16,
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

/// Serve one connection until the phone goes away.
async fn serve(server: &Server, conn: &Connection) {
    let reason = gatt_server::run(conn, server, |event| match event {
        ServerEvent::Bas(BatteryServiceEvent::BatteryLevelCccdWrite { notifications }) => {
            defmt::info!("battery notifications: {}", notifications);
            BATTERY_NOTIFY.store(notifications, Ordering::Relaxed);
        }
        ServerEvent::Cts(CurrentTimeServiceEvent::CurrentTimeWrite(bytes)) => {
            if let Err(e) = Clock::set_from_cts(&bytes) {
                defmt::warn!("rejected time from phone: {}", e);
            }
        }
        ServerEvent::Clock(ClockSettingsServiceEvent::ClockFormatWrite(value)) => {
            platform::set_clock_style(ClockStyle::from_setting(value));
        }
    })
    .await;
    defmt::info!("disconnected: {:?}", reason);
}

/// Advertise, serve, repeat. Reports connectivity on every transition.
pub async fn run(sd: &'static Softdevice, server: &'static Server) -> ! {
    SERVER.lock(|s| s.set(Some(server)));
    let config = peripheral::Config::default();
    loop {
        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &ADV_DATA,
            scan_data: &SCAN_DATA,
        };
        let conn = match peripheral::advertise_connectable(sd, adv, &config).await {
            Ok(conn) => conn,
            Err(e) => {
                defmt::error!("advertising failed: {:?}", e);
                continue;
            }
        };

        CONNECTION.lock(|c| c.replace(Some(conn.clone())));
        if let Err(e) = server
            .clock
            .clock_format_set(&platform::clock_style().setting())
        {
            defmt::warn!("clock format not stored: {:?}", e);
        }
        publish_battery_level(platform::battery_state().level());
        platform::set_connected(true).await;

        serve(server, &conn).await;

        CONNECTION.lock(|c| c.replace(None));
        BATTERY_NOTIFY.store(false, Ordering::Relaxed);
        platform::set_connected(false).await;
    }
}
