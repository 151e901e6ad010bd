//! Integration tests for the watchface lifecycle and rendering.

use std::cell::RefCell;

use chrono::{NaiveDate, NaiveDateTime};
use cloudface::{
    assets::BundledAssets,
    framebuffer::Framebuffer,
    layout::{self, LABELS},
    resources::{Bitmap, Font},
    ui, BatteryChargeState, ClockStyle, Dirty, Error, Event, Field, MainWindow, Platform,
    ResourceBundle, ResourceId, Result, Watchface,
};
use embedded_graphics::{image::ImageRaw, pixelcolor::BinaryColor, prelude::*};
use profont::PROFONT_9_POINT;

struct FakePlatform {
    now: NaiveDateTime,
    style: ClockStyle,
    connected: bool,
    charge_percent: u8,
}

impl Default for FakePlatform {
    fn default() -> Self {
        Self {
            now: at(14, 5),
            style: ClockStyle::TwentyFourHour,
            connected: true,
            charge_percent: 80,
        }
    }
}

impl Platform for FakePlatform {
    fn now(&self) -> NaiveDateTime {
        self.now
    }
    fn clock_style(&self) -> ClockStyle {
        self.style
    }
    fn bluetooth_connected(&self) -> bool {
        self.connected
    }
    fn battery_state(&self) -> BatteryChargeState {
        BatteryChargeState {
            charge_percent: self.charge_percent,
            ..Default::default()
        }
    }
}

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 7)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

static BLANK: [u8; 18] = [0; 18];

/// Bundle that records loads and releases per resource and can be told to
/// be missing one of them.
#[derive(Default)]
struct Tracking {
    loads: [usize; 4],
    releases: [usize; 4],
    missing: Option<ResourceId>,
}

impl Tracking {
    fn missing(id: ResourceId) -> Self {
        Self {
            missing: Some(id),
            ..Default::default()
        }
    }

    fn balanced(&self) -> bool {
        self.loads == self.releases
    }
}

impl ResourceBundle for Tracking {
    fn load_font(&mut self, id: ResourceId) -> Result<Font> {
        if self.missing == Some(id) {
            return Err(Error::ResourceMissing(id));
        }
        self.loads[id as usize] += 1;
        Ok(&PROFONT_9_POINT)
    }

    fn load_bitmap(&mut self, id: ResourceId) -> Result<Bitmap> {
        if self.missing == Some(id) {
            return Err(Error::ResourceMissing(id));
        }
        self.loads[id as usize] += 1;
        Ok(ImageRaw::new(&BLANK, 144))
    }

    fn release(&mut self, id: ResourceId) {
        self.releases[id as usize] += 1;
    }
}

#[test]
fn load_populates_every_label() {
    let bundle = RefCell::new(BundledAssets::new());
    let face = Watchface::load(&bundle, &FakePlatform::default()).unwrap();

    assert_eq!(face.text(Field::Time), "14:05");
    assert_eq!(face.text(Field::Date), "Mar  7");
    assert_eq!(face.text(Field::Bluetooth), "BT");
    assert_eq!(face.text(Field::Battery), "80");
}

#[test]
fn load_in_twelve_hour_mode() {
    let bundle = RefCell::new(BundledAssets::new());
    let platform = FakePlatform {
        now: at(0, 42),
        style: ClockStyle::TwelveHour,
        ..Default::default()
    };
    let face = Watchface::load(&bundle, &platform).unwrap();
    assert_eq!(face.text(Field::Time), "12:42");

    let platform = FakePlatform {
        style: ClockStyle::TwelveHour,
        ..Default::default()
    };
    let face = Watchface::load(&bundle, &platform).unwrap();
    assert_eq!(face.text(Field::Time), "02:05");
}

#[test]
fn unload_releases_each_resource_once() {
    let bundle = RefCell::new(Tracking::default());
    let mut window = MainWindow::new(&bundle);
    window.push(&FakePlatform::default()).unwrap();
    assert!(window.pop());

    let bundle = bundle.borrow();
    assert_eq!(bundle.loads, [1, 1, 1, 1]);
    assert_eq!(bundle.releases, [1, 1, 1, 1]);
}

#[test]
fn status_labels_share_one_font() {
    let bundle = RefCell::new(Tracking::default());
    let face = Watchface::load(&bundle, &FakePlatform::default()).unwrap();
    assert_eq!(bundle.borrow().loads[ResourceId::Quirly16 as usize], 1);
    face.unload();
    assert!(bundle.borrow().balanced());
}

#[test]
fn missing_resource_fails_load_and_releases_the_rest() {
    let bundle = RefCell::new(Tracking::missing(ResourceId::Cherl26));
    let mut window = MainWindow::new(&bundle);

    let err = window.push(&FakePlatform::default());
    assert_eq!(err, Err(Error::ResourceMissing(ResourceId::Cherl26)));
    assert!(!window.is_loaded());

    let bundle = bundle.borrow();
    assert_eq!(bundle.loads, [1, 1, 0, 0]);
    assert_eq!(bundle.releases, [1, 1, 0, 0]);
}

#[test]
fn missing_background_loads_nothing() {
    let bundle = RefCell::new(Tracking::missing(ResourceId::Cloudface));
    let result = Watchface::load(&bundle, &FakePlatform::default());
    assert!(matches!(
        result,
        Err(Error::ResourceMissing(ResourceId::Cloudface))
    ));
    assert_eq!(bundle.borrow().loads, [0; 4]);
    assert_eq!(bundle.borrow().releases, [0; 4]);
}

#[test]
fn reload_shows_the_same_labels() {
    let bundle = RefCell::new(BundledAssets::new());
    let platform = FakePlatform::default();
    let mut window = MainWindow::new(&bundle);

    window.push(&platform).unwrap();
    let first = window.face().unwrap().state().clone();
    assert!(window.pop());
    assert_eq!(bundle.borrow().outstanding(), 0);

    window.push(&platform).unwrap();
    assert_eq!(window.face().unwrap().state(), &first);
    assert!(window.pop());
    assert_eq!(bundle.borrow().outstanding(), 0);
}

#[test]
fn ticks_follow_the_clock_style() {
    let bundle = RefCell::new(BundledAssets::new());
    let mut window = MainWindow::new(&bundle);
    window.push(&FakePlatform::default()).unwrap();

    let dirty = window
        .dispatch(&Event::MinuteTick {
            time: at(14, 6),
            style: ClockStyle::TwelveHour,
        })
        .unwrap();
    assert_eq!(dirty, Dirty::only(Field::Time));
    assert_eq!(window.face().unwrap().text(Field::Time), "02:06");

    let dirty = window
        .dispatch(&Event::MinuteTick {
            time: at(0, 0),
            style: ClockStyle::TwentyFourHour,
        })
        .unwrap();
    assert_eq!(dirty, Dirty::only(Field::Time));
    assert_eq!(window.face().unwrap().text(Field::Time), "00:00");
}

#[test]
fn connectivity_and_battery_events_update_their_labels() {
    let bundle = RefCell::new(BundledAssets::new());
    let mut window = MainWindow::new(&bundle);
    window.push(&FakePlatform::default()).unwrap();

    assert_eq!(
        window.dispatch(&Event::Connectivity(false)).unwrap(),
        Dirty::only(Field::Bluetooth)
    );
    assert!(window.dispatch(&Event::Connectivity(false)).unwrap().is_empty());
    assert_eq!(window.face().unwrap().text(Field::Bluetooth), "No BT");

    let low = BatteryChargeState {
        charge_percent: 7,
        ..Default::default()
    };
    assert_eq!(
        window.dispatch(&Event::Battery(low)).unwrap(),
        Dirty::only(Field::Battery)
    );
    assert_eq!(window.face().unwrap().text(Field::Battery), "7");
}

fn inside_any_label(x: i32, y: i32) -> bool {
    LABELS
        .iter()
        .any(|spec| spec.frame.contains(Point::new(x, y)))
}

#[test]
fn full_render_draws_background_outside_labels() {
    let bundle = RefCell::new(BundledAssets::new());
    let mut window = MainWindow::new(&bundle);
    window.push(&FakePlatform::default()).unwrap();

    let mut face = Framebuffer::new();
    window.render(&mut face, Dirty::all()).unwrap();

    let mut background = Framebuffer::new();
    let raw = bundle.borrow_mut().load_bitmap(ResourceId::Cloudface).unwrap();
    embedded_graphics::image::Image::new(&raw, Point::zero())
        .draw(&mut background)
        .unwrap();
    bundle.borrow_mut().release(ResourceId::Cloudface);

    for y in 0..168 {
        for x in 0..144 {
            if !inside_any_label(x, y) {
                assert_eq!(face.pixel(x, y), background.pixel(x, y), "({x}, {y})");
            }
        }
    }
}

#[test]
fn incremental_render_matches_full_render() {
    let bundle = RefCell::new(BundledAssets::new());
    let mut window = MainWindow::new(&bundle);
    window.push(&FakePlatform::default()).unwrap();

    let mut face = Framebuffer::new();
    window.render(&mut face, Dirty::all()).unwrap();

    for event in [
        Event::Battery(BatteryChargeState {
            charge_percent: 100,
            ..Default::default()
        }),
        Event::Connectivity(false),
        Event::MinuteTick {
            time: at(23, 59),
            style: ClockStyle::TwentyFourHour,
        },
    ] {
        let dirty = window.dispatch(&event).unwrap();
        window.render(&mut face, dirty).unwrap();
    }

    let expected = FakePlatform {
        now: at(23, 59),
        connected: false,
        charge_percent: 100,
        ..Default::default()
    };
    let other_bundle = RefCell::new(BundledAssets::new());
    let fresh = Watchface::load(&other_bundle, &expected).unwrap();
    let mut reference = Framebuffer::new();
    fresh.render_full(&mut reference).unwrap();

    assert_eq!(face.as_bytes(), reference.as_bytes());
}

#[test]
fn battery_redraw_stays_inside_its_frame() {
    let bundle = RefCell::new(BundledAssets::new());
    let mut window = MainWindow::new(&bundle);
    window.push(&FakePlatform::default()).unwrap();

    let mut face = Framebuffer::new();
    window.render(&mut face, Dirty::only(Field::Battery)).unwrap();

    let frame = layout::BATTERY.frame;
    let mut inked = 0;
    for y in 0..168 {
        for x in 0..144 {
            let on = face.pixel(x, y) == Some(BinaryColor::On);
            if frame.contains(Point::new(x, y)) {
                inked += on as usize;
            } else {
                assert!(!on, "pixel ({x}, {y}) drawn outside the battery frame");
            }
        }
    }
    assert!(inked > 0);
}

#[test]
fn error_face_shows_the_failure() {
    let mut face = Framebuffer::new();
    ui::draw_error(&mut face, &Error::ResourceMissing(ResourceId::Cherl26)).unwrap();
    assert!(face.colors().any(|c| c == BinaryColor::On));
}
