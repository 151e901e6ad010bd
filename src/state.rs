//! Label state and the transitions driven by platform events.
//!
//! Handling an event is a pure update of [`FaceState`] that reports which
//! labels changed; drawing those labels is a separate step.

use chrono::NaiveDateTime;
use enumset::{EnumSet, EnumSetType};

use crate::battery::BatteryChargeState;
use crate::error::Result;
use crate::format::{self, BatteryText, ClockStyle, DateText, TimeText};
use crate::platform::Platform;

/// The four text fields of the face.
#[derive(EnumSetType, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    Time,
    Date,
    Bluetooth,
    Battery,
}

/// Set of fields whose text changed.
pub type Dirty = EnumSet<Field>;

/// Events delivered by the platform feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// A minute boundary passed. Carries the time and the clock style in
    /// effect when the tick was produced.
    MinuteTick {
        time: NaiveDateTime,
        style: ClockStyle,
    },
    /// Connection to the phone came up or went down.
    Connectivity(bool),
    /// Battery reading changed.
    Battery(BatteryChargeState),
}

impl Event {
    /// A minute tick for the platform's current time and clock style.
    pub fn tick_now<P: Platform>(platform: &P) -> Self {
        Event::MinuteTick {
            time: platform.now(),
            style: platform.clock_style(),
        }
    }
}

/// Text currently shown by each label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceState {
    pub time: TimeText,
    pub date: DateText,
    pub bluetooth: &'static str,
    pub battery: BatteryText,
}

impl FaceState {
    /// Populate every field from live platform queries.
    pub fn from_platform<P: Platform>(platform: &P) -> Result<Self> {
        let mut state = Self {
            time: TimeText::new(),
            date: DateText::new(),
            bluetooth: "",
            battery: BatteryText::new(),
        };
        state.apply(&Event::tick_now(platform))?;
        state.apply(&Event::Connectivity(platform.bluetooth_connected()))?;
        state.apply(&Event::Battery(platform.battery_state()))?;
        Ok(state)
    }

    /// Apply an event and report the fields whose text changed.
    pub fn apply(&mut self, event: &Event) -> Result<Dirty> {
        let mut dirty = Dirty::empty();
        match event {
            Event::MinuteTick { time, style } => {
                let text = format::format_time(time, *style)?;
                if text != self.time {
                    self.time = text;
                    dirty |= Field::Time;
                }
                let text = format::format_date(time)?;
                if text != self.date {
                    self.date = text;
                    dirty |= Field::Date;
                }
            }
            Event::Connectivity(connected) => {
                let text = format::bluetooth_text(*connected);
                if text != self.bluetooth {
                    self.bluetooth = text;
                    dirty |= Field::Bluetooth;
                }
            }
            Event::Battery(state) => {
                let text = format::format_battery(state.charge_percent)?;
                if text != self.battery {
                    self.battery = text;
                    dirty |= Field::Battery;
                }
            }
        }
        Ok(dirty)
    }

    /// Text of a single field.
    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::Time => self.time.as_str(),
            Field::Date => self.date.as_str(),
            Field::Bluetooth => self.bluetooth,
            Field::Battery => self.battery.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tick(h: u32, m: u32) -> Event {
        Event::MinuteTick {
            time: NaiveDate::from_ymd_opt(2024, 3, 7)
                .unwrap()
                .and_hms_opt(h, m, 0)
                .unwrap(),
            style: ClockStyle::TwentyFourHour,
        }
    }

    fn blank() -> FaceState {
        FaceState {
            time: TimeText::new(),
            date: DateText::new(),
            bluetooth: "",
            battery: BatteryText::new(),
        }
    }

    #[test]
    fn first_tick_dirties_time_and_date() {
        let mut state = blank();
        let dirty = state.apply(&tick(8, 15)).unwrap();
        assert_eq!(dirty, Field::Time | Field::Date);
        assert_eq!(state.text(Field::Time), "08:15");
        assert_eq!(state.text(Field::Date), "Mar  7");
    }

    #[test]
    fn next_minute_leaves_date_clean() {
        let mut state = blank();
        state.apply(&tick(8, 15)).unwrap();
        let dirty = state.apply(&tick(8, 16)).unwrap();
        assert_eq!(dirty, Dirty::only(Field::Time));
    }

    #[test]
    fn connectivity_is_idempotent() {
        let mut state = blank();
        assert_eq!(
            state.apply(&Event::Connectivity(true)).unwrap(),
            Dirty::only(Field::Bluetooth)
        );
        assert_eq!(state.text(Field::Bluetooth), "BT");
        assert!(state.apply(&Event::Connectivity(true)).unwrap().is_empty());
        assert_eq!(
            state.apply(&Event::Connectivity(false)).unwrap(),
            Dirty::only(Field::Bluetooth)
        );
        assert_eq!(state.text(Field::Bluetooth), "No BT");
    }

    #[test]
    fn battery_only_dirty_on_new_percentage() {
        let mut state = blank();
        let reading = BatteryChargeState {
            charge_percent: 7,
            ..Default::default()
        };
        assert_eq!(
            state.apply(&Event::Battery(reading)).unwrap(),
            Dirty::only(Field::Battery)
        );
        assert_eq!(state.text(Field::Battery), "7");

        // Plugging in changes the record but not the text.
        let plugged = BatteryChargeState {
            is_plugged: true,
            ..reading
        };
        assert!(state.apply(&Event::Battery(plugged)).unwrap().is_empty());
    }
}
