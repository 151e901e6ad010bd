//! Fixed screen layout of the face.

use embedded_graphics::geometry::{Point, Size};
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::Alignment;

use crate::resources::ResourceId;
use crate::state::Field;

/// Placement of one label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabelSpec {
    pub field: Field,
    pub frame: Rectangle,
    pub alignment: Alignment,
    pub font: ResourceId,
}

impl LabelSpec {
    /// Anchor point for text drawn with a top baseline.
    pub fn anchor(&self) -> Point {
        let Rectangle { top_left, size } = self.frame;
        let x = match self.alignment {
            Alignment::Left => top_left.x,
            Alignment::Center => top_left.x + size.width as i32 / 2,
            Alignment::Right => top_left.x + size.width as i32 - 1,
        };
        Point::new(x, top_left.y)
    }
}

const fn rect(x: i32, y: i32, w: u32, h: u32) -> Rectangle {
    Rectangle::new(Point::new(x, y), Size::new(w, h))
}

pub const TIME: LabelSpec = LabelSpec {
    field: Field::Time,
    frame: rect(0, 107, 144, 50),
    alignment: Alignment::Center,
    font: ResourceId::Cherl44,
};

pub const DATE: LabelSpec = LabelSpec {
    field: Field::Date,
    frame: rect(0, 81, 144, 56),
    alignment: Alignment::Center,
    font: ResourceId::Cherl26,
};

pub const BLUETOOTH: LabelSpec = LabelSpec {
    field: Field::Bluetooth,
    frame: rect(3, 0, 30, 16),
    alignment: Alignment::Left,
    font: ResourceId::Quirly16,
};

pub const BATTERY: LabelSpec = LabelSpec {
    field: Field::Battery,
    frame: rect(115, 0, 29, 16),
    alignment: Alignment::Right,
    font: ResourceId::Quirly16,
};

/// Labels in drawing order.
pub const LABELS: [LabelSpec; 4] = [DATE, TIME, BLUETOOTH, BATTERY];

pub fn label(field: Field) -> &'static LabelSpec {
    match field {
        Field::Time => &TIME,
        Field::Date => &DATE,
        Field::Bluetooth => &BLUETOOTH,
        Field::Battery => &BATTERY,
    }
}
