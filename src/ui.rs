//! The watchface screen.
//!
//! [`Watchface`] is the per-screen context: it holds the background and
//! the three fonts on loan from the resource bundle, and the text of the
//! four labels. It is built on load, handed to every event handler, and
//! dropped on unload, which returns every resource to the bundle.

use core::cell::RefCell;
use core::fmt::Write;

use embedded_graphics::{
    image::Image,
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text, TextStyleBuilder},
};

use crate::error::{Error, Result};
use crate::layout::{self, LabelSpec, LABELS};
use crate::platform::Platform;
use crate::resources::{Bitmap, Font, ResourceBundle, ResourceId, Scoped};
use crate::state::{Dirty, Event, FaceState, Field};

/// Characters per line of the error face.
const ERROR_LINE_CHARS: usize = 24;

/// Room for the longest error message.
const ERROR_TEXT_LEN: usize = 96;

/// A loaded watchface.
pub struct Watchface<'b, B: ResourceBundle> {
    background: Scoped<'b, B, Bitmap>,
    time_font: Scoped<'b, B, Font>,
    date_font: Scoped<'b, B, Font>,
    /// Shared by the Bluetooth and battery labels
    status_font: Scoped<'b, B, Font>,
    state: FaceState,
}

impl<'b, B: ResourceBundle> Watchface<'b, B> {
    /// Acquire resources and populate every label from the platform.
    ///
    /// A missing resource aborts the load; whatever was acquired before the
    /// failure is released on the way out.
    pub fn load<P: Platform>(bundle: &'b RefCell<B>, platform: &P) -> Result<Self> {
        let background = Scoped::bitmap(bundle, ResourceId::Cloudface)?;
        let time_font = Scoped::font(bundle, layout::TIME.font)?;
        let date_font = Scoped::font(bundle, layout::DATE.font)?;
        let status_font = Scoped::font(bundle, layout::BLUETOOTH.font)?;
        let state = FaceState::from_platform(platform)?;
        info!(
            "watchface loaded: {} {} {} {}",
            state.time.as_str(),
            state.date.as_str(),
            state.bluetooth,
            state.battery.as_str()
        );

        Ok(Self {
            background,
            time_font,
            date_font,
            status_font,
            state,
        })
    }

    /// Release all resources.
    pub fn unload(self) {
        info!("watchface unloaded");
    }

    pub fn state(&self) -> &FaceState {
        &self.state
    }

    /// Text shown by a label.
    pub fn text(&self, field: Field) -> &str {
        self.state.text(field)
    }

    /// Apply an event to the labels.
    pub fn handle(&mut self, event: &Event) -> Result<Dirty> {
        let dirty = self.state.apply(event)?;
        debug!("event handled, {} label(s) changed", dirty.len());
        Ok(dirty)
    }

    fn font(&self, field: Field) -> Font {
        match field {
            Field::Time => *self.time_font,
            Field::Date => *self.date_font,
            Field::Bluetooth | Field::Battery => *self.status_font,
        }
    }

    /// Draw the whole face: background, then every label.
    pub fn render_full<D>(&self, target: &mut D) -> core::result::Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        Image::new(&*self.background, Point::zero()).draw(target)?;
        for spec in &LABELS {
            self.draw_label(target, spec)?;
        }
        Ok(())
    }

    /// Redraw only the labels in `dirty`, plus any label whose frame
    /// overlaps one being redrawn.
    pub fn render<D>(&self, target: &mut D, dirty: Dirty) -> core::result::Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        if dirty == Dirty::all() {
            return self.render_full(target);
        }
        let dirty = with_overlaps(dirty);

        // All backgrounds first so no restored frame erases fresh text.
        for spec in LABELS.iter().filter(|spec| dirty.contains(spec.field)) {
            Image::new(&*self.background, Point::zero()).draw(&mut target.clipped(&spec.frame))?;
        }
        for spec in LABELS.iter().filter(|spec| dirty.contains(spec.field)) {
            self.draw_label(target, spec)?;
        }
        Ok(())
    }

    fn draw_label<D>(&self, target: &mut D, spec: &LabelSpec) -> core::result::Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let character_style = MonoTextStyle::new(self.font(spec.field), BinaryColor::On);
        let text_style = TextStyleBuilder::new()
            .alignment(spec.alignment)
            .baseline(Baseline::Top)
            .build();
        Text::with_text_style(
            self.text(spec.field),
            spec.anchor(),
            character_style,
            text_style,
        )
        .draw(&mut target.clipped(&spec.frame))?;
        Ok(())
    }
}

/// Grow `dirty` until no clean label overlaps a dirty one.
fn with_overlaps(mut dirty: Dirty) -> Dirty {
    loop {
        let mut grown = dirty;
        for field in dirty {
            let frame = layout::label(field).frame;
            for spec in &LABELS {
                if !spec.frame.intersection(&frame).is_zero_sized() {
                    grown |= spec.field;
                }
            }
        }
        if grown == dirty {
            return dirty;
        }
        dirty = grown;
    }
}

/// Default screen shown when the watchface cannot be loaded.
pub fn draw_error<D>(target: &mut D, error: &Error) -> core::result::Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    target.clear(BinaryColor::Off)?;
    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

    Text::with_baseline("ERROR", Point::new(0, 0), style, Baseline::Top).draw(target)?;

    let mut message: heapless::String<ERROR_TEXT_LEN> = heapless::String::new();
    // On overflow the text stops after the last piece that fit.
    let _ = write!(message, "{}", error);
    for (row, line) in message.as_bytes().chunks(ERROR_LINE_CHARS).enumerate() {
        let line = core::str::from_utf8(line).unwrap_or("?");
        let y = 20 + row as i32 * 12;
        Text::with_baseline(line, Point::new(0, y), style, Baseline::Top).draw(target)?;
    }
    Ok(())
}
