//! Display control module for PineTime

use embassy_nrf::{
    gpio::Output,
    peripherals::{P0_14, P0_18, P0_22, P0_23, P0_25, P0_26},
    spim::{self, Spim},
};

use cloudface::{
    config::{FACE_HEIGHT, FACE_WIDTH, LCD_H, LCD_W},
    framebuffer::Framebuffer,
};
use display_interface_spi::SPIInterface;
use embassy_time::Delay;
use embedded_graphics::{
    pixelcolor::{BinaryColor, Rgb565},
    prelude::*,
    primitives::Rectangle,
};
use mipidsi::{models::ST7789, Builder, Orientation};

/// Paper and ink colors of the 1-bit face on the color panel.
const PAPER: Rgb565 = Rgb565::WHITE;
const INK: Rgb565 = Rgb565::BLACK;

/// The face is centered on the square panel.
const FACE_ORIGIN: Point = Point::new(
    (LCD_W as i32 - FACE_WIDTH as i32) / 2,
    (LCD_H as i32 - FACE_HEIGHT as i32) / 2,
);

/// Backlight pins. Active low; each drives the backlight through a
/// different resistor.
pub struct BacklightPins<'a> {
    low: Output<'a, P0_14>,
    mid: Output<'a, P0_22>,
    high: Output<'a, P0_23>,
}

impl<'a> BacklightPins<'a> {
    /// Configure backlight pins on boot
    pub fn init(low: Output<'a, P0_14>, mid: Output<'a, P0_22>, high: Output<'a, P0_23>) -> Self {
        Self { low, mid, high }
    }

    /// Fixed medium brightness.
    fn on(&mut self) {
        self.low.set_high();
        self.mid.set_low();
        self.high.set_high();
    }
}

type Lcd<'a, SPI> = mipidsi::Display<
    SPIInterface<Spim<'a, SPI>, Output<'a, P0_18>, Output<'a, P0_25>>,
    ST7789,
    Output<'a, P0_26>,
>;

pub struct Display<SPI>
where
    SPI: spim::Instance,
{
    lcd: Lcd<'static, SPI>,
    /// Held so the backlight stays on
    _backlight: BacklightPins<'static>,
}

impl<SPI> Display<SPI>
where
    SPI: spim::Instance,
{
    /// Configure the LCD on boot and paint it blank.
    pub fn init(
        spim: Spim<'static, SPI>,
        cs_pin: Output<'static, P0_25>,
        dc_pin: Output<'static, P0_18>,
        rst_pin: Output<'static, P0_26>,
        mut backlight: BacklightPins<'static>,
    ) -> Result<Self, Error> {
        let lcd = Builder::st7789(SPIInterface::new(spim, dc_pin, cs_pin))
            .with_display_size(LCD_W, LCD_H)
            .with_orientation(Orientation::Portrait(false))
            .init(&mut Delay, Some(rst_pin))
            .map_err(|_| Error::Init)?;
        backlight.on();

        let mut display = Self {
            lcd,
            _backlight: backlight,
        };
        display.clear()?;
        Ok(display)
    }

    /// Paint the whole panel with the paper color.
    pub fn clear(&mut self) -> Result<(), Error> {
        self.lcd.clear(PAPER).map_err(|_| Error::Bus)
    }

    /// Copy the face onto the panel.
    pub fn flush(&mut self, face: &Framebuffer) -> Result<(), Error> {
        let area = Rectangle::new(FACE_ORIGIN, face.size());
        self.lcd
            .fill_contiguous(
                &area,
                face.colors().map(|color| match color {
                    BinaryColor::On => INK,
                    BinaryColor::Off => PAPER,
                }),
            )
            .map_err(|_| Error::Bus)
    }
}

#[derive(Debug, defmt::Format)]
pub enum Error {
    /// Controller did not come up
    Init,
    /// SPI transfer failed
    Bus,
}
