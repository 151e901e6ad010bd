//! 1-bit framebuffer holding the face between flushes.

use core::convert::Infallible;

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::BinaryColor,
    Pixel,
};

use crate::config::{FACE_HEIGHT, FACE_WIDTH};

const STRIDE: usize = FACE_WIDTH as usize / 8;
const BYTES: usize = STRIDE * FACE_HEIGHT as usize;

/// Face-sized buffer, rows MSB first. A set bit is ink
/// ([`BinaryColor::On`]).
pub struct Framebuffer {
    buf: [u8; BYTES],
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framebuffer {
    pub const fn new() -> Self {
        Self { buf: [0; BYTES] }
    }

    /// Color at `(x, y)`, or `None` outside the face.
    pub fn pixel(&self, x: i32, y: i32) -> Option<BinaryColor> {
        let (index, mask) = Self::locate(x, y)?;
        Some(BinaryColor::from(self.buf[index] & mask != 0))
    }

    /// Every pixel in row-major order.
    pub fn colors(&self) -> impl Iterator<Item = BinaryColor> + '_ {
        (0..FACE_HEIGHT as i32).flat_map(move |y| {
            (0..FACE_WIDTH as i32).map(move |x| self.pixel(x, y).unwrap_or(BinaryColor::Off))
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    fn locate(x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x >= FACE_WIDTH as i32 || y >= FACE_HEIGHT as i32 {
            return None;
        }
        let index = y as usize * STRIDE + x as usize / 8;
        Some((index, 0x80 >> (x % 8)))
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(FACE_WIDTH, FACE_HEIGHT)
    }
}

impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if let Some((index, mask)) = Self::locate(x, y) {
                match color {
                    BinaryColor::On => self.buf[index] |= mask,
                    BinaryColor::Off => self.buf[index] &= !mask,
                }
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let fill = match color {
            BinaryColor::On => 0xFF,
            BinaryColor::Off => 0x00,
        };
        self.buf.fill(fill);
        Ok(())
    }
}
