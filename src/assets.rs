//! Resources packaged with the firmware image.
//!
//! The face was drawn for three custom TrueType faces; on this device they
//! are stood in for by ProFont bitmap fonts of matching weight.

use embedded_graphics::image::ImageRaw;
use embedded_graphics::pixelcolor::BinaryColor;
use profont::{PROFONT_18_POINT, PROFONT_24_POINT, PROFONT_9_POINT};

use crate::config::FACE_WIDTH;
use crate::error::{Error, Result};
use crate::resources::{Bitmap, Font, ResourceBundle, ResourceId};

/// 144x168, 1 bit per pixel, rows MSB first. A set bit is ink.
static CLOUDFACE: &[u8] = include_bytes!("../assets/cloudface.raw");

/// The resource set compiled into the image.
///
/// Nothing here is heap allocated; the bundle only keeps count of
/// outstanding loans so a double release shows up in the log.
#[derive(Default)]
pub struct BundledAssets {
    loans: [u8; ResourceId::ALL.len()],
}

impl BundledAssets {
    pub const fn new() -> Self {
        Self {
            loans: [0; ResourceId::ALL.len()],
        }
    }

    /// Number of resources currently handed out.
    pub fn outstanding(&self) -> usize {
        self.loans.iter().map(|&n| n as usize).sum()
    }

    fn lend(&mut self, id: ResourceId) {
        let slot = &mut self.loans[id as usize];
        *slot = slot.saturating_add(1);
    }
}

impl ResourceBundle for BundledAssets {
    fn load_font(&mut self, id: ResourceId) -> Result<Font> {
        let font = match id {
            ResourceId::Cherl44 => &PROFONT_24_POINT,
            ResourceId::Cherl26 => &PROFONT_18_POINT,
            ResourceId::Quirly16 => &PROFONT_9_POINT,
            ResourceId::Cloudface => return Err(Error::ResourceMissing(id)),
        };
        self.lend(id);
        Ok(font)
    }

    fn load_bitmap(&mut self, id: ResourceId) -> Result<Bitmap> {
        match id {
            ResourceId::Cloudface => {
                self.lend(id);
                Ok(ImageRaw::<BinaryColor>::new(CLOUDFACE, FACE_WIDTH))
            }
            _ => Err(Error::ResourceMissing(id)),
        }
    }

    fn release(&mut self, id: ResourceId) {
        let slot = &mut self.loans[id as usize];
        if *slot == 0 {
            warn!("release of {:?} which is not on loan", id);
            return;
        }
        *slot -= 1;
    }
}
