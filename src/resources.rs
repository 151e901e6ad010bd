//! Packaged resources and their lifetimes.
//!
//! A [`ResourceBundle`] hands out fonts and bitmaps by identifier. Every
//! acquisition is wrapped in a [`Scoped`] handle which gives the resource
//! back to the bundle when dropped, so each resource is released exactly
//! once on every exit path, including a load that fails halfway.

use core::cell::RefCell;
use core::ops::Deref;

use embedded_graphics::image::ImageRaw;
use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::pixelcolor::BinaryColor;

use crate::error::Result;

/// Stable identifier of a packaged asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResourceId {
    /// Background image.
    Cloudface,
    /// Large font used by the time label.
    Cherl44,
    /// Medium font used by the date label.
    Cherl26,
    /// Small font shared by the Bluetooth and battery labels.
    Quirly16,
}

impl ResourceId {
    pub const ALL: [ResourceId; 4] = [
        ResourceId::Cloudface,
        ResourceId::Cherl44,
        ResourceId::Cherl26,
        ResourceId::Quirly16,
    ];
}

pub type Font = &'static MonoFont<'static>;
pub type Bitmap = ImageRaw<'static, BinaryColor>;

/// Source of packaged fonts and bitmaps.
pub trait ResourceBundle {
    /// Load a font. Fails with [`Error::ResourceMissing`](crate::Error) if
    /// the bundle does not contain it.
    fn load_font(&mut self, id: ResourceId) -> Result<Font>;

    /// Load a bitmap.
    fn load_bitmap(&mut self, id: ResourceId) -> Result<Bitmap>;

    /// Give a previously loaded resource back.
    fn release(&mut self, id: ResourceId);
}

/// A resource on loan from a bundle, returned on drop.
pub struct Scoped<'b, B: ResourceBundle, T> {
    bundle: &'b RefCell<B>,
    id: ResourceId,
    value: T,
}

impl<'b, B: ResourceBundle> Scoped<'b, B, Font> {
    pub fn font(bundle: &'b RefCell<B>, id: ResourceId) -> Result<Self> {
        let value = bundle.borrow_mut().load_font(id)?;
        trace!("loaded font {:?}", id);
        Ok(Self { bundle, id, value })
    }
}

impl<'b, B: ResourceBundle> Scoped<'b, B, Bitmap> {
    pub fn bitmap(bundle: &'b RefCell<B>, id: ResourceId) -> Result<Self> {
        let value = bundle.borrow_mut().load_bitmap(id)?;
        trace!("loaded bitmap {:?}", id);
        Ok(Self { bundle, id, value })
    }
}

impl<B: ResourceBundle, T> Scoped<'_, B, T> {
    pub fn id(&self) -> ResourceId {
        self.id
    }
}

impl<B: ResourceBundle, T> Deref for Scoped<'_, B, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<B: ResourceBundle, T> Drop for Scoped<'_, B, T> {
    fn drop(&mut self) {
        trace!("releasing {:?}", self.id);
        self.bundle.borrow_mut().release(self.id);
    }
}
