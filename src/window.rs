//! Window lifecycle and event dispatch.
//!
//! The main window is either unloaded (nothing allocated, feeds inactive)
//! or loaded (watchface live, feeds delivering). Events arriving while
//! unloaded are dropped.

use core::cell::RefCell;

use embedded_graphics::{draw_target::DrawTarget, pixelcolor::BinaryColor};

use crate::error::{Error, Result};
use crate::platform::Platform;
use crate::resources::ResourceBundle;
use crate::state::{Dirty, Event};
use crate::ui::Watchface;

pub struct MainWindow<'b, B: ResourceBundle> {
    bundle: &'b RefCell<B>,
    face: Option<Watchface<'b, B>>,
}

impl<'b, B: ResourceBundle> MainWindow<'b, B> {
    pub fn new(bundle: &'b RefCell<B>) -> Self {
        Self { bundle, face: None }
    }

    /// Show the window: load the face and populate every label from the
    /// platform before the first frame. On failure the window stays
    /// unloaded and nothing is left allocated.
    pub fn push<P: Platform>(&mut self, platform: &P) -> Result<()> {
        if self.face.is_some() {
            return Err(Error::AlreadyLoaded);
        }
        match Watchface::load(self.bundle, platform) {
            Ok(face) => {
                self.face = Some(face);
                Ok(())
            }
            Err(e) => {
                error!("watchface load failed: {}", e);
                Err(e)
            }
        }
    }

    /// Remove the window, releasing everything the face holds. Returns
    /// whether a face was loaded.
    pub fn pop(&mut self) -> bool {
        match self.face.take() {
            Some(face) => {
                face.unload();
                true
            }
            None => false,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.face.is_some()
    }

    pub fn face(&self) -> Option<&Watchface<'b, B>> {
        self.face.as_ref()
    }

    /// Deliver an event to the loaded face.
    pub fn dispatch(&mut self, event: &Event) -> Result<Dirty> {
        match self.face.as_mut() {
            Some(face) => face.handle(event),
            None => {
                trace!("event dropped, window not loaded");
                Ok(Dirty::empty())
            }
        }
    }

    /// Draw the changed labels, or the whole face when `dirty` is full.
    pub fn render<D>(&self, target: &mut D, dirty: Dirty) -> core::result::Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        match &self.face {
            Some(face) if !dirty.is_empty() => face.render(target, dirty),
            _ => Ok(()),
        }
    }
}
