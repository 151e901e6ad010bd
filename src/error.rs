//! Unified error type for the watchface.
//!
//! All variants carry only fixed-size data, so the enum stays `Copy` and
//! needs no allocator.

use crate::resources::ResourceId;

/// Convenience alias used across the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A font or bitmap is not part of the resource bundle. Fatal at load.
    #[error("resource {0:?} is missing from the bundle")]
    ResourceMissing(ResourceId),

    /// Formatted text does not fit the label buffer.
    #[error("label text does not fit its buffer")]
    BufferOverflow,

    /// A date/time payload holds out-of-range fields.
    #[error("invalid timestamp")]
    InvalidTimestamp,

    /// The ADC returned a sample outside the 12-bit range.
    #[error("invalid battery measurement")]
    InvalidMeasurement,

    /// The window is already on screen.
    #[error("window is already loaded")]
    AlreadyLoaded,
}
