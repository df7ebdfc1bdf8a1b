//! Color constants and the similarity test used to classify pixels.
//!
//! Channels are compared in a widened 16-bit space: each 8-bit value `c` is
//! replicated into both bytes (`c * 257`), so `255` maps to `65535`. A
//! [`Threshold`] is expressed in the same wide units.

use image::Rgba;

/// A 4-channel RGBA color with 8-bit channels.
pub type Color = Rgba<u8>;

/// Opaque white, `(255, 255, 255, 255)`.
pub const WHITE: Color = Rgba([255, 255, 255, 255]);

/// Opaque black, `(0, 0, 0, 255)`.
pub const BLACK: Color = Rgba([0, 0, 0, 255]);

/// Fully transparent, `(0, 0, 0, 0)`. Marks removed pixels.
pub const TRANSPARENT: Color = Rgba([0, 0, 0, 0]);

/// Multiplier from channel units (0-255) to wide threshold units.
const CHANNEL_SCALE: u32 = 256;

/// Default threshold in channel units.
const DEFAULT_CHANNEL_THRESHOLD: u32 = 30;

/// Maximum per-channel difference, in wide units, for two colors to be similar.
///
/// Comparison is strict: a difference equal to the threshold does not match,
/// so `Threshold::new(0)` never matches anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Threshold(u32);

impl Threshold {
    /// Create a threshold from a value already in wide (0-65535 channel) units.
    #[must_use]
    pub const fn new(wide: u32) -> Self {
        Self(wide)
    }

    /// Create a threshold from channel units (the familiar 0-255 scale).
    ///
    /// The value is multiplied by 256, saturating at `u32::MAX`.
    #[must_use]
    pub const fn from_channel_units(units: u32) -> Self {
        Self(units.saturating_mul(CHANNEL_SCALE))
    }

    /// The threshold in wide units.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::from_channel_units(DEFAULT_CHANNEL_THRESHOLD)
    }
}

impl From<u32> for Threshold {
    fn from(wide: u32) -> Self {
        Self::new(wide)
    }
}

/// Widen an 8-bit channel into the 16-bit comparison space.
#[must_use]
pub fn widen(channel: u8) -> u32 {
    u32::from(channel) * 0x101
}

/// Whether two colors are the same within `threshold`.
///
/// Red, green and blue are compared independently; alpha is ignored. Each
/// absolute difference must be strictly below the threshold.
#[must_use]
pub fn is_similar(a: Color, b: Color, threshold: Threshold) -> bool {
    a.0[..3]
        .iter()
        .zip(&b.0[..3])
        .all(|(&ca, &cb)| widen(ca).abs_diff(widen(cb)) < threshold.get())
}
