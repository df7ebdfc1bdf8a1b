//! Validation of textual request parameters.
//!
//! Front ends (an upload form, a query string) hand over raw strings. These
//! helpers turn them into typed values before any pixel is touched:
//!
//! - `threshold`: non-negative base-10 integer in wide units (the form sends
//!   its 0-255 slider value multiplied by 256). Anything else is an error.
//! - `backgroundColor`: `"black"` or `"white"`; anything else means white.
//! - `invertColors`: exactly `"true"` enables inversion.

use crate::color::Threshold;
use crate::error::{Error, Result};
use crate::pipeline::ProcessOptions;
use crate::selector::BackgroundSelector;

/// Validated parameters for a single background-removal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestParams {
    /// Similarity threshold in wide units.
    pub threshold: Threshold,
    /// Background color to remove.
    pub background: BackgroundSelector,
    /// Whether to invert black and white after removal.
    pub invert: bool,
}

impl RequestParams {
    /// Validate the three raw form fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidThreshold`] if `threshold` is not a
    /// non-negative integer. The other two fields cannot fail.
    pub fn from_form(threshold: &str, background: &str, invert: &str) -> Result<Self> {
        Ok(Self {
            threshold: parse_threshold(threshold)?,
            background: BackgroundSelector::from_name(background),
            invert: parse_invert_flag(invert),
        })
    }
}

impl From<RequestParams> for ProcessOptions {
    fn from(params: RequestParams) -> Self {
        Self {
            threshold: params.threshold,
            background: params.background,
            invert: params.invert,
            ..Self::default()
        }
    }
}

/// Parse a threshold given in wide units.
///
/// # Errors
///
/// Returns [`Error::InvalidThreshold`] for empty, non-numeric, negative or
/// out-of-range input.
pub fn parse_threshold(value: &str) -> Result<Threshold> {
    // `u32::from_str` accepts a leading '+'; only plain digits are allowed here.
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidThreshold {
            value: value.to_string(),
        });
    }
    value
        .parse::<u32>()
        .map(Threshold::new)
        .map_err(|_| Error::InvalidThreshold {
            value: value.to_string(),
        })
}

/// Interpret an invert flag: only the literal `"true"` enables inversion.
#[must_use]
pub fn parse_invert_flag(value: &str) -> bool {
    value == "true"
}
