//! Make a solid white or black background transparent.
//!
//! Every pixel whose red, green and blue channels are all within a threshold
//! of the chosen background color is replaced by fully transparent black.
//! Everything else is copied unchanged. An optional second pass swaps
//! near-white and near-black pixels, which turns dark line art on a white
//! page into light line art on a transparent canvas.
//!
//! # Quick Start
//!
//! ```no_run
//! use remove_background::{process_image, BackgroundSelector, ProcessOptions, Threshold};
//!
//! let img = image::open("scan.jpg").unwrap();
//! let opts = ProcessOptions {
//!     threshold: Threshold::from_channel_units(30),
//!     background: BackgroundSelector::White,
//!     invert: false,
//!     ..ProcessOptions::default()
//! };
//! let out = process_image(&img, &opts);
//! out.save("scan_nobg.png").unwrap();
//! ```
//!
//! # Thresholds
//!
//! Channels are compared in a 16-bit space (`c * 257`). A [`Threshold`] is
//! given in those wide units, or built from the familiar 0-255 scale with
//! [`Threshold::from_channel_units`], which multiplies by 256.
//!
//! # Untrusted input
//!
//! Raw strings from a form or query string go through [`RequestParams`]
//! first; the pixel passes only ever see validated, typed values.
//!
//! ```
//! use remove_background::{RequestParams, ProcessOptions};
//!
//! let params = RequestParams::from_form("7680", "black", "true").unwrap();
//! let opts = ProcessOptions::from(params);
//! assert!(opts.invert);
//! ```

#![deny(missing_docs)]

pub mod color;
mod engine;
pub mod error;
pub mod params;
pub mod pipeline;
mod selector;

pub use color::{is_similar, Color, Threshold, BLACK, TRANSPARENT, WHITE};
pub use engine::{
    default_output_path, is_supported_image, process_directory, process_file, process_image,
    save_image, ProcessOptions, ProcessResult,
};
pub use error::{Error, Result};
pub use params::{parse_invert_flag, parse_threshold, RequestParams};
pub use pipeline::{invert_black_white, remove_background};
pub use selector::BackgroundSelector;
