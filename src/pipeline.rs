//! Per-pixel transform passes.
//!
//! Both passes are pure maps: every output pixel depends only on the input
//! pixel at the same coordinate. With the `parallel` feature the output
//! buffer is split into rows and filled by rayon workers; the rows are
//! disjoint, so no synchronization is needed.

use image::{Pixel, RgbaImage};
use tracing::debug;

use crate::color::{is_similar, Color, Threshold, BLACK, TRANSPARENT, WHITE};
use crate::selector::BackgroundSelector;

/// Bytes per RGBA8 pixel.
const CHANNELS: usize = 4;

/// Options controlling background removal.
///
/// The default removes white backgrounds with a threshold of 30 channel
/// units and no inversion.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Similarity threshold, shared by the removal and inversion passes.
    pub threshold: Threshold,
    /// Which color to treat as background.
    pub background: BackgroundSelector,
    /// Swap near-black and near-white pixels after removal.
    pub invert: bool,
    /// Enable verbose logging.
    pub verbose: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Make every pixel similar to the selected background color transparent.
///
/// Returns a new image of the same dimensions. Each output pixel is either
/// exactly [`TRANSPARENT`] or a copy of the input pixel.
#[must_use]
pub fn remove_background(
    image: &RgbaImage,
    threshold: Threshold,
    background: BackgroundSelector,
) -> RgbaImage {
    let reference = background.reference_color();
    debug!(
        width = image.width(),
        height = image.height(),
        threshold = threshold.get(),
        %background,
        "removing background"
    );

    map_pixels(image, |px| {
        if is_similar(px, reference, threshold) {
            TRANSPARENT
        } else {
            px
        }
    })
}

/// Swap near-white and near-black pixels, leaving transparent pixels alone.
///
/// The white check runs first, so a pixel similar to both (only possible with
/// a very large threshold) becomes [`BLACK`].
#[must_use]
pub fn invert_black_white(image: &RgbaImage, threshold: Threshold) -> RgbaImage {
    debug!(
        width = image.width(),
        height = image.height(),
        threshold = threshold.get(),
        "inverting black and white"
    );

    map_pixels(image, |px| {
        if px[3] == 0 {
            px
        } else if is_similar(px, WHITE, threshold) {
            BLACK
        } else if is_similar(px, BLACK, threshold) {
            WHITE
        } else {
            px
        }
    })
}

/// Run background removal, then inversion when `opts.invert` is set.
#[must_use]
pub fn process(image: &RgbaImage, opts: &ProcessOptions) -> RgbaImage {
    let removed = remove_background(image, opts.threshold, opts.background);
    if opts.invert {
        invert_black_white(&removed, opts.threshold)
    } else {
        removed
    }
}

/// Build a same-sized image by applying `f` to every pixel.
fn map_pixels<F>(image: &RgbaImage, f: F) -> RgbaImage
where
    F: Fn(Color) -> Color + Sync,
{
    let (width, height) = image.dimensions();
    // Zeroed, which is TRANSPARENT; every byte is overwritten below.
    let mut out = RgbaImage::new(width, height);
    if width == 0 || height == 0 {
        return out;
    }

    let stride = width as usize * CHANNELS;

    #[cfg(feature = "parallel")]
    map_rows_parallel(image.as_raw(), &mut out, stride, &f);

    #[cfg(not(feature = "parallel"))]
    map_rows_sequential(image.as_raw(), &mut out, stride, &f);

    out
}

#[cfg(feature = "parallel")]
fn map_rows_parallel<F>(src: &[u8], dst: &mut [u8], stride: usize, f: &F)
where
    F: Fn(Color) -> Color + Sync,
{
    use rayon::prelude::*;
    dst.par_chunks_mut(stride)
        .zip(src.par_chunks(stride))
        .for_each(|(row_out, row_in)| map_row(row_in, row_out, f));
}

#[cfg(any(test, not(feature = "parallel")))]
fn map_rows_sequential<F>(src: &[u8], dst: &mut [u8], stride: usize, f: &F)
where
    F: Fn(Color) -> Color,
{
    dst.chunks_mut(stride)
        .zip(src.chunks(stride))
        .for_each(|(row_out, row_in)| map_row(row_in, row_out, f));
}

fn map_row<F>(row_in: &[u8], row_out: &mut [u8], f: &F)
where
    F: Fn(Color) -> Color,
{
    for (src, dst) in row_in
        .chunks_exact(CHANNELS)
        .zip(row_out.chunks_exact_mut(CHANNELS))
    {
        dst.copy_from_slice(f(*Color::from_slice(src)).channels());
    }
}
