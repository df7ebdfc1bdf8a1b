//! File-level processing: load, transform, save.

use std::collections::hash_map::{Entry, HashMap};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::pipeline;
pub use crate::pipeline::ProcessOptions;

/// Result of processing a single image file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the processed file.
    pub path: PathBuf,
    /// Where the output was written, if it was.
    pub output: Option<PathBuf>,
    /// Whether processing succeeded.
    pub success: bool,
    /// Human-readable status message.
    pub message: String,
}

impl ProcessResult {
    fn failed(path: &Path, message: String) -> Self {
        warn!(path = %path.display(), "{message}");
        Self {
            path: path.to_path_buf(),
            output: None,
            success: false,
            message,
        }
    }
}

/// Convert a decoded image of any color type to RGBA8 and run the pipeline.
#[must_use]
pub fn process_image(image: &DynamicImage, opts: &ProcessOptions) -> RgbaImage {
    pipeline::process(&image.to_rgba8(), opts)
}

/// Process a single image file: load, remove background, save.
///
/// Refuses to write over the input file. Returns a [`ProcessResult`]
/// indicating success or failure.
#[must_use]
pub fn process_file(input: &Path, output: &Path, opts: &ProcessOptions) -> ProcessResult {
    if is_same_file(input, output) {
        return ProcessResult::failed(
            input,
            format!("Output {} would overwrite the input", output.display()),
        );
    }

    let dyn_img = match image::open(input) {
        Ok(img) => img,
        Err(e) => return ProcessResult::failed(input, format!("Failed to load: {e}")),
    };

    let processed = process_image(&dyn_img, opts);

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                return ProcessResult::failed(
                    input,
                    format!("Failed to create output directory: {e}"),
                );
            }
        }
    }

    if let Err(e) = save_image(&processed, output) {
        return ProcessResult::failed(input, format!("Failed to save: {e}"));
    }

    info!(
        input = %input.display(),
        output = %output.display(),
        width = processed.width(),
        height = processed.height(),
        "background removed"
    );
    ProcessResult {
        path: input.to_path_buf(),
        output: Some(output.to_path_buf()),
        success: true,
        message: "Background removed".to_string(),
    }
}

/// Process all supported images in a directory.
///
/// Each output is written to `output_dir` as `{stem}.png`. Inputs are taken in
/// file name order; when two inputs share a stem, the first keeps the name and
/// the rest fail without writing anything. An output that would replace one
/// of the inputs (for example when `output_dir` is `input_dir`) also fails.
/// Files are processed in parallel when the `parallel` feature is enabled.
#[must_use]
pub fn process_directory(
    input_dir: &Path,
    output_dir: &Path,
    opts: &ProcessOptions,
) -> Vec<ProcessResult> {
    let mut entries: Vec<PathBuf> = match std::fs::read_dir(input_dir) {
        Ok(rd) => rd
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_ok_and(|ft| ft.is_file()))
            .map(|e| e.path())
            .filter(|p| is_supported_image(p))
            .collect(),
        Err(e) => {
            return vec![ProcessResult::failed(
                input_dir,
                format!("Failed to read directory: {e}"),
            )];
        }
    };
    entries.sort();

    if !output_dir.exists() {
        if let Err(e) = std::fs::create_dir_all(output_dir) {
            return vec![ProcessResult::failed(
                output_dir,
                format!("Failed to create output directory: {e}"),
            )];
        }
    }

    let jobs = plan_outputs(&entries, output_dir);
    let run = |(input, output): &Job<'_>| match output {
        Ok(output) => process_file(input, output, opts),
        Err(message) => ProcessResult::failed(input, message.clone()),
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        jobs.par_iter().map(run).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        jobs.iter().map(run).collect()
    }
}

/// An input paired with its output path, or the reason it gets none.
type Job<'a> = (&'a PathBuf, std::result::Result<PathBuf, String>);

/// Assign each input its `{stem}.png` output.
///
/// Rejects a name already claimed by an earlier input, and any output that
/// would land on one of the inputs.
fn plan_outputs<'a>(entries: &'a [PathBuf], output_dir: &Path) -> Vec<Job<'a>> {
    let inputs: HashSet<PathBuf> = entries
        .iter()
        .filter_map(|e| std::fs::canonicalize(e).ok())
        .collect();
    let mut claimed: HashMap<String, &Path> = HashMap::new();

    entries
        .iter()
        .map(|input| {
            let output = match claimed.entry(png_file_name(input)) {
                Entry::Occupied(first) => Err(format!(
                    "Output {} is already taken by {}",
                    first.key(),
                    first.get().display()
                )),
                Entry::Vacant(slot) => {
                    let output = output_dir.join(slot.key());
                    slot.insert(input);
                    if std::fs::canonicalize(&output).is_ok_and(|o| inputs.contains(&o)) {
                        Err(format!("Output {} would overwrite an input", output.display()))
                    } else {
                        Ok(output)
                    }
                }
            };
            (input, output)
        })
        .collect()
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp" | "bmp" | "gif" | "tif" | "tiff"
        ),
        None => false,
    }
}

/// Save an RGBA image in a format chosen by the path's extension.
///
/// Only formats that keep the alpha channel are accepted.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] for unknown extensions and for formats
/// without transparency (JPEG), or an I/O or encoding error if writing fails.
pub fn save_image(img: &RgbaImage, path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    match format {
        ImageFormat::Png | ImageFormat::WebP | ImageFormat::Bmp => {
            img.save_with_format(path, format)?;
        }
        ImageFormat::Jpeg => {
            return Err(Error::UnsupportedFormat(
                "JPEG cannot store transparency".to_string(),
            ));
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    Ok(())
}

/// Generate a default output path from an input path.
///
/// Example: `"photo.jpg"` becomes `"photo_nobg.png"`.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_nobg.png"))
}

fn png_file_name(input: &Path) -> String {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    format!("{stem}.png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Threshold, BLACK, TRANSPARENT, WHITE};
    use crate::selector::BackgroundSelector;

    #[test]
    fn default_output_path_appends_nobg_suffix() {
        let p = default_output_path(Path::new("/tmp/photo.jpg"));
        assert_eq!(p, PathBuf::from("/tmp/photo_nobg.png"));

        let p = default_output_path(Path::new("image.png"));
        assert_eq!(p.file_name().unwrap().to_str().unwrap(), "image_nobg.png");
    }

    #[test]
    fn png_file_name_replaces_extension() {
        assert_eq!(png_file_name(Path::new("in/scan.JPG")), "scan.png");
        assert_eq!(png_file_name(Path::new("logo.png")), "logo.png");
    }

    #[test]
    fn plan_outputs_rejects_shared_stems() {
        let entries = vec![
            PathBuf::from("in/logo.gif"),
            PathBuf::from("in/scan.bmp"),
            PathBuf::from("in/scan.png"),
        ];
        let plan = plan_outputs(&entries, Path::new("out"));

        assert_eq!(plan[0].1, Ok(PathBuf::from("out/logo.png")));
        assert_eq!(plan[1].1, Ok(PathBuf::from("out/scan.png")));
        let err = plan[2].1.as_ref().unwrap_err();
        assert!(err.contains("scan.png"));
        assert!(err.contains("scan.bmp"));
    }

    #[test]
    fn is_supported_image_accepts_common_formats() {
        assert!(is_supported_image(Path::new("photo.jpg")));
        assert!(is_supported_image(Path::new("photo.JPEG")));
        assert!(is_supported_image(Path::new("photo.png")));
        assert!(is_supported_image(Path::new("photo.webp")));
        assert!(is_supported_image(Path::new("photo.bmp")));
        assert!(is_supported_image(Path::new("photo.gif")));
        assert!(is_supported_image(Path::new("photo.TIFF")));
        assert!(is_supported_image(Path::new("photo.tif")));
    }

    #[test]
    fn is_supported_image_rejects_unsupported_formats() {
        assert!(!is_supported_image(Path::new("photo.svg")));
        assert!(!is_supported_image(Path::new("photo.txt")));
        assert!(!is_supported_image(Path::new("photo")));
    }

    #[test]
    fn default_options_remove_white_without_inversion() {
        let opts = ProcessOptions::default();
        assert_eq!(opts.threshold, Threshold::from_channel_units(30));
        assert_eq!(opts.background, BackgroundSelector::White);
        assert!(!opts.invert);
    }

    #[test]
    fn process_image_converts_rgb_input() {
        let mut rgb = image::RgbImage::new(2, 1);
        rgb.put_pixel(0, 0, image::Rgb([255, 255, 255]));
        let out = process_image(&DynamicImage::ImageRgb8(rgb), &ProcessOptions::default());
        assert_eq!(*out.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*out.get_pixel(1, 0), BLACK);
    }

    #[test]
    fn save_image_rejects_jpeg() {
        let img = RgbaImage::from_pixel(1, 1, WHITE);
        let err = save_image(&img, Path::new("out.jpg")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn save_image_rejects_unknown_extension() {
        let img = RgbaImage::from_pixel(1, 1, WHITE);
        assert!(save_image(&img, Path::new("out.xyz")).is_err());
    }
}
