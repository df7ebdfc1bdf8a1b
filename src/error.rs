//! Error types for the remove-background crate.
//!
//! The pixel passes themselves cannot fail; every variant here belongs to the
//! boundary (parameter parsing) or to file I/O around the passes.

/// Errors that can occur while validating parameters or loading and saving images.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A threshold value was not a non-negative integer.
    #[error("invalid threshold {value:?}: expected a non-negative integer")]
    InvalidThreshold {
        /// The raw text that failed to parse.
        value: String,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not supported, or cannot carry transparency.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An error occurred during image processing (load, save, encode).
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io_err.to_string().contains("gone"));

        let unsupported = Error::UnsupportedFormat("Jpeg".to_string());
        assert!(unsupported.to_string().contains("Jpeg"));

        let threshold = Error::InvalidThreshold {
            value: "-12".to_string(),
        };
        let msg = threshold.to_string();
        assert!(msg.contains("\"-12\""));
        assert!(msg.contains("non-negative"));
    }
}
