//! Background color selection.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::color::{Color, BLACK, WHITE};

/// Which reference color the removal pass treats as background.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BackgroundSelector {
    /// Remove near-white pixels.
    #[default]
    White,
    /// Remove near-black pixels.
    Black,
}

impl BackgroundSelector {
    /// Resolve a selector name.
    ///
    /// Only the exact, lowercase names `"black"` and `"white"` are recognized.
    /// Anything else, including the empty string, resolves to [`Self::White`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "black" => Self::Black,
            _ => Self::White,
        }
    }

    /// The canonical lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }

    /// The opaque reference color for this selector.
    #[must_use]
    pub const fn reference_color(self) -> Color {
        match self {
            Self::White => WHITE,
            Self::Black => BLACK,
        }
    }
}

impl FromStr for BackgroundSelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl fmt::Display for BackgroundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_exact_names() {
        assert_eq!(BackgroundSelector::from_name("black"), BackgroundSelector::Black);
        assert_eq!(BackgroundSelector::from_name("white"), BackgroundSelector::White);
    }

    #[test]
    fn unrecognized_names_fall_back_to_white() {
        for name in ["", "purple", "Black", "BLACK", " black", "#000000"] {
            assert_eq!(
                BackgroundSelector::from_name(name),
                BackgroundSelector::White,
                "{name:?}"
            );
        }
    }

    #[test]
    fn from_str_never_fails() {
        let sel: BackgroundSelector = "purple".parse().unwrap();
        assert_eq!(sel, BackgroundSelector::default());
    }

    #[test]
    fn reference_colors_are_opaque() {
        assert_eq!(BackgroundSelector::White.reference_color(), WHITE);
        assert_eq!(BackgroundSelector::Black.reference_color(), BLACK);
        assert_eq!(BackgroundSelector::Black.to_string(), "black");
    }
}
