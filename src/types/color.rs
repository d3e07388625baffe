//! Color frame values.

use serde::{Deserialize, Serialize};

use crate::{Result, UnisonError};

/// One full-screen color in an animation sequence.
///
/// Backend documents carry frames as `{r, g, b}` objects with channel
/// values in `[0, 255]`; older documents used `#RRGGBB` strings, handled
/// by [`ColorFrame::from_hex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorFrame {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorFrame {
    /// Black, the resting state between shows.
    pub const BLACK: ColorFrame = ColorFrame { r: 0, g: 0, b: 0 };

    /// Create a color frame from channel values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a legacy `#RRGGBB` (or bare `RRGGBB`) frame string.
    pub fn from_hex(value: &str) -> Result<Self> {
        let hex = value.strip_prefix('#').unwrap_or(value);
        if hex.len() != 6 {
            return Err(UnisonError::document_error(
                "frames",
                format!("invalid hex color: {value}"),
            ));
        }
        let rgb = u32::from_str_radix(hex, 16).map_err(|_| {
            UnisonError::document_error("frames", format!("invalid hex color: {value}"))
        })?;
        Ok(Self { r: (rgb >> 16) as u8, g: (rgb >> 8) as u8, b: rgb as u8 })
    }
}

impl From<[u8; 3]> for ColorFrame {
    fn from(rgb: [u8; 3]) -> Self {
        Self { r: rgb[0], g: rgb[1], b: rgb[2] }
    }
}
