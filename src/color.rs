//! Pixel color for monochrome memory LCDs
//!
//! Memory LCDs are reflective: a set bit lets light through to the mirror
//! (white), a cleared bit blocks it (black).
//!
//! | Color | Framebuffer bit |
//! |-------|-----------------|
//! | Black | 0               |
//! | White | 1               |
//!
//! ## Example
//!
//! ```
//! use sharpmem::Color;
//!
//! assert!(Color::White.is_set());
//! assert!(!Color::Black.is_set());
//! assert_eq!(Color::from(true), Color::White);
//! ```

/// Colors a memory LCD pixel can take
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Color {
    /// Black pixel, bit cleared
    Black,
    /// White pixel, bit set (blank panel state)
    #[default]
    White,
}

#[cfg(feature = "graphics")]
impl embedded_graphics_core::prelude::PixelColor for Color {
    type Raw = embedded_graphics_core::pixelcolor::raw::RawU1;
}

#[cfg(feature = "graphics")]
impl From<embedded_graphics_core::pixelcolor::BinaryColor> for Color {
    /// `On` sets the bit (white), matching [`PixelSurface`](crate::PixelSurface)
    fn from(color: embedded_graphics_core::pixelcolor::BinaryColor) -> Self {
        Self::from(color.is_on())
    }
}

#[cfg(feature = "graphics")]
impl From<Color> for embedded_graphics_core::pixelcolor::BinaryColor {
    fn from(color: Color) -> Self {
        if color.is_set() {
            Self::On
        } else {
            Self::Off
        }
    }
}

impl From<bool> for Color {
    fn from(on: bool) -> Self {
        if on { Self::White } else { Self::Black }
    }
}

impl Color {
    /// Value of the framebuffer bit for this color
    pub fn is_set(self) -> bool {
        matches!(self, Self::White)
    }

    /// The other color
    #[must_use]
    pub fn inverse(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }
}
