//! Bit-packed 1bpp framebuffer
//!
//! One bit per pixel, lines stored top to bottom, `width / 8` bytes per line.
//! A set bit is a white (reflective) pixel; a cleared bit is black. The blank
//! state of a memory LCD is all white, so a fresh or cleared buffer is all
//! `0xFF`.
//!
//! ## Example
//!
//! ```
//! use sharpmem::{Dimensions, Framebuffer, Rotation};
//!
//! let dims = match Dimensions::new(16, 8) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! let mut fb = match Framebuffer::try_new(dims, [0u8; 16]) {
//!     Ok(fb) => fb,
//!     Err(_) => return,
//! };
//! assert_eq!(fb.get_pixel(0, 0), Some(true));
//!
//! fb.set_pixel(0, 0, false, Rotation::Rotate0);
//! assert_eq!(fb.as_bytes()[0], 0xFE);
//!
//! // Writes outside the panel are ignored
//! fb.set_pixel(-3, 100, false, Rotation::Rotate0);
//! ```

use crate::config::{Dimensions, Rotation};
use crate::error::BuilderError;
use crate::rotation::{apply_rotation, locate};

/// Value of a blank (all white) buffer byte
pub const BLANK: u8 = 0xFF;

/// Framebuffer over caller-provided storage
///
/// `B` is any byte storage (`[u8; N]`, `&mut [u8]`, `Vec<u8>`, ...). Only the
/// first `dimensions.buffer_size()` bytes are used.
#[derive(Debug)]
pub struct Framebuffer<B> {
    dimensions: Dimensions,
    buffer: B,
}

impl<B> Framebuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Wrap `buffer` and clear it to blank
    ///
    /// # Panics
    ///
    /// Panics if `dimensions` fails [`Dimensions::validate`] or `buffer` is
    /// shorter than `dimensions.buffer_size()`.
    pub fn new(dimensions: Dimensions, buffer: B) -> Self {
        assert!(
            dimensions.validate().is_ok(),
            "invalid dimensions {}x{}",
            dimensions.width,
            dimensions.height
        );
        let required = dimensions.buffer_size();
        let provided = buffer.as_ref().len();
        assert!(
            provided >= required,
            "framebuffer too small: required {required} bytes, got {provided}"
        );
        let mut fb = Self { dimensions, buffer };
        fb.clear();
        fb
    }

    /// Wrap `buffer` and clear it to blank
    ///
    /// This is the fallible version of [`new`](Self::new).
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if `dimensions` fails
    /// [`Dimensions::validate`], `BuilderError::BufferTooSmall` if `buffer` is
    /// shorter than `dimensions.buffer_size()`.
    pub fn try_new(dimensions: Dimensions, buffer: B) -> Result<Self, BuilderError> {
        let dimensions = dimensions.validate()?;
        let required = dimensions.buffer_size();
        let provided = buffer.as_ref().len();
        if provided < required {
            return Err(BuilderError::BufferTooSmall { required, provided });
        }
        Ok(Self::new(dimensions, buffer))
    }

    /// Physical dimensions
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Set every pixel to white
    pub fn clear(&mut self) {
        self.fill(true);
    }

    /// Set every pixel to the same value
    pub fn fill(&mut self, on: bool) {
        let value = if on { BLANK } else { 0x00 };
        self.as_bytes_mut().fill(value);
    }

    /// Write one pixel in rotated coordinates
    ///
    /// Off-panel coordinates are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool, rotation: Rotation) {
        let Dimensions { width, height } = self.dimensions;
        if let Some((index, mask)) = apply_rotation(x, y, width, height, rotation) {
            let byte = &mut self.as_bytes_mut()[index];
            if on {
                *byte |= mask;
            } else {
                *byte &= !mask;
            }
        }
    }

    /// Read one pixel in physical coordinates
    ///
    /// Returns `None` for off-panel coordinates.
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<bool> {
        let Dimensions { width, height } = self.dimensions;
        locate(x, y, width, height).map(|(index, mask)| self.as_bytes()[index] & mask != 0)
    }

    /// Packed pixel data, exactly `dimensions.buffer_size()` bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer.as_ref()[..self.dimensions.buffer_size()]
    }

    /// Mutable packed pixel data
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let size = self.dimensions.buffer_size();
        &mut self.buffer.as_mut()[..size]
    }

    /// Give back the underlying storage
    pub fn into_inner(self) -> B {
        self.buffer
    }
}
