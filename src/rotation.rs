//! Coordinate rotation utilities
//!
//! This module maps logical (rotated) pixel coordinates onto the physical
//! framebuffer, and physical coordinates onto a byte index and bit mask.
//!
//! Memory LCDs shift pixel data least-significant-bit first, so pixel `x` of a
//! line lives in bit `x % 8` of its byte. The SPI bus must be configured
//! LSB-first (or the [`Interface`](crate::Interface) told to reverse bytes),
//! otherwise every 8-pixel group shows up mirrored.
//!
//! ## Rotation Modes
//!
//! With `W` and `H` the physical width and height:
//!
//! - **Rotate0**: identity
//! - **Rotate90**: `(x, y) -> (W - 1 - y, x)`
//! - **Rotate180**: `(x, y) -> (W - 1 - x, H - 1 - y)`
//! - **Rotate270**: `(x, y) -> (y, H - 1 - x)`
//!
//! ## Example
//!
//! ```
//! use sharpmem::{rotation::apply_rotation, Rotation};
//!
//! // Pixel (0,0) is at byte 0, bit 0 (LSB)
//! assert_eq!(apply_rotation(0, 0, 8, 1, Rotation::Rotate0), Some((0, 0x01)));
//!
//! // Pixel (7,0) is at byte 0, bit 7 (MSB)
//! assert_eq!(apply_rotation(7, 0, 8, 1, Rotation::Rotate0), Some((0, 0x80)));
//!
//! // Off-panel coordinates have no location
//! assert_eq!(apply_rotation(-1, 0, 8, 1, Rotation::Rotate0), None);
//! ```

use crate::config::Rotation;

/// Transform logical coordinates into physical ones
///
/// `width` and `height` are the physical (unrotated) dimensions. The result
/// may lie outside the panel; callers clip afterwards. Off-panel inputs always
/// stay off-panel (the subtractions saturate instead of wrapping).
///
/// ```
/// use sharpmem::{rotation::transform, Rotation};
///
/// assert_eq!(transform(0, 0, 128, 64, Rotation::Rotate90), (127, 0));
/// assert_eq!(transform(0, 0, 128, 64, Rotation::Rotate180), (127, 63));
/// assert_eq!(transform(0, 0, 128, 64, Rotation::Rotate270), (0, 63));
/// ```
pub fn transform(x: i32, y: i32, width: u16, height: u16, rotation: Rotation) -> (i32, i32) {
    let w = i32::from(width);
    let h = i32::from(height);
    match rotation {
        Rotation::Rotate0 => (x, y),
        Rotation::Rotate90 => ((w - 1).saturating_sub(y), x),
        Rotation::Rotate180 => ((w - 1).saturating_sub(x), (h - 1).saturating_sub(y)),
        Rotation::Rotate270 => (y, (h - 1).saturating_sub(x)),
    }
}

/// Byte index and bit mask of a physical pixel
///
/// Returns `None` when `(x, y)` is outside `[0, width) x [0, height)`.
pub fn locate(x: i32, y: i32, width: u16, height: u16) -> Option<(usize, u8)> {
    if x < 0 || y < 0 || x >= i32::from(width) || y >= i32::from(height) {
        return None;
    }
    let (x, y) = (x as usize, y as usize);
    let index = (y * width as usize + x) / 8;
    Some((index, 1 << (x % 8)))
}

/// Apply rotation transformation to get buffer index and bit mask
///
/// Converts logical (x, y) coordinates to a physical buffer location
/// `(byte_index, bit_mask)`, or `None` if the pixel is off the panel.
///
/// # Arguments
///
/// * `x` - X coordinate in the rotated frame
/// * `y` - Y coordinate in the rotated frame
/// * `width` - Physical display width in pixels (multiple of 8)
/// * `height` - Physical display height in pixels
/// * `rotation` - Rotation mode
///
/// # Example
///
/// ```
/// use sharpmem::{rotation::apply_rotation, Rotation};
///
/// // 16x16 display at 90° rotation: origin moves to the top-right corner
/// let (idx, bit) = apply_rotation(0, 0, 16, 16, Rotation::Rotate90).unwrap_or_default();
/// assert_eq!(idx, 1);
/// assert_eq!(bit, 0x80);
/// ```
pub fn apply_rotation(
    x: i32,
    y: i32,
    width: u16,
    height: u16,
    rotation: Rotation,
) -> Option<(usize, u8)> {
    let (px, py) = transform(x, y, width, height, rotation);
    locate(px, py, width, height)
}
