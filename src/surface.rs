//! Minimal pixel-drawing capability
//!
//! [`PixelSurface`] is what a shape or text renderer needs from a display:
//! a way to set one pixel and the size of the drawable area. It knows nothing
//! about bit packing, rotation or the bus, so renderers can be swapped without
//! touching the driver.
//!
//! ## Example
//!
//! ```
//! use sharpmem::PixelSurface;
//!
//! /// Draw a horizontal line, clipped by the surface
//! fn hline<S: PixelSurface>(surface: &mut S, x0: i16, x1: i16, y: i16) {
//!     for x in x0..=x1 {
//!         surface.set_pixel(x, y, false);
//!     }
//! }
//! ```

/// A 1-bit drawable area
///
/// Coordinates are in the rotated (logical) frame: `(0, 0)` is the top-left
/// corner as the viewer sees it. Writes outside
/// `[0, width) x [0, height)` are ignored.
pub trait PixelSurface {
    /// Set (`on = true`, white) or clear (`on = false`, black) one pixel
    fn set_pixel(&mut self, x: i16, y: i16, on: bool);

    /// Width of the drawable area in pixels
    fn width(&self) -> u16;

    /// Height of the drawable area in pixels
    fn height(&self) -> u16;

    /// Set every pixel of the area
    fn fill(&mut self, on: bool) {
        for y in 0..self.height() {
            for x in 0..self.width() {
                self.set_pixel(x as i16, y as i16, on);
            }
        }
    }
}
