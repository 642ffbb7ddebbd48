//! Graphics support via embedded-graphics
//!
//! [`Display`] implements the [`DrawTarget`] trait from the embedded-graphics
//! ecosystem, drawing into its framebuffer with the configured rotation.
//!
//! ## Features
//!
//! - 2D graphics primitives (lines, rectangles, circles, text, etc.)
//! - Image support via embedded-graphics image modules
//! - Rotation support
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_graphics::{
//!     mono_font::{ascii::FONT_6X10, MonoTextStyle},
//!     prelude::*,
//!     primitives::{Circle, PrimitiveStyle, Rectangle},
//!     text::Text,
//! };
//! use sharpmem::{Builder, Color, Dimensions, Display, DisplayInterface};
//! # use core::convert::Infallible;
//! # struct Bus;
//! # impl DisplayInterface for Bus {
//! #     type Error = Infallible;
//! #     fn select(&mut self) -> Result<(), Infallible> { Ok(()) }
//! #     fn deselect(&mut self) -> Result<(), Infallible> { Ok(()) }
//! #     fn transfer(&mut self, _byte: u8) -> Result<u8, Infallible> { Ok(0) }
//! # }
//! # let dims = match Dimensions::new(400, 240) {
//! #     Ok(dims) => dims,
//! #     Err(_) => return,
//! # };
//! # let config = match Builder::new().dimensions(dims).build() {
//! #     Ok(config) => config,
//! #     Err(_) => return,
//! # };
//! let mut display = Display::new(Bus, config, vec![0u8; dims.buffer_size()]);
//!
//! // Clear to white
//! let _ = display.clear(Color::White);
//!
//! // Draw shapes
//! let _ = Rectangle::new(Point::new(10, 10), Size::new(50, 30))
//!     .into_styled(PrimitiveStyle::with_fill(Color::Black))
//!     .draw(&mut display);
//!
//! let _ = Circle::new(Point::new(100, 50), 40)
//!     .into_styled(PrimitiveStyle::with_stroke(Color::Black, 2))
//!     .draw(&mut display);
//!
//! // Draw text
//! let _ = Text::new(
//!     "Hello, Memory LCD!",
//!     Point::new(10, 100),
//!     MonoTextStyle::new(&FONT_6X10, Color::Black),
//! )
//! .draw(&mut display);
//!
//! // Update physical display
//! let _ = display.refresh();
//! ```

use core::convert::Infallible;
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    prelude::Pixel,
};

use crate::color::Color;
use crate::display::Display;
use crate::interface::DisplayInterface;
use crate::surface::PixelSurface;

impl<I, B> DrawTarget for Display<I, B>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let rotation = self.rotation();
        let framebuffer = self.framebuffer_mut();
        for Pixel(Point { x, y }, color) in pixels {
            framebuffer.set_pixel(x, y, color.is_set(), rotation);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        PixelSurface::fill(self, color.is_set());
        Ok(())
    }
}

impl<I, B> OriginDimensions for Display<I, B>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn size(&self) -> Size {
        Size::new(self.width().into(), self.height().into())
    }
}
