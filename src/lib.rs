//! Sharp Memory LCD Driver
//!
//! A driver for Sharp memory-in-pixel LCDs (LS013B7DH03, LS027B7DH01,
//! LS032B7DD02 and friends) with panels up to 255 lines.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 support
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Configurable display dimensions
//! - Bit-packed framebuffer in caller-provided storage
//! - Automatic VCOM inversion on every transaction
//! - Rotation support
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::digital::OutputPin;
//! use embedded_hal::spi::SpiBus;
//! use sharpmem::{Builder, Dimensions, Display, Interface, PixelSurface, Rotation};
//!
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiBus for MockSpi {
//! #     fn read(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn write(&mut self, _words: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # let spi = MockSpi;
//! # let cs = MockPin;
//! let interface = Interface::new(spi, cs);
//! let dims = match Dimensions::new(400, 240) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! let config = match Builder::new().dimensions(dims).rotation(Rotation::Rotate180).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut display = Display::new(interface, config, [0u8; 400 * 240 / 8]);
//! let _ = display.init();
//!
//! display.set_pixel(0, 0, false);
//! let _ = display.refresh();
//!
//! // Keep the panel healthy between refreshes
//! let _ = display.toggle_vcom();
//! ```

#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

/// Pixel color for monochrome memory LCDs
pub mod color;
/// Memory LCD command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Bit-packed pixel storage
pub mod framebuffer;
/// Hardware interface abstraction
pub mod interface;
/// Transaction framing
pub mod protocol;
/// Coordinate rotation utilities
pub mod rotation;
/// Minimal pixel-drawing capability
pub mod surface;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

pub use color::Color;
pub use command::Vcom;
pub use config::{Builder, Config, Dimensions, Rotation};
pub use display::{Display, TransactionState};
pub use error::{BuilderError, Error, MAX_LINES};
pub use framebuffer::Framebuffer;
pub use interface::InterfaceError;
pub use interface::{BitOrder, DisplayInterface, Interface};
pub use protocol::RefreshFrame;
pub use surface::PixelSurface;
