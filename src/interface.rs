//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`Interface`] struct
//! for talking to a Sharp Memory LCD over SPI.
//!
//! ## Hardware Requirements
//!
//! The panel requires:
//! - SPI bus (SI + SCLK), mode 0, at or below the panel's rated clock
//!   (1-2 MHz for most parts)
//! - 1 GPIO pin:
//!   - **SCS**: Chip select (output, active **high**)
//!
//! Memory LCDs shift data least-significant-bit first. Configure the bus for
//! LSB-first transfers, or use [`Interface::with_bit_order`] with
//! [`BitOrder::MsbFirst`] so the interface reverses each byte in software.
//!
//! The DISP (display on/off) and EXTCOMIN pins are board concerns and are not
//! driven by this crate.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::digital::OutputPin;
//! use embedded_hal::spi::SpiBus;
//! use sharpmem::{DisplayInterface, Interface};
//! # use core::convert::Infallible;
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
//! // Create interface with SPI bus and chip-select pin
//! let mut interface = Interface::new(MockSpi, MockPin);
//!
//! // Send an all-clear frame by hand
//! let _ = interface.select();
//! let _ = interface.write(&[0x04, 0x00]);
//! let _ = interface.deselect();
//! ```

use core::fmt::Debug;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Bytes bit-reversed on the stack per bus write on an MSB-first bus
const REVERSE_CHUNK: usize = 64;

/// Trait for the transport to a memory LCD
///
/// This trait abstracts over different hardware implementations,
/// allowing the [`Display`](crate::display::Display) to work with any
/// SPI + GPIO implementation.
///
/// ## Implementing
///
/// For most cases, use the provided [`Interface`] struct. Implement this
/// trait yourself for buses with a hardware-managed chip select, or to record
/// traffic in tests.
pub trait DisplayInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Assert chip select, opening a transaction
    ///
    /// # Errors
    ///
    /// Returns an error if the GPIO fails.
    #[allow(clippy::type_complexity)]
    fn select(&mut self) -> InterfaceResult<(), Self::Error>;

    /// Deassert chip select, closing a transaction
    ///
    /// Implementations must make sure every byte has left the bus before
    /// releasing the line.
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    #[allow(clippy::type_complexity)]
    fn deselect(&mut self) -> InterfaceResult<(), Self::Error>;

    /// Shift one byte out
    ///
    /// The byte clocked back in is returned; memory LCDs have no data out,
    /// so the driver ignores it.
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails.
    #[allow(clippy::type_complexity)]
    fn transfer(&mut self, byte: u8) -> InterfaceResult<u8, Self::Error>;

    /// Shift a run of bytes out
    ///
    /// Defaults to one [`transfer`](Self::transfer) per byte.
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails.
    #[allow(clippy::type_complexity)]
    fn write(&mut self, bytes: &[u8]) -> InterfaceResult<(), Self::Error> {
        for byte in bytes {
            self.transfer(*byte)?;
        }
        Ok(())
    }
}

/// Errors that can occur at the interface level
///
/// Generic over SPI and GPIO error types.
#[derive(Debug)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// SPI communication error
    Spi(SpiErr),
    /// GPIO pin error
    Pin(PinErr),
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI error: {e:?}"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// Bit order the SPI bus shifts bytes out in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BitOrder {
    /// Bus is configured LSB-first; bytes are sent as is
    #[default]
    LsbFirst,
    /// Bus can only shift MSB-first; bytes are bit-reversed before sending
    MsbFirst,
}

/// Hardware interface implementation for memory LCDs
///
/// Implements [`DisplayInterface`] for an embedded-hal v1.0 [`SpiBus`] plus
/// an [`OutputPin`] driving SCS. A [`SpiBus`] is used rather than a
/// `SpiDevice` because SCS is active high, which shared-bus device drivers
/// do not support.
///
/// ## Type Parameters
///
/// * `SPI` - SPI bus implementing [`SpiBus`]
/// * `CS` - Chip-select pin implementing [`OutputPin`]
pub struct Interface<SPI, CS> {
    /// SPI bus for communication
    spi: SPI,
    /// Chip select pin
    cs: CS,
    /// Chip select polarity (true = active high)
    cs_active_high: bool,
    /// Bit order the bus is configured for
    bit_order: BitOrder,
}

impl<SPI, CS> Interface<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    /// Create a new Interface for an LSB-first bus
    ///
    /// # Arguments
    ///
    /// * `spi` - SPI bus (must implement [`SpiBus`])
    /// * `cs` - Chip-select pin (output, active high)
    pub fn new(spi: SPI, cs: CS) -> Self {
        Self::with_bit_order(spi, cs, BitOrder::LsbFirst)
    }

    /// Create a new Interface for a bus with the given bit order
    pub fn with_bit_order(spi: SPI, cs: CS, bit_order: BitOrder) -> Self {
        Self {
            spi,
            cs,
            cs_active_high: true,
            bit_order,
        }
    }

    /// Set chip-select polarity
    ///
    /// Default is active-high, as the panel expects. Set to false when SCS
    /// goes through an inverting level shifter.
    pub fn set_cs_active_high(&mut self, active_high: bool) -> &mut Self {
        self.cs_active_high = active_high;
        self
    }

    /// Get chip-select polarity (true = active high)
    pub fn cs_active_high(&self) -> bool {
        self.cs_active_high
    }

    /// Get the configured bus bit order
    pub fn bit_order(&self) -> BitOrder {
        self.bit_order
    }

    /// Release the bus and pin
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }

    fn wire_byte(&self, byte: u8) -> u8 {
        match self.bit_order {
            BitOrder::LsbFirst => byte,
            BitOrder::MsbFirst => byte.reverse_bits(),
        }
    }

    fn drive_cs(&mut self, active: bool) -> Result<(), CS::Error> {
        if active == self.cs_active_high {
            self.cs.set_high()
        } else {
            self.cs.set_low()
        }
    }
}

impl<SPI, CS> DisplayInterface for Interface<SPI, CS>
where
    SPI: SpiBus,
    SPI::Error: Debug,
    CS: OutputPin,
    CS::Error: Debug,
{
    type Error = InterfaceError<SPI::Error, CS::Error>;

    fn select(&mut self) -> InterfaceResult<(), Self::Error> {
        self.drive_cs(true).map_err(InterfaceError::Pin)
    }

    fn deselect(&mut self) -> InterfaceResult<(), Self::Error> {
        self.spi.flush().map_err(InterfaceError::Spi)?;
        self.drive_cs(false).map_err(InterfaceError::Pin)
    }

    fn transfer(&mut self, byte: u8) -> InterfaceResult<u8, Self::Error> {
        let mut word = [self.wire_byte(byte)];
        self.spi
            .transfer_in_place(&mut word)
            .map_err(InterfaceError::Spi)?;
        Ok(self.wire_byte(word[0]))
    }

    fn write(&mut self, bytes: &[u8]) -> InterfaceResult<(), Self::Error> {
        match self.bit_order {
            BitOrder::LsbFirst => self.spi.write(bytes).map_err(InterfaceError::Spi),
            BitOrder::MsbFirst => {
                let mut chunk = [0u8; REVERSE_CHUNK];
                for run in bytes.chunks(REVERSE_CHUNK) {
                    let out = &mut chunk[..run.len()];
                    for (dst, src) in out.iter_mut().zip(run) {
                        *dst = src.reverse_bits();
                    }
                    self.spi.write(out).map_err(InterfaceError::Spi)?;
                }
                Ok(())
            }
        }
    }
}
