//! Sharp Memory LCD command definitions
//!
//! Every transaction starts with a mode byte made of command bits OR'd with
//! the current VCOM level. Memory LCDs have no D/C line: commands, line
//! addresses and pixel data share the same serial stream, framed only by the
//! chip-select (SCS) line.
//!
//! ## Mode Byte Layout
//!
//! | Bit | Meaning                                   |
//! |-----|-------------------------------------------|
//! | 0   | [`WRITE_LINE`] - data update mode         |
//! | 1   | [`VCOM_BIT`] - polarity of the COM signal |
//! | 2   | [`CLEAR_ALL`] - all-clear mode            |
//!
//! A mode byte with neither command bit set is the "display mode" (no memory
//! change), used to invert VCOM without touching the panel contents.
//!
//! ## Example
//!
//! ```
//! use sharpmem::command::{self, Vcom};
//!
//! assert_eq!(command::CLEAR_ALL | Vcom::Low.bit(), 0x04);
//! assert_eq!(command::CLEAR_ALL | Vcom::High.bit(), 0x06);
//! assert_eq!(command::WRITE_LINE | Vcom::High.bit(), 0x03);
//! ```

/// Data update mode bit (0x01)
///
/// Followed by one or more `[line address, line data..., trailer]` groups.
pub const WRITE_LINE: u8 = 0x01;

/// VCOM polarity bit (0x02)
pub const VCOM_BIT: u8 = 0x02;

/// All-clear mode bit (0x04)
///
/// Clears the whole panel memory to white. Followed by one trailer byte.
pub const CLEAR_ALL: u8 = 0x04;

/// Display mode (0x00)
///
/// Keeps the panel memory as is; only the VCOM bit is latched.
pub const DISPLAY_MODE: u8 = 0x00;

/// Dummy byte closing a line or a command frame (0x00)
pub const TRAILER: u8 = 0x00;

/// Polarity of the panel's COM signal
///
/// The liquid crystal must never see a DC bias, so the level has to alternate
/// from one transaction to the next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Vcom {
    /// COM low, bit cleared in the mode byte
    Low,
    /// COM high, bit set in the mode byte
    #[default]
    High,
}

impl Vcom {
    /// Bit to OR into a mode byte
    ///
    /// ```
    /// use sharpmem::command::Vcom;
    ///
    /// assert_eq!(Vcom::Low.bit(), 0x00);
    /// assert_eq!(Vcom::High.bit(), 0x02);
    /// ```
    pub const fn bit(self) -> u8 {
        match self {
            Self::Low => 0x00,
            Self::High => VCOM_BIT,
        }
    }

    /// The opposite level
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }

    /// Flip in place
    pub fn toggle(&mut self) {
        *self = self.toggled();
    }
}
