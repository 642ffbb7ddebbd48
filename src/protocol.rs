//! Wire framing for memory LCD transactions
//!
//! Everything sent between one chip-select assertion and the next release is
//! a frame. This module builds frames as plain bytes; [`Display`] pushes them
//! through a [`DisplayInterface`] and owns the VCOM state.
//!
//! ## Frames
//!
//! - **All clear**: `[CLEAR_ALL | vcom, 0x00]`
//! - **Display mode** (VCOM inversion only): `[vcom, 0x00]`
//! - **Refresh**: `[WRITE_LINE | vcom, 1]`, then for every line `n` its
//!   `width / 8` data bytes followed by a `0x00` trailer and, unless `n` was
//!   the last line, the address `n + 1`. One more `0x00` closes the frame.
//!
//! For a panel of `W x H` pixels a refresh frame is
//! `W * H / 8 + 2 * H + 2` bytes long.
//!
//! [`Display`]: crate::Display
//! [`DisplayInterface`]: crate::DisplayInterface

use core::iter::FusedIterator;

use crate::command::{CLEAR_ALL, DISPLAY_MODE, TRAILER, Vcom, WRITE_LINE};
use crate::error::MAX_LINES;

/// All-clear frame
///
/// ```
/// use sharpmem::{command::Vcom, protocol::clear_frame};
///
/// assert_eq!(clear_frame(Vcom::Low), [0x04, 0x00]);
/// assert_eq!(clear_frame(Vcom::High), [0x06, 0x00]);
/// ```
pub const fn clear_frame(vcom: Vcom) -> [u8; 2] {
    [CLEAR_ALL | vcom.bit(), TRAILER]
}

/// Display-mode frame, latching a new VCOM level without touching memory
pub const fn display_mode_frame(vcom: Vcom) -> [u8; 2] {
    [DISPLAY_MODE | vcom.bit(), TRAILER]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Command,
    Address(usize),
    Data,
    Trailer { next_line: usize },
    FinalTrailer,
    Done,
}

/// Byte stream of a full-frame refresh
///
/// Yields the exact sequence the panel expects, starting with the mode byte.
/// The stream borrows the pixel data for its lifetime only.
///
/// ```
/// use sharpmem::{command::Vcom, protocol::RefreshFrame};
///
/// // Two lines of 8 pixels
/// let frame: Vec<u8> = RefreshFrame::new(&[0xAA, 0x55], 1, Vcom::Low).collect();
/// assert_eq!(frame, [0x01, 1, 0xAA, 0x00, 2, 0x55, 0x00, 0x00]);
/// ```
#[derive(Clone, Debug)]
pub struct RefreshFrame<'a> {
    data: &'a [u8],
    line_bytes: usize,
    lines: usize,
    mode: u8,
    index: usize,
    line: usize,
    stage: Stage,
}

impl<'a> RefreshFrame<'a> {
    /// Frame `data` as lines of `line_bytes` bytes
    ///
    /// A trailing partial line is not sent. `line_bytes` of zero yields an
    /// empty stream. Line addresses are a single byte, so at most
    /// [`MAX_LINES`] lines are framed and any further data is ignored.
    pub fn new(data: &'a [u8], line_bytes: usize, vcom: Vcom) -> Self {
        let lines = data
            .len()
            .checked_div(line_bytes)
            .unwrap_or(0)
            .min(usize::from(MAX_LINES));
        Self {
            data: &data[..lines * line_bytes],
            line_bytes,
            lines,
            mode: WRITE_LINE | vcom.bit(),
            index: 0,
            line: 1,
            stage: if lines == 0 { Stage::Done } else { Stage::Command },
        }
    }

    /// Total bytes in a refresh frame for `data_len` bytes over `lines` lines
    pub const fn encoded_len(data_len: usize, lines: usize) -> usize {
        data_len + 2 * lines + 2
    }

    fn remaining(&self) -> usize {
        // lines whose trailer is still to come
        let open_lines = self.lines + 1 - self.line;
        let data_left = self.data.len() - self.index;
        match self.stage {
            Stage::Command => Self::encoded_len(self.data.len(), self.lines),
            Stage::Address(_) => data_left + 2 * open_lines + 1,
            Stage::Data => data_left + 2 * open_lines,
            Stage::Trailer { .. } => data_left + 2 * (open_lines + 1),
            Stage::FinalTrailer => 1,
            Stage::Done => 0,
        }
    }
}

impl Iterator for RefreshFrame<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        match self.stage {
            Stage::Command => {
                self.stage = Stage::Address(1);
                Some(self.mode)
            }
            Stage::Address(line) => {
                self.stage = Stage::Data;
                Some(line as u8)
            }
            Stage::Data => {
                let byte = self.data[self.index];
                self.index += 1;
                let line = self.index / self.line_bytes + 1;
                if line != self.line {
                    self.line = line;
                    self.stage = Stage::Trailer { next_line: line };
                }
                Some(byte)
            }
            Stage::Trailer { next_line } => {
                self.stage = if next_line <= self.lines {
                    Stage::Address(next_line)
                } else {
                    Stage::FinalTrailer
                };
                Some(TRAILER)
            }
            Stage::FinalTrailer => {
                self.stage = Stage::Done;
                Some(TRAILER)
            }
            Stage::Done => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RefreshFrame<'_> {}

impl FusedIterator for RefreshFrame<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn test_clear_frame_follows_vcom() {
        assert_eq!(clear_frame(Vcom::Low), [0x04, 0x00]);
        assert_eq!(clear_frame(Vcom::High), [0x06, 0x00]);
    }

    #[test]
    fn test_display_mode_frame() {
        assert_eq!(display_mode_frame(Vcom::Low), [0x00, 0x00]);
        assert_eq!(display_mode_frame(Vcom::High), [0x02, 0x00]);
    }

    #[test]
    fn test_single_line_frame() {
        let frame: Vec<u8> = RefreshFrame::new(&[0x12, 0x34], 2, Vcom::High).collect();
        assert_eq!(frame, [0x03, 1, 0x12, 0x34, 0x00, 0x00]);
    }

    #[test]
    fn test_128x128_frame_layout() {
        let data: Vec<u8> = (0..2048).map(|i| (i % 251) as u8).collect();
        let frame: Vec<u8> = RefreshFrame::new(&data, 16, Vcom::Low).collect();

        // 1 mode + 1 first address + 2048 data + 128 trailers
        // + 127 further addresses + 1 closing trailer
        assert_eq!(frame.len(), 1 + 1 + 2048 + 128 + 127 + 1);
        assert_eq!(frame.len(), RefreshFrame::encoded_len(2048, 128));
        assert_eq!(frame[0], 0x01);

        // each line is [address, 16 data bytes, trailer]
        let lines = &frame[1..frame.len() - 1];
        assert_eq!(lines.len(), 128 * 18);
        for (n, chunk) in lines.chunks(18).enumerate() {
            assert_eq!(chunk[0] as usize, n + 1, "line address of line {n}");
            assert_eq!(&chunk[1..17], &data[n * 16..(n + 1) * 16]);
            assert_eq!(chunk[17], 0x00);
        }
        assert_eq!(frame[frame.len() - 1], 0x00);
    }

    #[test]
    fn test_line_addresses_are_strictly_increasing() {
        let data = vec![0xFFu8; 50 * 240];
        let frame: Vec<u8> = RefreshFrame::new(&data, 50, Vcom::Low).collect();
        let addresses: Vec<u8> = frame[1..]
            .chunks(52)
            .filter(|chunk| chunk.len() == 52)
            .map(|chunk| chunk[0])
            .collect();
        let expected: Vec<u8> = (1..=240).collect();
        assert_eq!(addresses, expected);
    }

    #[test]
    fn test_refresh_twice_differs_only_in_vcom() {
        let data: Vec<u8> = (0..64).map(|i| i as u8).collect();
        let first: Vec<u8> = RefreshFrame::new(&data, 2, Vcom::High).collect();
        let second: Vec<u8> = RefreshFrame::new(&data, 2, Vcom::Low).collect();
        assert_eq!(first.len(), second.len());
        assert_eq!(first[0] ^ second[0], 0x02);
        assert_eq!(&first[1..], &second[1..]);
    }

    #[test]
    fn test_size_hint_is_exact_throughout() {
        let data = [0u8; 24];
        let mut frame = RefreshFrame::new(&data, 3, Vcom::Low);
        let mut expected = RefreshFrame::encoded_len(24, 8);
        loop {
            assert_eq!(frame.len(), expected);
            if frame.next().is_none() {
                break;
            }
            expected -= 1;
        }
        assert_eq!(expected, 0);
        assert_eq!(frame.next(), None);
    }

    #[test]
    fn test_lines_beyond_address_range_are_dropped() {
        let data = vec![0xA5u8; 300];
        let frame: Vec<u8> = RefreshFrame::new(&data, 1, Vcom::Low).collect();
        assert_eq!(frame.len(), RefreshFrame::encoded_len(255, 255));
        let addresses: Vec<u8> = frame[1..frame.len() - 1]
            .chunks(3)
            .map(|line| line[0])
            .collect();
        let expected: Vec<u8> = (1..=255).collect();
        assert_eq!(addresses, expected);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert_eq!(RefreshFrame::new(&[], 16, Vcom::Low).count(), 0);
        assert_eq!(RefreshFrame::new(&[1, 2], 0, Vcom::Low).count(), 0);
    }
}
