//! Core display operations

use crate::command::Vcom;
use crate::config::{Config, Dimensions, Rotation};
use crate::error::{BuilderError, Error};
use crate::framebuffer::Framebuffer;
use crate::interface::DisplayInterface;
use crate::protocol::{RefreshFrame, clear_frame, display_mode_frame};
use crate::rotation::transform;
use crate::surface::PixelSurface;

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Bytes handed to [`DisplayInterface::write`] at a time
const WRITE_CHUNK: usize = 64;

/// Chip-select state of the device handle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransactionState {
    /// Select deasserted, ready for the next transaction
    #[default]
    Idle,
    /// Select asserted, a frame is on the bus
    ///
    /// Outside a driver call this means a transport failure left the
    /// chip-select line stuck. The next transaction releases it first.
    Asserted,
}

/// Driver for a Sharp Memory LCD
///
/// Owns the transport, the framebuffer and the VCOM polarity. Pixel writes go
/// to the framebuffer only; [`refresh`](Self::refresh) pushes the whole
/// buffer to the panel.
///
/// Every operation takes `&mut self`, so a handle is used by one caller at a
/// time. Share it between tasks behind a mutex.
///
/// ## Example
///
/// ```rust,no_run
/// use sharpmem::{Builder, Dimensions, Display, DisplayInterface, PixelSurface};
/// # use core::convert::Infallible;
/// # struct Bus;
/// # impl DisplayInterface for Bus {
/// #     type Error = Infallible;
/// #     fn select(&mut self) -> Result<(), Infallible> { Ok(()) }
/// #     fn deselect(&mut self) -> Result<(), Infallible> { Ok(()) }
/// #     fn transfer(&mut self, _byte: u8) -> Result<u8, Infallible> { Ok(0) }
/// # }
/// let dims = match Dimensions::new(128, 128) {
///     Ok(dims) => dims,
///     Err(_) => return,
/// };
/// let config = match Builder::new().dimensions(dims).build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
///
/// let mut display = Display::new(Bus, config, [0u8; 128 * 128 / 8]);
/// let _ = display.init();
///
/// display.set_pixel(10, 20, false);
/// let _ = display.refresh();
/// ```
pub struct Display<I, B>
where
    I: DisplayInterface,
{
    /// Hardware interface
    interface: I,
    /// Display configuration
    config: Config,
    /// Pixel memory
    framebuffer: Framebuffer<B>,
    /// Polarity for the next transaction
    vcom: Vcom,
    /// Chip-select state
    state: TransactionState,
}

impl<I, B> Display<I, B>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Create a new Display instance
    ///
    /// `buffer` becomes the framebuffer and is cleared to white. Nothing is
    /// sent to the panel until [`init`](Self::init).
    ///
    /// # Panics
    ///
    /// Panics if the configured dimensions fail validation or `buffer` is
    /// smaller than `dimensions.buffer_size()` bytes.
    pub fn new(interface: I, config: Config, buffer: B) -> Self {
        let framebuffer = Framebuffer::new(config.dimensions, buffer);
        Self::with_framebuffer(interface, config, framebuffer)
    }

    /// Try to create a new Display, returning an error if the buffer is too small
    ///
    /// This is the fallible version of [`new`](Self::new).
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if the configured dimensions
    /// fail validation, `BuilderError::BufferTooSmall` if `buffer` is smaller
    /// than `dimensions.buffer_size()` bytes.
    pub fn try_new(interface: I, config: Config, buffer: B) -> Result<Self, BuilderError> {
        let framebuffer = Framebuffer::try_new(config.dimensions, buffer)?;
        Ok(Self::with_framebuffer(interface, config, framebuffer))
    }

    fn with_framebuffer(interface: I, config: Config, framebuffer: Framebuffer<B>) -> Self {
        Self {
            interface,
            vcom: config.initial_vcom,
            config,
            framebuffer,
            state: TransactionState::Idle,
        }
    }

    /// Bring the panel to a known state
    ///
    /// Blanks the framebuffer and sends an all-clear command.
    pub fn init(&mut self) -> DisplayResult<I> {
        log::debug!(
            "init {}x{} panel, rotation {:?}",
            self.config.dimensions.width,
            self.config.dimensions.height,
            self.config.rotation
        );
        self.clear_display()
    }

    /// Clear the panel with the all-clear command
    ///
    /// Faster than refreshing a blank buffer. The framebuffer is blanked too,
    /// so the next [`refresh`](Self::refresh) does not bring old contents back.
    pub fn clear_display(&mut self) -> DisplayResult<I> {
        self.framebuffer.clear();
        log::debug!("all clear, vcom {:?}", self.vcom);
        let frame = clear_frame(self.vcom);
        self.transaction(frame.into_iter())
    }

    /// Blank the framebuffer without touching the panel
    pub fn clear_buffer(&mut self) {
        self.framebuffer.clear();
    }

    /// Push the whole framebuffer to the panel
    pub fn refresh(&mut self) -> DisplayResult<I> {
        log::debug!(
            "refresh {} lines, vcom {:?}",
            self.config.dimensions.height,
            self.vcom
        );
        let frame = RefreshFrame::new(
            self.framebuffer.as_bytes(),
            self.config.dimensions.line_bytes(),
            self.vcom,
        );
        run_transaction(&mut self.interface, &mut self.state, &mut self.vcom, frame)
    }

    /// Invert VCOM without changing the panel contents
    ///
    /// The panel needs its polarity inverted regularly (typically at least
    /// once per second). Call this from a timer when refreshes are rarer.
    pub fn toggle_vcom(&mut self) -> DisplayResult<I> {
        log::trace!("display mode, vcom {:?}", self.vcom);
        let frame = display_mode_frame(self.vcom);
        self.transaction(frame.into_iter())
    }

    /// Read a pixel in rotated coordinates
    ///
    /// Returns `None` for off-panel coordinates.
    pub fn pixel(&self, x: i32, y: i32) -> Option<bool> {
        let Dimensions { width, height } = self.config.dimensions;
        let (px, py) = transform(x, y, width, height, self.config.rotation);
        self.framebuffer.get_pixel(px, py)
    }

    /// Change the rotation used for future pixel writes
    ///
    /// Pixels already in the framebuffer stay where they are.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        log::trace!("rotation {:?} -> {:?}", self.config.rotation, rotation);
        self.config.rotation = rotation;
    }

    /// Get display rotation
    pub fn rotation(&self) -> Rotation {
        self.config.rotation
    }

    /// Get physical display dimensions
    pub fn dimensions(&self) -> &Dimensions {
        &self.config.dimensions
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// VCOM level the next transaction will use
    pub fn vcom(&self) -> Vcom {
        self.vcom
    }

    /// Chip-select state
    pub fn transaction_state(&self) -> TransactionState {
        self.state
    }

    /// Access the framebuffer
    pub fn framebuffer(&self) -> &Framebuffer<B> {
        &self.framebuffer
    }

    /// Access the framebuffer mutably
    ///
    /// Writes through the framebuffer use physical coordinates unless a
    /// rotation is passed explicitly.
    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer<B> {
        &mut self.framebuffer
    }

    /// Access the hardware interface
    pub fn interface(&self) -> &I {
        &self.interface
    }

    /// Tear down the driver, returning the interface and framebuffer storage
    pub fn release(self) -> (I, B) {
        (self.interface, self.framebuffer.into_inner())
    }

    fn transaction(&mut self, frame: impl Iterator<Item = u8>) -> DisplayResult<I> {
        run_transaction(&mut self.interface, &mut self.state, &mut self.vcom, frame)
    }
}

#[cfg(feature = "alloc")]
impl<I> Display<I, alloc::vec::Vec<u8>>
where
    I: DisplayInterface,
{
    /// Create a new Display with a heap-allocated framebuffer
    pub fn new_alloc(interface: I, config: Config) -> Self {
        let buffer = alloc::vec![0u8; config.dimensions.buffer_size()];
        Self::new(interface, config, buffer)
    }
}

impl<I, B> PixelSurface for Display<I, B>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn set_pixel(&mut self, x: i16, y: i16, on: bool) {
        self.framebuffer
            .set_pixel(x.into(), y.into(), on, self.config.rotation);
    }

    fn width(&self) -> u16 {
        self.config.rotated_dimensions().width
    }

    fn height(&self) -> u16 {
        self.config.rotated_dimensions().height
    }

    fn fill(&mut self, on: bool) {
        self.framebuffer.fill(on);
    }
}

/// Run one select-bracketed transaction
///
/// VCOM flips as soon as the mode byte is on the bus. On a transport error
/// the select line is released if possible and the error is returned as is.
///
/// If an earlier failure left chip-select asserted, it is released first; the
/// transaction only starts once that succeeds.
fn run_transaction<I, F>(
    interface: &mut I,
    state: &mut TransactionState,
    vcom: &mut Vcom,
    frame: F,
) -> DisplayResult<I>
where
    I: DisplayInterface,
    F: Iterator<Item = u8>,
{
    if *state == TransactionState::Asserted {
        log::debug!("releasing select left asserted by a failed transaction");
        interface.deselect().map_err(Error::Interface)?;
        *state = TransactionState::Idle;
    }

    interface.select().map_err(Error::Interface)?;
    *state = TransactionState::Asserted;

    if let Err(e) = send_frame(interface, vcom, frame) {
        log::warn!("transaction aborted: {e:?}");
        if interface.deselect().is_ok() {
            *state = TransactionState::Idle;
        }
        return Err(Error::Interface(e));
    }

    interface.deselect().map_err(Error::Interface)?;
    *state = TransactionState::Idle;
    Ok(())
}

fn send_frame<I, F>(interface: &mut I, vcom: &mut Vcom, mut frame: F) -> Result<(), I::Error>
where
    I: DisplayInterface,
    F: Iterator<Item = u8>,
{
    if let Some(mode) = frame.next() {
        interface.transfer(mode)?;
        vcom.toggle();
    }

    let mut chunk = [0u8; WRITE_CHUNK];
    let mut len = 0;
    for byte in frame {
        chunk[len] = byte;
        len += 1;
        if len == WRITE_CHUNK {
            interface.write(&chunk)?;
            len = 0;
        }
    }
    if len > 0 {
        interface.write(&chunk[..len])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Builder;
    use alloc::vec;
    use alloc::vec::Vec;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Op {
        Select,
        Deselect,
        Byte(u8),
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct BusFault;

    #[derive(Debug, Default)]
    struct MockInterface {
        ops: Vec<Op>,
        /// Fail the transfer of the n-th byte (0-based, counted over the whole test)
        fail_at: Option<usize>,
        fail_deselect: bool,
        sent: usize,
    }

    impl MockInterface {
        fn new() -> Self {
            Self::default()
        }

        fn take_frames(&mut self) -> Vec<Vec<u8>> {
            let mut frames = Vec::new();
            let mut current = None;
            for op in self.ops.drain(..) {
                match op {
                    Op::Select => current = Some(Vec::new()),
                    Op::Byte(b) => current.as_mut().unwrap().push(b),
                    Op::Deselect => frames.push(current.take().unwrap()),
                }
            }
            frames
        }
    }

    impl DisplayInterface for MockInterface {
        type Error = BusFault;

        fn select(&mut self) -> Result<(), Self::Error> {
            self.ops.push(Op::Select);
            Ok(())
        }

        fn deselect(&mut self) -> Result<(), Self::Error> {
            if self.fail_deselect {
                return Err(BusFault);
            }
            self.ops.push(Op::Deselect);
            Ok(())
        }

        fn transfer(&mut self, byte: u8) -> Result<u8, Self::Error> {
            if self.fail_at == Some(self.sent) {
                return Err(BusFault);
            }
            self.sent += 1;
            self.ops.push(Op::Byte(byte));
            Ok(0)
        }
    }

    fn test_display(width: u16, height: u16, vcom: Vcom) -> Display<MockInterface, Vec<u8>> {
        let dims = Dimensions::new(width, height).unwrap();
        let config = Builder::new()
            .dimensions(dims)
            .initial_vcom(vcom)
            .build()
            .unwrap();
        Display::new(MockInterface::new(), config, vec![0u8; dims.buffer_size()])
    }

    #[test]
    fn test_new_starts_idle_with_blank_buffer_and_no_traffic() {
        let display = test_display(16, 8, Vcom::High);
        assert_eq!(display.transaction_state(), TransactionState::Idle);
        assert_eq!(display.vcom(), Vcom::High);
        assert!(display.framebuffer().as_bytes().iter().all(|b| *b == 0xFF));
        assert!(display.interface().ops.is_empty());
    }

    #[test]
    fn test_try_new_small_buffer_returns_error() {
        let config = Builder::new()
            .dimensions(Dimensions::new(16, 8).unwrap())
            .build()
            .unwrap();
        let result = Display::try_new(MockInterface::new(), config, [0u8; 15]);
        assert!(matches!(
            result,
            Err(BuilderError::BufferTooSmall {
                required: 16,
                provided: 15
            })
        ));
    }

    #[test]
    #[should_panic(expected = "framebuffer too small")]
    fn test_new_panics_on_small_buffer() {
        let config = Builder::new()
            .dimensions(Dimensions::new(16, 8).unwrap())
            .build()
            .unwrap();
        let _ = Display::new(MockInterface::new(), config, [0u8; 8]);
    }

    #[test]
    fn test_clear_display_alternates_vcom() {
        let mut display = test_display(16, 8, Vcom::Low);
        display.clear_display().unwrap();
        assert_eq!(display.vcom(), Vcom::High);
        display.clear_display().unwrap();
        assert_eq!(display.vcom(), Vcom::Low);

        let frames = display.interface.take_frames();
        assert_eq!(frames, [vec![0x04, 0x00], vec![0x06, 0x00]]);
    }

    #[test]
    fn test_clear_display_blanks_buffer() {
        let mut display = test_display(16, 8, Vcom::Low);
        display.set_pixel(0, 0, false);
        display.clear_display().unwrap();
        assert!(display.framebuffer().as_bytes().iter().all(|b| *b == 0xFF));
    }

    #[test]
    fn test_init_sends_all_clear() {
        let mut display = test_display(16, 8, Vcom::High);
        display.init().unwrap();
        assert_eq!(display.interface.take_frames(), [vec![0x06, 0x00]]);
    }

    #[test]
    fn test_clear_buffer_sends_nothing() {
        let mut display = test_display(16, 8, Vcom::High);
        display.set_pixel(3, 3, false);
        display.clear_buffer();
        assert_eq!(display.pixel(3, 3), Some(true));
        assert!(display.interface().ops.is_empty());
        assert_eq!(display.vcom(), Vcom::High);
    }

    #[test]
    fn test_refresh_128x128_frame() {
        let mut display = test_display(128, 128, Vcom::Low);
        display.set_pixel(0, 0, false);
        display.refresh().unwrap();
        assert_eq!(display.vcom(), Vcom::High);

        let frames = display.interface.take_frames();
        assert_eq!(frames.len(), 1);
        let frame = &frames[0];
        assert_eq!(frame.len(), 1 + 1 + 2048 + 128 + 127 + 1);
        assert_eq!(&frame[..3], &[0x01, 1, 0xFE]);

        let addresses: Vec<u8> = frame[1..frame.len() - 1]
            .chunks(18)
            .map(|line| line[0])
            .collect();
        let expected: Vec<u8> = (1..=128).collect();
        assert_eq!(addresses, expected);
        assert_eq!(&frame[frame.len() - 2..], &[0x00, 0x00]);
    }

    #[test]
    fn test_refresh_twice_differs_only_in_vcom() {
        let mut display = test_display(32, 16, Vcom::High);
        display.set_pixel(5, 7, false);
        display.refresh().unwrap();
        display.refresh().unwrap();

        let frames = display.interface.take_frames();
        assert_eq!(frames[0][0], 0x03);
        assert_eq!(frames[1][0], 0x01);
        assert_eq!(&frames[0][1..], &frames[1][1..]);
    }

    #[test]
    fn test_vcom_alternates_across_mixed_transactions() {
        let mut display = test_display(16, 8, Vcom::Low);
        display.clear_display().unwrap();
        display.refresh().unwrap();
        display.toggle_vcom().unwrap();
        display.refresh().unwrap();

        let firsts: Vec<u8> = display
            .interface
            .take_frames()
            .iter()
            .map(|frame| frame[0])
            .collect();
        assert_eq!(firsts, [0x04, 0x03, 0x00, 0x03]);
    }

    #[test]
    fn test_toggle_vcom_frame() {
        let mut display = test_display(16, 8, Vcom::High);
        display.toggle_vcom().unwrap();
        assert_eq!(display.vcom(), Vcom::Low);
        assert_eq!(display.interface.take_frames(), [vec![0x02, 0x00]]);
    }

    #[test]
    fn test_failed_mode_byte_keeps_vcom_and_releases_select() {
        let mut display = test_display(16, 8, Vcom::Low);
        display.interface.fail_at = Some(0);
        let result = display.refresh();
        assert!(matches!(result, Err(Error::Interface(BusFault))));
        assert_eq!(display.vcom(), Vcom::Low);
        assert_eq!(display.transaction_state(), TransactionState::Idle);
        assert_eq!(display.interface().ops, [Op::Select, Op::Deselect]);
    }

    #[test]
    fn test_failure_mid_frame_surfaces_error_after_vcom_flip() {
        let mut display = test_display(16, 8, Vcom::Low);
        display.interface.fail_at = Some(10);
        let result = display.refresh();
        assert!(matches!(result, Err(Error::Interface(BusFault))));
        // the mode byte reached the panel
        assert_eq!(display.vcom(), Vcom::High);
        assert_eq!(display.transaction_state(), TransactionState::Idle);
        assert_eq!(display.interface().ops.last(), Some(&Op::Deselect));

        // not retried; the next call starts a fresh frame with the new level
        display.interface.fail_at = None;
        display.interface.ops.clear();
        display.refresh().unwrap();
        assert_eq!(display.interface.take_frames()[0][0], 0x03);
    }

    #[test]
    fn test_stuck_select_is_released_by_next_transaction() {
        let mut display = test_display(16, 8, Vcom::Low);
        display.interface.fail_at = Some(1);
        display.interface.fail_deselect = true;
        assert!(display.refresh().is_err());
        assert_eq!(display.transaction_state(), TransactionState::Asserted);

        // bus still faulty: the stale select cannot be released
        display.interface.fail_at = None;
        let result = display.refresh();
        assert!(matches!(result, Err(Error::Interface(BusFault))));
        assert_eq!(display.transaction_state(), TransactionState::Asserted);
        assert_eq!(display.vcom(), Vcom::High);

        // bus recovered: release, then a full frame
        display.interface.fail_deselect = false;
        display.interface.ops.clear();
        display.refresh().unwrap();
        assert_eq!(display.transaction_state(), TransactionState::Idle);
        assert_eq!(display.vcom(), Vcom::Low);
        assert_eq!(display.interface().ops[0], Op::Deselect);
        display.interface.ops.remove(0);
        let frames = display.interface.take_frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0][0], 0x03);
    }

    #[test]
    fn test_try_new_rejects_unvalidated_config() {
        let config = Config {
            dimensions: Dimensions {
                width: 12,
                height: 8,
            },
            rotation: Rotation::Rotate0,
            initial_vcom: Vcom::High,
        };
        let result = Display::try_new(MockInterface::new(), config, vec![0u8; 64]);
        assert!(matches!(
            result,
            Err(BuilderError::InvalidDimensions {
                width: 12,
                height: 8
            })
        ));
    }

    #[test]
    fn test_pixel_surface_uses_rotated_dimensions() {
        let mut display = test_display(32, 16, Vcom::Low);
        assert_eq!((display.width(), display.height()), (32, 16));
        display.set_rotation(Rotation::Rotate90);
        assert_eq!((display.width(), display.height()), (16, 32));
        display.set_rotation(Rotation::Rotate270);
        assert_eq!((display.width(), display.height()), (16, 32));
    }

    #[test]
    fn test_set_pixel_then_pixel_round_trips_in_every_rotation() {
        for rotation in [
            Rotation::Rotate0,
            Rotation::Rotate90,
            Rotation::Rotate180,
            Rotation::Rotate270,
        ] {
            let mut display = test_display(32, 16, Vcom::Low);
            display.set_rotation(rotation);
            let (w, h) = (display.width() as i16, display.height() as i16);
            for (x, y) in [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1), (5, 3)] {
                display.set_pixel(x, y, false);
                assert_eq!(display.pixel(x.into(), y.into()), Some(false));
                display.set_pixel(x, y, true);
                assert_eq!(display.pixel(x.into(), y.into()), Some(true));
            }
        }
    }

    #[test]
    fn test_rotation_change_keeps_existing_pixels() {
        let mut display = test_display(16, 16, Vcom::Low);
        display.set_pixel(1, 2, false);
        let before = display.framebuffer().as_bytes().to_vec();
        display.set_rotation(Rotation::Rotate180);
        assert_eq!(display.framebuffer().as_bytes(), &before[..]);
        assert_eq!(display.framebuffer().get_pixel(1, 2), Some(false));
        // later writes are transformed
        display.set_pixel(1, 2, false);
        assert_eq!(display.framebuffer().get_pixel(14, 13), Some(false));
    }

    #[test]
    fn test_out_of_bounds_pixels_are_clipped() {
        let mut display = test_display(16, 8, Vcom::Low);
        display.set_pixel(-1, 0, false);
        display.set_pixel(16, 0, false);
        display.set_pixel(0, 8, false);
        display.set_pixel(i16::MIN, i16::MAX, false);
        assert!(display.framebuffer().as_bytes().iter().all(|b| *b == 0xFF));
        assert_eq!(display.pixel(16, 0), None);
    }

    #[test]
    fn test_release_returns_parts() {
        let mut display = test_display(16, 8, Vcom::Low);
        display.set_pixel(0, 0, false);
        let (_interface, buffer) = display.release();
        assert_eq!(buffer[0], 0xFE);
    }
}
