//! Matrix renderer trait

/// Pixels per module, horizontally and vertically
pub const MODULE_WIDTH: usize = 8;

/// Trait for a chain of 8x8 LED modules with an off-screen frame
///
/// The renderer keeps a *virtual* display that can be wider than the
/// physical chain. Coordinates are zero-indexed from the bottom-left of the
/// virtual display. Drawing only changes the off-screen frame unless `flush`
/// is requested.
///
/// Operations are infallible from the caller's point of view: out-of-range
/// coordinates are ignored, and implementations that talk to real hardware
/// record transfer faults for the firmware to report.
pub trait MatrixDriver {
    /// Turn on the pixel at `row`, `col`
    fn switch_on(&mut self, row: i32, col: i32, flush: bool);

    /// Turn off the pixel at `row`, `col`
    fn switch_off(&mut self, row: i32, col: i32, flush: bool);

    /// Turn off every pixel of the virtual display
    fn switch_off_all(&mut self, flush: bool);

    /// Push the visible part of the frame to the hardware
    fn flush(&mut self);

    /// Shift the virtual display one pixel to the left
    fn scroll(&mut self, flush: bool);

    /// Set brightness, 0-15
    fn set_intensity(&mut self, level: u8);

    /// Current virtual display width, in modules
    fn virtual_chain_length(&self) -> usize;

    /// Resize the virtual display
    ///
    /// Implementations may clamp `modules` to what they can hold; read the
    /// result back with [`MatrixDriver::virtual_chain_length`].
    fn set_virtual_chain_length(&mut self, modules: usize);
}
