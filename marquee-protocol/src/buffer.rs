//! Fixed-capacity character buffer
//!
//! Used both for the incoming command line and for the text currently
//! shown on the display. Storage is inline, so a buffer never allocates
//! and never fails to be created.
//!
//! Characters are raw bytes: the display font is an 8-bit character set
//! and no multi-byte encoding is supported.

use heapless::Vec;

use crate::{MAX_INPUT, MAX_LINE};

/// Buffer for the command line being received from the host
pub type InputBuffer = LineBuffer<MAX_INPUT>;

/// Buffer for the text line currently drawn on the display
pub type TextBuffer = LineBuffer<MAX_LINE>;

/// A bounded byte accumulator
///
/// `append` stores at most `N - 1` bytes and silently drops the rest, which
/// protects the input path against overruns. `set` replaces the whole content
/// and keeps up to `N` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBuffer<const N: usize> {
    contents: Vec<u8, N>,
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LineBuffer<N> {
    const NON_ZERO: () = assert!(N > 0, "LineBuffer capacity must be non-zero");

    /// Create a new empty buffer
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_ZERO;
        Self {
            contents: Vec::new(),
        }
    }

    /// Total capacity in bytes
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of stored bytes (the write position)
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// Check if the buffer holds no bytes
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Check if further `append` calls will be dropped
    pub fn is_full(&self) -> bool {
        self.contents.len() >= N - 1
    }

    /// Append one byte, dropping it if the buffer is full
    pub fn append(&mut self, byte: u8) {
        if self.is_full() {
            return;
        }
        // Cannot fail: len < N - 1
        let _ = self.contents.push(byte);
    }

    /// Reset the write position to the start
    ///
    /// Does not release any storage.
    pub fn reset(&mut self) {
        self.contents.clear();
    }

    /// Move the write position back one byte, if possible
    ///
    /// The content stays terminated at the new position.
    pub fn backspace(&mut self) {
        self.contents.pop();
    }

    /// Replace the content with `bytes`, truncated to the capacity
    pub fn set(&mut self, bytes: &[u8]) {
        let len = bytes.len().min(N);
        self.contents.clear();
        // Cannot fail: len <= N
        let _ = self.contents.extend_from_slice(&bytes[..len]);
    }

    /// The stored bytes, up to the write position
    pub fn as_bytes(&self) -> &[u8] {
        &self.contents
    }
}
