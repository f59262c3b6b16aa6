//! Host-side test doubles for the collaborator traits

use heapless::Vec;

use crate::traits::{GlyphSource, MatrixDriver, GLYPH_ROWS};

/// Most modules the recording matrix will accept
pub const RECORDING_CAPACITY: usize = 128;

/// Matrix renderer that records what it was asked to do
pub struct RecordingMatrix {
    pub lit: Vec<(i32, i32), 2048>,
    pub virtual_len: usize,
    pub flushes: u32,
    pub scrolls: u32,
    pub clears: u32,
    pub intensity: Option<u8>,
}

impl RecordingMatrix {
    pub fn new(chain_len: usize) -> Self {
        Self {
            lit: Vec::new(),
            virtual_len: chain_len,
            flushes: 0,
            scrolls: 0,
            clears: 0,
            intensity: None,
        }
    }

    /// Is (`row`, `col`) lit
    pub fn is_on(&self, row: i32, col: i32) -> bool {
        self.lit.contains(&(row, col))
    }
}

impl MatrixDriver for RecordingMatrix {
    fn switch_on(&mut self, row: i32, col: i32, flush: bool) {
        if !self.is_on(row, col) {
            let _ = self.lit.push((row, col));
        }
        if flush {
            self.flush();
        }
    }

    fn switch_off(&mut self, row: i32, col: i32, flush: bool) {
        self.lit.retain(|&p| p != (row, col));
        if flush {
            self.flush();
        }
    }

    fn switch_off_all(&mut self, flush: bool) {
        self.lit.clear();
        self.clears += 1;
        if flush {
            self.flush();
        }
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }

    fn scroll(&mut self, flush: bool) {
        self.scrolls += 1;
        if flush {
            self.flush();
        }
    }

    fn set_intensity(&mut self, level: u8) {
        self.intensity = Some(level);
    }

    fn virtual_chain_length(&self) -> usize {
        self.virtual_len
    }

    fn set_virtual_chain_length(&mut self, modules: usize) {
        self.virtual_len = modules.min(RECORDING_CAPACITY);
    }
}

/// Font whose every printable glyph is a single top-left pixel
///
/// Character `i` of a line therefore lands at row 7, column `6 * i`.
pub struct DotFont;

impl GlyphSource for DotFont {
    fn glyph_rows(&self, code: u8) -> [u8; GLYPH_ROWS] {
        let mut rows = [0u8; GLYPH_ROWS];
        if code != b' ' {
            rows[0] = 0x80;
        }
        rows
    }
}
