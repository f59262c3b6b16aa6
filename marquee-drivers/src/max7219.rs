//! MAX7219 LED matrix chain
//!
//! Drives a daisy chain of 8x8 modules, each behind its own MAX7219, over a
//! write-only SPI bus. Every register write is a 16-bit word (address byte
//! then data byte) per module; the chain latches all modules at once on the
//! rising edge of chip select, so one transaction carries exactly one word
//! for every module, furthest module first.
//!
//! # Frame layout
//!
//! The driver keeps an off-screen frame of 8 rows by up to
//! [`MAX_VIRTUAL_MODULES`] modules. Only the first `chain_len` modules of
//! the virtual display are visible; scrolling rotates the whole virtual
//! display through that window.
//!
//! Row 0 is the bottom row and column 0 the leftmost. Digit register 1
//! carries the top row. Within a frame byte bit 7 is the leftmost column;
//! modules that are wired mirrored get their bytes bit-reversed on the way
//! out (`reverse_columns`).

use marquee_core::traits::{MatrixDriver, MODULE_WIDTH};
use marquee_hal::{Mode, OutputPin, SpiBus, SpiConfig};

/// MAX7219 register addresses
pub mod reg {
    /// No-op, used to skip modules in a chain
    pub const NOOP: u8 = 0x00;
    /// First digit (row) register; digits are 0x01..=0x08
    pub const DIGIT0: u8 = 0x01;
    /// BCD decode mode
    pub const DECODE_MODE: u8 = 0x09;
    /// Brightness, 0-15
    pub const INTENSITY: u8 = 0x0A;
    /// Number of scanned digits minus one
    pub const SCAN_LIMIT: u8 = 0x0B;
    /// 0 = shutdown, 1 = normal operation
    pub const SHUTDOWN: u8 = 0x0C;
    /// Display test (all LEDs on)
    pub const DISPLAY_TEST: u8 = 0x0F;
}

/// Most modules the virtual display can span
pub const MAX_VIRTUAL_MODULES: usize = 128;

/// Rows per module
const ROWS: usize = 8;

/// The MAX7219 samples on the rising edge with the clock idling low
pub const SPI_MODE: Mode = Mode::Mode0;

/// SPI settings for a MAX7219 chain clocked at `frequency` Hz
pub fn spi_config(frequency: u32) -> SpiConfig {
    SpiConfig::with_mode(frequency, SPI_MODE)
}

/// Chain of MAX7219-driven 8x8 modules
pub struct Max7219<S: SpiBus, CS> {
    spi: S,
    cs: CS,
    /// Physical modules in the chain
    chain_len: usize,
    /// Modules in the virtual display
    virtual_len: usize,
    /// Mirror each module horizontally
    reverse_columns: bool,
    /// Off-screen frame, indexed `[row][module]`
    frame: [[u8; MAX_VIRTUAL_MODULES]; ROWS],
    /// Most recent bus failure not yet reported
    fault: Option<S::Error>,
}

impl<S: SpiBus, CS: OutputPin> Max7219<S, CS> {
    /// Create a driver for `chain_len` modules
    ///
    /// The chain is not touched until [`Max7219::init`] is called.
    pub fn new(spi: S, mut cs: CS, chain_len: usize, reverse_columns: bool) -> Self {
        cs.set_high();
        let chain_len = chain_len.clamp(1, MAX_VIRTUAL_MODULES);
        Self {
            spi,
            cs,
            chain_len,
            virtual_len: chain_len,
            reverse_columns,
            frame: [[0; MAX_VIRTUAL_MODULES]; ROWS],
            fault: None,
        }
    }

    /// Program every module for raw matrix use and blank the display
    pub fn init(&mut self, intensity: u8) {
        self.write_register(reg::DECODE_MODE, 0x00);
        self.write_register(reg::SCAN_LIMIT, 0x07);
        self.write_register(reg::DISPLAY_TEST, 0x00);
        self.write_register(reg::SHUTDOWN, 0x01);
        self.write_register(reg::INTENSITY, intensity & 0x0F);
        self.switch_off_all(true);
    }

    /// Physical modules in the chain
    pub fn chain_len(&self) -> usize {
        self.chain_len
    }

    /// Is the pixel at `row`, `col` of the virtual display lit
    pub fn is_lit(&self, row: i32, col: i32) -> bool {
        match self.locate(row, col) {
            Some((row, module, mask)) => self.frame[row][module] & mask != 0,
            None => false,
        }
    }

    /// Take the last bus failure, if any
    pub fn take_fault(&mut self) -> Option<S::Error> {
        self.fault.take()
    }

    /// Frame position of a pixel, or `None` if it is off the virtual display
    fn locate(&self, row: i32, col: i32) -> Option<(usize, usize, u8)> {
        let row = usize::try_from(row).ok().filter(|&r| r < ROWS)?;
        let col = usize::try_from(col)
            .ok()
            .filter(|&c| c < self.virtual_len * MODULE_WIDTH)?;
        let mask = 0x80 >> (col % MODULE_WIDTH);
        Some((row, col / MODULE_WIDTH, mask))
    }

    /// Write the same register value to every module
    fn write_register(&mut self, address: u8, value: u8) {
        let words = (0..self.chain_len).map(|_| [address, value]);
        let result = shift_out(&mut self.spi, &mut self.cs, words);
        self.record(result);
    }

    fn record(&mut self, result: Result<(), S::Error>) {
        if let Err(e) = result {
            self.fault = Some(e);
        }
    }
}

/// One latched transaction: assert chip select, clock out `words`, release
fn shift_out<S, CS, I>(spi: &mut S, cs: &mut CS, words: I) -> Result<(), S::Error>
where
    S: SpiBus,
    CS: OutputPin,
    I: DoubleEndedIterator<Item = [u8; 2]>,
{
    cs.set_low();
    // Words for the far end of the chain go out first
    let result = words
        .rev()
        .try_for_each(|word| spi.write(&word))
        .and_then(|()| spi.flush());
    cs.set_high();
    result
}

impl<S: SpiBus, CS: OutputPin> MatrixDriver for Max7219<S, CS> {
    fn switch_on(&mut self, row: i32, col: i32, flush: bool) {
        if let Some((row, module, mask)) = self.locate(row, col) {
            self.frame[row][module] |= mask;
        }
        if flush {
            self.flush();
        }
    }

    fn switch_off(&mut self, row: i32, col: i32, flush: bool) {
        if let Some((row, module, mask)) = self.locate(row, col) {
            self.frame[row][module] &= !mask;
        }
        if flush {
            self.flush();
        }
    }

    fn switch_off_all(&mut self, flush: bool) {
        self.frame = [[0; MAX_VIRTUAL_MODULES]; ROWS];
        if flush {
            self.flush();
        }
    }

    fn flush(&mut self) {
        for digit in 0..ROWS {
            let row = &self.frame[ROWS - 1 - digit];
            let reverse = self.reverse_columns;
            let address = reg::DIGIT0 + digit as u8;
            let words = row[..self.chain_len].iter().map(|&bits| {
                let bits = if reverse { bits.reverse_bits() } else { bits };
                [address, bits]
            });
            let result = shift_out(&mut self.spi, &mut self.cs, words);
            self.record(result);
        }
    }

    fn scroll(&mut self, flush: bool) {
        let width = self.virtual_len;
        for row in self.frame.iter_mut() {
            let cells = &mut row[..width];
            let wrap = cells[0] >> 7;
            for i in 0..width {
                let carry = cells.get(i + 1).map_or(wrap, |next| next >> 7);
                cells[i] = (cells[i] << 1) | carry;
            }
        }
        if flush {
            self.flush();
        }
    }

    fn set_intensity(&mut self, level: u8) {
        self.write_register(reg::INTENSITY, level & 0x0F);
    }

    fn virtual_chain_length(&self) -> usize {
        self.virtual_len
    }

    fn set_virtual_chain_length(&mut self, modules: usize) {
        let modules = modules.clamp(self.chain_len, MAX_VIRTUAL_MODULES);
        if modules < self.virtual_len {
            for row in self.frame.iter_mut() {
                row[modules..].fill(0);
            }
        }
        self.virtual_len = modules;
    }
}
