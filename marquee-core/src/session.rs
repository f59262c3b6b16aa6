//! Display session
//!
//! Owns everything the command handlers mutate: the virtual display width,
//! the text line and the scroll timer. There is exactly one session per
//! process and it is only ever touched from the dispatch loop, so no
//! locking is involved.
//!
//! The virtual display grows on demand so that pixels and text drawn past
//! the physical chain can be scrolled into view later. It never shrinks
//! except on reset.

use marquee_protocol::{ErrorKind, TextBuffer, MAX_LINE};

use crate::config::{BoardConfig, MAX_BRIGHTNESS};
use crate::scroll::ScrollTimer;
use crate::traits::{GlyphSource, MatrixDriver, GLYPH_ADVANCE, GLYPH_ROWS, MODULE_WIDTH};

/// Modules needed to show column `col`
fn modules_for_column(col: i32) -> usize {
    usize::try_from(col / MODULE_WIDTH as i32 + 1).unwrap_or(0)
}

/// Modules needed to show `chars` characters of text
fn modules_for_text(chars: usize) -> usize {
    chars * GLYPH_ADVANCE / MODULE_WIDTH + 1
}

/// Render one glyph with its top-left corner at column `x`
fn draw_glyph<D: MatrixDriver, F: GlyphSource>(driver: &mut D, font: &F, code: u8, x: i32) {
    let glyph = font.glyph_rows(code);
    for (i, &bits) in glyph.iter().enumerate() {
        let row = (GLYPH_ROWS - 1 - i) as i32;
        for j in 0..MODULE_WIDTH {
            if bits & (1 << j) != 0 {
                let col = (MODULE_WIDTH - 1 - j) as i32 + x;
                driver.switch_on(row, col, false);
            }
        }
    }
}

/// The single display session
pub struct DisplaySession<D, F> {
    driver: D,
    font: F,
    chain_len: usize,
    default_brightness: u8,
    virtual_width: usize,
    line: TextBuffer,
    scroll: ScrollTimer,
}

impl<D: MatrixDriver, F: GlyphSource> DisplaySession<D, F> {
    /// Create a session sized to the physical chain
    pub fn new(driver: D, font: F, config: &BoardConfig) -> Self {
        let chain_len = config.chain_len().max(1);
        let mut session = Self {
            driver,
            font,
            chain_len,
            default_brightness: config.display.default_brightness.min(MAX_BRIGHTNESS),
            virtual_width: chain_len,
            line: TextBuffer::new(),
            scroll: ScrollTimer::new(config.display.scroll_period_ticks),
        };
        session.apply_virtual_width(chain_len);
        session
    }

    /// Access the renderer
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Mutable access to the renderer
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Physical chain length in modules
    pub fn chain_len(&self) -> usize {
        self.chain_len
    }

    /// Virtual display width in modules
    pub fn virtual_width(&self) -> usize {
        self.virtual_width
    }

    /// Text currently held for display
    pub fn line(&self) -> &[u8] {
        self.line.as_bytes()
    }

    /// Scroll timer
    pub fn scroll_timer(&self) -> &ScrollTimer {
        &self.scroll
    }

    fn apply_virtual_width(&mut self, modules: usize) {
        self.driver.set_virtual_chain_length(modules);
        self.virtual_width = self.driver.virtual_chain_length();
    }

    /// Grow the virtual display to at least `required` modules
    pub fn auto_size(&mut self, required: usize) {
        let required = required.max(self.chain_len);
        if required > self.virtual_width {
            self.apply_virtual_width(required);
        }
    }

    /// Turn on the pixel at `col`, `row`, growing the display if needed
    pub fn turn_on(&mut self, col: i32, row: i32) {
        self.auto_size(modules_for_column(col));
        self.driver.switch_on(row, col, false);
    }

    /// Turn off the pixel at `col`, `row`, growing the display if needed
    pub fn turn_off(&mut self, col: i32, row: i32) {
        self.auto_size(modules_for_column(col));
        self.driver.switch_off(row, col, false);
    }

    /// Append one character to the text line and redraw it
    ///
    /// Does not flush, so a client can build a line character by character
    /// and flush once.
    pub fn draw_char(&mut self, code: u8) -> Result<(), ErrorKind> {
        if self.line.is_full() {
            return Err(ErrorKind::TooLong);
        }
        self.line.append(code);
        self.redraw_line();
        Ok(())
    }

    /// Replace the text line, draw it and flush
    pub fn draw_string(&mut self, text: &[u8]) -> Result<(), ErrorKind> {
        if text.len() >= MAX_LINE {
            return Err(ErrorKind::TooLong);
        }
        self.line.set(text);
        self.redraw_line();
        self.driver.flush();
        Ok(())
    }

    fn redraw_line(&mut self) {
        self.auto_size(modules_for_text(self.line.len()));
        for (i, &code) in self.line.as_bytes().iter().enumerate() {
            draw_glyph(
                &mut self.driver,
                &self.font,
                code,
                (i * GLYPH_ADVANCE) as i32,
            );
        }
    }

    /// Push pending changes to the hardware
    pub fn flush(&mut self) {
        self.driver.flush();
    }

    /// Clear everything and return to power-on state
    ///
    /// The only operation that shrinks the virtual display.
    pub fn reset(&mut self) {
        self.line.reset();
        self.driver.switch_off_all(true);
        self.driver.set_intensity(self.default_brightness);
        self.apply_virtual_width(self.chain_len);
        self.scroll.reset();
    }

    /// Set brightness, clamping to 0-15
    pub fn set_brightness(&mut self, level: i32) {
        let level = level.clamp(0, i32::from(MAX_BRIGHTNESS)) as u8;
        self.driver.set_intensity(level);
    }

    /// Scroll one pixel left and flush
    pub fn scroll_once(&mut self) {
        self.driver.scroll(true);
    }

    /// Enable or disable automatic scrolling
    pub fn set_scrolling(&mut self, enabled: bool) {
        self.scroll.set_enabled(enabled);
    }

    /// Service one idle tick of the scroll timer
    ///
    /// Returns true if the display scrolled.
    pub fn tick(&mut self) -> bool {
        if self.scroll.tick() {
            self.scroll_once();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::ScrollState;
    use crate::testing::{DotFont, RecordingMatrix, RECORDING_CAPACITY};

    fn session() -> DisplaySession<RecordingMatrix, DotFont> {
        DisplaySession::new(RecordingMatrix::new(1), DotFont, &BoardConfig::default())
    }

    #[test]
    fn test_new_session_sized_to_chain() {
        let s = session();
        assert_eq!(s.virtual_width(), 4);
        assert_eq!(s.driver().virtual_len, 4);
        assert!(s.line().is_empty());
        assert_eq!(s.scroll_timer().state(), ScrollState::Idle);
    }

    #[test]
    fn test_module_math() {
        assert_eq!(modules_for_column(0), 1);
        assert_eq!(modules_for_column(7), 1);
        assert_eq!(modules_for_column(8), 2);
        assert_eq!(modules_for_column(-1), 1);
        assert_eq!(modules_for_column(-100), 0);
        assert_eq!(modules_for_text(0), 1);
        assert_eq!(modules_for_text(5), 4); // 30 px
        assert_eq!(modules_for_text(6), 5); // 36 px
    }

    #[test]
    fn test_turn_on_within_chain() {
        let mut s = session();
        s.turn_on(3, 4);
        assert!(s.driver().is_on(4, 3));
        assert_eq!(s.virtual_width(), 4);
        assert_eq!(s.driver().flushes, 0);
    }

    #[test]
    fn test_turn_on_grows_virtual_width() {
        let mut s = session();
        s.turn_on(40, 0);
        assert_eq!(s.virtual_width(), 6);
        assert!(s.driver().is_on(0, 40));

        // Never shrinks automatically
        s.turn_on(0, 0);
        assert_eq!(s.virtual_width(), 6);
    }

    #[test]
    fn test_turn_off() {
        let mut s = session();
        s.turn_on(1, 1);
        s.turn_off(1, 1);
        assert!(!s.driver().is_on(1, 1));
    }

    #[test]
    fn test_turn_off_grows_virtual_width() {
        let mut s = session();
        s.turn_off(40, 0);
        assert_eq!(s.virtual_width(), 6);
        assert_eq!(s.driver().virtual_len, 6);

        s.turn_off(0, 0);
        assert_eq!(s.virtual_width(), 6);
    }

    #[test]
    fn test_width_readback_follows_driver_clamp() {
        let mut s = session();
        s.turn_on(100_000, 0);
        assert_eq!(s.virtual_width(), RECORDING_CAPACITY);
    }

    #[test]
    fn test_draw_char_does_not_flush() {
        let mut s = session();
        s.draw_char(b'H').unwrap();
        s.draw_char(b'i').unwrap();
        assert_eq!(s.line(), b"Hi");
        assert!(s.driver().is_on(7, 0));
        assert!(s.driver().is_on(7, 6));
        assert_eq!(s.driver().flushes, 0);
    }

    #[test]
    fn test_draw_char_too_long_at_line_limit() {
        let mut s = session();
        for _ in 0..MAX_LINE - 1 {
            s.draw_char(b'x').unwrap();
        }
        assert_eq!(s.draw_char(b'y'), Err(ErrorKind::TooLong));
        assert_eq!(s.line().len(), MAX_LINE - 1);
    }

    #[test]
    fn test_draw_string_flushes_and_sizes() {
        let mut s = session();
        s.draw_string(b"Hello, world").unwrap();
        assert_eq!(s.line(), b"Hello, world");
        // 12 chars * 6 px = 72 px -> 10 modules
        assert_eq!(s.virtual_width(), 10);
        assert_eq!(s.driver().flushes, 1);
        // The space at index 6 draws nothing
        assert!(!s.driver().is_on(7, 36));
        assert!(s.driver().is_on(7, 66));
    }

    #[test]
    fn test_draw_string_too_long_keeps_line() {
        let mut s = session();
        s.draw_string(b"keep").unwrap();
        let long = [b'a'; MAX_LINE];
        assert_eq!(s.draw_string(&long), Err(ErrorKind::TooLong));
        assert_eq!(s.line(), b"keep");
        assert_eq!(s.driver().flushes, 1);
    }

    #[test]
    fn test_draw_string_longest_allowed() {
        let mut s = session();
        let text = [b'a'; MAX_LINE - 1];
        assert_eq!(s.draw_string(&text), Ok(()));
        assert_eq!(s.line().len(), MAX_LINE - 1);
    }

    #[test]
    fn test_brightness_is_clamped() {
        let mut s = session();
        s.set_brightness(99);
        assert_eq!(s.driver().intensity, Some(15));
        s.set_brightness(-3);
        assert_eq!(s.driver().intensity, Some(0));
        s.set_brightness(7);
        assert_eq!(s.driver().intensity, Some(7));
    }

    #[test]
    fn test_reset_restores_power_on_state() {
        let mut s = session();
        s.draw_string(b"a fairly long line of text").unwrap();
        s.set_scrolling(true);
        s.set_brightness(12);
        assert!(s.virtual_width() > 4);

        s.reset();
        assert!(s.line().is_empty());
        assert_eq!(s.virtual_width(), 4);
        assert_eq!(s.driver().virtual_len, 4);
        assert_eq!(s.driver().intensity, Some(1));
        assert!(s.driver().lit.is_empty());
        assert_eq!(s.driver().clears, 1);
        assert_eq!(s.scroll_timer().state(), ScrollState::Idle);
        assert_eq!(s.scroll_timer().countdown(), 100);
        assert_eq!(s.scroll_timer().period(), 100);
    }

    #[test]
    fn test_tick_scrolls_after_period() {
        let mut s = session();
        s.set_scrolling(true);
        for _ in 0..99 {
            assert!(!s.tick());
        }
        assert!(s.tick());
        assert_eq!(s.driver().scrolls, 1);
        assert_eq!(s.driver().flushes, 1);
        assert_eq!(s.scroll_timer().countdown(), 100);
    }

    #[test]
    fn test_scroll_once_flushes() {
        let mut s = session();
        s.scroll_once();
        assert_eq!(s.driver().scrolls, 1);
        assert_eq!(s.driver().flushes, 1);
    }
}
