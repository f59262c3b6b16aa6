//! Glyph lookup trait

/// Rows per glyph
pub const GLYPH_ROWS: usize = 8;

/// Horizontal distance between consecutive characters, in pixels
///
/// Glyphs are five pixels wide with a one pixel gap.
pub const GLYPH_ADVANCE: usize = 6;

/// Source of character bitmaps
///
/// Each glyph is eight bytes, one per row, top row first. Bit 7 of a row is
/// the leftmost column.
pub trait GlyphSource {
    /// Bitmap for the 8-bit character `code`
    fn glyph_rows(&self, code: u8) -> [u8; GLYPH_ROWS];
}
