//! Glyph table backed by embedded-graphics mono fonts
//!
//! Glyphs are rasterised on demand into an 8x8 one-bit canvas, so any
//! `MonoFont` up to 8 pixels square can feed the display. The default is
//! the 5x8 ISO 8859-1 font, so every byte of an 8-bit line maps to a Latin-1
//! glyph. It leaves the rightmost three columns of every row clear; together
//! with the six pixel advance that gives a one pixel gap between characters.

use core::convert::Infallible;

use embedded_graphics::mono_font::iso_8859_1::FONT_5X8;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use marquee_core::traits::{GlyphSource, GLYPH_ROWS};

/// Glyph source rendering an embedded-graphics mono font
#[derive(Clone, Copy)]
pub struct MonoGlyphs {
    font: &'static MonoFont<'static>,
}

impl MonoGlyphs {
    /// Glyphs from the 5x8 Latin-1 font
    pub const fn new() -> Self {
        Self { font: &FONT_5X8 }
    }

    /// Glyphs from another font; anything beyond 8x8 is clipped
    pub const fn with_font(font: &'static MonoFont<'static>) -> Self {
        Self { font }
    }
}

impl Default for MonoGlyphs {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphSource for MonoGlyphs {
    fn glyph_rows(&self, code: u8) -> [u8; GLYPH_ROWS] {
        let mut canvas = GlyphCanvas::default();
        // Control codes have no glyph and would move the text cursor
        if code < 0x20 || code == 0x7F {
            return canvas.rows;
        }

        // Each byte is the Latin-1 char of the same value; codes the font
        // lacks get its replacement glyph
        let mut utf8 = [0u8; 4];
        let text = char::from(code).encode_utf8(&mut utf8);
        let style = MonoTextStyle::new(self.font, BinaryColor::On);
        let text = Text::with_baseline(text, Point::zero(), style, Baseline::Top);
        if let Err(never) = text.draw(&mut canvas) {
            match never {}
        }
        canvas.rows
    }
}

/// 8x8 one-bit draw target, bit 7 of each row is x = 0
#[derive(Default)]
struct GlyphCanvas {
    rows: [u8; GLYPH_ROWS],
}

impl OriginDimensions for GlyphCanvas {
    fn size(&self) -> Size {
        Size::new(8, GLYPH_ROWS as u32)
    }
}

impl DrawTarget for GlyphCanvas {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if color.is_off() {
                continue;
            }
            if let (Ok(x @ 0..=7), Ok(y @ 0..=7)) =
                (usize::try_from(point.x), usize::try_from(point.y))
            {
                self.rows[y] |= 0x80 >> x;
            }
        }
        Ok(())
    }
}
