//! Collaborator traits
//!
//! These traits define the interface between the display session and the
//! hardware-specific renderer and font implementations.

pub mod font;
pub mod matrix;

pub use font::{GlyphSource, GLYPH_ADVANCE, GLYPH_ROWS};
pub use matrix::{MatrixDriver, MODULE_WIDTH};
