//! Hardware driver implementations
//!
//! Concrete implementations of the collaborator traits defined in
//! marquee-core:
//!
//! - MAX7219 LED matrix chain ([`max7219::Max7219`])
//! - Glyph table rasterised from embedded-graphics mono fonts
//!   ([`font::MonoGlyphs`])

#![no_std]
#![deny(unsafe_code)]

pub mod font;
pub mod max7219;

pub use font::MonoGlyphs;
pub use max7219::{Max7219, MAX_VIRTUAL_MODULES};
