//! Board-agnostic core logic for the LED matrix display firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Collaborator traits for the matrix renderer and the glyph table
//! - Display session (virtual width, text line, drawing)
//! - Scroll timer state machine
//! - Command dispatch loop
//! - Configuration type definitions and parsing

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod dispatch;
pub mod scroll;
pub mod session;
pub mod traits;

#[cfg(test)]
mod testing;

pub use dispatch::{execute, Dispatcher, LinkError};
pub use scroll::{ScrollState, ScrollTimer};
pub use session::DisplaySession;
