//! Marquee Serial Protocol
//!
//! This crate defines the ASCII command protocol spoken between a host and
//! the LED matrix display over a serial link. The protocol is designed to be
//! typed by hand in a terminal emulator as easily as it is scripted.
//!
//! # Protocol Overview
//!
//! Every command is one line: a single command letter, an optional argument,
//! and a line feed. A carriage return anywhere in the stream is ignored.
//! ```text
//! ┌─────┬──────────────┬────┐
//! │ CMD │ ARGUMENT     │ LF │
//! │ 1B  │ 0–254B       │ 1B │
//! └─────┴──────────────┴────┘
//! ```
//!
//! Every line, valid or not, is answered with exactly one response line:
//! ```text
//! <code> <label>[ <text>]\n
//! ```
//!
//! Nothing is echoed and no output is ever unsolicited.

#![no_std]
#![deny(unsafe_code)]

pub mod args;
pub mod buffer;
pub mod command;
pub mod response;

pub use buffer::{InputBuffer, LineBuffer, TextBuffer};
pub use command::{parse_line, Command, CommandKind, ParseError};
pub use response::{ErrorKind, Response, ResponseLine, MAX_RESPONSE_LEN};

/// Maximum length of an input command line, including the command letter.
///
/// Must be greater than [`MAX_LINE`].
pub const MAX_INPUT: usize = 256;

/// Maximum length of the text line held for display.
///
/// Long lines take ages to read unless the scroll speed is very fast.
pub const MAX_LINE: usize = 128;

/// Line terminator
pub const LINE_FEED: u8 = b'\n';

/// Ignored wherever it appears in the input stream
pub const CARRIAGE_RETURN: u8 = b'\r';

const _: () = assert!(MAX_INPUT > MAX_LINE);
