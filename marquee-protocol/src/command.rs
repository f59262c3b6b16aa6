//! Command letters and line parsing
//!
//! Commands fall into three groups:
//! - Display control: reset (`R`), brightness (`I`), scrolling (`S`, `G`, `H`)
//! - Individual LEDs: on (`A`) and off (`B`)
//! - Text: character (`C`) and string (`D`) output
//!
//! Most commands only touch the off-screen frame; nothing reaches the
//! hardware until a flush (`F`). `D` and `S` flush implicitly.

// Command letters
pub const CMD_ON: u8 = b'A';
pub const CMD_OFF: u8 = b'B';
pub const CMD_CHAR: u8 = b'C';
pub const CMD_STRING: u8 = b'D';
pub const CMD_FLUSH: u8 = b'F';
pub const CMD_SCROLL_ON: u8 = b'G';
pub const CMD_SCROLL_OFF: u8 = b'H';
pub const CMD_BRIGHTNESS: u8 = b'I';
pub const CMD_RESET: u8 = b'R';
pub const CMD_SCROLL: u8 = b'S';

/// Command kinds understood by the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandKind {
    /// `Acol,row`: turn on an LED
    On,
    /// `Bcol,row`: turn off an LED
    Off,
    /// `Cc`: append one character to the text line
    Char,
    /// `Dstring`: replace the text line, draw and flush
    String,
    /// `F`: flush pending changes to the hardware
    Flush,
    /// `G`: enable automatic scrolling
    ScrollOn,
    /// `H`: disable automatic scrolling
    ScrollOff,
    /// `In`: set brightness 0-15
    Brightness,
    /// `R`: full reset
    Reset,
    /// `S`: scroll one pixel and flush
    Scroll,
}

/// First-byte lookup table
const COMMAND_TABLE: [(u8, CommandKind); 10] = [
    (CMD_ON, CommandKind::On),
    (CMD_OFF, CommandKind::Off),
    (CMD_CHAR, CommandKind::Char),
    (CMD_STRING, CommandKind::String),
    (CMD_FLUSH, CommandKind::Flush),
    (CMD_SCROLL_ON, CommandKind::ScrollOn),
    (CMD_SCROLL_OFF, CommandKind::ScrollOff),
    (CMD_BRIGHTNESS, CommandKind::Brightness),
    (CMD_RESET, CommandKind::Reset),
    (CMD_SCROLL, CommandKind::Scroll),
];

impl CommandKind {
    /// Look up a command by its letter
    pub fn from_byte(byte: u8) -> Option<Self> {
        COMMAND_TABLE
            .iter()
            .find(|(letter, _)| *letter == byte)
            .map(|&(_, kind)| kind)
    }

    /// The command letter on the wire
    pub fn to_byte(self) -> u8 {
        match self {
            CommandKind::On => CMD_ON,
            CommandKind::Off => CMD_OFF,
            CommandKind::Char => CMD_CHAR,
            CommandKind::String => CMD_STRING,
            CommandKind::Flush => CMD_FLUSH,
            CommandKind::ScrollOn => CMD_SCROLL_ON,
            CommandKind::ScrollOff => CMD_SCROLL_OFF,
            CommandKind::Brightness => CMD_BRIGHTNESS,
            CommandKind::Reset => CMD_RESET,
            CommandKind::Scroll => CMD_SCROLL,
        }
    }
}

/// A parsed command line
///
/// Borrows its argument from the input buffer, so it cannot outlive the
/// line it was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command<'a> {
    /// Which command
    pub kind: CommandKind,
    /// Everything after the command letter, unvalidated
    pub args: &'a [u8],
}

/// Errors that can occur while parsing a command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError<'a> {
    /// Empty line, no command letter
    TooShort,
    /// Unknown command letter; carries the rest of the line
    BadCommand { rest: &'a [u8] },
}

/// Parse one complete, terminator-free line
///
/// Argument syntax is not checked here; each command validates its own.
pub fn parse_line(line: &[u8]) -> Result<Command<'_>, ParseError<'_>> {
    let (&letter, args) = line.split_first().ok_or(ParseError::TooShort)?;
    let kind = CommandKind::from_byte(letter).ok_or(ParseError::BadCommand { rest: args })?;
    Ok(Command { kind, args })
}
