//! Response lines
//!
//! Each processed command line produces exactly one response:
//! ```text
//! <code> <label>[ <text>]\n
//! ```
//! Responses end with a bare LF, no CR. The optional text is the offending
//! argument echoed back verbatim. It cannot contain a line feed because it
//! was itself delimited by one.

use heapless::Vec;

use crate::MAX_INPUT;

/// Longest label plus code, separators and terminator
const MAX_HEADER_LEN: usize = 16;

/// Maximum encoded response size
pub const MAX_RESPONSE_LEN: usize = MAX_HEADER_LEN + MAX_INPUT;

/// An encoded response, ready to write to the link
pub type ResponseLine = Vec<u8, MAX_RESPONSE_LEN>;

/// Command failures reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// Missing command letter or empty required argument
    TooShort,
    /// Argument present but not parseable
    ArgsInvalid,
    /// Unknown command letter
    BadCommand,
    /// Text longer than the display line allows
    TooLong,
}

impl ErrorKind {
    /// Numeric response code
    pub fn code(self) -> u8 {
        match self {
            ErrorKind::TooShort => 1,
            ErrorKind::ArgsInvalid => 2,
            ErrorKind::BadCommand => 3,
            ErrorKind::TooLong => 4,
        }
    }

    /// Response label
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::TooShort => "too_short",
            ErrorKind::ArgsInvalid => "bad_arguments",
            ErrorKind::BadCommand => "bad_command",
            ErrorKind::TooLong => "too_long",
        }
    }
}

/// Outcome of one command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Response<'a> {
    error: Option<ErrorKind>,
    text: Option<&'a [u8]>,
}

impl<'a> Response<'a> {
    /// Success: `0 OK`
    pub const fn ok() -> Self {
        Self {
            error: None,
            text: None,
        }
    }

    /// Failure without diagnostic text
    pub const fn error(kind: ErrorKind) -> Self {
        Self {
            error: Some(kind),
            text: None,
        }
    }

    /// Failure echoing the offending argument
    pub const fn error_with_text(kind: ErrorKind, text: &'a [u8]) -> Self {
        Self {
            error: Some(kind),
            text: Some(text),
        }
    }

    /// Returns true for `0 OK`
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// The failure, if any
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error
    }

    /// Numeric response code
    pub fn code(&self) -> u8 {
        self.error.map_or(0, ErrorKind::code)
    }

    /// Response label
    pub fn label(&self) -> &'static str {
        self.error.map_or("OK", ErrorKind::label)
    }

    /// Diagnostic text
    pub fn text(&self) -> Option<&'a [u8]> {
        self.text
    }

    /// Encode to a response line
    ///
    /// Text that would overflow [`MAX_RESPONSE_LEN`] is cut short; the line
    /// terminator is always present.
    pub fn to_line(&self) -> ResponseLine {
        let mut line = ResponseLine::new();
        // Header fits: code is one digit, labels are at most 13 bytes
        let _ = line.push(b'0' + self.code());
        let _ = line.push(b' ');
        let _ = line.extend_from_slice(self.label().as_bytes());

        if let Some(text) = self.text {
            let _ = line.push(b' ');
            let room = MAX_RESPONSE_LEN - line.len() - 1;
            let len = text.len().min(room);
            let _ = line.extend_from_slice(&text[..len]);
        }

        let _ = line.push(b'\n');
        line
    }
}

impl<'a> From<Result<(), ErrorKind>> for Response<'a> {
    fn from(result: Result<(), ErrorKind>) -> Self {
        match result {
            Ok(()) => Response::ok(),
            Err(kind) => Response::error(kind),
        }
    }
}
