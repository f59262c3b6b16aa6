//! Simple TOML parser for board configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! the display configuration. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - [section] headers
//! - Key = value pairs (integer, boolean)
//! - `_` digit separators in integers
//! - Comments (# ...), whole-line or trailing
//!
//! NOT supported:
//! - Strings, arrays, inline tables
//! - Dotted keys

use super::types::BoardConfig;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not valid in its section
    UnknownKey,
    /// Value of the wrong type or out of range
    InvalidValue,
    /// Line is neither a header nor a key/value pair
    InvalidLine,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Display,
    Matrix,
    Serial,
}

/// Parse TOML configuration into a [`BoardConfig`]
///
/// Keys that are not present keep their default values. The result is not
/// range-checked; call [`BoardConfig::validate`] for that.
pub fn parse_config(input: &str) -> Result<BoardConfig, ParseError> {
    let mut config = BoardConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        // Check for section header
        if let Some(header) = line.strip_prefix('[') {
            let name = header.strip_suffix(']').ok_or(ParseError::InvalidSection)?;
            section = parse_section_header(name.trim())?;
            continue;
        }

        let (key, value) = line.split_once('=').ok_or(ParseError::InvalidLine)?;
        apply_key(&mut config, section, key.trim(), value.trim())?;
    }

    Ok(config)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn parse_section_header(name: &str) -> Result<Section, ParseError> {
    match name {
        "display" => Ok(Section::Display),
        "matrix" => Ok(Section::Matrix),
        "serial" => Ok(Section::Serial),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_key(
    config: &mut BoardConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Display, "scroll_period_ticks") => {
            config.display.scroll_period_ticks = parse_int(value)?;
        }
        (Section::Display, "poll_timeout_ms") => {
            config.display.poll_timeout_ms = parse_int(value)?;
        }
        (Section::Display, "default_brightness") => {
            config.display.default_brightness = parse_int(value)?;
        }
        (Section::Matrix, "chain_len") => {
            config.matrix.chain_len = parse_int(value)?;
        }
        (Section::Matrix, "reverse_columns") => {
            config.matrix.reverse_columns = parse_bool(value)?;
        }
        (Section::Matrix, "spi_frequency_hz") => {
            config.matrix.spi_frequency_hz = parse_int(value)?;
        }
        (Section::Serial, "baudrate") => {
            config.serial.baudrate = parse_int(value)?;
        }
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

/// Parse an unsigned integer, allowing `_` separators
fn parse_int<T: TryFrom<u64>>(value: &str) -> Result<T, ParseError> {
    if value.is_empty() || value.starts_with('_') {
        return Err(ParseError::InvalidValue);
    }

    let mut acc: u64 = 0;
    for ch in value.chars() {
        if ch == '_' {
            continue;
        }
        let digit = ch.to_digit(10).ok_or(ParseError::InvalidValue)?;
        acc = acc
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(digit)))
            .ok_or(ParseError::InvalidValue)?;
    }

    T::try_from(acc).map_err(|_| ParseError::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}
