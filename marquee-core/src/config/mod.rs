//! Configuration types
//!
//! Board configuration is compiled into the firmware as TOML text and
//! parsed at start-up without an allocator.

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ParseError};
pub use types::*;
