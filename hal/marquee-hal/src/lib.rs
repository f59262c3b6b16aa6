//! Marquee Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that can be implemented
//! by chip-specific code (RP2040 today). The display engine and the LED
//! matrix driver only ever talk to these traits, which keeps them testable
//! on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  marquee-firmware (embassy, RP2040)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  marquee-core / marquee-drivers         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  marquee-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital output (chip select)
//! - [`spi::SpiBus`] - SPI bus operations
//! - [`serial::SerialRx`], [`serial::SerialTx`] - Host serial link

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod serial;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use gpio::OutputPin;
pub use serial::{SerialRx, SerialTx};
pub use spi::{Mode, SpiBus, SpiConfig};
