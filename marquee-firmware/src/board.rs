//! RP2040 bindings for the marquee-hal traits

use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{self, Blocking, Spi};
use embedded_hal::spi::SpiBus as _;

use marquee_hal::spi::{Phase, Polarity};
use marquee_hal::{OutputPin, SpiBus, SpiConfig};

/// Blocking, transmit-only SPI0 feeding the LED chain
pub struct MatrixSpi(pub Spi<'static, SPI0, Blocking>);

impl SpiBus for MatrixSpi {
    type Error = spi::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.0.blocking_write(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.0.flush()
    }
}

/// Chip select line of the LED chain
pub struct ChipSelect(pub Output<'static>);

impl OutputPin for ChipSelect {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}

/// Translate bus settings into the embassy-rp configuration
pub fn spi_config(config: &SpiConfig) -> spi::Config {
    let mut out = spi::Config::default();
    out.frequency = config.frequency;
    out.polarity = match config.polarity {
        Polarity::IdleLow => spi::Polarity::IdleLow,
        Polarity::IdleHigh => spi::Polarity::IdleHigh,
    };
    out.phase = match config.phase {
        Phase::CaptureOnFirstTransition => spi::Phase::CaptureOnFirstTransition,
        Phase::CaptureOnSecondTransition => spi::Phase::CaptureOnSecondTransition,
    };
    out
}
