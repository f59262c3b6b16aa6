//! Marquee - Scrolling LED Matrix Firmware
//!
//! Main firmware binary for RP2040 boards driving a chain of MAX7219 8x8
//! LED modules. A host talks to the board over a line-oriented serial
//! protocol: set pixels, write text, and scroll a virtual display that can
//! be wider than the physical chain.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::spi::Spi;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use marquee_core::config::{parse_config, BoardConfig};
use marquee_core::{Dispatcher, DisplaySession};
use marquee_drivers::{max7219, Max7219, MonoGlyphs};

use crate::board::{ChipSelect, MatrixSpi};
use crate::tasks::Display;

mod board;
mod tasks;

/// Embedded configuration (compiled into firmware)
/// Edit display.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../display.toml");

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 512]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

static DISPLAY: StaticCell<Display> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Marquee firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    info!(
        "Config: {} modules, brightness {}, scroll every {} ticks of {} ms",
        config.matrix.chain_len,
        config.display.default_brightness,
        config.display.scroll_period_ticks,
        config.display.poll_timeout_ms
    );

    // LED chain on SPI0: SCK=GPIO18, MOSI=GPIO19, CS=GPIO17
    let spi_config = board::spi_config(&max7219::spi_config(config.matrix.spi_frequency_hz));
    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);
    let cs = Output::new(p.PIN_17, Level::High);

    let mut matrix = Max7219::new(
        MatrixSpi(spi),
        ChipSelect(cs),
        config.chain_len(),
        config.matrix.reverse_columns,
    );
    matrix.init(config.display.default_brightness);
    if let Some(fault) = matrix.take_fault() {
        warn!("Matrix init failed: {:?}", fault);
    }
    info!("LED matrix initialized ({} modules)", matrix.chain_len());

    let session = DisplaySession::new(matrix, MonoGlyphs::new(), &config);
    let display = DISPLAY.init(Dispatcher::new(session, config.display.poll_timeout_ms));

    // Host link on UART0: TX=GPIO0, RX=GPIO1
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.serial.baudrate;

    let tx_buf = TX_BUF.init([0u8; 512]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("UART initialized at {} baud", config.serial.baudrate);

    spawner
        .spawn(tasks::serial_task(
            display,
            rx,
            tx,
            config.display.poll_timeout_ms,
        ))
        .unwrap();

    info!("Marquee ready");
}

/// Parse and validate the embedded configuration, falling back to defaults
fn load_config() -> BoardConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            warn!("Embedded config parse error: {:?}, using defaults", e);
            return BoardConfig::default();
        }
    };

    match config.validate() {
        Ok(()) => config,
        Err(e) => {
            warn!("Embedded config invalid: {:?}, using defaults", e);
            BoardConfig::default()
        }
    }
}
