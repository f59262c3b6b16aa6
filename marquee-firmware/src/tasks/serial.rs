//! Host serial task
//!
//! Runs the command dispatcher over the buffered UART. A read that times
//! out is one idle tick of the scroll timer; any received bytes are fed to
//! the dispatcher and each completed line is answered immediately.

use defmt::*;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embassy_time::{with_timeout, Duration};
use embedded_io_async::{Read, Write};

use marquee_core::Dispatcher;
use marquee_drivers::{Max7219, MonoGlyphs};

use crate::board::{ChipSelect, MatrixSpi};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// The concrete dispatcher this board runs
pub type Display = Dispatcher<Max7219<MatrixSpi, ChipSelect>, MonoGlyphs>;

/// Serial task - owns the display and answers host commands
#[embassy_executor::task]
pub async fn serial_task(
    display: &'static mut Display,
    mut rx: BufferedUartRx,
    mut tx: BufferedUartTx,
    poll_timeout_ms: u16,
) {
    info!("Serial task started");

    let poll = Duration::from_millis(u64::from(poll_timeout_ms));
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match with_timeout(poll, rx.read(&mut buf)).await {
            Err(_) => {
                if display.idle_tick() {
                    trace!("Scrolled");
                }
            }
            Ok(Ok(n)) => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    let Some(line) = display.feed(byte) else {
                        continue;
                    };
                    debug!("Response: {=[u8]:a}", line.as_slice());
                    if let Err(e) = tx.write_all(&line).await {
                        warn!("UART write error: {:?}", e);
                    }
                }
            }
            Ok(Err(e)) => {
                warn!("UART read error: {:?}", e);
            }
        }

        if let Some(fault) = display.session_mut().driver_mut().take_fault() {
            warn!("Matrix SPI fault: {:?}", fault);
        }
    }
}
