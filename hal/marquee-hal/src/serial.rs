//! Serial link abstractions
//!
//! The host link is a plain byte stream. The receive side exposes a
//! bounded-timeout read because the display engine uses the idle time
//! between bytes as its scheduling tick.

/// Serial transmitter
pub trait SerialTx {
    /// Error type for transmit operations
    type Error;

    /// Write all of `data` to the link
    ///
    /// Blocks until all data has been written or an error occurs.
    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Serial receiver
pub trait SerialRx {
    /// Error type for receive operations
    type Error;

    /// Read a single byte, waiting at most `timeout_ms` milliseconds
    ///
    /// Returns `Ok(None)` when the timeout expired without data.
    fn read_byte_timeout(&mut self, timeout_ms: u32) -> Result<Option<u8>, Self::Error>;
}
