//! Configuration type definitions

/// Largest physical chain the firmware is built for
pub const MAX_CHAIN_LEN: u8 = 32;

/// Highest brightness level the modules accept
pub const MAX_BRIGHTNESS: u8 = 15;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Chain length is zero or above [`MAX_CHAIN_LEN`]
    ChainLength,
    /// Default brightness above [`MAX_BRIGHTNESS`]
    Brightness,
    /// Scroll period of zero ticks
    ScrollPeriod,
    /// Read timeout of zero milliseconds
    PollTimeout,
}

/// Display behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// Idle ticks between automatic scroll steps
    pub scroll_period_ticks: u16,
    /// Serial read timeout; each expiry is one scroll tick
    pub poll_timeout_ms: u16,
    /// Brightness applied at start-up and on reset
    pub default_brightness: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            scroll_period_ticks: 100,
            poll_timeout_ms: 1,
            default_brightness: 1,
        }
    }
}

/// LED matrix chain wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MatrixHwConfig {
    /// Number of physical 8x8 modules in the chain
    pub chain_len: u8,
    /// Mirror each module horizontally (depends on how the matrix is wired)
    pub reverse_columns: bool,
    /// SPI clock
    pub spi_frequency_hz: u32,
}

impl Default for MatrixHwConfig {
    fn default() -> Self {
        Self {
            chain_len: 4,
            reverse_columns: false,
            spi_frequency_hz: 2_000_000,
        }
    }
}

/// Host serial link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialHwConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
}

impl Default for SerialHwConfig {
    fn default() -> Self {
        Self { baudrate: 115_200 }
    }
}

/// Complete board configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardConfig {
    pub display: DisplayConfig,
    pub matrix: MatrixHwConfig,
    pub serial: SerialHwConfig,
}

impl BoardConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.matrix.chain_len == 0 || self.matrix.chain_len > MAX_CHAIN_LEN {
            return Err(ConfigError::ChainLength);
        }
        if self.display.default_brightness > MAX_BRIGHTNESS {
            return Err(ConfigError::Brightness);
        }
        if self.display.scroll_period_ticks == 0 {
            return Err(ConfigError::ScrollPeriod);
        }
        if self.display.poll_timeout_ms == 0 {
            return Err(ConfigError::PollTimeout);
        }
        Ok(())
    }

    /// Physical chain length in modules
    pub fn chain_len(&self) -> usize {
        usize::from(self.matrix.chain_len)
    }
}
