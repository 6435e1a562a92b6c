//! Emulated transceiver state
//!
//! One `RadioState` models the one fake radio every connected client
//! sees. It is owned by the server and passed by mutable reference into
//! each session's process step; there is deliberately no global and no
//! lock, because the whole server is single-threaded.

use serde::{Deserialize, Serialize};

/// Current state of the emulated transceiver
///
/// Fields are plain and public; handlers read and write them directly.
/// Last writer wins across clients, which is exactly how one physical
/// radio shared by several control programs behaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioState {
    /// Receive frequency in Hz
    pub frequency_hz: u64,
    /// Operating mode token, e.g. "USB"
    pub mode: String,
    /// Passband width in Hz
    pub passband_hz: u32,
    /// Selected VFO token
    pub vfo: String,
    /// Transmit active
    pub ptt: bool,
    /// Split enable token as last set by a client ("0" = off)
    pub split_enabled: String,
    /// Transmit VFO token
    pub tx_vfo: String,
    /// Transmit frequency in Hz (split operation)
    pub tx_frequency_hz: u64,
    /// Transmit mode token (split operation)
    pub tx_mode: String,
    /// Transmit passband width in Hz (split operation)
    pub tx_passband_hz: u32,
}

/// Initial state for the emulated radio
///
/// Loadable from JSON via the server binary; only the receive side is
/// configurable, the split/TX mirrors start out equal to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RadioConfig {
    /// Initial frequency in Hz
    pub frequency_hz: u64,
    /// Initial operating mode
    pub mode: String,
    /// Initial passband width in Hz
    pub passband_hz: u32,
    /// Initial VFO token
    pub vfo: String,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 21_200_500, // 15m
            mode: "USB".to_string(),
            passband_hz: 2_400,
            vfo: "VFO".to_string(),
        }
    }
}

impl RadioState {
    /// Create a radio with default state (21.2005 MHz USB, receiving)
    pub fn new() -> Self {
        Self::from_config(RadioConfig::default())
    }

    /// Create a radio from configuration
    pub fn from_config(config: RadioConfig) -> Self {
        Self {
            frequency_hz: config.frequency_hz,
            mode: config.mode.clone(),
            passband_hz: config.passband_hz,
            vfo: config.vfo.clone(),
            ptt: false,
            split_enabled: "0".to_string(),
            tx_vfo: config.vfo,
            tx_frequency_hz: config.frequency_hz,
            tx_mode: config.mode,
            tx_passband_hz: config.passband_hz,
        }
    }

    /// Get a one-line summary of current state, for logging
    pub fn summary(&self) -> String {
        format!(
            "{:.4} MHz {} {} {}",
            self.frequency_hz as f64 / 1_000_000.0,
            self.mode,
            self.vfo,
            if self.ptt { "[TX]" } else { "[RX]" }
        )
    }
}

impl Default for RadioState {
    fn default() -> Self {
        Self::new()
    }
}
