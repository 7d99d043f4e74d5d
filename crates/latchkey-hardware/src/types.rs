//! Common types shared across hardware implementations.

use serde::{Deserialize, Serialize};

/// Logic level of a digital line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineLevel {
    /// Line driven low.
    Low,

    /// Line driven high.
    High,
}

impl LineLevel {
    /// Check whether the level is high.
    pub fn is_high(&self) -> bool {
        matches!(self, LineLevel::High)
    }
}

/// SPI transport information.
///
/// Contains bus metadata used for logging and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportInfo {
    /// Transport name (e.g., "SPI0/CE0", "Mock reader chip").
    pub name: String,

    /// Bus clock rate in hertz, if known.
    pub max_clock_hz: Option<u32>,
}

impl TransportInfo {
    /// Create a new TransportInfo.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_clock_hz: None,
        }
    }

    /// Set the bus clock rate.
    pub fn with_max_clock_hz(mut self, max_clock_hz: u32) -> Self {
        self.max_clock_hz = Some(max_clock_hz);
        self
    }
}
