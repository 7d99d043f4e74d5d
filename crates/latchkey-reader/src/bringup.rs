//! Bring-up state machine and timing configuration.
//!
//! A reader is trusted only after it has walked the full bring-up sequence:
//! hardware reset, soft reset, version check. The state machine enforces
//! the order; any step failure lands in the terminal [`Faulted`] state, from
//! which only an explicit re-bring-up escapes.
//!
//! # States
//!
//! - `Uninitialized`: nothing has happened yet
//! - `HardReset`: the reset line has been pulsed and released
//! - `SoftReset`: the soft-reset command has been issued and settled
//! - `VersionChecked`: the version register returned the expected value
//! - `Ready`: bring-up complete, the reader may run the self-test and emit
//!   presence events
//! - `Faulted`: a step failed; do not trust this reader
//!
//! # Valid Transitions
//!
//! - Uninitialized → HardReset → SoftReset → VersionChecked → Ready
//! - Ready → HardReset, Faulted → HardReset (explicit re-bring-up)
//! - any state → Faulted
//!
//! [`Faulted`]: BringUpState::Faulted

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use latchkey_core::constants::{
    DEFAULT_HARD_RESET_PULSE_MS, MIN_HARD_RESET_PULSE_MS, SOFT_RESET_SETTLE_MS,
};
use latchkey_core::{Error, Result};

/// Phases of reader bring-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BringUpState {
    /// No bring-up step has run.
    Uninitialized,

    /// Reset line pulsed low and released.
    HardReset,

    /// Soft-reset command issued and settled.
    SoftReset,

    /// Version register matched the expected value.
    VersionChecked,

    /// Bring-up complete; the reader may be trusted.
    Ready,

    /// A bring-up or self-test step failed; the reader must not be trusted
    /// until a fresh bring-up succeeds.
    Faulted,
}

impl BringUpState {
    /// Check if transition to the target state is valid from this state.
    ///
    /// # Examples
    ///
    /// ```
    /// use latchkey_reader::BringUpState;
    ///
    /// assert!(BringUpState::Uninitialized.can_transition_to(&BringUpState::HardReset));
    /// assert!(!BringUpState::Uninitialized.can_transition_to(&BringUpState::Ready));
    ///
    /// // faulting is always possible, recovery only via re-bring-up
    /// assert!(BringUpState::SoftReset.can_transition_to(&BringUpState::Faulted));
    /// assert!(BringUpState::Faulted.can_transition_to(&BringUpState::HardReset));
    /// ```
    pub fn can_transition_to(&self, target: &BringUpState) -> bool {
        matches!(
            (self, target),
            // the forward sequence
            (BringUpState::Uninitialized, BringUpState::HardReset)
                | (BringUpState::HardReset, BringUpState::SoftReset)
                | (BringUpState::SoftReset, BringUpState::VersionChecked)
                | (BringUpState::VersionChecked, BringUpState::Ready)
                // explicit re-bring-up
                | (BringUpState::Ready, BringUpState::HardReset)
                | (BringUpState::Faulted, BringUpState::HardReset)
                // any step may fault
                | (_, BringUpState::Faulted)
        )
    }

    /// Check whether this is the trusted end state.
    pub fn is_ready(&self) -> bool {
        matches!(self, BringUpState::Ready)
    }
}

impl fmt::Display for BringUpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            BringUpState::Uninitialized => "Uninitialized",
            BringUpState::HardReset => "HardReset",
            BringUpState::SoftReset => "SoftReset",
            BringUpState::VersionChecked => "VersionChecked",
            BringUpState::Ready => "Ready",
            BringUpState::Faulted => "Faulted",
        };
        write!(f, "{}", state_str)
    }
}

/// Reset timing configuration.
///
/// The hard-reset pulse width varies across observed boards (100–200 ms)
/// and has no authoritative datasheet minimum, so it is configurable with
/// the longest observed value as the default and the known-good floor
/// enforced at construction.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use latchkey_reader::BringUpConfig;
///
/// let config = BringUpConfig::default();
/// assert_eq!(config.hard_reset_pulse(), Duration::from_millis(200));
///
/// // below the 100 ms floor is rejected
/// assert!(
///     BringUpConfig::new(Duration::from_millis(50), Duration::from_millis(150)).is_err()
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BringUpConfig {
    hard_reset_pulse: Duration,
    soft_reset_settle: Duration,
}

impl BringUpConfig {
    /// Create a configuration with explicit timings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the hard-reset pulse is shorter
    /// than the 100 ms floor.
    pub fn new(hard_reset_pulse: Duration, soft_reset_settle: Duration) -> Result<Self> {
        if hard_reset_pulse < Duration::from_millis(MIN_HARD_RESET_PULSE_MS) {
            return Err(Error::config(format!(
                "hard-reset pulse must be at least {}ms, got {}ms",
                MIN_HARD_RESET_PULSE_MS,
                hard_reset_pulse.as_millis()
            )));
        }
        Ok(Self {
            hard_reset_pulse,
            soft_reset_settle,
        })
    }

    /// How long the reset line is held low.
    pub fn hard_reset_pulse(&self) -> Duration {
        self.hard_reset_pulse
    }

    /// How long the chip settles after a soft-reset command.
    pub fn soft_reset_settle(&self) -> Duration {
        self.soft_reset_settle
    }
}

impl Default for BringUpConfig {
    fn default() -> Self {
        Self {
            hard_reset_pulse: Duration::from_millis(DEFAULT_HARD_RESET_PULSE_MS),
            soft_reset_settle: Duration::from_millis(SOFT_RESET_SETTLE_MS),
        }
    }
}
