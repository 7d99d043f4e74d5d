//! Shared types for the Latchkey lock controller.
//!
//! These types flow between the hardware layer, the reader driver, and the
//! access-decision engine: validated token slots, the lock state owned by
//! the decision engine, presence events, and the quorum policy.

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_QUORUM_THRESHOLD, TOKEN_SLOT_COUNT};
use crate::error::{Error, Result};

/// A validated token slot index.
///
/// Each slot corresponds to one antenna region / presence line. Constructing
/// a `TokenSlot` validates the index against [`TOKEN_SLOT_COUNT`], so bitmap
/// indexing downstream can never go out of bounds.
///
/// # Examples
///
/// ```
/// use latchkey_core::TokenSlot;
///
/// let slot = TokenSlot::new(1).unwrap();
/// assert_eq!(slot.index(), 1);
///
/// assert!(TokenSlot::new(3).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSlot(u8);

impl TokenSlot {
    /// Create a token slot from a raw index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is not below [`TOKEN_SLOT_COUNT`].
    pub fn new(index: u8) -> Result<Self> {
        if (index as usize) >= TOKEN_SLOT_COUNT {
            return Err(Error::InvalidTokenSlot {
                slot: index,
                count: TOKEN_SLOT_COUNT,
            });
        }
        Ok(Self(index))
    }

    /// The slot index, guaranteed to be below [`TOKEN_SLOT_COUNT`].
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// Iterate over every configured slot.
    pub fn all() -> impl Iterator<Item = TokenSlot> {
        (0..TOKEN_SLOT_COUNT as u8).map(TokenSlot)
    }
}

impl fmt::Display for TokenSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot {}", self.0)
    }
}

/// The state of the physical lock, as commanded by the decision engine.
///
/// The actuator itself is stateless; this is the engine's record of the
/// last command it issued. The default is [`LockState::Locked`] — the
/// controller must never come up unlocked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    /// Solenoid engaged, door secured.
    #[default]
    Locked,

    /// Solenoid released, door may open.
    Unlocked,
}

impl LockState {
    /// Check whether the lock is in the secured state.
    pub fn is_locked(&self) -> bool {
        matches!(self, LockState::Locked)
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockState::Locked => write!(f, "locked"),
            LockState::Unlocked => write!(f, "unlocked"),
        }
    }
}

/// A token presence transition observed at an antenna.
///
/// Events carry the `Instant` they were observed at so the decision engine
/// debounces on observation spacing rather than on processing time, even
/// when events queue up in the channel.
#[derive(Debug, Clone, Copy)]
pub struct PresenceEvent {
    /// Which slot the transition was observed on.
    pub slot: TokenSlot,

    /// Whether a token is now detected in the slot's antenna region.
    pub present: bool,

    /// When the transition was observed at the source.
    pub at: Instant,
}

impl PresenceEvent {
    /// Create an event observed now.
    pub fn new(slot: TokenSlot, present: bool) -> Self {
        Self {
            slot,
            present,
            at: Instant::now(),
        }
    }

    /// Create an event with an explicit observation instant.
    ///
    /// Used by sources that timestamp at the interrupt edge, and by tests
    /// that need deterministic spacing.
    pub fn observed_at(slot: TokenSlot, present: bool, at: Instant) -> Self {
        Self { slot, present, at }
    }
}

/// Quorum policy: how many simultaneously present tokens unlock the door.
///
/// # Examples
///
/// ```
/// use latchkey_core::QuorumPolicy;
///
/// let policy = QuorumPolicy::default();
/// assert!(!policy.met(1));
/// assert!(policy.met(2));
///
/// // Thresholds outside 1..=TOKEN_SLOT_COUNT are rejected
/// assert!(QuorumPolicy::new(0).is_err());
/// assert!(QuorumPolicy::new(4).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumPolicy {
    threshold: usize,
}

impl QuorumPolicy {
    /// Create a policy with the given threshold.
    ///
    /// # Errors
    ///
    /// Returns a configuration error unless `1 <= threshold <= TOKEN_SLOT_COUNT`.
    pub fn new(threshold: usize) -> Result<Self> {
        if threshold == 0 || threshold > TOKEN_SLOT_COUNT {
            return Err(Error::config(format!(
                "quorum threshold must be 1-{}, got {}",
                TOKEN_SLOT_COUNT, threshold
            )));
        }
        Ok(Self { threshold })
    }

    /// The configured threshold.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Check whether a present-token count satisfies the quorum.
    pub fn met(&self, count: usize) -> bool {
        count >= self.threshold
    }
}

impl Default for QuorumPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_QUORUM_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_slot_validation() {
        assert!(TokenSlot::new(0).is_ok());
        assert!(TokenSlot::new(2).is_ok());
        assert!(TokenSlot::new(3).is_err());
        assert!(TokenSlot::new(255).is_err());
    }

    #[test]
    fn test_token_slot_all() {
        let slots: Vec<_> = TokenSlot::all().collect();
        assert_eq!(slots.len(), TOKEN_SLOT_COUNT);
        assert_eq!(slots[0].index(), 0);
        assert_eq!(slots[2].index(), 2);
    }

    #[test]
    fn test_lock_state_default_is_locked() {
        assert_eq!(LockState::default(), LockState::Locked);
        assert!(LockState::default().is_locked());
        assert!(!LockState::Unlocked.is_locked());
    }

    #[test]
    fn test_lock_state_serde() {
        let json = serde_json::to_string(&LockState::Unlocked).unwrap();
        assert_eq!(json, "\"unlocked\"");
        let back: LockState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, LockState::Unlocked);
    }

    #[test]
    fn test_quorum_policy_bounds() {
        assert!(QuorumPolicy::new(0).is_err());
        assert!(QuorumPolicy::new(1).is_ok());
        assert!(QuorumPolicy::new(3).is_ok());
        assert!(QuorumPolicy::new(4).is_err());
    }

    #[test]
    fn test_quorum_policy_met() {
        let policy = QuorumPolicy::new(2).unwrap();
        assert!(!policy.met(0));
        assert!(!policy.met(1));
        assert!(policy.met(2));
        assert!(policy.met(3));
    }

    #[test]
    fn test_presence_event_explicit_instant() {
        let at = Instant::now();
        let event = PresenceEvent::observed_at(TokenSlot::new(1).unwrap(), true, at);
        assert_eq!(event.at, at);
        assert!(event.present);
        assert_eq!(event.slot.index(), 1);
    }
}
