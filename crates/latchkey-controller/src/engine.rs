//! Access-decision engine.
//!
//! A Mealy machine over the token presence bitmap: every accepted event
//! updates one bitmap entry, the present count is recomputed, and the
//! actuator is commanded from the count alone — there is no transient
//! "unlocking" state. Events inside the debounce window (measured between
//! accepted events for the whole controller, not per slot) are discarded
//! without touching anything.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use latchkey_core::constants::{DEBOUNCE_WINDOW_MS, TOKEN_SLOT_COUNT};
use latchkey_core::{LockState, PresenceEvent, QuorumPolicy};

use crate::actuator::LockActuator;
use crate::error::ActuatorError;

/// Outcome of feeding one presence event to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// The event fell inside the debounce window and was discarded.
    Debounced,

    /// The event was applied and the lock commanded into the given state.
    Applied(LockState),
}

/// The decision engine: presence bitmap, debounce, quorum, lock state.
///
/// Owns the actuator and the authoritative [`LockState`]. All state starts
/// at the fail-safe values: empty bitmap, locked.
#[derive(Debug)]
pub struct AccessDecisionEngine<A: LockActuator> {
    actuator: A,
    quorum: QuorumPolicy,
    debounce_window: Duration,
    bitmap: [bool; TOKEN_SLOT_COUNT],
    last_accepted: Option<Instant>,
    lock_state: LockState,
}

impl<A: LockActuator> AccessDecisionEngine<A> {
    /// Create an engine with the default quorum and debounce window.
    pub fn new(actuator: A) -> Self {
        Self::with_policy(
            actuator,
            QuorumPolicy::default(),
            Duration::from_millis(DEBOUNCE_WINDOW_MS),
        )
    }

    /// Create an engine with an explicit quorum policy and debounce window.
    pub fn with_policy(actuator: A, quorum: QuorumPolicy, debounce_window: Duration) -> Self {
        Self {
            actuator,
            quorum,
            debounce_window,
            bitmap: [false; TOKEN_SLOT_COUNT],
            last_accepted: None,
            lock_state: LockState::default(),
        }
    }

    /// The lock state as last commanded (or assumed after a fault).
    pub fn lock_state(&self) -> LockState {
        self.lock_state
    }

    /// Number of slots currently marked present.
    pub fn present_count(&self) -> usize {
        self.bitmap.iter().filter(|&&present| present).count()
    }

    /// Apply one presence event.
    ///
    /// Debounce, then update the bitmap, recompute the quorum, and command
    /// the actuator. The whole sequence runs to completion before the next
    /// event can be applied (`&mut self`), so decisions are never torn.
    ///
    /// # Errors
    ///
    /// Propagates actuator faults. After a fault the recorded lock state
    /// is `Locked` — the only safe assumption when the line state is
    /// unknown.
    pub async fn on_presence_event(
        &mut self,
        event: PresenceEvent,
    ) -> Result<Decision, ActuatorError> {
        if let Some(last) = self.last_accepted {
            if event.at.saturating_duration_since(last) < self.debounce_window {
                debug!(slot = %event.slot, present = event.present, "event inside debounce window, discarded");
                return Ok(Decision::Debounced);
            }
        }
        self.last_accepted = Some(event.at);
        self.bitmap[event.slot.index()] = event.present;

        let count = self.present_count();
        let target = if self.quorum.met(count) {
            LockState::Unlocked
        } else {
            LockState::Locked
        };
        self.drive(target).await?;

        info!(
            slot = %event.slot,
            present = event.present,
            count,
            state = %self.lock_state,
            "presence event applied"
        );
        Ok(Decision::Applied(target))
    }

    /// Unconditionally drive the lock into the secured state.
    ///
    /// Used at controller shutdown; decisions in normal operation go
    /// through [`on_presence_event`](Self::on_presence_event).
    pub async fn force_lock(&mut self) -> Result<(), ActuatorError> {
        self.drive(LockState::Locked).await
    }

    async fn drive(&mut self, target: LockState) -> Result<(), ActuatorError> {
        let result = match target {
            LockState::Locked => self.actuator.lock().await,
            LockState::Unlocked => self.actuator.unlock().await,
        };
        if let Err(err) = result {
            // line state unknown: record the fail-safe assumption
            self.lock_state = LockState::Locked;
            return Err(err);
        }
        self.lock_state = target;
        Ok(())
    }
}
