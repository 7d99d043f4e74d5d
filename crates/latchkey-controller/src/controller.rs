//! Access controller: the presence channel and its single consumer.
//!
//! Presence transitions originate in interrupt-style callbacks; instead of
//! letting those callbacks mutate shared state, they post events into a
//! bounded channel via [`PresenceSource`], and [`AccessController::run`]
//! applies them one at a time in arrival order. The
//! debounce-bitmap-quorum-actuate sequence for one event always completes
//! before the next event is looked at.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info};

use latchkey_core::constants::{DEBOUNCE_WINDOW_MS, PRESENCE_CHANNEL_CAPACITY};
use latchkey_core::{LockState, PresenceEvent, QuorumPolicy, TokenSlot};

use crate::actuator::LockActuator;
use crate::engine::AccessDecisionEngine;
use crate::error::ControllerError;

/// Controller configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Quorum policy for the decision engine.
    pub quorum: QuorumPolicy,

    /// Debounce window between accepted presence events.
    pub debounce_window: Duration,

    /// Capacity of the presence-event channel.
    pub channel_capacity: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            quorum: QuorumPolicy::default(),
            debounce_window: Duration::from_millis(DEBOUNCE_WINDOW_MS),
            channel_capacity: PRESENCE_CHANNEL_CAPACITY,
        }
    }
}

/// Sending side of the presence channel.
///
/// Clone one per presence source (one per antenna slot, typically) and
/// hand them to whatever observes the hardware.
#[derive(Debug, Clone)]
pub struct PresenceSource {
    tx: mpsc::Sender<PresenceEvent>,
}

impl PresenceSource {
    /// Report a presence transition observed now.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::ChannelClosed`] if the controller has
    /// stopped.
    pub async fn report(&self, slot: TokenSlot, present: bool) -> Result<(), ControllerError> {
        self.send(PresenceEvent::new(slot, present)).await
    }

    /// Post a presence event carrying its own observation instant.
    pub async fn send(&self, event: PresenceEvent) -> Result<(), ControllerError> {
        self.tx
            .send(event)
            .await
            .map_err(|_| ControllerError::ChannelClosed)
    }
}

/// The controller context: decision engine plus the receiving end of the
/// presence channel.
///
/// Created together with its [`PresenceSource`]; consumed by
/// [`run`](AccessController::run).
#[derive(Debug)]
pub struct AccessController<A: LockActuator> {
    engine: AccessDecisionEngine<A>,
    events: mpsc::Receiver<PresenceEvent>,
}

impl<A: LockActuator> AccessController<A> {
    /// Create a controller with the default configuration.
    ///
    /// The actuator should already hold the locked state (see
    /// [`SolenoidLock::init`](crate::SolenoidLock::init)).
    pub fn new(actuator: A) -> (Self, PresenceSource) {
        Self::with_config(actuator, ControllerConfig::default())
    }

    /// Create a controller with an explicit configuration.
    pub fn with_config(actuator: A, config: ControllerConfig) -> (Self, PresenceSource) {
        let (tx, rx) = mpsc::channel(config.channel_capacity);
        let controller = Self {
            engine: AccessDecisionEngine::with_policy(
                actuator,
                config.quorum,
                config.debounce_window,
            ),
            events: rx,
        };
        (controller, PresenceSource { tx })
    }

    /// The lock state as last commanded.
    pub fn lock_state(&self) -> LockState {
        self.engine.lock_state()
    }

    /// Consume presence events until every source is dropped.
    ///
    /// Events are applied strictly in arrival order, one at a time. On a
    /// clean shutdown (all sources gone) the lock is driven into the
    /// secured state before returning. An actuator fault stops the loop
    /// and propagates — the engine has already recorded the fail-safe
    /// assumption, and an effector that cannot be driven is not worth
    /// looping on.
    pub async fn run(mut self) -> Result<(), ControllerError> {
        info!("access controller running");
        while let Some(event) = self.events.recv().await {
            if let Err(err) = self.engine.on_presence_event(event).await {
                error!(%err, "stopping on actuator fault");
                return Err(err.into());
            }
        }
        info!("presence sources closed, securing lock and stopping");
        self.engine.force_lock().await?;
        Ok(())
    }
}
