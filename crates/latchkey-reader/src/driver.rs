//! Reader chip driver: reset and bring-up sequencing.
//!
//! [`Mfrc522`] owns the register bus and the reset line and walks the chip
//! through bring-up: hard reset, soft reset, version check. Each step
//! validates its place in the sequence against [`BringUpState`]; a step
//! attempted out of order errors without touching the hardware, and a step
//! that fails on the hardware faults the driver.

use tokio::time::sleep;
use tracing::{debug, error, info};

use latchkey_core::constants::VERSION_EXPECTED;
use latchkey_hardware::{BusError, OutputLine, SpiTransport};

use crate::bringup::{BringUpConfig, BringUpState};
use crate::bus::RegisterBus;
use crate::error::BringUpError;
use crate::registers::{Command, Register, command_frame};

/// Driver for the reader chip.
///
/// # Examples
///
/// ```
/// use latchkey_hardware::mock::{MockLine, MockReaderChip};
/// use latchkey_reader::{BringUpState, Mfrc522};
///
/// #[tokio::main]
/// async fn main() -> Result<(), latchkey_reader::BringUpError> {
///     let (chip, _chip_handle) = MockReaderChip::new();
///     let (reset_line, _line_handle) = MockLine::new("reset");
///
///     let mut reader = Mfrc522::new(chip, reset_line);
///     assert_eq!(reader.state(), BringUpState::Uninitialized);
///
///     reader.bring_up().await?;
///     assert_eq!(reader.state(), BringUpState::Ready);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Mfrc522<T: SpiTransport, R: OutputLine> {
    pub(crate) bus: RegisterBus<T>,
    reset_line: R,
    config: BringUpConfig,
    state: BringUpState,
}

impl<T: SpiTransport, R: OutputLine> Mfrc522<T, R> {
    /// Create a driver with default reset timings.
    pub fn new(transport: T, reset_line: R) -> Self {
        Self::with_config(transport, reset_line, BringUpConfig::default())
    }

    /// Create a driver with explicit reset timings.
    pub fn with_config(transport: T, reset_line: R, config: BringUpConfig) -> Self {
        Self {
            bus: RegisterBus::new(transport),
            reset_line,
            config,
            state: BringUpState::Uninitialized,
        }
    }

    /// Current bring-up state.
    pub fn state(&self) -> BringUpState {
        self.state
    }

    /// Check whether bring-up has completed.
    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    pub(crate) fn config(&self) -> &BringUpConfig {
        &self.config
    }

    /// Run the full bring-up sequence: hard reset, soft reset, version
    /// check.
    ///
    /// On success the driver is [`BringUpState::Ready`] and the self-test
    /// may run. On any failure the driver is [`BringUpState::Faulted`] and
    /// the reader must not be trusted until a fresh bring-up succeeds.
    pub async fn bring_up(&mut self) -> Result<(), BringUpError> {
        self.hard_reset().await?;
        self.soft_reset().await?;
        self.verify_version().await?;
        self.transition(BringUpState::Ready)?;
        info!("reader bring-up complete");
        Ok(())
    }

    /// Pulse the reset line low, then release it.
    ///
    /// Valid from `Uninitialized`, `Ready`, and `Faulted` (the latter two
    /// are explicit re-bring-up).
    pub async fn hard_reset(&mut self) -> Result<(), BringUpError> {
        self.ensure_transition(BringUpState::HardReset)?;
        info!(
            pulse_ms = self.config.hard_reset_pulse().as_millis() as u64,
            "hard-resetting reader chip"
        );
        if let Err(err) = self.pulse_reset_line().await {
            return Err(self.fault(err.into()));
        }
        self.state = BringUpState::HardReset;
        Ok(())
    }

    /// Issue the soft-reset command and wait for the chip to settle.
    pub async fn soft_reset(&mut self) -> Result<(), BringUpError> {
        self.ensure_transition(BringUpState::SoftReset)?;
        debug!("issuing soft-reset command");
        if let Err(err) = self.send_command(Command::SoftReset).await {
            return Err(self.fault(err.into()));
        }
        sleep(self.config.soft_reset_settle()).await;
        self.state = BringUpState::SoftReset;
        Ok(())
    }

    /// Read the version register and require the expected value.
    ///
    /// Any other value is a fatal bring-up error: wrong or counterfeit
    /// chip, or broken bus wiring. Not retryable.
    pub async fn verify_version(&mut self) -> Result<u8, BringUpError> {
        self.ensure_transition(BringUpState::VersionChecked)?;
        match self.bus.read_byte(Register::Version).await {
            Ok(version) if version == VERSION_EXPECTED => {
                info!("chip version {:#04x} verified", version);
                self.state = BringUpState::VersionChecked;
                Ok(version)
            }
            Ok(version) => Err(self.fault(BringUpError::VersionMismatch {
                got: version,
                expected: VERSION_EXPECTED,
            })),
            Err(err) => Err(self.fault(err.into())),
        }
    }

    /// Write a command code to the command register (receiver on, no
    /// power-down).
    pub(crate) async fn send_command(&mut self, command: Command) -> Result<(), BusError> {
        self.bus
            .write_byte(Register::Command, command_frame(false, false, command))
            .await
    }

    pub(crate) fn fault_state(&mut self) {
        self.state = BringUpState::Faulted;
    }

    async fn pulse_reset_line(&mut self) -> Result<(), BusError> {
        self.reset_line.set_low().await?;
        sleep(self.config.hard_reset_pulse()).await;
        self.reset_line.set_high().await?;
        Ok(())
    }

    fn ensure_transition(&self, to: BringUpState) -> Result<(), BringUpError> {
        if self.state.can_transition_to(&to) {
            Ok(())
        } else {
            Err(BringUpError::InvalidTransition {
                from: self.state,
                to,
            })
        }
    }

    fn transition(&mut self, to: BringUpState) -> Result<(), BringUpError> {
        self.ensure_transition(to)?;
        debug!(from = %self.state, to = %to, "bring-up transition");
        self.state = to;
        Ok(())
    }

    fn fault(&mut self, err: BringUpError) -> BringUpError {
        error!(%err, "bring-up failed");
        self.state = BringUpState::Faulted;
        err
    }
}
