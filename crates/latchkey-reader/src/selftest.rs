//! CRC-coprocessor self-test.
//!
//! The self-test validates the chip and the bus wiring in one stroke: the
//! chip is driven through the manufacturer-defined stimulus sequence and
//! must produce a fixed 64-byte output. A single wrong byte anywhere means
//! the reader cannot be trusted — there is no partial credit and no retry,
//! since a wiring or silicon fault reproduces deterministically.
//!
//! Procedure (every step a register access on the same bus the controller
//! will later poll through):
//!
//! 1. soft reset, settle
//! 2. flush the FIFO
//! 3. preload 25 zero bytes and store them to internal memory
//! 4. arm self-test mode
//! 5. one zero stimulus byte, start the CRC coprocessor
//! 6. read exactly 64 output bytes — there is no done flag; the output
//!    length is the contract
//! 7. idle the coprocessor, disarm self-test mode
//! 8. compare byte-for-byte against the reference

use tokio::time::sleep;
use tracing::{debug, error, info};

use latchkey_core::constants::{
    AUTOTEST_DISABLE, AUTOTEST_ENABLE, FIFO_FLUSH, SELF_TEST_FIFO_PRELOAD, SELF_TEST_LEN,
    SELF_TEST_REFERENCE,
};
use latchkey_hardware::{OutputLine, SpiTransport};

use crate::bringup::BringUpState;
use crate::driver::Mfrc522;
use crate::error::SelfTestError;
use crate::registers::{Command, Register};

impl<T: SpiTransport, R: OutputLine> Mfrc522<T, R> {
    /// Run the chip self-test and validate its output.
    ///
    /// Requires a completed bring-up ([`BringUpState::Ready`]). On success
    /// the driver stays `Ready`; on any failure it faults, and the reader
    /// must not be trusted until a fresh bring-up and self-test succeed.
    ///
    /// # Errors
    ///
    /// - [`SelfTestError::NotReady`] if bring-up has not completed
    /// - [`SelfTestError::SetupFailed`] if any stimulus step fails on the bus
    /// - [`SelfTestError::VectorMismatch`] on the first diverging output byte
    pub async fn run_self_test(&mut self) -> Result<(), SelfTestError> {
        if self.state() != BringUpState::Ready {
            return Err(SelfTestError::NotReady { state: self.state() });
        }
        info!("running reader self-test");
        match self.self_test_sequence().await {
            Ok(()) => {
                info!("self-test passed");
                Ok(())
            }
            Err(err) => {
                error!(%err, "self-test failed");
                self.fault_state();
                Err(err)
            }
        }
    }

    async fn self_test_sequence(&mut self) -> Result<(), SelfTestError> {
        // isolate the test from whatever state bring-up left behind
        self.send_command(Command::SoftReset)
            .await
            .map_err(|e| SelfTestError::setup_failed("soft reset", e))?;
        sleep(self.config().soft_reset_settle()).await;

        self.bus
            .write_byte(Register::FifoLevel, FIFO_FLUSH)
            .await
            .map_err(|e| SelfTestError::setup_failed("fifo flush", e))?;

        self.bus
            .write_block(Register::FifoData, &[0u8; SELF_TEST_FIFO_PRELOAD])
            .await
            .map_err(|e| SelfTestError::setup_failed("fifo preload", e))?;

        self.send_command(Command::Mem)
            .await
            .map_err(|e| SelfTestError::setup_failed("store to memory", e))?;

        self.bus
            .write_byte(Register::AutoTest, AUTOTEST_ENABLE)
            .await
            .map_err(|e| SelfTestError::setup_failed("arm self-test mode", e))?;

        self.bus
            .write_byte(Register::FifoData, 0x00)
            .await
            .map_err(|e| SelfTestError::setup_failed("stimulus byte", e))?;

        self.send_command(Command::CalcCrc)
            .await
            .map_err(|e| SelfTestError::setup_failed("start crc coprocessor", e))?;

        // no done flag: read exactly the output length, one byte per cycle
        let mut output = [0u8; SELF_TEST_LEN];
        for byte in output.iter_mut() {
            *byte = self
                .bus
                .read_byte(Register::FifoData)
                .await
                .map_err(|e| SelfTestError::setup_failed("fifo read", e))?;
        }

        self.send_command(Command::Idle)
            .await
            .map_err(|e| SelfTestError::setup_failed("idle coprocessor", e))?;

        self.bus
            .write_byte(Register::AutoTest, AUTOTEST_DISABLE)
            .await
            .map_err(|e| SelfTestError::setup_failed("disarm self-test mode", e))?;

        for (index, (&got, &expected)) in
            output.iter().zip(SELF_TEST_REFERENCE.iter()).enumerate()
        {
            if got != expected {
                return Err(SelfTestError::VectorMismatch {
                    index,
                    got,
                    expected,
                });
            }
        }
        debug!(len = SELF_TEST_LEN, "self-test output matches reference");
        Ok(())
    }
}
