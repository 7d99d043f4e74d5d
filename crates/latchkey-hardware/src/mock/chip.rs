//! Simulated reader chip for testing and development.
//!
//! The mock models the slice of the chip the controller exercises: the
//! register file, the 64-byte FIFO, the command register, and the
//! CRC-coprocessor self-test. It decodes the same wire framing the real
//! silicon does (address in bits 7:1, direction in bit 0), so the driver
//! above it is tested against the actual byte stream it puts on the bus.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use latchkey_core::constants::{
    AUTOTEST_ENABLE, AUTOTEST_REG, CMD_CALC_CRC, CMD_MEM, CMD_SOFT_RESET, COMMAND_REG,
    FIFO_DATA_REG, FIFO_FLUSH, FIFO_LEVEL_REG, SELF_TEST_FIFO_PRELOAD, SELF_TEST_REFERENCE,
    VERSION_EXPECTED, VERSION_REG,
};

use crate::error::{BusError, Result};
use crate::traits::SpiTransport;
use crate::types::TransportInfo;

/// FIFO depth of the simulated chip.
const FIFO_CAPACITY: usize = 64;

#[derive(Debug)]
struct ChipState {
    version: u8,
    autotest: u8,
    fifo: VecDeque<u8>,
    mem: Vec<u8>,
    fail_transfers: bool,
    corruptions: Vec<(usize, u8)>,
    transfer_count: u64,
}

impl ChipState {
    fn new() -> Self {
        Self {
            version: VERSION_EXPECTED,
            autotest: 0x00,
            fifo: VecDeque::with_capacity(FIFO_CAPACITY),
            mem: Vec::new(),
            fail_transfers: false,
            corruptions: Vec::new(),
            transfer_count: 0,
        }
    }

    fn read_register(&mut self, addr: u8) -> u8 {
        match addr {
            VERSION_REG => self.version,
            FIFO_DATA_REG => self.fifo.pop_front().unwrap_or(0x00),
            FIFO_LEVEL_REG => self.fifo.len() as u8,
            AUTOTEST_REG => self.autotest,
            _ => 0x00,
        }
    }

    fn write_register(&mut self, addr: u8, value: u8) {
        match addr {
            COMMAND_REG => self.execute(value & 0x0F),
            FIFO_DATA_REG => {
                if self.fifo.len() < FIFO_CAPACITY {
                    self.fifo.push_back(value);
                }
            }
            FIFO_LEVEL_REG => {
                if value & FIFO_FLUSH != 0 {
                    self.fifo.clear();
                }
            }
            AUTOTEST_REG => self.autotest = value,
            // version register is read-only; unknown registers swallow writes
            _ => {}
        }
    }

    fn execute(&mut self, command: u8) {
        match command {
            CMD_SOFT_RESET => {
                self.fifo.clear();
                self.autotest = 0x00;
            }
            CMD_MEM => {
                let n = self.fifo.len().min(SELF_TEST_FIFO_PRELOAD);
                self.mem = self.fifo.drain(..n).collect();
            }
            CMD_CALC_CRC => {
                if self.autotest == AUTOTEST_ENABLE {
                    self.fifo.clear();
                    let mut output = SELF_TEST_REFERENCE;
                    for &(index, value) in &self.corruptions {
                        if index < output.len() {
                            output[index] = value;
                        }
                    }
                    self.fifo.extend(output);
                }
            }
            // Idle and unmodeled commands leave the chip as it is
            _ => {}
        }
    }
}

/// Simulated reader chip exposed through [`SpiTransport`].
///
/// # Examples
///
/// ```
/// use latchkey_hardware::mock::MockReaderChip;
/// use latchkey_hardware::SpiTransport;
///
/// #[tokio::main]
/// async fn main() -> latchkey_hardware::Result<()> {
///     let (mut chip, _handle) = MockReaderChip::new();
///
///     // Read the version register: framed address, one clocked response byte
///     let response = chip.write_then_read(&[(0x37 << 1) | 1], 1).await?;
///     assert_eq!(response[0], 0x92);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockReaderChip {
    state: Arc<Mutex<ChipState>>,
}

impl MockReaderChip {
    /// Create a new simulated chip together with its control handle.
    pub fn new() -> (Self, MockChipHandle) {
        let state = Arc::new(Mutex::new(ChipState::new()));
        (
            Self {
                state: Arc::clone(&state),
            },
            MockChipHandle { state },
        )
    }
}

impl SpiTransport for MockReaderChip {
    async fn write_then_read(&mut self, tx: &[u8], n_rx: usize) -> Result<Vec<u8>> {
        let mut state = self.state.lock().expect("chip state poisoned");
        state.transfer_count += 1;

        if state.fail_transfers {
            return Err(BusError::transfer_failed("mock bus configured to fail"));
        }
        let Some(&frame) = tx.first() else {
            return Err(BusError::transfer_failed("empty command"));
        };

        let addr = frame >> 1;
        let is_read = frame & 0x01 != 0;

        if is_read {
            // the response to each clocked byte period is the register value;
            // FIFO reads pop one byte per period
            Ok((0..n_rx).map(|_| state.read_register(addr)).collect())
        } else {
            for &value in &tx[1..] {
                state.write_register(addr, value);
            }
            // writes acknowledge with zero bytes
            Ok(vec![0x00; n_rx])
        }
    }

    async fn info(&self) -> Result<TransportInfo> {
        Ok(TransportInfo::new("Mock reader chip").with_max_clock_hz(1_000_000))
    }
}

/// Handle for controlling a [`MockReaderChip`].
///
/// Allows tests to inject faults (wrong version byte, corrupted self-test
/// output, failing bus) and to observe chip state without going through
/// the bus.
#[derive(Debug, Clone)]
pub struct MockChipHandle {
    state: Arc<Mutex<ChipState>>,
}

impl MockChipHandle {
    /// Override the version register content.
    pub fn set_version(&self, version: u8) {
        self.state.lock().expect("chip state poisoned").version = version;
    }

    /// Corrupt one byte of the self-test output.
    ///
    /// The corruption applies to every subsequent self-test run until the
    /// chip is recreated.
    pub fn corrupt_self_test_byte(&self, index: usize, value: u8) {
        self.state
            .lock()
            .expect("chip state poisoned")
            .corruptions
            .push((index, value));
    }

    /// Make every transfer fail with a bus error.
    pub fn fail_transfers(&self, fail: bool) {
        self.state.lock().expect("chip state poisoned").fail_transfers = fail;
    }

    /// Current auto-test register content.
    pub fn autotest_register(&self) -> u8 {
        self.state.lock().expect("chip state poisoned").autotest
    }

    /// Number of bytes currently in the FIFO.
    pub fn fifo_len(&self) -> usize {
        self.state.lock().expect("chip state poisoned").fifo.len()
    }

    /// Content of the chip's internal memory buffer.
    pub fn mem(&self) -> Vec<u8> {
        self.state.lock().expect("chip state poisoned").mem.clone()
    }

    /// Number of bus transactions the chip has seen.
    pub fn transfer_count(&self) -> u64 {
        self.state.lock().expect("chip state poisoned").transfer_count
    }
}
