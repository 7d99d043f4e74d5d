//! Core constants for the Latchkey lock controller.
//!
//! These values configure reader bring-up timing, presence debouncing, and
//! the token quorum. They are referenced by the reader driver and the
//! access-decision engine; changing them changes the controller's observable
//! behavior, so each constant documents where its value comes from.

// ============================================================================
// Reset Timing
// ============================================================================

/// Default hard-reset pulse width (milliseconds).
///
/// The reset line is held low for this long before being released. Observed
/// deployments of the reader chip use anywhere from 100 ms to 200 ms; the
/// datasheet does not give an authoritative minimum, so the default is the
/// longest observed value.
///
/// # Value: 200ms
pub const DEFAULT_HARD_RESET_PULSE_MS: u64 = 200;

/// Minimum allowed hard-reset pulse width (milliseconds).
///
/// Pulse widths below this are known to leave the chip only partially reset
/// on some boards; the reader's bring-up configuration rejects shorter
/// values at construction.
///
/// # Value: 100ms
pub const MIN_HARD_RESET_PULSE_MS: u64 = 100;

/// Settle delay after issuing the chip's soft-reset command (milliseconds).
///
/// Empirically chosen: the chip answers register reads with stale data if
/// polled sooner than this after a soft reset.
///
/// # Value: 150ms
pub const SOFT_RESET_SETTLE_MS: u64 = 150;

// ============================================================================
// Presence Debouncing
// ============================================================================

/// Minimum spacing between accepted presence events (milliseconds).
///
/// Presence interrupts from the antenna are noisy: a single token entering
/// the field can fire several edges within tens of milliseconds. An event
/// arriving within this window of the previously accepted event (for the
/// whole controller, not per slot) is discarded without touching the bitmap.
///
/// # Value: 200ms
pub const DEBOUNCE_WINDOW_MS: u64 = 200;

// ============================================================================
// Token Quorum
// ============================================================================

/// Number of token slots the controller tracks.
///
/// Each slot corresponds to one antenna region / presence line. The presence
/// bitmap is exactly this many entries.
///
/// # Value: 3
pub const TOKEN_SLOT_COUNT: usize = 3;

/// Default number of simultaneously present tokens required to unlock.
///
/// # Value: 2
pub const DEFAULT_QUORUM_THRESHOLD: usize = 2;

// ============================================================================
// Reader Chip Protocol
// ============================================================================
//
// Register addresses are 6-bit chip-internal identifiers. On the wire each
// access cycle is one byte: bits [7:1] carry the address, bit 0 the
// direction (1 = read, 0 = write). The framing itself lives in the reader
// driver; these are the raw addresses and magic values both the driver and
// the simulated chip agree on.

/// Command register address. Bits 3:0 select the command, bit 4 powers the
/// chip down, bit 5 switches the receiver off.
pub const COMMAND_REG: u8 = 0x01;

/// FIFO data register address. Reads pop, writes push; the chip repeats the
/// register internally for block access.
pub const FIFO_DATA_REG: u8 = 0x09;

/// FIFO level register address. Bit 7 written high flushes the FIFO.
pub const FIFO_LEVEL_REG: u8 = 0x0A;

/// Auto-test register address.
pub const AUTOTEST_REG: u8 = 0x36;

/// Version register address (read-only).
pub const VERSION_REG: u8 = 0x37;

/// Expected content of the version register.
///
/// Any other value means a wrong or counterfeit chip, or broken bus wiring;
/// it is a fatal bring-up error, not a retryable condition.
pub const VERSION_EXPECTED: u8 = 0x92;

/// Value written to the FIFO level register to flush the FIFO (bit 7).
pub const FIFO_FLUSH: u8 = 0x80;

/// Value written to the auto-test register to enable self-test mode.
pub const AUTOTEST_ENABLE: u8 = 0x09;

/// Value written to the auto-test register to leave self-test mode.
pub const AUTOTEST_DISABLE: u8 = 0x00;

/// Command code: cancel the running command and idle the coprocessor.
pub const CMD_IDLE: u8 = 0b0000;

/// Command code: store 25 FIFO bytes into the chip's internal memory.
pub const CMD_MEM: u8 = 0b0001;

/// Command code: start the CRC coprocessor (runs the self-test when
/// self-test mode is enabled).
pub const CMD_CALC_CRC: u8 = 0b0100;

/// Command code: soft-reset the chip.
pub const CMD_SOFT_RESET: u8 = 0b1111;

/// Number of zero bytes preloaded into the FIFO before the self-test.
pub const SELF_TEST_FIFO_PRELOAD: usize = 25;

/// Length of the self-test output.
pub const SELF_TEST_LEN: usize = 64;

/// Reference output of the chip's CRC-coprocessor self-test.
///
/// The chip produces exactly these 64 bytes when healthy and correctly
/// wired; a mismatch at any index means the reader must not be trusted.
pub const SELF_TEST_REFERENCE: [u8; SELF_TEST_LEN] = [
    0x00, 0xEB, 0x66, 0xBA, 0x57, 0xBF, 0x23, 0x95, 0xD0, 0xE3, 0x0D, 0x3D, 0x27, 0x89, 0x5C,
    0xDE, 0x9D, 0x3B, 0xA7, 0x00, 0x21, 0x5B, 0x89, 0x82, 0x51, 0x3A, 0xEB, 0x02, 0x0C, 0xA5,
    0x00, 0x49, 0x7C, 0x84, 0x4D, 0xB3, 0xCC, 0xD2, 0x1B, 0x81, 0x5D, 0x48, 0x76, 0xD5, 0x71,
    0x61, 0x21, 0xA9, 0x86, 0x96, 0x83, 0x38, 0xCF, 0x9D, 0x5B, 0x6D, 0xDC, 0x15, 0xBA, 0x3E,
    0x7D, 0x95, 0x3B, 0x2F,
];

// ============================================================================
// Event Plumbing
// ============================================================================

/// Capacity of the bounded presence-event channel.
///
/// Presence events are tiny and the decision loop drains quickly; 32 slots
/// absorb interrupt bursts without unbounded buffering.
///
/// # Value: 32
pub const PRESENCE_CHANNEL_CAPACITY: usize = 32;
