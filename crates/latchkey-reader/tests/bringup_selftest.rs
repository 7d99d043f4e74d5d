//! Integration tests for reader bring-up and self-test.
//!
//! These run the driver against the simulated chip, exercising the full
//! register traffic: reset pulse, soft reset, version check, self-test
//! stimulus and output validation, and the fault paths.

use latchkey_core::constants::SELF_TEST_REFERENCE;
use latchkey_hardware::LineLevel;
use latchkey_hardware::mock::{MockLine, MockReaderChip};
use latchkey_reader::{BringUpError, BringUpState, Mfrc522, Register, RegisterBus, SelfTestError};

fn fresh_reader() -> (
    Mfrc522<MockReaderChip, MockLine>,
    latchkey_hardware::mock::MockChipHandle,
    latchkey_hardware::mock::MockLineHandle,
) {
    let (chip, chip_handle) = MockReaderChip::new();
    let (reset_line, line_handle) = MockLine::new("reset");
    (Mfrc522::new(chip, reset_line), chip_handle, line_handle)
}

#[tokio::test(start_paused = true)]
async fn bring_up_reaches_ready() {
    let (mut reader, _chip, line) = fresh_reader();
    assert_eq!(reader.state(), BringUpState::Uninitialized);

    reader.bring_up().await.unwrap();

    assert_eq!(reader.state(), BringUpState::Ready);
    assert!(reader.is_ready());
    // reset pulse: driven low, then released high
    assert_eq!(line.history(), vec![LineLevel::Low, LineLevel::High]);
}

#[tokio::test(start_paused = true)]
async fn bring_up_rejects_wrong_versions() {
    for wrong in [0x91u8, 0x93, 0x00, 0xFF] {
        let (mut reader, chip, _line) = fresh_reader();
        chip.set_version(wrong);

        let err = reader.bring_up().await.unwrap_err();
        match err {
            BringUpError::VersionMismatch { got, expected } => {
                assert_eq!(got, wrong);
                assert_eq!(expected, 0x92);
            }
            other => panic!("expected version mismatch, got {other:?}"),
        }
        assert_eq!(reader.state(), BringUpState::Faulted);
        assert!(!reader.is_ready());
    }
}

#[tokio::test(start_paused = true)]
async fn bring_up_surfaces_bus_failure() {
    let (mut reader, chip, _line) = fresh_reader();
    chip.fail_transfers(true);

    let err = reader.bring_up().await.unwrap_err();
    assert!(matches!(err, BringUpError::Bus(_)));
    assert_eq!(reader.state(), BringUpState::Faulted);
}

#[tokio::test(start_paused = true)]
async fn steps_out_of_order_are_rejected_without_fault() {
    let (mut reader, _chip, _line) = fresh_reader();

    let err = reader.soft_reset().await.unwrap_err();
    assert!(matches!(
        err,
        BringUpError::InvalidTransition {
            from: BringUpState::Uninitialized,
            to: BringUpState::SoftReset,
        }
    ));
    // an out-of-order call does not fault the driver
    assert_eq!(reader.state(), BringUpState::Uninitialized);

    let err = reader.verify_version().await.unwrap_err();
    assert!(matches!(err, BringUpError::InvalidTransition { .. }));
    assert_eq!(reader.state(), BringUpState::Uninitialized);
}

#[tokio::test(start_paused = true)]
async fn rebring_up_recovers_from_fault() {
    let (mut reader, chip, _line) = fresh_reader();
    chip.set_version(0x91);
    assert!(reader.bring_up().await.is_err());
    assert_eq!(reader.state(), BringUpState::Faulted);

    chip.set_version(0x92);
    reader.bring_up().await.unwrap();
    assert_eq!(reader.state(), BringUpState::Ready);
}

#[tokio::test(start_paused = true)]
async fn self_test_passes_on_healthy_chip() {
    let (mut reader, chip, _line) = fresh_reader();
    reader.bring_up().await.unwrap();

    reader.run_self_test().await.unwrap();

    assert_eq!(reader.state(), BringUpState::Ready);
    // self-test mode is disarmed and the FIFO fully drained afterwards
    assert_eq!(chip.autotest_register(), 0x00);
    assert_eq!(chip.fifo_len(), 0);
}

#[tokio::test(start_paused = true)]
async fn self_test_requires_bring_up() {
    let (mut reader, _chip, _line) = fresh_reader();

    let err = reader.run_self_test().await.unwrap_err();
    assert!(matches!(
        err,
        SelfTestError::NotReady {
            state: BringUpState::Uninitialized,
        }
    ));
}

#[tokio::test(start_paused = true)]
async fn self_test_reports_corrupted_byte_with_index() {
    for index in [0usize, 17, 63] {
        let (mut reader, chip, _line) = fresh_reader();
        reader.bring_up().await.unwrap();

        let bad = SELF_TEST_REFERENCE[index] ^ 0xFF;
        chip.corrupt_self_test_byte(index, bad);

        let err = reader.run_self_test().await.unwrap_err();
        match err {
            SelfTestError::VectorMismatch {
                index: reported,
                got,
                expected,
            } => {
                assert_eq!(reported, index);
                assert_eq!(got, bad);
                assert_eq!(expected, SELF_TEST_REFERENCE[index]);
            }
            other => panic!("expected vector mismatch, got {other:?}"),
        }
        assert_eq!(reader.state(), BringUpState::Faulted);
    }
}

#[tokio::test(start_paused = true)]
async fn self_test_reports_first_mismatch() {
    let (mut reader, chip, _line) = fresh_reader();
    reader.bring_up().await.unwrap();

    chip.corrupt_self_test_byte(5, SELF_TEST_REFERENCE[5] ^ 0x01);
    chip.corrupt_self_test_byte(40, SELF_TEST_REFERENCE[40] ^ 0x01);

    let err = reader.run_self_test().await.unwrap_err();
    assert!(matches!(err, SelfTestError::VectorMismatch { index: 5, .. }));
}

#[tokio::test(start_paused = true)]
async fn self_test_setup_failure_names_the_step() {
    let (mut reader, chip, _line) = fresh_reader();
    reader.bring_up().await.unwrap();

    chip.fail_transfers(true);
    let err = reader.run_self_test().await.unwrap_err();
    assert!(matches!(
        err,
        SelfTestError::SetupFailed {
            step: "soft reset",
            ..
        }
    ));
    assert_eq!(reader.state(), BringUpState::Faulted);
}

#[tokio::test(start_paused = true)]
async fn read_write_round_trip_is_idempotent() {
    // a read/write register holds what was written; writing back the
    // just-read value changes nothing
    let (chip, _handle) = MockReaderChip::new();
    let mut bus = RegisterBus::new(chip);

    bus.write_byte(Register::AutoTest, 0x09).await.unwrap();
    let value = bus.read_byte(Register::AutoTest).await.unwrap();
    assert_eq!(value, 0x09);

    bus.write_byte(Register::AutoTest, value).await.unwrap();
    assert_eq!(bus.read_byte(Register::AutoTest).await.unwrap(), value);
}
