//! End-to-end access flow: reader bring-up and self-test, then the
//! two-token unlock scenario through the full controller stack on mock
//! hardware.

use std::time::{Duration, Instant};

use latchkey_controller::{AccessController, ControllerError, SolenoidLock};
use latchkey_core::{PresenceEvent, TokenSlot};
use latchkey_hardware::LineLevel;
use latchkey_hardware::mock::{MockLine, MockReaderChip};
use latchkey_reader::Mfrc522;

#[tokio::test(start_paused = true)]
async fn two_token_quorum_unlocks_and_relocks() {
    // the reader must prove itself before any presence event is trusted
    let (chip, _chip_handle) = MockReaderChip::new();
    let (reset_line, _reset_handle) = MockLine::new("reset");
    let mut reader = Mfrc522::new(chip, reset_line);
    reader.bring_up().await.unwrap();
    reader.run_self_test().await.unwrap();
    assert!(reader.is_ready());

    let (solenoid_line, solenoid) = MockLine::new("solenoid");
    let lock = SolenoidLock::init(solenoid_line).await.unwrap();
    let (controller, source) = AccessController::new(lock);
    let worker = tokio::spawn(controller.run());

    let token_a = TokenSlot::new(0).unwrap();
    let token_b = TokenSlot::new(1).unwrap();
    let base = Instant::now();

    // token A arrives: one of two, stays locked
    source
        .send(PresenceEvent::observed_at(token_a, true, base))
        .await
        .unwrap();
    // antenna chatter 100 ms later is debounced away
    source
        .send(PresenceEvent::observed_at(
            token_a,
            true,
            base + Duration::from_millis(100),
        ))
        .await
        .unwrap();
    // token B arrives past the window: quorum met, unlock
    source
        .send(PresenceEvent::observed_at(
            token_b,
            true,
            base + Duration::from_millis(300),
        ))
        .await
        .unwrap();
    // token B leaves: quorum lost, relock
    source
        .send(PresenceEvent::observed_at(
            token_b,
            false,
            base + Duration::from_millis(600),
        ))
        .await
        .unwrap();

    drop(source);
    worker.await.unwrap().unwrap();

    // init lock; A below quorum → lock; B quorum → the one unlock;
    // B gone → the one relock; shutdown lock-down
    assert_eq!(
        solenoid.history(),
        vec![
            LineLevel::High,
            LineLevel::High,
            LineLevel::Low,
            LineLevel::High,
            LineLevel::High,
        ]
    );
    let unlock_drives = solenoid
        .history()
        .iter()
        .filter(|level| !level.is_high())
        .count();
    assert_eq!(unlock_drives, 1);
}

#[tokio::test(start_paused = true)]
async fn untrusted_reader_never_reaches_the_controller() {
    // a reader that fails self-test is faulted; the controller keeps its
    // fail-safe state because no events are ever sourced from it
    let (chip, chip_handle) = MockReaderChip::new();
    let (reset_line, _reset_handle) = MockLine::new("reset");
    let mut reader = Mfrc522::new(chip, reset_line);
    reader.bring_up().await.unwrap();

    chip_handle.corrupt_self_test_byte(31, 0xDE);
    assert!(reader.run_self_test().await.is_err());
    assert!(!reader.is_ready());

    let (solenoid_line, solenoid) = MockLine::new("solenoid");
    let lock = SolenoidLock::init(solenoid_line).await.unwrap();
    let (controller, source) = AccessController::new(lock);

    // no events reported; dropping the source shuts the controller down
    drop(source);
    let result: Result<(), ControllerError> = controller.run().await;
    result.unwrap();

    assert_eq!(solenoid.level(), Some(LineLevel::High));
    assert!(
        solenoid
            .history()
            .iter()
            .all(|level| level.is_high())
    );
}
