//! Scheduling of the generic sender, with a stub field set.
use super::*;
use crate::protocol::publish::expiring::ExpiringValue;

const PGN_TEST: u32 = 127508;

struct Stub {
    level: ExpiringValue<u8>,
    frames: usize,
}

impl Stub {
    fn expiring() -> Self {
        Self {
            level: ExpiringValue::expiring(Duration::from_millis(3_000)),
            frames: 1,
        }
    }

    fn stopping() -> Self {
        Self {
            level: ExpiringValue::stopping(Duration::from_millis(3_000)),
            frames: 1,
        }
    }
}

impl MessageSource for Stub {
    fn suspended(&self, now: Instant) -> bool {
        self.level.is_stopped(now)
    }

    fn compose(&self, now: Instant, batch: &mut OutboundBatch) -> Result<(), EncodeError> {
        let byte = self.level.get(now).unwrap_or(0xFF);
        for _ in 0..self.frames {
            batch.push(CanFrame::new(6, PGN_TEST, 0, &[byte]))?;
        }
        Ok(())
    }
}

fn at(ms: u64) -> Instant {
    Instant::from_millis(ms)
}

fn poll(sender: &mut PeriodicSender<Stub>, ms: u64) -> (TickOutcome, OutboundBatch) {
    let mut batch = OutboundBatch::new();
    let outcome = sender.poll(at(ms), &mut batch).unwrap();
    (outcome, batch)
}

#[test]
fn test_first_poll_arms_schedule() {
    let mut sender = PeriodicSender::new(Stub::expiring(), true, 0);
    assert_eq!(sender.next_due(), None);
    assert_eq!(poll(&mut sender, 0).0, TickOutcome::NotDue);
    assert_eq!(sender.next_due(), Some(at(1_000)));
    assert_eq!(poll(&mut sender, 999).0, TickOutcome::NotDue);
    let (outcome, batch) = poll(&mut sender, 1_000);
    assert_eq!(outcome, TickOutcome::Ready);
    assert_eq!(batch.len(), 1);
    assert_eq!(sender.next_due(), Some(at(2_000)));
}

#[test]
/// Late polls keep the original cadence.
fn test_rearm_relative_to_due_instant() {
    let mut sender = PeriodicSender::new(Stub::expiring(), true, 0);
    poll(&mut sender, 0);
    assert_eq!(poll(&mut sender, 1_040).0, TickOutcome::Ready);
    assert_eq!(sender.next_due(), Some(at(2_000)));
    assert_eq!(poll(&mut sender, 1_999).0, TickOutcome::NotDue);
    assert_eq!(poll(&mut sender, 2_000).0, TickOutcome::Ready);
}

#[test]
fn test_missed_ticks_are_coalesced() {
    let mut sender = PeriodicSender::new(Stub::expiring(), true, 0);
    poll(&mut sender, 0);
    assert_eq!(poll(&mut sender, 3_500).0, TickOutcome::Ready);
    assert_eq!(sender.next_due(), Some(at(4_000)));
    assert_eq!(poll(&mut sender, 3_600).0, TickOutcome::NotDue);

    // Exactly on a later boundary: next tick is strictly in the future.
    assert_eq!(poll(&mut sender, 6_000).0, TickOutcome::Ready);
    assert_eq!(sender.next_due(), Some(at(7_000)));
}

#[test]
fn test_disabled_sender_never_fires() {
    let mut sender = PeriodicSender::new(Stub::expiring(), false, 0);
    for ms in (0..10_000).step_by(500) {
        let (outcome, batch) = poll(&mut sender, ms);
        assert_eq!(outcome, TickOutcome::NotDue);
        assert!(batch.is_empty());
    }
    assert_eq!(sender.next_due(), None);
}

#[test]
fn test_disable_drops_schedule() {
    let mut sender = PeriodicSender::new(Stub::expiring(), true, 0);
    poll(&mut sender, 0);
    sender.set_enabled(false);
    assert_eq!(poll(&mut sender, 1_000).0, TickOutcome::NotDue);
    sender.set_enabled(true);
    assert_eq!(poll(&mut sender, 5_000).0, TickOutcome::NotDue);
    assert_eq!(sender.next_due(), Some(at(6_000)));
}

#[test]
/// Expired expiring slots still produce a message, with the sentinel.
fn test_expiring_slot_sends_sentinel() {
    let mut sender = PeriodicSender::new(Stub::expiring(), true, 0);
    sender.source_mut().level.set(42, at(0));
    poll(&mut sender, 0);
    let (_, batch) = poll(&mut sender, 1_000);
    assert_eq!(batch.iter().next().unwrap().payload(), &[42]);
    let (outcome, batch) = poll(&mut sender, 4_000);
    assert_eq!(outcome, TickOutcome::Ready);
    assert_eq!(batch.iter().next().unwrap().payload(), &[0xFF]);
}

#[test]
fn test_stopping_slot_suspends_until_written() {
    let mut sender = PeriodicSender::new(Stub::stopping(), true, 0);
    poll(&mut sender, 0);
    // Never written: silent.
    let (outcome, batch) = poll(&mut sender, 1_000);
    assert_eq!(outcome, TickOutcome::Suspended);
    assert!(batch.is_empty());

    sender.source_mut().level.set(7, at(1_500));
    assert_eq!(poll(&mut sender, 2_000).0, TickOutcome::Ready);
    assert_eq!(poll(&mut sender, 4_000).0, TickOutcome::Ready);
    // 1_500 + 3_000 < 5_000: expired.
    assert_eq!(poll(&mut sender, 5_000).0, TickOutcome::Suspended);
    assert_eq!(poll(&mut sender, 6_000).0, TickOutcome::Suspended);

    sender.source_mut().level.set(8, at(6_500));
    let (outcome, batch) = poll(&mut sender, 7_000);
    assert_eq!(outcome, TickOutcome::Ready);
    assert_eq!(batch.iter().next().unwrap().payload(), &[8]);
}

#[test]
fn test_custom_interval() {
    let mut sender =
        PeriodicSender::new(Stub::expiring(), true, 2).with_interval(Duration::from_millis(250));
    assert_eq!(sender.device_index(), 2);
    poll(&mut sender, 0);
    assert_eq!(poll(&mut sender, 250).0, TickOutcome::Ready);
    assert_eq!(poll(&mut sender, 500).0, TickOutcome::Ready);
}

#[test]
fn test_batch_overflow_is_reported() {
    let mut stub = Stub::expiring();
    stub.frames = MAX_FRAMES_PER_TICK + 1;
    let mut sender = PeriodicSender::new(stub, true, 0);
    poll(&mut sender, 0);
    let mut batch = OutboundBatch::new();
    assert_eq!(sender.poll(at(1_000), &mut batch), Err(EncodeError::BatchFull));
    assert_eq!(batch.len(), MAX_FRAMES_PER_TICK);
}

#[test]
fn test_object_safe_view() {
    let mut first = PeriodicSender::new(Stub::expiring(), true, 1);
    let mut second = PeriodicSender::new(Stub::expiring(), false, 2);
    let mut senders: [&mut dyn Publish; 2] = [&mut first, &mut second];
    let mut batch = OutboundBatch::new();
    for sender in senders.iter_mut() {
        sender.poll(at(0), &mut batch).unwrap();
    }
    assert_eq!(senders[0].next_due(), Some(at(1_000)));
    assert_eq!(senders[1].next_due(), None);
    assert_eq!(senders[1].device_index(), 2);
}
