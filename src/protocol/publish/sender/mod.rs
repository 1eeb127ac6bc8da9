//! Generic periodic sender.
//!
//! A [`PeriodicSender`] owns one [`MessageSource`] (the expiring slots of one
//! outbound message type plus its instance numbers) and decides when a tick
//! is due. The source only knows how to turn its current slot states into
//! frames; scheduling, enabling and the stopping policy live here once.
use embassy_time::{Duration, Instant};

use crate::error::EncodeError;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::DEFAULT_REPEAT_INTERVAL_MS;

/// Most frames a single tick produces (65013 + 65014).
pub const MAX_FRAMES_PER_TICK: usize = 2;

/// Frames produced by one tick, sent in order.
#[derive(Debug, Clone, Default)]
pub struct OutboundBatch {
    frames: [Option<CanFrame>; MAX_FRAMES_PER_TICK],
    len: usize,
}

impl OutboundBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: CanFrame) -> Result<(), EncodeError> {
        let slot = self.frames.get_mut(self.len).ok_or(EncodeError::BatchFull)?;
        *slot = Some(frame);
        self.len += 1;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.frames = Default::default();
        self.len = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanFrame> {
        self.frames[..self.len].iter().flatten()
    }
}

/// Field set of one outbound message type.
pub trait MessageSource {
    /// `true` when a stopping slot silences the sender at `now`.
    fn suspended(&self, _now: Instant) -> bool {
        false
    }

    /// Encode the current slot states into `batch`.
    fn compose(&self, now: Instant, batch: &mut OutboundBatch) -> Result<(), EncodeError>;
}

/// Result of polling a sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Disabled, or the next tick lies in the future.
    NotDue,
    /// Tick consumed without output: a stopping slot has expired.
    Suspended,
    /// Tick consumed, frames were appended to the batch.
    Ready,
}

/// Scheduler of one outbound message type.
pub struct PeriodicSender<S: MessageSource> {
    source: S,
    enabled: bool,
    repeat_interval: Duration,
    /// Virtual device the frames are sent from.
    device_index: u8,
    next_due: Option<Instant>,
}

impl<S: MessageSource> PeriodicSender<S> {
    /// Sender with the protocol repeat interval of one second.
    pub fn new(source: S, enabled: bool, device_index: u8) -> Self {
        Self {
            source,
            enabled,
            repeat_interval: Duration::from_millis(DEFAULT_REPEAT_INTERVAL_MS),
            device_index,
            next_due: None,
        }
    }

    pub fn with_interval(mut self, repeat_interval: Duration) -> Self {
        self.repeat_interval = repeat_interval;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Slot access for telemetry updates.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the sender. A disabled sender forgets its schedule;
    /// once enabled again, its first tick is one interval after the next poll.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.next_due = None;
        }
    }

    pub fn device_index(&self) -> u8 {
        self.device_index
    }

    pub fn repeat_interval(&self) -> Duration {
        self.repeat_interval
    }

    /// Next due instant, `None` while disabled or not yet armed.
    pub fn next_due(&self) -> Option<Instant> {
        if self.enabled {
            self.next_due
        } else {
            None
        }
    }

    /// Run the tick due at `now`, if any.
    ///
    /// The first poll only arms the schedule. Each fired tick re-arms one
    /// interval after the previous due instant; intervals missed entirely are
    /// skipped rather than replayed.
    pub fn poll(&mut self, now: Instant, batch: &mut OutboundBatch) -> Result<TickOutcome, EncodeError> {
        if !self.enabled {
            return Ok(TickOutcome::NotDue);
        }
        let due = match self.next_due {
            Some(due) => due,
            None => {
                self.next_due = Some(now + self.repeat_interval);
                return Ok(TickOutcome::NotDue);
            }
        };
        if now < due {
            return Ok(TickOutcome::NotDue);
        }

        let mut next = due + self.repeat_interval;
        if next <= now {
            let behind = now.saturating_duration_since(due).as_ticks();
            let step = self.repeat_interval.as_ticks().max(1);
            next = due + Duration::from_ticks((behind / step + 1) * step);
        }
        self.next_due = Some(next);

        if self.source.suspended(now) {
            #[cfg(feature = "defmt")]
            defmt::debug!("Sender suspended, tick skipped");
            return Ok(TickOutcome::Suspended);
        }
        self.source.compose(now, batch)?;
        Ok(TickOutcome::Ready)
    }
}

/// Object-safe view of a [`PeriodicSender`], so senders of different message
/// types can be driven from one list.
pub trait Publish {
    fn poll(&mut self, now: Instant, batch: &mut OutboundBatch) -> Result<TickOutcome, EncodeError>;
    fn next_due(&self) -> Option<Instant>;
    fn device_index(&self) -> u8;
}

impl<S: MessageSource> Publish for PeriodicSender<S> {
    fn poll(&mut self, now: Instant, batch: &mut OutboundBatch) -> Result<TickOutcome, EncodeError> {
        PeriodicSender::poll(self, now, batch)
    }

    fn next_due(&self) -> Option<Instant> {
        PeriodicSender::next_due(self)
    }

    fn device_index(&self) -> u8 {
        PeriodicSender::device_index(self)
    }
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
