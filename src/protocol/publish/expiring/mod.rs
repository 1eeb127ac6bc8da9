//! Single cached telemetry value with an age limit.
use embassy_time::{Duration, Instant};

use crate::protocol::transport::DEFAULT_EXPIRY_MS;

/// What happens once a slot is older than its expiry window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StalePolicy {
    /// Reads return "not available"; the owning sender keeps transmitting.
    Expiring,
    /// The owning sender goes silent until a new value arrives.
    Stopping,
}

/// State of a slot at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlotState {
    /// Written no longer than `expiry` ago.
    Fresh,
    /// Never written or too old, under [`StalePolicy::Expiring`].
    Stale,
    /// Never written or too old, under [`StalePolicy::Stopping`].
    Stopped,
}

/// One named telemetry slot.
#[derive(Debug, Clone, Copy)]
pub struct ExpiringValue<T: Copy> {
    current: Option<T>,
    last_update: Option<Instant>,
    expiry: Duration,
    policy: StalePolicy,
}

impl<T: Copy> ExpiringValue<T> {
    pub const fn new(expiry: Duration, policy: StalePolicy) -> Self {
        Self {
            current: None,
            last_update: None,
            expiry,
            policy,
        }
    }

    /// Slot reported as "not available" once stale.
    pub const fn expiring(expiry: Duration) -> Self {
        Self::new(expiry, StalePolicy::Expiring)
    }

    /// Slot that silences its sender once stale.
    pub const fn stopping(expiry: Duration) -> Self {
        Self::new(expiry, StalePolicy::Stopping)
    }

    pub fn policy(&self) -> StalePolicy {
        self.policy
    }

    /// Store a new value.
    pub fn set(&mut self, value: T, now: Instant) {
        self.current = Some(value);
        self.last_update = Some(now);
    }

    /// State at `now`. A slot is fresh up to and including `expiry` after the write.
    pub fn state(&self, now: Instant) -> SlotState {
        let fresh = self
            .last_update
            .is_some_and(|at| now.saturating_duration_since(at) <= self.expiry);
        match (fresh, self.policy) {
            (true, _) => SlotState::Fresh,
            (false, StalePolicy::Expiring) => SlotState::Stale,
            (false, StalePolicy::Stopping) => SlotState::Stopped,
        }
    }

    /// Value to publish at `now`, `None` once stale.
    pub fn get(&self, now: Instant) -> Option<T> {
        match self.state(now) {
            SlotState::Fresh => self.current,
            _ => None,
        }
    }

    /// `true` when this slot silences its sender at `now`.
    pub fn is_stopped(&self, now: Instant) -> bool {
        self.state(now) == SlotState::Stopped
    }
}

impl<T: Copy> Default for ExpiringValue<T> {
    fn default() -> Self {
        Self::expiring(Duration::from_millis(DEFAULT_EXPIRY_MS))
    }
}
