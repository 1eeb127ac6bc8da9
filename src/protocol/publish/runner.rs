//! Cooperative loop of the publishers.
//!
//! One task owns the [`TelemetryBridge`], the bus handle and the timer. It
//! sends whatever is due, then sleeps until the next due instant unless a
//! telemetry update arrives first on the optional [`embassy_sync`] channel.
//! Send failures are dropped: the next tick carries fresher values anyway.
use core::fmt::Debug;

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};
use embassy_time::{Duration, Instant};
use futures_util::{future::select, future::Either, pin_mut};

use crate::protocol::publish::bridge::TelemetryBridge;
use crate::protocol::publish::sender::{OutboundBatch, TickOutcome};
use crate::protocol::publish::telemetry::TelemetryUpdate;
use crate::protocol::transport::traits::{korri_timer::KorriTimer, n2k_bus::N2kBus};
use crate::protocol::transport::DEFAULT_REPEAT_INTERVAL_MS;

/// Telemetry queue shared between the host and the runner.
pub type TelemetryChannel<const CAP: usize> =
    Channel<CriticalSectionRawMutex, TelemetryUpdate, CAP>;

/// Runner that drives every periodic sender.
pub struct PublisherRunner<'a, 'n, B, T, const CAP: usize>
where
    B: N2kBus,
    B::Error: Debug,
    T: KorriTimer,
{
    bridge: TelemetryBridge<'n>,
    bus: B,
    timer: T,
    updates: Option<&'a TelemetryChannel<CAP>>,
}

impl<'a, 'n, B, T, const CAP: usize> PublisherRunner<'a, 'n, B, T, CAP>
where
    B: N2kBus,
    B::Error: Debug,
    T: KorriTimer,
{
    pub fn new(
        bridge: TelemetryBridge<'n>,
        bus: B,
        timer: T,
        updates: Option<&'a TelemetryChannel<CAP>>,
    ) -> Self {
        Self {
            bridge,
            bus,
            timer,
            updates,
        }
    }

    pub fn bridge(&self) -> &TelemetryBridge<'n> {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut TelemetryBridge<'n> {
        &mut self.bridge
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Poll every sender at the current instant and send what they produce.
    /// Returns the number of frames accepted by the bus.
    pub async fn publish_due(&mut self) -> usize {
        let now = self.timer.now();
        let mut sent = 0;
        for sender in self.bridge.senders_mut() {
            let mut batch = OutboundBatch::new();
            match sender.poll(now, &mut batch) {
                Ok(TickOutcome::Ready) => {}
                Ok(_) => continue,
                Err(_err) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Encoding failed: {}", defmt::Debug2Format(&_err));
                    continue;
                }
            }
            for frame in batch.iter() {
                match self.bus.send(frame, sender.device_index()).await {
                    Ok(()) => sent += 1,
                    Err(_err) => {
                        #[cfg(feature = "defmt")]
                        defmt::warn!(
                            "PGN {} dropped: {}",
                            frame.pgn,
                            defmt::Debug2Format(&_err)
                        );
                    }
                }
            }
        }
        sent
    }

    /// Milliseconds until the earliest due sender (one repeat interval when
    /// none is scheduled).
    fn wait_ms(&mut self, now: Instant) -> u32 {
        let wait = self
            .bridge
            .next_due()
            .map_or(Duration::from_millis(DEFAULT_REPEAT_INTERVAL_MS), |due| {
                due.saturating_duration_since(now)
            });
        u32::try_from(wait.as_millis()).unwrap_or(u32::MAX)
    }

    /// One pass: publish what is due, then wait for the next due instant or
    /// the next telemetry update, whichever comes first.
    pub async fn step(&mut self) {
        self.publish_due().await;
        let wait = self.wait_ms(self.timer.now());

        match self.updates {
            Some(channel) => {
                let mut update = None;
                {
                    let receive_future = channel.receive();
                    let delay_future = self.timer.delay_ms(wait);
                    pin_mut!(receive_future);
                    pin_mut!(delay_future);

                    match select(receive_future, delay_future).await {
                        Either::Left((received, pending_delay)) => {
                            update = Some(received);
                            drop(pending_delay);
                        }
                        Either::Right(((), pending_receive)) => drop(pending_receive),
                    }
                }

                if let Some(update) = update {
                    let now = self.timer.now();
                    self.bridge.apply(update.path.as_str(), update.value, now);
                }
            }
            None => self.timer.delay_ms(wait).await,
        }
    }

    /// Run forever.
    pub async fn drive(mut self) {
        loop {
            self.step().await;
        }
    }
}
