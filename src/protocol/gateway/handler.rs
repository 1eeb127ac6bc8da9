//! Receive path of the gateway: address observation, time tracking, line
//! rendering and datagram emission, in that order, for every message.
use core::fmt::Debug;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::protocol::gateway::line::{format_line, GatewayLine};
use crate::protocol::gateway::time_reference::TimeReference;
use crate::protocol::managment::address_observer::AddressObserver;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::{datagram::DatagramSink, n2k_bus::N2kBus};

/// What handling one message did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HandleOutcome {
    /// New node address to persist, reported once per change.
    pub address_change: Option<u8>,
    /// `true` when the time reference was refreshed by this message.
    pub time_updated: bool,
    /// `true` when the datagram left without error.
    pub sent: bool,
}

/// Gateway state: time reference, address record and the datagram sink.
pub struct GatewayHandler<D: DatagramSink> {
    sink: D,
    time: TimeReference,
    observer: AddressObserver,
    /// Virtual device whose address is observed.
    device_index: u8,
    /// A disabled gateway ignores every message.
    enabled: bool,
}

impl<D: DatagramSink> GatewayHandler<D>
where
    D::Error: Debug,
{
    /// `recorded_address` is the persisted node address (if any).
    pub fn new(sink: D, recorded_address: Option<u8>, device_index: u8) -> Self {
        Self {
            sink,
            time: TimeReference::new(),
            observer: AddressObserver::new(recorded_address),
            device_index,
            enabled: true,
        }
    }

    /// Handler observing the device and starting from the address recorded
    /// in `config`. Stays silent when `config.enabled` is off.
    pub fn from_config(sink: D, config: &GatewayConfig) -> Self {
        let mut handler = Self::new(sink, config.node_address, config.device_index);
        handler.enabled = config.enabled;
        handler
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Time reference stamped on every line.
    pub fn time(&self) -> &TimeReference {
        &self.time
    }

    /// Node address last recorded.
    pub fn recorded_address(&self) -> Option<u8> {
        self.observer.recorded()
    }

    /// Process one received message.
    ///
    /// Never fails: an unparsable time message only skips the time update and
    /// a failed send is dropped, the line is simply lost. A disabled handler
    /// returns an empty outcome and touches nothing.
    pub async fn handle<B: N2kBus>(&mut self, bus: &B, frame: &CanFrame) -> HandleOutcome {
        if !self.enabled {
            return HandleOutcome::default();
        }

        let mut outcome = HandleOutcome {
            address_change: self.observer.observe(bus.source_address(self.device_index)),
            ..HandleOutcome::default()
        };

        match self.time.observe(frame) {
            Ok(updated) => outcome.time_updated = updated,
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("Ignoring time message: {}", defmt::Debug2Format(&_err));
            }
        }

        let line = match self.render(frame) {
            Some(line) => line,
            None => return outcome,
        };

        match self.sink.send_datagram(line.as_bytes()).await {
            Ok(()) => outcome.sent = true,
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Datagram dropped: {}", defmt::Debug2Format(&_err));
            }
        }
        outcome
    }

    fn render(&self, frame: &CanFrame) -> Option<GatewayLine> {
        let rendered = format_line(frame, &self.time).and_then(|mut line| {
            line.terminate()?;
            Ok(line)
        });
        match rendered {
            Ok(line) => Some(line),
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("PGN {} not forwarded: {}", frame.pgn, defmt::Debug2Format(&_err));
                None
            }
        }
    }

    /// Receive loop: handle every message the bus stack delivers.
    ///
    /// Only returns when the bus stack fails to deliver a message.
    pub async fn drive<B: N2kBus>(&mut self, bus: &mut B) -> Result<(), GatewayError<B::Error>> {
        loop {
            let frame = bus.recv().await.map_err(GatewayError::Receive)?;
            self.handle(&*bus, &frame).await;
        }
    }
}
