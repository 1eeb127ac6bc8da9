//! PGN 127509, Inverter Status.
use embassy_time::{Duration, Instant};

use crate::error::EncodeError;
use crate::infra::codec::scaled::encode_u8;
use crate::protocol::lookups::{nibble, on_off_bits, InverterOperatingState, OnOff};
use crate::protocol::messages::build_frame;
use crate::protocol::publish::expiring::ExpiringValue;
use crate::protocol::publish::sender::{MessageSource, OutboundBatch, PeriodicSender};
use crate::protocol::transport::can_frame::CanFrame;

pub const PGN_INVERTER_STATUS: u32 = 127509;

/// Values of one 127509 message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InverterStatus {
    pub instance: u8,
    pub ac_instance: u8,
    pub battery_instance: u8,
    pub operating_state: Option<InverterOperatingState>,
    pub enabled: Option<OnOff>,
}

/// Three instances, then one byte: bits 2-3 enabled, bits 4-7 state.
pub fn encode_inverter_status(status: &InverterStatus) -> Result<CanFrame, EncodeError> {
    build_frame(PGN_INVERTER_STATUS, |w| {
        w.write_u8(encode_u8(Some(status.instance)))?;
        w.write_u8(encode_u8(Some(status.ac_instance)))?;
        w.write_u8(encode_u8(Some(status.battery_instance)))?;
        w.write_bits(0, 2)?;
        w.write_bits(on_off_bits(status.enabled) as u64, 2)?;
        w.write_bits(nibble(status.operating_state) as u64, 4)
    })
}

/// Inverter slots, both stopping.
#[derive(Debug, Clone, Copy)]
pub struct InverterStatusFields {
    pub instance: u8,
    pub ac_instance: u8,
    pub battery_instance: u8,
    pub operating_state: ExpiringValue<InverterOperatingState>,
    pub enabled: ExpiringValue<OnOff>,
}

impl InverterStatusFields {
    pub fn new(instance: u8, ac_instance: u8, battery_instance: u8, expiry: Duration) -> Self {
        Self {
            instance,
            ac_instance,
            battery_instance,
            operating_state: ExpiringValue::stopping(expiry),
            enabled: ExpiringValue::stopping(expiry),
        }
    }

    pub fn snapshot(&self, now: Instant) -> InverterStatus {
        InverterStatus {
            instance: self.instance,
            ac_instance: self.ac_instance,
            battery_instance: self.battery_instance,
            operating_state: self.operating_state.get(now),
            enabled: self.enabled.get(now),
        }
    }
}

impl MessageSource for InverterStatusFields {
    fn suspended(&self, now: Instant) -> bool {
        self.operating_state.is_stopped(now) || self.enabled.is_stopped(now)
    }

    fn compose(&self, now: Instant, batch: &mut OutboundBatch) -> Result<(), EncodeError> {
        batch.push(encode_inverter_status(&self.snapshot(now))?)
    }
}

pub type InverterStatusSender = PeriodicSender<InverterStatusFields>;
