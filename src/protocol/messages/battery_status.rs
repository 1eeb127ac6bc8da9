//! PGN 127508, Battery Status.
use embassy_time::{Duration, Instant};

use crate::error::EncodeError;
use crate::infra::codec::scaled::{encode_u8, FieldWidth};
use crate::protocol::messages::{build_frame, write_scaled};
use crate::protocol::publish::expiring::ExpiringValue;
use crate::protocol::publish::sender::{MessageSource, OutboundBatch, PeriodicSender};
use crate::protocol::transport::can_frame::CanFrame;

pub const PGN_BATTERY_STATUS: u32 = 127508;

/// Values of one 127508 message.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryStatus {
    pub instance: u8,
    /// Volts.
    pub voltage: Option<f64>,
    /// Amperes, positive when charging.
    pub current: Option<f64>,
    /// Kelvin.
    pub temperature: Option<f64>,
}

/// Instance, voltage (0.01 V), current (0.1 A), temperature (0.01 K), SID.
pub fn encode_battery_status(status: &BatteryStatus) -> Result<CanFrame, EncodeError> {
    build_frame(PGN_BATTERY_STATUS, |w| {
        w.write_u8(encode_u8(Some(status.instance)))?;
        write_scaled(w, status.voltage, 0.01, FieldWidth::I16)?;
        write_scaled(w, status.current, 0.1, FieldWidth::I16)?;
        write_scaled(w, status.temperature, 0.01, FieldWidth::U16)?;
        // No sequence tracking.
        w.write_u8(0xFF)
    })
}

/// Expiring slots of one battery.
#[derive(Debug, Clone, Copy)]
pub struct BatteryStatusFields {
    pub instance: u8,
    pub voltage: ExpiringValue<f64>,
    pub current: ExpiringValue<f64>,
    pub temperature: ExpiringValue<f64>,
}

impl BatteryStatusFields {
    pub fn new(instance: u8, expiry: Duration) -> Self {
        Self {
            instance,
            voltage: ExpiringValue::expiring(expiry),
            current: ExpiringValue::expiring(expiry),
            temperature: ExpiringValue::expiring(expiry),
        }
    }

    pub fn snapshot(&self, now: Instant) -> BatteryStatus {
        BatteryStatus {
            instance: self.instance,
            voltage: self.voltage.get(now),
            current: self.current.get(now),
            temperature: self.temperature.get(now),
        }
    }
}

impl MessageSource for BatteryStatusFields {
    fn compose(&self, now: Instant, batch: &mut OutboundBatch) -> Result<(), EncodeError> {
        batch.push(encode_battery_status(&self.snapshot(now))?)
    }
}

pub type BatteryStatusSender = PeriodicSender<BatteryStatusFields>;
