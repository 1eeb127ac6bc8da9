//! PGN 127751, DC Voltage/Current.
use embassy_time::{Duration, Instant};

use crate::error::EncodeError;
use crate::infra::codec::scaled::{encode_u8, FieldWidth};
use crate::protocol::messages::{build_frame, write_scaled};
use crate::protocol::publish::expiring::ExpiringValue;
use crate::protocol::publish::sender::{MessageSource, OutboundBatch, PeriodicSender};
use crate::protocol::transport::can_frame::CanFrame;

pub const PGN_DC_VOLTAGE_CURRENT: u32 = 127751;

/// Values of one 127751 message.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DcVoltageCurrent {
    pub connection: u8,
    /// Volts.
    pub voltage: Option<f64>,
    /// Amperes.
    pub current: Option<f64>,
}

/// SID, connection, voltage (0.1 V, 2 bytes), current (0.01 A, 3 bytes).
pub fn encode_dc_voltage_current(status: &DcVoltageCurrent) -> Result<CanFrame, EncodeError> {
    build_frame(PGN_DC_VOLTAGE_CURRENT, |w| {
        w.write_u8(0)?;
        w.write_u8(encode_u8(Some(status.connection)))?;
        write_scaled(w, status.voltage, 0.1, FieldWidth::U16)?;
        write_scaled(w, status.current, 0.01, FieldWidth::U24)
    })
}

/// Current to publish: the measured one when present and positive, else
/// `power / voltage`. A zero voltage (or any non-finite quotient) gives
/// "not available".
pub fn bus_current(current: Option<f64>, power: Option<f64>, voltage: Option<f64>) -> Option<f64> {
    if let Some(current) = current.filter(|c| *c > 0.0) {
        return Some(current);
    }
    let (power, voltage) = (power?, voltage?);
    if voltage == 0.0 {
        return None;
    }
    Some(power / voltage).filter(|c| c.is_finite())
}

/// DC bus slots.
#[derive(Debug, Clone, Copy)]
pub struct DcVoltageCurrentFields {
    pub connection: u8,
    pub voltage: ExpiringValue<f64>,
    pub current: ExpiringValue<f64>,
    pub power: ExpiringValue<f64>,
}

impl DcVoltageCurrentFields {
    pub fn new(connection: u8, expiry: Duration) -> Self {
        Self {
            connection,
            voltage: ExpiringValue::expiring(expiry),
            current: ExpiringValue::expiring(expiry),
            power: ExpiringValue::expiring(expiry),
        }
    }

    pub fn snapshot(&self, now: Instant) -> DcVoltageCurrent {
        let voltage = self.voltage.get(now);
        DcVoltageCurrent {
            connection: self.connection,
            voltage,
            current: bus_current(self.current.get(now), self.power.get(now), voltage),
        }
    }
}

impl MessageSource for DcVoltageCurrentFields {
    fn compose(&self, now: Instant, batch: &mut OutboundBatch) -> Result<(), EncodeError> {
        batch.push(encode_dc_voltage_current(&self.snapshot(now))?)
    }
}

pub type DcVoltageCurrentSender = PeriodicSender<DcVoltageCurrentFields>;
