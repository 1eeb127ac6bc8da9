//! PGN 127506, DC Detailed Status.
use embassy_time::{Duration, Instant};

use crate::error::EncodeError;
use crate::infra::codec::scaled::{encode_u8, FieldWidth};
use crate::protocol::lookups::DcSourceType;
use crate::protocol::messages::{build_frame, write_scaled};
use crate::protocol::publish::expiring::ExpiringValue;
use crate::protocol::publish::sender::{MessageSource, OutboundBatch, PeriodicSender};
use crate::protocol::transport::can_frame::CanFrame;

pub const PGN_DC_DETAILED_STATUS: u32 = 127506;

/// Values of one 127506 message.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DcDetailedStatus {
    pub instance: u8,
    pub dc_type: DcSourceType,
    /// Percent.
    pub state_of_charge: Option<f64>,
    /// Percent.
    pub state_of_health: Option<f64>,
    /// Seconds.
    pub time_remaining: Option<f64>,
    /// Volts.
    pub ripple_voltage: Option<f64>,
    /// Coulombs.
    pub capacity: Option<f64>,
}

/// SID, instance, type, SOC, SOH, time remaining (60 s), ripple (0.001 V),
/// capacity (3600 C, one amp-hour).
pub fn encode_dc_detailed_status(status: &DcDetailedStatus) -> Result<CanFrame, EncodeError> {
    build_frame(PGN_DC_DETAILED_STATUS, |w| {
        w.write_u8(0)?;
        w.write_u8(encode_u8(Some(status.instance)))?;
        w.write_u8(status.dc_type.into())?;
        write_scaled(w, status.state_of_charge, 1.0, FieldWidth::U8)?;
        write_scaled(w, status.state_of_health, 1.0, FieldWidth::U8)?;
        write_scaled(w, status.time_remaining, 60.0, FieldWidth::U16)?;
        write_scaled(w, status.ripple_voltage, 0.001, FieldWidth::U16)?;
        write_scaled(w, status.capacity, 3600.0, FieldWidth::U16)
    })
}

/// Expiring slots of one battery bank.
#[derive(Debug, Clone, Copy)]
pub struct DcDetailedStatusFields {
    pub instance: u8,
    pub state_of_charge: ExpiringValue<f64>,
    pub state_of_health: ExpiringValue<f64>,
    pub time_remaining: ExpiringValue<f64>,
    pub ripple_voltage: ExpiringValue<f64>,
    pub capacity: ExpiringValue<f64>,
}

impl DcDetailedStatusFields {
    pub fn new(instance: u8, expiry: Duration) -> Self {
        Self {
            instance,
            state_of_charge: ExpiringValue::expiring(expiry),
            state_of_health: ExpiringValue::expiring(expiry),
            time_remaining: ExpiringValue::expiring(expiry),
            ripple_voltage: ExpiringValue::expiring(expiry),
            capacity: ExpiringValue::expiring(expiry),
        }
    }

    pub fn snapshot(&self, now: Instant) -> DcDetailedStatus {
        DcDetailedStatus {
            instance: self.instance,
            dc_type: DcSourceType::Battery,
            state_of_charge: self.state_of_charge.get(now),
            state_of_health: self.state_of_health.get(now),
            time_remaining: self.time_remaining.get(now),
            ripple_voltage: self.ripple_voltage.get(now),
            capacity: self.capacity.get(now),
        }
    }
}

impl MessageSource for DcDetailedStatusFields {
    fn compose(&self, now: Instant, batch: &mut OutboundBatch) -> Result<(), EncodeError> {
        batch.push(encode_dc_detailed_status(&self.snapshot(now))?)
    }
}

pub type DcDetailedStatusSender = PeriodicSender<DcDetailedStatusFields>;
