//! PGN 127507, Charger Status.
use embassy_time::{Duration, Instant};

use crate::error::EncodeError;
use crate::infra::codec::scaled::{encode_u8, FieldWidth};
use crate::protocol::lookups::{nibble, on_off_bits, ChargeState, ChargerMode, OnOff};
use crate::protocol::messages::{build_frame, write_scaled};
use crate::protocol::publish::expiring::ExpiringValue;
use crate::protocol::publish::sender::{MessageSource, OutboundBatch, PeriodicSender};
use crate::protocol::transport::can_frame::CanFrame;

pub const PGN_CHARGER_STATUS: u32 = 127507;

/// Values of one 127507 message.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChargerStatus {
    pub instance: u8,
    pub battery_instance: u8,
    pub charge_state: Option<ChargeState>,
    pub charger_mode: Option<ChargerMode>,
    pub enabled: Option<OnOff>,
    pub equalization_pending: Option<OnOff>,
    /// Seconds.
    pub equalization_time_remaining: Option<f64>,
}

pub fn encode_charger_status(status: &ChargerStatus) -> Result<CanFrame, EncodeError> {
    build_frame(PGN_CHARGER_STATUS, |w| {
        w.write_u8(encode_u8(Some(status.instance)))?;
        w.write_u8(encode_u8(Some(status.battery_instance)))?;
        w.write_bits(nibble(status.charge_state) as u64, 4)?;
        w.write_bits(nibble(status.charger_mode) as u64, 4)?;
        w.write_bits(on_off_bits(status.enabled) as u64, 2)?;
        w.write_bits(on_off_bits(status.equalization_pending) as u64, 2)?;
        w.write_bits(0x0F, 4)?;
        write_scaled(w, status.equalization_time_remaining, 60.0, FieldWidth::U16)
    })
}

/// Charger slots. Both are stopping: an unknown charger state is signalled
/// by silence rather than by a sentinel message.
#[derive(Debug, Clone, Copy)]
pub struct ChargerStatusFields {
    pub instance: u8,
    pub battery_instance: u8,
    pub charger_mode: ChargerMode,
    pub charge_state: ExpiringValue<ChargeState>,
    pub enabled: ExpiringValue<OnOff>,
}

impl ChargerStatusFields {
    pub fn new(instance: u8, battery_instance: u8, charger_mode: ChargerMode, expiry: Duration) -> Self {
        Self {
            instance,
            battery_instance,
            charger_mode,
            charge_state: ExpiringValue::stopping(expiry),
            enabled: ExpiringValue::stopping(expiry),
        }
    }

    pub fn snapshot(&self, now: Instant) -> ChargerStatus {
        ChargerStatus {
            instance: self.instance,
            battery_instance: self.battery_instance,
            charge_state: self.charge_state.get(now),
            charger_mode: Some(self.charger_mode),
            enabled: self.enabled.get(now),
            equalization_pending: None,
            equalization_time_remaining: None,
        }
    }
}

impl MessageSource for ChargerStatusFields {
    fn suspended(&self, now: Instant) -> bool {
        self.charge_state.is_stopped(now) || self.enabled.is_stopped(now)
    }

    fn compose(&self, now: Instant, batch: &mut OutboundBatch) -> Result<(), EncodeError> {
        batch.push(encode_charger_status(&self.snapshot(now))?)
    }
}

pub type ChargerStatusSender = PeriodicSender<ChargerStatusFields>;
