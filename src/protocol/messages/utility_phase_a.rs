//! PGNs 65013 and 65014, Utility Phase A AC power and basic quantities.
//! Both go out on the same tick.
use embassy_time::{Duration, Instant};

use crate::error::EncodeError;
use crate::infra::codec::scaled::FieldWidth;
use crate::protocol::messages::{build_frame, write_scaled};
use crate::protocol::publish::expiring::ExpiringValue;
use crate::protocol::publish::sender::{MessageSource, OutboundBatch, PeriodicSender};
use crate::protocol::transport::can_frame::CanFrame;

pub const PGN_UTILITY_PHASE_A_POWER: u32 = 65013;
pub const PGN_UTILITY_PHASE_A_BASIC: u32 = 65014;

/// Values of one 65013 message.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UtilityPhaseAPower {
    /// Watts.
    pub real_power: Option<f64>,
    /// Volt-amperes.
    pub apparent_power: Option<f64>,
}

/// Values of one 65014 message.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UtilityPhaseABasic {
    /// Volts.
    pub line_line_voltage: Option<f64>,
    /// Volts.
    pub line_neutral_voltage: Option<f64>,
    /// Hertz.
    pub frequency: Option<f64>,
    /// Amperes.
    pub current: Option<f64>,
}

pub fn encode_utility_phase_a_power(power: &UtilityPhaseAPower) -> Result<CanFrame, EncodeError> {
    build_frame(PGN_UTILITY_PHASE_A_POWER, |w| {
        write_scaled(w, power.real_power, 1.0, FieldWidth::I32)?;
        write_scaled(w, power.apparent_power, 1.0, FieldWidth::I32)
    })
}

/// Voltages (1 V), frequency (1/128 Hz), current (1 A).
pub fn encode_utility_phase_a_basic(basic: &UtilityPhaseABasic) -> Result<CanFrame, EncodeError> {
    build_frame(PGN_UTILITY_PHASE_A_BASIC, |w| {
        write_scaled(w, basic.line_line_voltage, 1.0, FieldWidth::U16)?;
        write_scaled(w, basic.line_neutral_voltage, 1.0, FieldWidth::U16)?;
        write_scaled(w, basic.frequency, 1.0 / 128.0, FieldWidth::U16)?;
        write_scaled(w, basic.current, 1.0, FieldWidth::U16)
    })
}

/// AC input or output slots of one inverter/charger.
#[derive(Debug, Clone, Copy)]
pub struct UtilityPhaseAFields {
    pub real_power: ExpiringValue<f64>,
    pub apparent_power: ExpiringValue<f64>,
    pub line_line_voltage: ExpiringValue<f64>,
    pub line_neutral_voltage: ExpiringValue<f64>,
    pub frequency: ExpiringValue<f64>,
    pub current: ExpiringValue<f64>,
}

impl UtilityPhaseAFields {
    pub fn new(expiry: Duration) -> Self {
        Self {
            real_power: ExpiringValue::expiring(expiry),
            apparent_power: ExpiringValue::expiring(expiry),
            line_line_voltage: ExpiringValue::expiring(expiry),
            line_neutral_voltage: ExpiringValue::expiring(expiry),
            frequency: ExpiringValue::expiring(expiry),
            current: ExpiringValue::expiring(expiry),
        }
    }

    pub fn snapshot(&self, now: Instant) -> (UtilityPhaseAPower, UtilityPhaseABasic) {
        (
            UtilityPhaseAPower {
                real_power: self.real_power.get(now),
                apparent_power: self.apparent_power.get(now),
            },
            UtilityPhaseABasic {
                line_line_voltage: self.line_line_voltage.get(now),
                line_neutral_voltage: self.line_neutral_voltage.get(now),
                frequency: self.frequency.get(now),
                current: self.current.get(now),
            },
        )
    }
}

impl MessageSource for UtilityPhaseAFields {
    fn compose(&self, now: Instant, batch: &mut OutboundBatch) -> Result<(), EncodeError> {
        let (power, basic) = self.snapshot(now);
        batch.push(encode_utility_phase_a_power(&power)?)?;
        batch.push(encode_utility_phase_a_basic(&basic)?)
    }
}

pub type UtilityPhaseASender = PeriodicSender<UtilityPhaseAFields>;
