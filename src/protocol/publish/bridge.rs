//! Routing of named telemetry values into the sender slots.
//!
//! The bridge owns every outbound sender of the gateway. Paths follow the
//! Signal K layout: `electrical.batteries.<name>.<field>` and
//! `electrical.inverters.<name>.<field>`, with the names taken from
//! [`BridgeConfig`].
use embassy_time::Instant;

use crate::config::{BridgeConfig, SenderConfig};
use crate::protocol::lookups::{
    charge_state_from_mode_number, inverter_state_from_mode_number, on_off_from_number,
};
use crate::protocol::messages::battery_status::{BatteryStatusFields, BatteryStatusSender};
use crate::protocol::messages::charger_status::{ChargerStatusFields, ChargerStatusSender};
use crate::protocol::messages::dc_detailed_status::{DcDetailedStatusFields, DcDetailedStatusSender};
use crate::protocol::messages::dc_voltage_current::{DcVoltageCurrentFields, DcVoltageCurrentSender};
use crate::protocol::messages::inverter_status::{InverterStatusFields, InverterStatusSender};
use crate::protocol::messages::utility_phase_a::{UtilityPhaseAFields, UtilityPhaseASender};
use crate::protocol::publish::sender::{PeriodicSender, Publish};

const BATTERIES: &str = "electrical.batteries.";
const INVERTERS: &str = "electrical.inverters.";
const VENUS_DC_POWER: &str = "electrical.venus.dcPower";

/// Virtual device publishing the battery, charger and inverter messages.
pub const MAIN_DEVICE: u8 = 0;
/// Virtual device publishing the AC input quantities.
pub const AC_INPUT_DEVICE: u8 = 1;
/// Virtual device publishing the AC output quantities.
pub const AC_OUTPUT_DEVICE: u8 = 2;

/// Number of senders owned by the bridge.
pub const SENDER_COUNT: usize = 8;

/// `field` part of `<group><name>.<field>`, if `path` belongs to `name`.
fn member<'p>(path: &'p str, group: &str, name: &str) -> Option<&'p str> {
    path.strip_prefix(group)?
        .strip_prefix(name)?
        .strip_prefix('.')
}

/// Telemetry names and the senders they feed.
pub struct TelemetryBridge<'a> {
    start_battery_name: &'a str,
    house_battery_name: &'a str,
    charger_name: &'a str,
    pub start_battery: BatteryStatusSender,
    pub house_battery: BatteryStatusSender,
    pub house_dc: DcDetailedStatusSender,
    pub charger: ChargerStatusSender,
    pub inverter: InverterStatusSender,
    pub dc_bus: DcVoltageCurrentSender,
    pub ac_input: UtilityPhaseASender,
    pub ac_output: UtilityPhaseASender,
}

impl<'a> TelemetryBridge<'a> {
    pub fn new(config: &BridgeConfig<'a>) -> Self {
        let expiry = config.expiry();
        let interval = config.repeat_interval();
        let battery = |cfg: &SenderConfig| {
            PeriodicSender::new(
                BatteryStatusFields::new(cfg.instance, expiry),
                cfg.enabled,
                MAIN_DEVICE,
            )
            .with_interval(interval)
        };
        let ac = |cfg: &SenderConfig, device_index: u8| {
            PeriodicSender::new(UtilityPhaseAFields::new(expiry), cfg.enabled, device_index)
                .with_interval(interval)
        };

        let (dc, charger, inverter, bus) = (
            &config.house_dc_status,
            &config.charger_status,
            &config.inverter_status,
            &config.dc_bus,
        );
        Self {
            start_battery_name: config.start_battery,
            house_battery_name: config.house_battery,
            charger_name: config.charger,
            start_battery: battery(&config.start_battery_status),
            house_battery: battery(&config.house_battery_status),
            house_dc: PeriodicSender::new(
                DcDetailedStatusFields::new(dc.instance, expiry),
                dc.enabled,
                MAIN_DEVICE,
            )
            .with_interval(interval),
            charger: PeriodicSender::new(
                ChargerStatusFields::new(
                    charger.instance,
                    charger.battery_instance,
                    config.charger_mode,
                    expiry,
                ),
                charger.enabled,
                MAIN_DEVICE,
            )
            .with_interval(interval),
            inverter: PeriodicSender::new(
                InverterStatusFields::new(
                    inverter.instance,
                    inverter.ac_instance,
                    inverter.battery_instance,
                    expiry,
                ),
                inverter.enabled,
                MAIN_DEVICE,
            )
            .with_interval(interval),
            dc_bus: PeriodicSender::new(
                DcVoltageCurrentFields::new(bus.instance, expiry),
                bus.enabled,
                MAIN_DEVICE,
            )
            .with_interval(interval),
            ac_input: ac(&config.ac_input, AC_INPUT_DEVICE),
            ac_output: ac(&config.ac_output, AC_OUTPUT_DEVICE),
        }
    }

    /// Store `value` under `path`. Returns `false` for unknown paths.
    pub fn apply(&mut self, path: &str, value: f64, now: Instant) -> bool {
        let routed = if path == VENUS_DC_POWER {
            self.dc_bus.source_mut().power.set(value, now);
            true
        } else if let Some(field) = member(path, BATTERIES, self.start_battery_name) {
            self.apply_start_battery(field, value, now)
        } else if let Some(field) = member(path, BATTERIES, self.house_battery_name) {
            self.apply_house_battery(field, value, now)
        } else if let Some(field) = member(path, INVERTERS, self.charger_name) {
            self.apply_charger(field, value, now)
        } else {
            false
        };

        if !routed {
            #[cfg(feature = "defmt")]
            defmt::trace!("Unrouted telemetry path {=str}", path);
        }
        routed
    }

    fn apply_start_battery(&mut self, field: &str, value: f64, now: Instant) -> bool {
        match field {
            "voltage" => self.start_battery.source_mut().voltage.set(value, now),
            _ => return false,
        }
        true
    }

    fn apply_house_battery(&mut self, field: &str, value: f64, now: Instant) -> bool {
        match field {
            "voltage" => {
                self.house_battery.source_mut().voltage.set(value, now);
                self.dc_bus.source_mut().voltage.set(value, now);
            }
            "current" => self.house_battery.source_mut().current.set(value, now),
            "temperature" => self.house_battery.source_mut().temperature.set(value, now),
            // Published as a ratio, carried in percent.
            "capacity.stateOfCharge" => self
                .house_dc
                .source_mut()
                .state_of_charge
                .set(value * 100.0, now),
            "capacity.timeRemaining" => self.house_dc.source_mut().time_remaining.set(value, now),
            "chargingModeNumber" => self
                .charger
                .source_mut()
                .charge_state
                .set(charge_state_from_mode_number(value as i32), now),
            "modeNumber" => self
                .charger
                .source_mut()
                .enabled
                .set(on_off_from_number(value as i32), now),
            _ => return false,
        }
        true
    }

    fn apply_charger(&mut self, field: &str, value: f64, now: Instant) -> bool {
        if field == "inverterModeNumber" {
            let inverter = self.inverter.source_mut();
            inverter
                .operating_state
                .set(inverter_state_from_mode_number(value as i32), now);
            inverter.enabled.set(on_off_from_number(value as i32), now);
            return true;
        }

        let (ac, quantity) = if let Some(quantity) = field.strip_prefix("acin.") {
            (self.ac_input.source_mut(), quantity)
        } else if let Some(quantity) = field.strip_prefix("acout.") {
            (self.ac_output.source_mut(), quantity)
        } else {
            return false;
        };
        match quantity {
            "power" => {
                ac.real_power.set(value, now);
                ac.apparent_power.set(value, now);
            }
            "frequency" => ac.frequency.set(value, now),
            "current" => ac.current.set(value, now),
            "voltage" => ac.line_neutral_voltage.set(value, now),
            _ => return false,
        }
        true
    }

    /// Every sender, as one list.
    pub fn senders_mut(&mut self) -> [&mut dyn Publish; SENDER_COUNT] {
        [
            &mut self.start_battery,
            &mut self.house_battery,
            &mut self.house_dc,
            &mut self.charger,
            &mut self.inverter,
            &mut self.dc_bus,
            &mut self.ac_input,
            &mut self.ac_output,
        ]
    }

    /// Earliest due instant over all enabled senders.
    pub fn next_due(&mut self) -> Option<Instant> {
        self.senders_mut().iter().filter_map(|s| s.next_due()).min()
    }
}
