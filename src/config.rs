//! Plain configuration data of the gateway and the publishers.
//!
//! Loaded by the host (flash, JSON document, ...) through `serde`. Every
//! field falls back to a compiled-in default, so a partial or empty document
//! still yields a usable configuration with all senders disabled.
use embassy_time::Duration;
use serde::Deserialize;

use crate::protocol::lookups::ChargerMode;
use crate::protocol::transport::{DEFAULT_EXPIRY_MS, DEFAULT_REPEAT_INTERVAL_MS, YD_UDP_PORT};

/// One periodic sender: persisted enable flag and instance numbers (0-253).
///
/// Which instance fields are read depends on the message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct SenderConfig {
    pub enabled: bool,
    /// Battery, charger, inverter instance or DC connection number.
    pub instance: u8,
    pub battery_instance: u8,
    pub ac_instance: u8,
}

impl SenderConfig {
    pub const fn disabled(instance: u8) -> Self {
        Self {
            enabled: false,
            instance,
            battery_instance: instance,
            ac_instance: instance,
        }
    }
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self::disabled(0)
    }
}

/// UDP gateway settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct GatewayConfig {
    pub enabled: bool,
    /// Last node address recorded by the address observer.
    pub node_address: Option<u8>,
    /// Listener port (YD RAW).
    pub port: u16,
    /// Virtual device whose claimed address is observed.
    pub device_index: u8,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            node_address: None,
            port: YD_UDP_PORT,
            device_index: 0,
        }
    }
}

/// Telemetry names and the full sender set.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BridgeConfig<'a> {
    /// Name of the start battery under `electrical.batteries`.
    #[serde(borrow)]
    pub start_battery: &'a str,
    /// Name of the house battery under `electrical.batteries`.
    #[serde(borrow)]
    pub house_battery: &'a str,
    /// Name of the inverter/charger under `electrical.inverters`.
    #[serde(borrow)]
    pub charger: &'a str,
    pub repeat_interval_ms: u64,
    pub expiry_ms: u64,
    pub charger_mode: ChargerMode,
    pub start_battery_status: SenderConfig,
    pub house_battery_status: SenderConfig,
    pub house_dc_status: SenderConfig,
    pub charger_status: SenderConfig,
    pub inverter_status: SenderConfig,
    pub dc_bus: SenderConfig,
    pub ac_input: SenderConfig,
    pub ac_output: SenderConfig,
    pub gateway: GatewayConfig,
}

impl BridgeConfig<'_> {
    pub fn repeat_interval(&self) -> Duration {
        Duration::from_millis(self.repeat_interval_ms)
    }

    pub fn expiry(&self) -> Duration {
        Duration::from_millis(self.expiry_ms)
    }
}

impl Default for BridgeConfig<'_> {
    fn default() -> Self {
        Self {
            start_battery: "279-second",
            house_battery: "279",
            charger: "276",
            repeat_interval_ms: DEFAULT_REPEAT_INTERVAL_MS,
            expiry_ms: DEFAULT_EXPIRY_MS,
            charger_mode: ChargerMode::Standalone,
            start_battery_status: SenderConfig::disabled(0),
            house_battery_status: SenderConfig::disabled(1),
            house_dc_status: SenderConfig::disabled(1),
            charger_status: SenderConfig::disabled(1),
            inverter_status: SenderConfig::disabled(1),
            dc_bus: SenderConfig::disabled(3),
            ac_input: SenderConfig::disabled(0),
            ac_output: SenderConfig::disabled(0),
            gateway: GatewayConfig::default(),
        }
    }
}
