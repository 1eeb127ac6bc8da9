//! NMEA 2000 lookup enumerations used by the outbound encoders, plus the
//! translation from the mode numbers published by Victron VE.Bus devices.
//!
//! Each enum is `#[repr(u8)]` with its wire value; `None` at the call site
//! stands for the "unavailable" pattern of the field (`0xF` for 4-bit
//! lookups, `0x3` for 2-bit ones).

/// DC source type of PGN 127506.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DcSourceType {
    Battery = 0,
    Alternator = 1,
    Convertor = 2,
    SolarCell = 3,
    WindGenerator = 4,
}

/// Charger state of PGN 127507 (4 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ChargeState {
    NotCharging = 0,
    Bulk = 1,
    Absorption = 2,
    Overcharge = 3,
    Equalise = 4,
    Float = 5,
    NoFloat = 6,
    ConstantVi = 7,
    Disabled = 8,
    Fault = 9,
}

/// Charger operating mode of PGN 127507 (4 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ChargerMode {
    #[default]
    Standalone = 0,
    Primary = 1,
    Secondary = 2,
    Echo = 3,
}

/// Two-bit switch state shared by chargers and inverters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum OnOff {
    Off = 0,
    On = 1,
    Error = 2,
}

/// Inverter operating state of PGN 127509 (4 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum InverterOperatingState {
    Invert = 0,
    AcPassthru = 1,
    LoadSense = 2,
    Fault = 3,
    Disabled = 4,
    Error = 14,
}

/// Raw 4-bit pattern for an optional lookup.
pub(crate) fn nibble<T: Into<u8>>(value: Option<T>) -> u8 {
    value.map_or(0x0F, |v| v.into() & 0x0F)
}

/// Raw 2-bit pattern for an optional switch state.
pub(crate) fn on_off_bits(value: Option<OnOff>) -> u8 {
    value.map_or(0x03, |v| v as u8 & 0x03)
}

macro_rules! lookup_into_u8 {
    ($($ty:ty),*) => {
        $(impl From<$ty> for u8 {
            fn from(value: $ty) -> u8 {
                value as u8
            }
        })*
    };
}

lookup_into_u8!(DcSourceType, ChargeState, ChargerMode, OnOff, InverterOperatingState);

//==================================================================================VE_BUS
/// Map a VE.Bus charging mode number onto the NMEA 2000 charger state.
pub fn charge_state_from_mode_number(mode: i32) -> ChargeState {
    match mode {
        1 | 2 => ChargeState::Fault,
        3 => ChargeState::Bulk,
        4 => ChargeState::Absorption,
        5 | 6 => ChargeState::Float,
        7 => ChargeState::Equalise,
        8 => ChargeState::Disabled,
        11 => ChargeState::ConstantVi,
        _ => ChargeState::NotCharging,
    }
}

/// Map a VE.Bus inverter mode number onto the NMEA 2000 operating state.
pub fn inverter_state_from_mode_number(mode: i32) -> InverterOperatingState {
    match mode {
        1 | 2 => InverterOperatingState::Fault,
        8 => InverterOperatingState::AcPassthru,
        9 => InverterOperatingState::Invert,
        10 => InverterOperatingState::LoadSense,
        _ => InverterOperatingState::Disabled,
    }
}

/// Zero means off, anything else on.
pub fn on_off_from_number(mode: i32) -> OnOff {
    if mode == 0 {
        OnOff::Off
    } else {
        OnOff::On
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charge_state_map() {
        assert_eq!(charge_state_from_mode_number(0), ChargeState::NotCharging);
        assert_eq!(charge_state_from_mode_number(2), ChargeState::Fault);
        assert_eq!(charge_state_from_mode_number(3), ChargeState::Bulk);
        assert_eq!(charge_state_from_mode_number(6), ChargeState::Float);
        assert_eq!(charge_state_from_mode_number(11), ChargeState::ConstantVi);
        assert_eq!(charge_state_from_mode_number(42), ChargeState::NotCharging);
    }

    #[test]
    fn test_inverter_state_map() {
        assert_eq!(inverter_state_from_mode_number(0), InverterOperatingState::Disabled);
        assert_eq!(inverter_state_from_mode_number(1), InverterOperatingState::Fault);
        assert_eq!(inverter_state_from_mode_number(8), InverterOperatingState::AcPassthru);
        assert_eq!(inverter_state_from_mode_number(9), InverterOperatingState::Invert);
        assert_eq!(inverter_state_from_mode_number(10), InverterOperatingState::LoadSense);
        assert_eq!(inverter_state_from_mode_number(3), InverterOperatingState::Disabled);
    }

    #[test]
    fn test_unavailable_patterns() {
        assert_eq!(nibble::<ChargeState>(None), 0x0F);
        assert_eq!(nibble(Some(ChargeState::Float)), 5);
        assert_eq!(on_off_bits(None), 0x03);
        assert_eq!(on_off_bits(Some(on_off_from_number(7))), 1);
    }
}
