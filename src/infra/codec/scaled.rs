//! Fixed-point quantization with the NMEA 2000 reserved top values.
//!
//! Every integer field reserves its highest patterns: the very top one means
//! "not available", the next one "out of range / error". Physical values are
//! divided by the field resolution, rounded half away from zero, then checked
//! against the representable range. Absence (`None`) and NaN are written as
//! "not available"; anything that does not fit is written as "out of range".
//! A wrapped or truncated number is never emitted.

/// Integer layout of an outbound field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldWidth {
    U8,
    U16,
    U24,
    I16,
    I32,
}

impl FieldWidth {
    /// Width in bytes on the wire.
    pub const fn bytes(self) -> u8 {
        match self {
            FieldWidth::U8 => 1,
            FieldWidth::U16 | FieldWidth::I16 => 2,
            FieldWidth::U24 => 3,
            FieldWidth::I32 => 4,
        }
    }

    /// Raw pattern meaning "not available".
    pub const fn not_available(self) -> u32 {
        match self {
            FieldWidth::U8 => 0xFF,
            FieldWidth::U16 => 0xFFFF,
            FieldWidth::U24 => 0xFF_FFFF,
            FieldWidth::I16 => 0x7FFF,
            FieldWidth::I32 => 0x7FFF_FFFF,
        }
    }

    /// Raw pattern meaning "out of range / error".
    pub const fn out_of_range(self) -> u32 {
        self.not_available() - 1
    }

    const fn min(self) -> i64 {
        match self {
            FieldWidth::U8 | FieldWidth::U16 | FieldWidth::U24 => 0,
            FieldWidth::I16 => i16::MIN as i64,
            FieldWidth::I32 => i32::MIN as i64,
        }
    }

    /// Largest value that is still a measurement.
    const fn max(self) -> i64 {
        self.not_available() as i64 - 2
    }

    /// Two's complement bit pattern of `value` truncated to the field width.
    const fn raw(self, value: i64) -> u32 {
        match self {
            FieldWidth::I16 => value as i16 as u16 as u32,
            FieldWidth::I32 => value as i32 as u32,
            _ => value as u32,
        }
    }
}

/// Quantize `value` at `resolution` into the raw pattern of `width`.
pub fn quantize(value: Option<f64>, resolution: f64, width: FieldWidth) -> u32 {
    let Some(value) = value else {
        return width.not_available();
    };
    if value.is_nan() {
        return width.not_available();
    }

    let scaled = value / resolution;
    // Also rejects +/-inf before the float to int cast below.
    if !(scaled >= (width.min() - 1) as f64 && scaled <= (width.max() + 1) as f64) {
        return width.out_of_range();
    }

    let rounded = if scaled >= 0.0 {
        (scaled + 0.5) as i64
    } else {
        (scaled - 0.5) as i64
    };
    if rounded < width.min() || rounded > width.max() {
        return width.out_of_range();
    }
    width.raw(rounded)
}

/// Raw byte for an integer quantity carried as-is (percentages, instances).
pub fn encode_u8(value: Option<u8>) -> u8 {
    match value {
        None => FieldWidth::U8.not_available() as u8,
        Some(v) if v as i64 > FieldWidth::U8.max() => FieldWidth::U8.out_of_range() as u8,
        Some(v) => v,
    }
}
