//! Outbound PGN payload encoders.
//!
//! Each message type comes in two halves: a plain snapshot struct with an
//! `encode` function (pure, `None` fields become the wire sentinels) and a
//! field set of [`ExpiringValue`](crate::protocol::publish::expiring::ExpiringValue)
//! slots implementing [`MessageSource`](crate::protocol::publish::sender::MessageSource),
//! which snapshots its slots on every tick.
use crate::core::PgnBytes;
use crate::error::{BitWriterError, EncodeError};
use crate::infra::codec::bits::BitWriter;
use crate::infra::codec::scaled::{quantize, FieldWidth};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::BROADCAST_ADDRESS;

pub mod battery_status;
pub mod charger_status;
pub mod dc_detailed_status;
pub mod dc_voltage_current;
pub mod inverter_status;
pub mod utility_phase_a;

/// Priority of every periodic status message.
pub const STATUS_PRIORITY: u8 = 6;

/// Lay out a broadcast payload and wrap it in a frame.
///
/// The source address is left at 0, the bus stack stamps the address of the
/// sending device. The identifier is packed once here so an invalid PGN is
/// caught at encode time.
pub(crate) fn build_frame(
    pgn: u32,
    layout: impl FnOnce(&mut BitWriter) -> Result<(), BitWriterError>,
) -> Result<CanFrame, EncodeError> {
    let mut data = PgnBytes::new();
    let len = {
        let mut writer = BitWriter::new(data.storage_mut());
        layout(&mut writer)?;
        writer.byte_len()
    };
    data.len = len;

    let frame = CanFrame {
        priority: STATUS_PRIORITY,
        pgn,
        source: 0,
        destination: BROADCAST_ADDRESS,
        data,
    };
    frame.can_id()?;
    Ok(frame)
}

/// Quantize `value` and write it little-endian on `width` bytes.
pub(crate) fn write_scaled(
    writer: &mut BitWriter,
    value: Option<f64>,
    resolution: f64,
    width: FieldWidth,
) -> Result<(), BitWriterError> {
    writer.write_le(quantize(value, resolution, width), width.bytes())
}
