//! Decoded NMEA 2000 message as handed over by the bus stack (Fast Packet
//! frames already reassembled) or produced by an outbound encoder.
use crate::core::PgnBytes;
use crate::error::CanIdBuildError;
use crate::protocol::transport::can_id::{CanId, BROADCAST_ADDRESS};

#[derive(Clone, Debug, PartialEq, Eq)]
/// One NMEA 2000 message.
pub struct CanFrame {
    /// Priority, 0 (highest) to 7.
    pub priority: u8,
    /// 18-bit Parameter Group Number.
    pub pgn: u32,
    /// Sender node address.
    pub source: u8,
    /// Addressee; only meaningful for PDU1 PGNs.
    pub destination: u8,
    /// Message payload (0 to 223 bytes).
    pub data: PgnBytes,
}

impl CanFrame {
    /// Build a broadcast message.
    pub fn new(priority: u8, pgn: u32, source: u8, data: &[u8]) -> Self {
        Self {
            priority,
            pgn,
            source,
            destination: BROADCAST_ADDRESS,
            data: PgnBytes::from_slice(data),
        }
    }

    /// Rebuild the message from a wire identifier and its payload.
    pub fn from_id(id: CanId, data: &[u8]) -> Self {
        let fields = id.unpack();
        Self {
            priority: fields.priority,
            pgn: fields.pgn,
            source: fields.source,
            destination: fields.destination.unwrap_or(BROADCAST_ADDRESS),
            data: PgnBytes::from_slice(data),
        }
    }

    /// Pack the 29-bit wire identifier of this message.
    pub fn can_id(&self) -> Result<CanId, CanIdBuildError> {
        CanId::pack(self.priority, self.pgn, self.source, self.destination)
    }

    /// Wire identifier as rendered on the gateway, never rejected.
    pub fn wire_id(&self) -> CanId {
        CanId::pack_lenient(self.priority, self.pgn, self.source, self.destination)
    }

    /// Populated payload bytes.
    pub fn payload(&self) -> &[u8] {
        self.data.as_slice()
    }
}
