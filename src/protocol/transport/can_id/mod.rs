//! Packing and unpacking of the 29-bit CAN identifiers used by
//! NMEA 2000 (derived from SAE J1939).
//!
//! ```text
//! bits 26-28  priority
//! bits  8-25  PGN (R, DP, PF, PS)
//! bits  0-7   source address
//! ```
//!
//! When PF < 240 (PDU1) the PS byte carries the destination address and the
//! low byte of the PGN is zero. When PF >= 240 (PDU2) the PS byte is the
//! group extension of the PGN and the message is broadcast.
use crate::error::CanIdBuildError;
use embedded_can::ExtendedId;

/// First PDU format value of the broadcast (PDU2) range.
pub const PDU2_THRESHOLD: u8 = 240;

/// Highest PGN that fits in the 18 identifier bits reserved for it.
pub const MAX_PGN: u32 = 0x3_FFFF;

/// Destination address meaning "every node".
pub const BROADCAST_ADDRESS: u8 = 0xFF;

/// Bits of an extended CAN identifier.
pub const EXTENDED_ID_MASK: u32 = 0x1FFF_FFFF;

/// PDU format: high byte of the 16 low PGN bits.
#[inline]
pub const fn pdu_format(pgn: u32) -> u8 {
    ((pgn >> 8) & 0xFF) as u8
}

/// `true` when the PGN is destination-specific.
#[inline]
pub const fn is_pdu1(pgn: u32) -> bool {
    pdu_format(pgn) < PDU2_THRESHOLD
}

//==================================================================================CAN_ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Extended CAN identifier (29 bits) with accessors for priority, PGN,
/// destination and source.
pub struct CanId(pub u32);

/// Fields recovered from an identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CanIdFields {
    pub priority: u8,
    pub pgn: u32,
    pub source: u8,
    /// `None` for PDU2 PGNs, which carry no destination.
    pub destination: Option<u8>,
}

impl CanId {
    /// Pack the identifier of a message.
    ///
    /// `destination` is only encoded for PDU1 PGNs; for PDU2 its bit
    /// position holds the PGN group extension and the argument is ignored.
    ///
    /// Values that do not fit their field are rejected rather than clamped.
    pub fn pack(
        priority: u8,
        pgn: u32,
        source: u8,
        destination: u8,
    ) -> Result<CanId, CanIdBuildError> {
        if priority > 0x07 {
            return Err(CanIdBuildError::InvalidPriority { priority });
        }
        if pgn > MAX_PGN {
            return Err(CanIdBuildError::PgnOverflow { pgn });
        }

        let mut id = (source as u32) | ((priority as u32) << 26);
        if is_pdu1(pgn) {
            if pgn & 0xFF != 0 {
                return Err(CanIdBuildError::PsFocusMessageMustBeNull { pgn });
            }
            id |= ((destination as u32) << 8) | (pgn << 8);
        } else {
            id |= pgn << 8;
        }
        Ok(CanId(id))
    }

    /// Pack the identifier of a received message, whatever its fields hold.
    ///
    /// Same bit placement as [`CanId::pack`], but nothing is rejected: a
    /// PDU1 PGN keeps its low byte ORed with the destination and oversized
    /// fields are cut to 29 bits. Used to render frames the bus already
    /// carried, which must reach the gateway even when malformed.
    pub fn pack_lenient(priority: u8, pgn: u32, source: u8, destination: u8) -> CanId {
        let mut id = (source as u32) | ((priority as u32) << 26);
        if is_pdu1(pgn) {
            id |= (destination as u32) << 8;
        }
        id |= pgn << 8;
        CanId(id & EXTENDED_ID_MASK)
    }

    /// Split the identifier back into its fields.
    pub fn unpack(&self) -> CanIdFields {
        CanIdFields {
            priority: self.priority(),
            pgn: self.pgn(),
            source: self.source_address(),
            destination: self.destination(),
        }
    }

    /// Priority (3 bits, value 0-7).
    pub fn priority(&self) -> u8 {
        ((self.0 >> 26) & 0x07) as u8
    }

    /// 18-bit PGN, handling the PDU1/PDU2 distinction.
    pub fn pgn(&self) -> u32 {
        let raw = (self.0 >> 8) & MAX_PGN;
        if is_pdu1(raw) {
            // PS stores the destination, not a PGN byte.
            raw & !0xFF
        } else {
            raw
        }
    }

    /// Destination address (PDU1 only).
    pub fn destination(&self) -> Option<u8> {
        let raw = (self.0 >> 8) & MAX_PGN;
        if is_pdu1(raw) {
            Some((raw & 0xFF) as u8)
        } else {
            None
        }
    }

    /// Eight-bit source address (logical node identifier on the N2K network).
    pub fn source_address(&self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Hand the identifier to an `embedded-can` driver.
    pub fn to_extended(&self) -> Option<ExtendedId> {
        ExtendedId::new(self.0)
    }
}

impl From<ExtendedId> for CanId {
    fn from(id: ExtendedId) -> Self {
        CanId(id.as_raw())
    }
}
