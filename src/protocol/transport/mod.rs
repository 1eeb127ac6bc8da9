//! NMEA 2000 transport seam: decoded frame representation, 29-bit identifier
//! codec and the collaborator traits (bus stack, UDP sink, timer).
//!
//! ## Timing and sizing constants
//!
//! Values dictated by NMEA 2000 or by the YD RAW gateway convention.

pub mod can_frame;
pub mod can_id;
pub mod traits;

/// Transmission interval of the periodic status PGNs (ms). Fixed by NMEA 2000.
pub const DEFAULT_REPEAT_INTERVAL_MS: u64 = 1000;

/// Age after which a cached telemetry value stops being reported (ms).
pub const DEFAULT_EXPIRY_MS: u64 = 30_000;

/// UDP port the YD RAW listeners expect.
pub const YD_UDP_PORT: u16 = 4444;

/// Payload bytes rendered on one gateway line.
///
/// Longer Fast Packet payloads are truncated so a line always fits in a
/// single datagram.
pub const MAX_GATEWAY_PAYLOAD: usize = 134;
