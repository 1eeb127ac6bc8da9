//! YD RAW line rendering.
//!
//! ```text
//! 16:29:27.000 R 09f8017f 50 c3 b8 13 47 d8 2b c6
//! ```
//!
//! Time of day taken from the [`TimeReference`] (whole seconds, the
//! millisecond field is always `000`), the direction marker `R`, the packed
//! identifier as eight lowercase hex digits, then one ` xx` pair per payload
//! byte, at most [`MAX_GATEWAY_PAYLOAD`] of them.
use core::fmt::{self, Write};

use crate::error::LineError;
use crate::protocol::gateway::time_reference::TimeReference;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::MAX_GATEWAY_PAYLOAD;

/// "HH:MM:SS.mmm R IIIIIIII" + " xx" per byte + "\r\n".
pub const MAX_LINE_BYTES: usize = 23 + 3 * MAX_GATEWAY_PAYLOAD + 2;

const SECONDS_PER_DAY: u64 = 86_400;

/// One rendered gateway line, sized for a single datagram.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct GatewayLine {
    len: usize,
    data: [u8; MAX_LINE_BYTES],
}

impl GatewayLine {
    const fn new() -> Self {
        Self {
            len: 0,
            data: [0; MAX_LINE_BYTES],
        }
    }

    /// Rendered bytes (ASCII).
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Rendered line as text.
    pub fn as_str(&self) -> &str {
        // Only ASCII is ever written through `write_str`.
        core::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    /// Append the line terminator expected by YD RAW listeners.
    pub fn terminate(&mut self) -> Result<(), LineError> {
        self.write_str("\r\n").map_err(|_| LineError::BufferFull)
    }
}

impl Write for GatewayLine {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len + s.len();
        if end > MAX_LINE_BYTES {
            return Err(fmt::Error);
        }
        self.data[self.len..end].copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

impl fmt::Debug for GatewayLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GatewayLine").field(&self.as_str()).finish()
    }
}

/// Render `frame` as a YD RAW line (without terminator).
///
/// Pure: the same frame and reference always give the same bytes. Frames
/// whose identifier fields are out of range are still rendered, with the
/// bits packed as they came.
pub fn format_line(frame: &CanFrame, time: &TimeReference) -> Result<GatewayLine, LineError> {
    let can_id = frame.wire_id();

    // Whole days vanish modulo one day, only the time of day is rendered.
    let (_, seconds) = time.read();
    let of_day = (seconds as u64) % SECONDS_PER_DAY;
    let (hours, minutes, secs) = (of_day / 3600, (of_day / 60) % 60, of_day % 60);

    let mut line = GatewayLine::new();
    write!(
        line,
        "{:02}:{:02}:{:02}.000 R {:08x}",
        hours, minutes, secs, can_id.0
    )
    .map_err(|_| LineError::BufferFull)?;

    let payload = frame.payload();
    for byte in &payload[..payload.len().min(MAX_GATEWAY_PAYLOAD)] {
        write!(line, " {:02x}", byte).map_err(|_| LineError::BufferFull)?;
    }
    Ok(line)
}
