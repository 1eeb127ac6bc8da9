//! Latest absolute date/time observed on the bus.
//!
//! Two PGNs carry it: 126992 (System Time) and 129029 (GNSS Position Data).
//! Whichever arrives last wins; there is no ordering check against the
//! previous value and no expiry, so a delayed frame can move the clock
//! backwards and a reference never refreshed stays in use forever.
use crate::error::ExtractionError;
use crate::infra::codec::bits::BitReader;
use crate::protocol::transport::can_frame::CanFrame;

/// PGN 126992, System Time.
pub const PGN_SYSTEM_TIME: u32 = 126992;
/// PGN 129029, GNSS Position Data.
pub const PGN_GNSS_POSITION: u32 = 129029;

/// Time-of-day ticks per second (0.0001 s resolution).
const TIME_TICKS_PER_SECOND: f64 = 10_000.0;

/// Absolute time shared by every formatted gateway line.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimeReference {
    days_since_epoch: u16,
    seconds_since_midnight: f64,
}

impl TimeReference {
    /// Zero-initialized reference (1970-01-01 00:00:00).
    pub const fn new() -> Self {
        Self {
            days_since_epoch: 0,
            seconds_since_midnight: 0.0,
        }
    }

    /// Overwrite both fields unconditionally.
    pub fn update(&mut self, days_since_epoch: u16, seconds_since_midnight: f64) {
        self.days_since_epoch = days_since_epoch;
        self.seconds_since_midnight = seconds_since_midnight;
    }

    /// Time taken from a System Time message.
    pub fn on_system_time(&mut self, days_since_epoch: u16, seconds_since_midnight: f64) {
        self.update(days_since_epoch, seconds_since_midnight);
    }

    /// Time taken from a GNSS position fix.
    pub fn on_gnss_fix(&mut self, days_since_epoch: u16, seconds_since_midnight: f64) {
        self.update(days_since_epoch, seconds_since_midnight);
    }

    /// Current `(days_since_epoch, seconds_since_midnight)`.
    pub fn read(&self) -> (u16, f64) {
        (self.days_since_epoch, self.seconds_since_midnight)
    }

    /// Feed a received message.
    ///
    /// Returns `Ok(true)` when the reference was updated, `Ok(false)` for
    /// messages that carry no time. A time-bearing message that cannot be
    /// parsed leaves the reference untouched and reports why.
    pub fn observe(&mut self, frame: &CanFrame) -> Result<bool, ExtractionError> {
        match frame.pgn {
            PGN_SYSTEM_TIME => {
                let (days, seconds) = extract_time(frame, 16)?;
                self.on_system_time(days, seconds);
                Ok(true)
            }
            PGN_GNSS_POSITION => {
                let (days, seconds) = extract_time(frame, 8)?;
                self.on_gnss_fix(days, seconds);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// Read the date (u16, days) and time (u32, 0.0001 s) found after `skip_bits`.
fn extract_time(frame: &CanFrame, skip_bits: usize) -> Result<(u16, f64), ExtractionError> {
    let payload = frame.payload();
    let needed = skip_bits / 8 + 6;
    if payload.len() < needed {
        return Err(ExtractionError::InvalidDataLen {
            pgn: frame.pgn,
            len: payload.len(),
        });
    }

    let mut reader = BitReader::new(payload);
    let to_err = |err| ExtractionError::BitReaderError { err };
    reader.skip(skip_bits).map_err(to_err)?;
    let days = reader.read_u16().map_err(to_err)?;
    let time = reader.read_u32().map_err(to_err)?;

    // 0xFFFF / 0xFFFFFFFF: not available; 0xFFFFFFFE: out of range.
    if days == 0xFFFF || time >= 0xFFFF_FFFE {
        return Err(ExtractionError::NotAvailable { pgn: frame.pgn });
    }
    Ok((days, time as f64 / TIME_TICKS_PER_SECOND))
}
