//! Named telemetry values as pushed by the host.
use core::fmt;

/// Longest dotted path accepted.
pub const MAX_PATH_BYTES: usize = 96;

/// Dotted telemetry path, e.g. `electrical.batteries.279.voltage`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TelemetryPath {
    len: usize,
    data: [u8; MAX_PATH_BYTES],
}

impl TelemetryPath {
    /// `None` when `path` is longer than [`MAX_PATH_BYTES`].
    pub fn new(path: &str) -> Option<Self> {
        if path.len() > MAX_PATH_BYTES {
            return None;
        }
        let mut data = [0u8; MAX_PATH_BYTES];
        data[..path.len()].copy_from_slice(path.as_bytes());
        Some(Self {
            len: path.len(),
            data,
        })
    }

    pub fn as_str(&self) -> &str {
        // Built from a `&str`, cut on its own length.
        core::str::from_utf8(&self.data[..self.len]).unwrap_or_default()
    }
}

impl fmt::Debug for TelemetryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TelemetryPath").field(&self.as_str()).finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TelemetryPath {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str())
    }
}

/// One value pushed through the telemetry queue.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryUpdate {
    pub path: TelemetryPath,
    pub value: f64,
}

impl TelemetryUpdate {
    /// `None` when the path does not fit.
    pub fn new(path: &str, value: f64) -> Option<Self> {
        Some(Self {
            path: TelemetryPath::new(path)?,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_round_trip() {
        let update = TelemetryUpdate::new("electrical.batteries.279.voltage", 12.9).unwrap();
        assert_eq!(update.path.as_str(), "electrical.batteries.279.voltage");
        assert_eq!(update.value, 12.9);
    }

    #[test]
    fn test_too_long_path_is_refused() {
        let long = [b'a'; MAX_PATH_BYTES + 1];
        let long = core::str::from_utf8(&long).unwrap();
        assert!(TelemetryPath::new(long).is_none());
        assert!(TelemetryPath::new(&long[..MAX_PATH_BYTES]).is_some());
    }
}
