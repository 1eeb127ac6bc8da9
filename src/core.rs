//! Value types shared by the decoder side (gateway) and the encoder side
//! (publishers). Everything here is fixed-capacity so the crate never needs
//! an allocator.

/// Largest reassembled Fast Packet payload (31 frames: 6 + 30 * 7 bytes).
pub const MAX_PGN_BYTES: usize = 223;

/// Payload of a single NMEA 2000 message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PgnBytes {
    pub(crate) len: usize,
    data: [u8; MAX_PGN_BYTES],
}

impl Default for PgnBytes {
    fn default() -> Self {
        Self::new()
    }
}

impl PgnBytes {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self {
            len: 0,
            data: [0; MAX_PGN_BYTES],
        }
    }

    /// Build a buffer from a slice, truncated to [`MAX_PGN_BYTES`].
    pub fn from_slice(slice: &[u8]) -> Self {
        let mut bytes = Self::new();
        bytes.copy_from_slice(slice);
        bytes
    }

    /// Number of valid bytes stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks whether the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copy bytes into the buffer and update `len`.
    #[inline]
    pub fn copy_from_slice(&mut self, slice: &[u8]) {
        let clamped = slice.len().min(MAX_PGN_BYTES);
        self.data[..clamped].copy_from_slice(&slice[..clamped]);
        self.len = clamped;
    }

    /// Immutable view over the populated bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Whole backing storage, used by encoders before `len` is known.
    #[inline]
    pub(crate) fn storage_mut(&mut self) -> &mut [u8; MAX_PGN_BYTES] {
        &mut self.data
    }
}
