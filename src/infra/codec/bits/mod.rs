//! Bit cursors over NMEA 2000 payloads. Fields are little-endian and packed
//! LSB first, so a 4-bit lookup followed by a 4-bit lookup share one byte
//! with the first field in the low nibble.
use crate::error::{BitReaderError, BitWriterError};

/// Sequential reader over a received payload.
pub struct BitReader<'a> {
    buffer: &'a [u8],
    /// Bits consumed from the start of `buffer`.
    bit_cursor: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader positioned at the start of the provided buffer.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            bit_cursor: 0,
        }
    }

    /// Bits left before the end of the buffer.
    pub fn remaining_bits(&self) -> usize {
        self.buffer.len() * 8 - self.bit_cursor
    }

    /// Read `num_bits` (1..=64) starting at the cursor.
    pub fn read_bits(&mut self, num_bits: u8) -> Result<u64, BitReaderError> {
        if !(1..=64).contains(&num_bits) {
            return Err(BitReaderError::TooLongForType {
                max: 64,
                asked: num_bits,
            });
        }
        if num_bits as usize > self.remaining_bits() {
            return Err(BitReaderError::OutOfBounds {
                asked: num_bits as usize,
                available: self.remaining_bits(),
            });
        }

        let mut result: u64 = 0;
        let mut done = 0usize;
        while done < num_bits as usize {
            let position = self.bit_cursor + done;
            let offset = position % 8;
            let chunk = (8 - offset).min(num_bits as usize - done);
            let mask = ((1u16 << chunk) - 1) as u8;
            let bits = (self.buffer[position / 8] >> offset) & mask;
            result |= (bits as u64) << done;
            done += chunk;
        }
        self.bit_cursor += num_bits as usize;
        Ok(result)
    }

    /// Read an 8-bit field.
    pub fn read_u8(&mut self) -> Result<u8, BitReaderError> {
        self.read_bits(8).map(|v| v as u8)
    }

    /// Read a 16-bit little-endian field.
    pub fn read_u16(&mut self) -> Result<u16, BitReaderError> {
        self.read_bits(16).map(|v| v as u16)
    }

    /// Read a 32-bit little-endian field.
    pub fn read_u32(&mut self) -> Result<u32, BitReaderError> {
        self.read_bits(32).map(|v| v as u32)
    }

    /// Skip `length` bits (reserved or uninteresting fields).
    pub fn skip(&mut self, length: usize) -> Result<(), BitReaderError> {
        if length > self.remaining_bits() {
            return Err(BitReaderError::OutOfBounds {
                asked: length,
                available: self.remaining_bits(),
            });
        }
        self.bit_cursor += length;
        Ok(())
    }
}
//==================================================================================BITWRITER

/// Sequential writer laying fields into an outbound payload.
pub struct BitWriter<'a> {
    buffer: &'a mut [u8],
    /// Bits written from the start of `buffer`.
    bit_cursor: usize,
}

impl<'a> BitWriter<'a> {
    /// Create a writer positioned at the start of the buffer.
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self {
            buffer,
            bit_cursor: 0,
        }
    }

    /// Number of bytes touched so far, a partial trailing byte included.
    pub fn byte_len(&self) -> usize {
        self.bit_cursor.div_ceil(8)
    }

    /// Write the `num_bits` (1..=64) low bits of `value`.
    pub fn write_bits(&mut self, value: u64, num_bits: u8) -> Result<(), BitWriterError> {
        if !(1..=64).contains(&num_bits) {
            return Err(BitWriterError::TooLongForType {
                max: 64,
                asked: num_bits,
            });
        }
        let available = self.buffer.len() * 8 - self.bit_cursor;
        if num_bits as usize > available {
            return Err(BitWriterError::OutOfBounds {
                asked: num_bits as usize,
                available,
            });
        }

        let mut rest = value;
        let mut done = 0usize;
        while done < num_bits as usize {
            let position = self.bit_cursor + done;
            let offset = position % 8;
            let chunk = (8 - offset).min(num_bits as usize - done);
            let mask = ((1u16 << chunk) - 1) as u8;
            let byte = &mut self.buffer[position / 8];
            *byte &= !(mask << offset);
            *byte |= (rest as u8 & mask) << offset;
            rest >>= chunk;
            done += chunk;
        }
        self.bit_cursor += num_bits as usize;
        Ok(())
    }

    /// Write one byte. The cursor must sit on a byte boundary.
    pub fn write_u8(&mut self, value: u8) -> Result<(), BitWriterError> {
        self.aligned()?;
        self.write_bits(value as u64, 8)
    }

    /// Write the `width` low bytes of `value`, little-endian.
    pub fn write_le(&mut self, value: u32, width: u8) -> Result<(), BitWriterError> {
        if !(1..=4).contains(&width) {
            return Err(BitWriterError::TooLongForType {
                max: 32,
                asked: width.saturating_mul(8),
            });
        }
        self.aligned()?;
        self.write_bits(value as u64, width * 8)
    }

    fn aligned(&self) -> Result<(), BitWriterError> {
        if self.bit_cursor % 8 != 0 {
            return Err(BitWriterError::NonAlignedBit {
                cursor: self.bit_cursor,
            });
        }
        Ok(())
    }
}
