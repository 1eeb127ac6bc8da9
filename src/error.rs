//! Error definitions shared across library modules.
//! Each type models a specific failure scenario (CAN ID construction,
//! payload encoding, time extraction, collaborator I/O).
use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Precondition violations while packing a 29-bit CAN identifier.
///
/// Packing never clamps: a value that does not fit its field is rejected.
pub enum CanIdBuildError {
    /// Priority must fit in 3 bits.
    #[error("Invalid priority: {priority}")]
    InvalidPriority { priority: u8 },
    /// PGN must fit in 18 bits, otherwise it would spill over the priority field.
    #[error("PGN {pgn} does not fit in 18 bits")]
    PgnOverflow { pgn: u32 },
    /// In PDU1 the lower 8 bits of the PGN must remain zero.
    #[error("PDU1 PGNs require PS = 0: {pgn}")]
    PsFocusMessageMustBeNull { pgn: u32 },
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// Failures while extracting information from a received frame.
pub enum ExtractionError {
    /// Payload is shorter than the fields to read.
    #[error("Invalid data length for PGN {pgn}: {len}")]
    InvalidDataLen { pgn: u32, len: usize },
    /// Date or time field holds the "not available" pattern.
    #[error("Time not available in PGN {pgn}")]
    NotAvailable { pgn: u32 },
    /// Bit-level access failed.
    #[error("BitReader error: {err}")]
    BitReaderError { err: BitReaderError },
}

//================================================================================CODEC_ERROR

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// Issues encountered while encoding an outbound PGN payload.
pub enum EncodeError {
    /// Failed while writing bits into the output buffer.
    #[error("BitWrite error: {err}")]
    BitWriteError { err: BitWriterError },
    /// Identifier of the outbound frame could not be packed.
    #[error("Frame build failed: {0}")]
    Build(CanIdBuildError),
    /// More frames produced in one tick than the batch holds.
    #[error("Outbound batch full")]
    BatchFull,
}

impl From<BitWriterError> for EncodeError {
    fn from(err: BitWriterError) -> Self {
        EncodeError::BitWriteError { err }
    }
}

impl From<CanIdBuildError> for EncodeError {
    fn from(err: CanIdBuildError) -> Self {
        EncodeError::Build(err)
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// Errors raised while rendering a gateway line.
pub enum LineError {
    /// The line does not fit in the datagram buffer.
    #[error("Gateway line buffer full")]
    BufferFull,
}

//==================================================================================RUN_ERROR
#[derive(Debug, Error)]
/// Errors that stop the gateway receive loop.
pub enum GatewayError<E: core::fmt::Debug> {
    /// Bus stack failed to deliver the next frame.
    #[error("CAN bus receive error: {0:?}")]
    Receive(E),
}

//==================================================================================BITREADER_ERRORS
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// Errors raised during bitwise buffer reads.
pub enum BitReaderError {
    /// Attempted to read past the end of the buffer.
    #[error("Attempted to read out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
    /// Requested more bits than the target type can hold.
    #[error("Cannot read more than {max} bits. Requested: {asked}")]
    TooLongForType { max: u8, asked: u8 },
}
//==================================================================================BITWRITER_ERRORS
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// Errors raised during bitwise writes into a buffer.
pub enum BitWriterError {
    /// Attempted to write beyond the provided capacity.
    #[error("Attempted to write out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
    /// Field is too large for the provided type.
    #[error("Cannot write more than {max} bits. Requested: {asked}")]
    TooLongForType { max: u8, asked: u8 },
    /// Cursor is not aligned on a byte boundary when the operation requires it.
    #[error("Non aligned bit. Cursor: {cursor}")]
    NonAlignedBit { cursor: usize },
}
