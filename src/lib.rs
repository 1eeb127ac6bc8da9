//! `korri-gateway` library: bridges an NMEA 2000 bus to the YD RAW text
//! protocol over UDP and republishes live telemetry as standard PGNs, in a
//! `no_std` environment. The crate exposes the infrastructure modules (codec,
//! sentinel encoding), protocol logic (identifier codec, gateway line,
//! address observer, periodic publisher) and the collaborator traits.
#![no_std]
//==================================================================================
/// Fixed-capacity payload buffer shared by decoded frames and encoders.
pub mod core;
/// Plain-data configuration consumed from the hosting application.
pub mod config;
/// Domain and low-level errors (CAN identifier construction, payload
/// encoding, time extraction, collaborator failures).
pub mod error;
/// Bit-level readers/writers and NMEA 2000 sentinel quantization.
pub mod infra;
/// NMEA 2000 protocol implementation: identifier codec, gateway line,
/// address observation, periodic publishers and PGN encoders.
pub mod protocol;
//==================================================================================
