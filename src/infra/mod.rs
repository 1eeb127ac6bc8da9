//! Infrastructure shared by the protocol layer: payload bit access and
//! NMEA 2000 fixed-point/sentinel encoding.
pub mod codec;
