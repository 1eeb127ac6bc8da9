//! NMEA 2000 side of the gateway: identifier codec and collaborator traits,
//! the YD RAW receive path, the periodic publishers and their PGN encoders.
pub mod gateway;
pub mod lookups;
pub mod managment;
pub mod messages;
pub mod publish;
pub mod transport;
