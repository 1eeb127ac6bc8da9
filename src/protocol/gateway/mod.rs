//! NMEA 2000 → YD RAW gateway: every received message is rendered as one
//! text line and pushed to a UDP listener, stamped with the latest absolute
//! time seen on the bus.
pub mod handler;
pub mod line;
pub mod time_reference;
