//! Collaborator traits at the transport seam: NMEA 2000 bus stack, UDP
//! datagram sink and timer.
pub mod datagram;
pub mod korri_timer;
pub mod n2k_bus;
