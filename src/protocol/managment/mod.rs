//! Network management seen from the gateway: tracking the address the bus
//! stack claimed for this node.
pub mod address_observer;
