//! Narrow view of the NMEA 2000 bus stack. The stack owns address claiming,
//! Fast Packet segmentation/reassembly and the physical driver; the gateway
//! and the publishers only exchange whole messages with it.
use crate::protocol::transport::can_frame::CanFrame;
use core::future::Future;

/// Contract to exchange whole NMEA 2000 messages asynchronously.
pub trait N2kBus {
    type Error: core::fmt::Debug;

    /// Emit a message on the bus under the virtual device `device_index`.
    ///
    /// The stack stamps the device's claimed address as source.
    fn send<'a>(
        &'a mut self,
        frame: &'a CanFrame,
        device_index: u8,
    ) -> impl Future<Output = Result<(), Self::Error>> + 'a;

    /// Retrieve the next reassembled message. Waits until one arrives.
    fn recv<'a>(&'a mut self) -> impl Future<Output = Result<CanFrame, Self::Error>> + 'a;

    /// Address currently claimed by the virtual device `device_index`.
    fn source_address(&self, device_index: u8) -> u8;
}
