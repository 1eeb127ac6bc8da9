//! Best-effort datagram transport used by the gateway (UDP in practice).
use core::future::Future;

/// Send one self-contained datagram to the configured listener.
///
/// No acknowledgment and no retry: callers drop failed sends.
pub trait DatagramSink {
    type Error: core::fmt::Debug;

    fn send_datagram<'a>(
        &'a mut self,
        bytes: &'a [u8],
    ) -> impl Future<Output = Result<(), Self::Error>> + 'a;
}
