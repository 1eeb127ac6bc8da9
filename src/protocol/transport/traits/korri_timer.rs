//! Asynchronous timer abstraction providing the clock and delays required
//! by the periodic publishers.
use embassy_time::Instant;

/// Timer trait abstraction; must remain thread-safe when applicable.
pub trait KorriTimer {
    /// Asynchronously wait for `millis` milliseconds.
    fn delay_ms<'a>(&'a mut self, millis: u32) -> impl core::future::Future<Output = ()> + 'a;

    /// Current monotonic instant.
    fn now(&self) -> Instant;
}
