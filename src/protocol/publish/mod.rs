//! Periodic publishers: telemetry values arrive whenever the host has them,
//! the bus expects each status PGN at a fixed cadence. Values are cached in
//! [`expiring::ExpiringValue`] slots, a [`sender::PeriodicSender`] turns
//! them into messages on every due tick, and the [`runner`] drives all
//! senders from one cooperative loop.
pub mod bridge;
pub mod expiring;
pub mod runner;
pub mod sender;
pub mod telemetry;
