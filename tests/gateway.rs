//! Receive path of the gateway: address observation, time tracking and the
//! datagrams handed to the sink.
mod helpers;

use helpers::{MockBus, MockSink};
use korri_gateway::{
    config::GatewayConfig,
    error::GatewayError,
    protocol::{
        gateway::handler::{GatewayHandler, HandleOutcome},
        transport::can_frame::CanFrame,
    },
};
use std::sync::atomic::Ordering;

/// 126992 with date 19000 and 16:29:27.
fn system_time_frame() -> CanFrame {
    CanFrame::new(3, 126992, 0, &[0x01, 0xF0, 0x38, 0x4A, 0x70, 0xAF, 0x62, 0x23])
}

/// 129029 with date 19001 and 12:00:00; the rest of the fix is unavailable.
fn gnss_frame() -> CanFrame {
    let mut data = [0xFFu8; 43];
    data[..7].copy_from_slice(&[0x05, 0x39, 0x4A, 0x00, 0xCC, 0xBF, 0x19]);
    CanFrame::new(3, 129029, 0x10, &data)
}

#[tokio::test]
async fn test_time_frame_stamps_its_own_line() {
    let (bus, _feed) = MockBus::new(0x23);
    let sink = MockSink::default();
    let mut handler = GatewayHandler::new(sink.clone(), None, 0);

    let frame = system_time_frame();
    let outcome = handler.handle(&bus, &frame).await;
    assert!(outcome.time_updated);
    assert!(outcome.sent);
    assert_eq!(handler.time().read(), (19_000, 59_367.0));

    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    let line = lines[0].trim_end_matches("\r\n");
    assert!(line.starts_with("16:29:27.000 R 0df01000"));
    assert_eq!(line.split(' ').count() - 3, frame.data.len());
    assert!(lines[0].ends_with("\r\n"));
}

#[tokio::test]
async fn test_every_frame_is_forwarded_with_last_time() {
    let (bus, _feed) = MockBus::new(0x23);
    let sink = MockSink::default();
    let mut handler = GatewayHandler::new(sink.clone(), Some(0x23), 0);

    // Before any time message the clock reads midnight.
    let rudder = CanFrame::new(2, 127245, 0x31, &[0xFF, 0xF8, 0xFF, 0x7F, 0x64, 0x00, 0xFF, 0xFF]);
    let outcome = handler.handle(&bus, &rudder).await;
    assert!(!outcome.time_updated);

    handler.handle(&bus, &gnss_frame()).await;
    handler.handle(&bus, &rudder).await;
    handler.handle(&bus, &system_time_frame()).await;
    handler.handle(&bus, &rudder).await;

    let lines = sink.lines();
    assert_eq!(lines.len(), 5);
    assert_eq!(
        lines[0],
        "00:00:00.000 R 09f10d31 ff f8 ff 7f 64 00 ff ff\r\n"
    );
    assert!(lines[1].starts_with("12:00:00.000 R 0df80510 05 39 4a 00 cc bf 19"));
    assert!(lines[2].starts_with("12:00:00.000 R 09f10d31"));
    assert!(lines[3].starts_with("16:29:27.000 R 0df01000"));
    assert!(lines[4].starts_with("16:29:27.000 R 09f10d31"));
}

#[tokio::test]
async fn test_unavailable_time_is_ignored_but_forwarded() {
    let (bus, _feed) = MockBus::new(0x23);
    let sink = MockSink::default();
    let mut handler = GatewayHandler::new(sink.clone(), None, 0);
    handler.handle(&bus, &system_time_frame()).await;

    let unavailable = CanFrame::new(3, 126992, 0, &[0x02, 0xF0, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
    let outcome = handler.handle(&bus, &unavailable).await;
    assert!(!outcome.time_updated);
    assert!(outcome.sent);
    assert_eq!(handler.time().read(), (19_000, 59_367.0));

    // Too short to carry a time: still forwarded.
    let short = CanFrame::new(3, 126992, 0, &[0x03, 0xF0]);
    let outcome = handler.handle(&bus, &short).await;
    assert!(!outcome.time_updated);
    assert_eq!(sink.lines()[2], "16:29:27.000 R 0df01000 03 f0\r\n");
}

#[tokio::test]
async fn test_address_change_is_reported_once() {
    let (bus, _feed) = MockBus::new(0x23);
    let sink = MockSink::default();
    let mut handler = GatewayHandler::new(sink, Some(0x10), 0);
    let frame = CanFrame::new(2, 130306, 9, &[0; 8]);

    assert_eq!(handler.handle(&bus, &frame).await.address_change, Some(0x23));
    assert_eq!(handler.handle(&bus, &frame).await.address_change, None);
    assert_eq!(handler.recorded_address(), Some(0x23));

    bus.address.store(0x24, Ordering::SeqCst);
    assert_eq!(handler.handle(&bus, &frame).await.address_change, Some(0x24));
    assert_eq!(handler.handle(&bus, &frame).await.address_change, None);
}

#[tokio::test]
async fn test_handler_from_config() {
    let (bus, _feed) = MockBus::new(0x23);
    let config = GatewayConfig {
        node_address: Some(0x23),
        ..GatewayConfig::default()
    };
    let mut handler = GatewayHandler::from_config(MockSink::default(), &config);
    assert_eq!(handler.recorded_address(), Some(0x23));
    let outcome = handler.handle(&bus, &system_time_frame()).await;
    assert_eq!(outcome.address_change, None);
}

#[tokio::test]
async fn test_disabled_gateway_stays_silent() {
    let (bus, _feed) = MockBus::new(0x23);
    let sink = MockSink::default();
    let config = GatewayConfig {
        enabled: false,
        ..GatewayConfig::default()
    };
    let mut handler = GatewayHandler::from_config(sink.clone(), &config);
    assert!(!handler.is_enabled());

    let rudder = CanFrame::new(2, 127245, 0x31, &[0xFF, 0xF8, 0xFF, 0x7F, 0x64, 0x00, 0xFF, 0xFF]);
    assert_eq!(handler.handle(&bus, &rudder).await, HandleOutcome::default());
    assert_eq!(handler.handle(&bus, &system_time_frame()).await, HandleOutcome::default());

    assert!(sink.lines().is_empty());
    assert_eq!(handler.time().read(), (0, 0.0));
    assert_eq!(handler.recorded_address(), None);
}

#[tokio::test]
/// PGN 0xEF01 cannot be packed for sending, but a received one is still forwarded.
async fn test_malformed_identifier_is_forwarded() {
    let (bus, _feed) = MockBus::new(0x23);
    let sink = MockSink::default();
    let mut handler = GatewayHandler::new(sink.clone(), Some(0x23), 0);

    let outcome = handler.handle(&bus, &CanFrame::new(6, 0xEF01, 0x23, &[1, 2, 3])).await;
    assert!(outcome.sent);
    assert_eq!(sink.lines(), vec!["00:00:00.000 R 18efff23 01 02 03\r\n".to_string()]);
}

#[tokio::test]
async fn test_failed_datagram_is_dropped() {
    let (bus, _feed) = MockBus::new(0x23);
    let sink = MockSink::default();
    sink.fail.store(true, Ordering::SeqCst);
    let mut handler = GatewayHandler::new(sink.clone(), None, 0);

    let outcome = handler.handle(&bus, &system_time_frame()).await;
    assert!(!outcome.sent);
    // State is updated regardless of the transport.
    assert!(outcome.time_updated);
    assert_eq!(outcome.address_change, Some(0x23));

    sink.fail.store(false, Ordering::SeqCst);
    assert!(handler.handle(&bus, &system_time_frame()).await.sent);
    assert_eq!(sink.lines().len(), 1);
}

#[tokio::test]
async fn test_drive_forwards_until_bus_closes() {
    let (mut bus, feed) = MockBus::new(0x23);
    let sink = MockSink::default();
    let mut handler = GatewayHandler::new(sink.clone(), None, 0);

    feed.send(system_time_frame()).unwrap();
    feed.send(CanFrame::new(2, 129025, 0x7F, &[0x50, 0xC3, 0xB8, 0x13, 0x47, 0xD8, 0x2B, 0xC6]))
        .unwrap();
    feed.send(CanFrame::new(6, 59904, 0x23, &[0x14, 0xF0, 0x01])).unwrap();
    drop(feed);

    let result = handler.drive(&mut bus).await;
    assert!(matches!(result, Err(GatewayError::Receive(()))));

    let lines = sink.lines();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "16:29:27.000 R 09f8017f 50 c3 b8 13 47 d8 2b c6\r\n");
    assert_eq!(lines[2], "16:29:27.000 R 18eaff23 14 f0 01\r\n");
    assert_eq!(handler.recorded_address(), Some(0x23));
}
