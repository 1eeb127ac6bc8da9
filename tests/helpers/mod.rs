/// Test doubles for the bus stack, the datagram sink and the clock.
use embassy_time::Instant;
use korri_gateway::protocol::transport::{
    can_frame::CanFrame,
    traits::{datagram::DatagramSink, korri_timer::KorriTimer, n2k_bus::N2kBus},
};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

#[allow(dead_code)]
/// In-memory bus stack: inbound frames come from a channel, outbound frames
/// are recorded together with their device index.
pub struct MockBus {
    inbound: mpsc::UnboundedReceiver<CanFrame>,
    pub sent: Arc<Mutex<Vec<(CanFrame, u8)>>>,
    pub address: Arc<AtomicU8>,
    pub fail_sends: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl MockBus {
    /// Bus plus the handle feeding its receive side.
    pub fn new(address: u8) -> (Self, mpsc::UnboundedSender<CanFrame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let bus = Self {
            inbound: rx,
            sent: Arc::new(Mutex::new(Vec::new())),
            address: Arc::new(AtomicU8::new(address)),
            fail_sends: Arc::new(AtomicBool::new(false)),
        };
        (bus, tx)
    }

    pub fn sent(&self) -> Vec<(CanFrame, u8)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn take_sent(&self) -> Vec<(CanFrame, u8)> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }
}

impl N2kBus for MockBus {
    type Error = ();

    async fn send<'a>(&'a mut self, frame: &'a CanFrame, device_index: u8) -> Result<(), Self::Error> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(());
        }
        self.sent.lock().unwrap().push((frame.clone(), device_index));
        Ok(())
    }

    async fn recv(&mut self) -> Result<CanFrame, Self::Error> {
        self.inbound.recv().await.ok_or(())
    }

    fn source_address(&self, _device_index: u8) -> u8 {
        self.address.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Default)]
#[allow(dead_code)]
/// Datagram sink recording every payload.
pub struct MockSink {
    pub datagrams: Arc<Mutex<Vec<Vec<u8>>>>,
    pub fail: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl MockSink {
    pub fn lines(&self) -> Vec<String> {
        self.datagrams
            .lock()
            .unwrap()
            .iter()
            .map(|bytes| String::from_utf8(bytes.clone()).unwrap())
            .collect()
    }
}

impl DatagramSink for MockSink {
    type Error = &'static str;

    async fn send_datagram<'a>(&'a mut self, bytes: &'a [u8]) -> Result<(), Self::Error> {
        if self.fail.load(Ordering::SeqCst) {
            return Err("unreachable host");
        }
        self.datagrams.lock().unwrap().push(bytes.to_vec());
        Ok(())
    }
}

#[derive(Clone, Default)]
#[allow(dead_code)]
/// Manual clock: delays complete at once and move the clock forward.
pub struct ManualTimer {
    pub millis: Arc<AtomicU64>,
}

#[allow(dead_code)]
impl ManualTimer {
    pub fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    pub fn millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }

    pub fn now_instant(&self) -> Instant {
        Instant::from_millis(self.millis())
    }
}

impl KorriTimer for ManualTimer {
    async fn delay_ms(&mut self, millis: u32) {
        self.millis.fetch_add(millis as u64, Ordering::SeqCst);
    }

    fn now(&self) -> Instant {
        Instant::from_millis(self.millis.load(Ordering::SeqCst))
    }
}
