//! Tracks the source address the bus stack currently holds for this node.
//!
//! Address claiming itself is performed by the bus stack; a lost arbitration
//! silently moves the node to another address. The observer compares the
//! live address with the last recorded one on every received message and
//! reports each change exactly once so the host can persist it as the node
//! address to claim first at the next start.

/// Last recorded node address and change detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AddressObserver {
    recorded: Option<u8>,
}

impl AddressObserver {
    /// Start from the persisted address, if any.
    pub const fn new(recorded: Option<u8>) -> Self {
        Self { recorded }
    }

    /// Canonical record.
    pub fn recorded(&self) -> Option<u8> {
        self.recorded
    }

    /// Compare the live address with the record.
    ///
    /// Returns `Some(address)` when it differs (the record is updated), `None`
    /// when unchanged.
    pub fn observe(&mut self, current: u8) -> Option<u8> {
        if self.recorded == Some(current) {
            return None;
        }
        self.recorded = Some(current);
        #[cfg(feature = "defmt")]
        defmt::info!("Address change: new address={}", current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_observation_is_a_change() {
        let mut observer = AddressObserver::new(None);
        assert_eq!(observer.observe(42), Some(42));
        assert_eq!(observer.recorded(), Some(42));
    }

    #[test]
    fn test_persisted_address_is_not_reported_again() {
        let mut observer = AddressObserver::new(Some(42));
        assert_eq!(observer.observe(42), None);
    }

    #[test]
    fn test_change_is_reported_once() {
        let mut observer = AddressObserver::new(Some(42));
        assert_eq!(observer.observe(43), Some(43));
        assert_eq!(observer.observe(43), None);
        assert_eq!(observer.observe(43), None);
        assert_eq!(observer.observe(42), Some(42));
        assert_eq!(observer.recorded(), Some(42));
    }
}
