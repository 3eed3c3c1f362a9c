//! Stable chain ordering for deterministic event replay.

use crate::domain::ChainEvent;

/// Total-order key for chain events.
///
/// Ordering: block number -> transaction index -> log index. This matches the
/// order the chain committed the logs in and is the precondition the handlers
/// rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EventOrderingKey {
    pub block_number: u64,
    pub tx_index: u64,
    pub log_index: u64,
}

impl EventOrderingKey {
    pub fn from_event(event: &ChainEvent) -> Self {
        EventOrderingKey {
            block_number: event.meta.block_number,
            tx_index: event.meta.tx_index,
            log_index: event.meta.log_index,
        }
    }
}

/// Sort events into chain order.
pub fn sort_events_chain_order(events: &mut [ChainEvent]) {
    events.sort_by_key(EventOrderingKey::from_event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EventKind, EventMeta};
    use alloy_primitives::{Address, B256, U256};

    fn event(block_number: u64, tx_index: u64, log_index: u64) -> ChainEvent {
        ChainEvent {
            meta: EventMeta {
                address: Address::ZERO,
                block_number,
                block_timestamp: 0,
                tx_hash: B256::ZERO,
                tx_index,
                log_index,
            },
            kind: EventKind::Harvest {
                pool_id: 0,
                user: Address::ZERO,
                amount: U256::ZERO,
            },
        }
    }

    #[test]
    fn test_ordering_by_block() {
        let a = EventOrderingKey::from_event(&event(1, 9, 9));
        let b = EventOrderingKey::from_event(&event(2, 0, 0));
        assert!(a < b);
    }

    #[test]
    fn test_ordering_same_block_by_tx_index() {
        let a = EventOrderingKey::from_event(&event(1, 0, 9));
        let b = EventOrderingKey::from_event(&event(1, 1, 0));
        assert!(a < b);
    }

    #[test]
    fn test_ordering_same_tx_by_log_index() {
        let a = EventOrderingKey::from_event(&event(1, 0, 3));
        let b = EventOrderingKey::from_event(&event(1, 0, 4));
        assert!(a < b);
    }

    #[test]
    fn test_sort_events_chain_order() {
        let mut events = vec![event(2, 0, 0), event(1, 1, 0), event(1, 0, 5), event(1, 0, 2)];
        sort_events_chain_order(&mut events);
        let keys: Vec<_> = events.iter().map(EventOrderingKey::from_event).collect();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(keys[0].log_index, 2);
        assert_eq!(keys[3].block_number, 2);
    }
}
