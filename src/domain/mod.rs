//! Domain types for the farm accounting indexer.
//!
//! This module provides:
//! - Inbound chain-event types with their log coordinates
//! - Persisted entities (chefs, farms, positions, audit rows)
//! - Stable chain-order key for deterministic replay
//! - Entity-key formatting helpers

pub mod entity;
pub mod event;
pub mod ordering;
pub mod primitives;

pub use entity::{
    Chef, Farm, FarmDeposit, FarmSnapshot, FarmWithdrawal, PendingTransfer, Rewarder,
    TokenBalance, UserInfo,
};
pub use event::{ChainEvent, EventKind, EventMeta};
pub use ordering::{sort_events_chain_order, EventOrderingKey};
pub use primitives::{address_key, log_key, tx_key, user_info_key, FarmId};
