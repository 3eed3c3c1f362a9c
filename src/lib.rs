pub mod chain;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod market;
pub mod store;

pub use chain::{ChainClient, ChainError, MockChainClient, PendingTokens, StaticChainClient};
pub use config::Config;
pub use domain::{
    sort_events_chain_order, ChainEvent, EventKind, EventMeta, Farm, FarmId, TokenBalance,
    UserInfo,
};
pub use engine::{PositionReport, ACC_REWARD_PRECISION};
pub use error::IndexError;
pub use handlers::Indexer;
pub use market::{LoggingMarketSink, MarketSink, RecordingMarketSink, SinkCall};
pub use store::{init_db, Repository};
