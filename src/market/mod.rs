//! External market-accounting collaborator.
//!
//! The core reconstructs positions; protocol-level aggregates (TVL and
//! friends) are the sink's business. The sink receives one report per
//! position-changing event plus market registration/supply notifications.

use alloy_primitives::Address;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::domain::TokenBalance;
use crate::engine::PositionReport;

pub mod log;
pub mod mock;

pub use log::LoggingMarketSink;
pub use mock::{RecordingMarketSink, SinkCall};

#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct MarketError(pub String);

#[async_trait]
pub trait MarketSink: Send + Sync + fmt::Debug {
    /// A new farm exists; the sink should start tracking its market.
    async fn register_market(
        &self,
        market: &str,
        contract: Address,
        input_token: Address,
        reward_tokens: &[Address],
    ) -> Result<(), MarketError>;

    /// The farm's staked supply changed (pool-update broadcast).
    async fn update_market(
        &self,
        market: &str,
        input_supplies: &[TokenBalance],
    ) -> Result<(), MarketError>;

    /// Tokens moved into a position.
    async fn report_investment(&self, report: &PositionReport) -> Result<(), MarketError>;

    /// Tokens (or rewards) moved out of a position.
    async fn report_redemption(&self, report: &PositionReport) -> Result<(), MarketError>;
}
