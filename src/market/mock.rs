//! Recording sink for tests.

use alloy_primitives::Address;
use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::TokenBalance;
use crate::engine::PositionReport;

use super::{MarketError, MarketSink};

/// One recorded collaborator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    RegisterMarket {
        market: String,
        contract: Address,
        input_token: Address,
        reward_tokens: Vec<Address>,
    },
    UpdateMarket {
        market: String,
        input_supplies: Vec<TokenBalance>,
    },
    Investment(PositionReport),
    Redemption(PositionReport),
}

/// Sink that records every call for later assertions.
#[derive(Debug, Default)]
pub struct RecordingMarketSink {
    calls: Mutex<Vec<SinkCall>>,
}

impl RecordingMarketSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().expect("sink lock poisoned").clone()
    }

    fn record(&self, call: SinkCall) {
        self.calls.lock().expect("sink lock poisoned").push(call);
    }
}

#[async_trait]
impl MarketSink for RecordingMarketSink {
    async fn register_market(
        &self,
        market: &str,
        contract: Address,
        input_token: Address,
        reward_tokens: &[Address],
    ) -> Result<(), MarketError> {
        self.record(SinkCall::RegisterMarket {
            market: market.to_string(),
            contract,
            input_token,
            reward_tokens: reward_tokens.to_vec(),
        });
        Ok(())
    }

    async fn update_market(
        &self,
        market: &str,
        input_supplies: &[TokenBalance],
    ) -> Result<(), MarketError> {
        self.record(SinkCall::UpdateMarket {
            market: market.to_string(),
            input_supplies: input_supplies.to_vec(),
        });
        Ok(())
    }

    async fn report_investment(&self, report: &PositionReport) -> Result<(), MarketError> {
        self.record(SinkCall::Investment(report.clone()));
        Ok(())
    }

    async fn report_redemption(&self, report: &PositionReport) -> Result<(), MarketError> {
        self.record(SinkCall::Redemption(report.clone()));
        Ok(())
    }
}
