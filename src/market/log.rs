//! Tracing-backed sink used by the replay binary.

use alloy_primitives::Address;
use async_trait::async_trait;

use crate::domain::TokenBalance;
use crate::engine::PositionReport;

use super::{MarketError, MarketSink};

/// Logs every report instead of forwarding it anywhere. Useful for replaying
/// an event file against an empty database and eyeballing the output.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMarketSink;

#[async_trait]
impl MarketSink for LoggingMarketSink {
    async fn register_market(
        &self,
        market: &str,
        contract: Address,
        input_token: Address,
        reward_tokens: &[Address],
    ) -> Result<(), MarketError> {
        tracing::info!(
            market,
            contract = %contract,
            input_token = %input_token,
            reward_tokens = reward_tokens.len(),
            "market registered"
        );
        Ok(())
    }

    async fn update_market(
        &self,
        market: &str,
        input_supplies: &[TokenBalance],
    ) -> Result<(), MarketError> {
        for supply in input_supplies {
            tracing::info!(market, token = %supply.token, amount = %supply.amount, "market supply");
        }
        Ok(())
    }

    async fn report_investment(&self, report: &PositionReport) -> Result<(), MarketError> {
        tracing::info!(
            market = %report.market,
            account = %report.account,
            movements = report.input_movements.len(),
            "invest"
        );
        Ok(())
    }

    async fn report_redemption(&self, report: &PositionReport) -> Result<(), MarketError> {
        tracing::info!(
            market = %report.market,
            account = %report.account,
            movements = report.input_movements.len(),
            rewards = report.reward_movements.len(),
            "redeem"
        );
        Ok(())
    }
}
