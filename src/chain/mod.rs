//! Chain-facing collaborator: contract read calls and token subscriptions.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod mock;

pub use mock::MockChainClient;

/// Result of a `pendingTokens` rewarder call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PendingTokens {
    pub tokens: Vec<Address>,
    pub amounts: Vec<U256>,
}

/// Read access to on-chain contract state, plus registration of tokens whose
/// transfer events the delivering harness should start feeding us.
///
/// Reverts are an expected outcome for rewarder queries and are modeled as
/// `Ok(None)`, never as an error. `ChainError` is reserved for transport-level
/// failures of reads that must succeed.
#[async_trait]
pub trait ChainClient: Send + Sync + fmt::Debug {
    /// Primary reward token of a farm manager contract. Required read; a
    /// manager without one is unusable.
    async fn primary_reward_token(&self, chef: Address) -> Result<Address, ChainError>;

    /// Extra reward tokens and amounts a rewarder reports for `account`.
    /// Called with the zero address (and zero `extra_arg`) to discover the
    /// token set at farm creation. `Ok(None)` models a revert.
    async fn pending_tokens(
        &self,
        rewarder: Address,
        pool_id: u64,
        account: Address,
        extra_arg: U256,
    ) -> Result<Option<PendingTokens>, ChainError>;

    /// Ask the harness to start delivering transfer events for `token`.
    async fn track_token(&self, token: Address) -> Result<(), ChainError>;
}

/// Error type for chain read operations.
#[derive(Debug, Clone, Error)]
pub enum ChainError {
    #[error("transport: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Response(String),
}

/// Chain client for offline replay: the primary reward token is configured
/// up front and every rewarder query behaves as reverted.
#[derive(Debug, Clone)]
pub struct StaticChainClient {
    primary_reward_token: Address,
}

impl StaticChainClient {
    pub fn new(primary_reward_token: Address) -> Self {
        StaticChainClient {
            primary_reward_token,
        }
    }
}

#[async_trait]
impl ChainClient for StaticChainClient {
    async fn primary_reward_token(&self, _chef: Address) -> Result<Address, ChainError> {
        Ok(self.primary_reward_token)
    }

    async fn pending_tokens(
        &self,
        _rewarder: Address,
        _pool_id: u64,
        _account: Address,
        _extra_arg: U256,
    ) -> Result<Option<PendingTokens>, ChainError> {
        Ok(None)
    }

    async fn track_token(&self, token: Address) -> Result<(), ChainError> {
        tracing::debug!(token = %token, "track_token requested (offline replay, ignored)");
        Ok(())
    }
}
