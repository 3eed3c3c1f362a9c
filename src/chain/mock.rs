//! Programmable chain client for tests.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{ChainClient, ChainError, PendingTokens};

/// In-memory chain client. Unconfigured rewarder queries behave as reverted,
/// which is also what a real rewarder without extra tokens does.
#[derive(Debug, Default)]
pub struct MockChainClient {
    primary: Mutex<HashMap<Address, Address>>,
    pending: Mutex<HashMap<(Address, u64, Address), PendingTokens>>,
    tracked: Mutex<Vec<Address>>,
}

impl MockChainClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the primary reward token returned for `chef`.
    pub fn set_primary_reward_token(&self, chef: Address, token: Address) {
        self.primary
            .lock()
            .expect("mock lock poisoned")
            .insert(chef, token);
    }

    /// Configure a successful `pendingTokens` response for a
    /// (rewarder, pool, account) triple.
    pub fn set_pending_tokens(
        &self,
        rewarder: Address,
        pool_id: u64,
        account: Address,
        tokens: Vec<Address>,
        amounts: Vec<U256>,
    ) {
        self.pending
            .lock()
            .expect("mock lock poisoned")
            .insert((rewarder, pool_id, account), PendingTokens { tokens, amounts });
    }

    /// Tokens registered for transfer delivery so far, in call order.
    pub fn tracked_tokens(&self) -> Vec<Address> {
        self.tracked.lock().expect("mock lock poisoned").clone()
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn primary_reward_token(&self, chef: Address) -> Result<Address, ChainError> {
        self.primary
            .lock()
            .expect("mock lock poisoned")
            .get(&chef)
            .copied()
            .ok_or_else(|| ChainError::Response(format!("no primary reward token for {chef}")))
    }

    async fn pending_tokens(
        &self,
        rewarder: Address,
        pool_id: u64,
        account: Address,
        _extra_arg: U256,
    ) -> Result<Option<PendingTokens>, ChainError> {
        Ok(self
            .pending
            .lock()
            .expect("mock lock poisoned")
            .get(&(rewarder, pool_id, account))
            .cloned())
    }

    async fn track_token(&self, token: Address) -> Result<(), ChainError> {
        self.tracked.lock().expect("mock lock poisoned").push(token);
        Ok(())
    }
}
