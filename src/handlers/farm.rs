//! Farm registry and pool accrual handlers.

use alloy_primitives::{Address, U256};
use tracing::{debug, info};

use crate::chain::PendingTokens;
use crate::domain::{log_key, Chef, EventMeta, Farm, FarmId, FarmSnapshot, Rewarder};
use crate::engine::reporter;
use crate::error::IndexError;

use super::Indexer;

impl Indexer {
    /// A new pool was added. Creates the chef on first sight (resolving its
    /// primary reward token), the rewarder, and the farm with its full
    /// reward-token set, then registers the market with the accounting
    /// collaborator.
    pub(super) async fn handle_pool_added(
        &self,
        meta: &EventMeta,
        pool_id: u64,
        rewarder: Address,
        alloc_point: U256,
        lp_token: Address,
    ) -> Result<(), IndexError> {
        let chef = match self.repo.get_chef(meta.address).await? {
            Some(chef) => chef,
            None => {
                let reward_token = self.chain.primary_reward_token(meta.address).await?;
                self.track_token(reward_token).await?;
                let chef = Chef {
                    id: meta.address,
                    reward_token,
                };
                self.repo.put_chef(&chef).await?;
                info!(chef = %chef.id, reward_token = %reward_token, "chef created");
                chef
            }
        };

        if self.repo.get_rewarder(rewarder).await?.is_none() {
            self.repo.put_rewarder(&Rewarder { id: rewarder }).await?;
        }

        let mut reward_tokens = vec![chef.reward_token];
        // Extra reward tokens are reported live by the rewarder; a revert
        // just means there are none.
        if let Some(PendingTokens { tokens, .. }) = self
            .chain
            .pending_tokens(rewarder, pool_id, Address::ZERO, U256::ZERO)
            .await?
        {
            for token in tokens {
                if !reward_tokens.contains(&token) {
                    self.track_token(token).await?;
                    reward_tokens.push(token);
                }
            }
        }

        let farm = Farm {
            id: FarmId::new(pool_id),
            chef: chef.id,
            rewarder,
            alloc_point,
            lp_token,
            reward_tokens,
            created: meta.block_timestamp,
            created_at_block: meta.block_number,
            created_at_tx: meta.tx_hash,
            total_supply: U256::ZERO,
            acc_reward_per_share: U256::ZERO,
            last_reward_block: meta.block_number,
        };
        self.repo.put_farm(&farm).await?;
        info!(farm = %farm.id, lp_token = %lp_token, rewards = farm.reward_tokens.len(), "farm created");

        self.sink
            .register_market(
                &reporter::market_id(&farm),
                chef.id,
                lp_token,
                &farm.reward_tokens,
            )
            .await?;

        Ok(())
    }

    /// Periodic accrual broadcast: snapshot the farm as it was, then persist
    /// the contract-supplied supply and reward index.
    pub(super) async fn handle_pool_updated(
        &self,
        meta: &EventMeta,
        pool_id: u64,
        last_reward_block: u64,
        lp_supply: U256,
        acc_reward_per_share: U256,
    ) -> Result<(), IndexError> {
        let mut farm = self.farm(pool_id).await?;

        self.repo
            .insert_snapshot(&FarmSnapshot {
                id: log_key(&meta.tx_hash, meta.log_index),
                farm: farm.id,
                alloc_point: farm.alloc_point,
                total_supply: farm.total_supply,
                timestamp: meta.block_timestamp,
                tx_hash: meta.tx_hash,
                tx_index: meta.tx_index,
                block_number: meta.block_number,
                log_index: meta.log_index,
            })
            .await?;

        farm.last_reward_block = last_reward_block;
        farm.total_supply = lp_supply;
        farm.acc_reward_per_share = acc_reward_per_share;
        self.repo.put_farm(&farm).await?;

        let supply = crate::domain::TokenBalance::new(farm.lp_token, farm.chef, farm.total_supply);
        self.sink
            .update_market(&reporter::market_id(&farm), &[supply])
            .await?;

        Ok(())
    }

    /// Allocation update; the rewarder reference moves only when `overwrite`
    /// is set.
    pub(super) async fn handle_pool_set(
        &self,
        _meta: &EventMeta,
        pool_id: u64,
        alloc_point: U256,
        rewarder: Address,
        overwrite: bool,
    ) -> Result<(), IndexError> {
        let mut farm = self.farm(pool_id).await?;

        farm.alloc_point = alloc_point;
        if overwrite {
            // The swapped-in rewarder must exist as an entity or the
            // correlator will not recognize its transfers.
            self.repo.put_rewarder(&Rewarder { id: rewarder }).await?;
            farm.rewarder = rewarder;
            debug!(farm = %farm.id, rewarder = %rewarder, "rewarder replaced");
        }
        self.repo.put_farm(&farm).await?;

        Ok(())
    }

    /// Register `token` for transfer-event delivery, at most once.
    pub(super) async fn track_token(&self, token: Address) -> Result<(), IndexError> {
        if !self.repo.is_token_tracked(token).await? {
            self.chain.track_token(token).await?;
            self.repo.mark_token_tracked(token).await?;
        }
        Ok(())
    }
}
