//! Event dispatch: one handler per event kind.
//!
//! Events must be applied exactly once, in chain order. Each handler reads
//! the entities it needs at their current version, applies the transition,
//! and writes them back; there is no retry and no partial application
//! semantics inside the core.

use std::sync::Arc;

use crate::chain::ChainClient;
use crate::domain::{ChainEvent, EventKind, Farm, FarmId};
use crate::error::IndexError;
use crate::market::MarketSink;
use crate::store::Repository;

mod farm;
mod position;
mod transfer;

pub struct Indexer {
    repo: Arc<Repository>,
    chain: Arc<dyn ChainClient>,
    sink: Arc<dyn MarketSink>,
}

impl Indexer {
    pub fn new(
        repo: Arc<Repository>,
        chain: Arc<dyn ChainClient>,
        sink: Arc<dyn MarketSink>,
    ) -> Self {
        Self { repo, chain, sink }
    }

    /// Apply a single event. Errors are non-recoverable for this event; the
    /// caller decides whether to halt or skip.
    pub async fn apply(&self, event: &ChainEvent) -> Result<(), IndexError> {
        let meta = &event.meta;
        match &event.kind {
            EventKind::PoolAdded {
                pool_id,
                rewarder,
                alloc_point,
                lp_token,
            } => {
                self.handle_pool_added(meta, *pool_id, *rewarder, *alloc_point, *lp_token)
                    .await
            }
            EventKind::Deposit {
                pool_id,
                user,
                to,
                amount,
            } => self.handle_deposit(meta, *pool_id, *user, *to, *amount).await,
            EventKind::Withdraw {
                pool_id,
                user,
                to,
                amount,
            } => {
                self.handle_withdraw(meta, *pool_id, *user, *to, *amount)
                    .await
            }
            EventKind::EmergencyWithdraw {
                pool_id,
                user,
                to,
                amount,
            } => {
                self.handle_emergency_withdraw(meta, *pool_id, *user, *to, *amount)
                    .await
            }
            EventKind::Harvest {
                pool_id,
                user,
                amount,
            } => self.handle_harvest(meta, *pool_id, *user, *amount).await,
            EventKind::PoolUpdated {
                pool_id,
                last_reward_block,
                lp_supply,
                acc_reward_per_share,
            } => {
                self.handle_pool_updated(
                    meta,
                    *pool_id,
                    *last_reward_block,
                    *lp_supply,
                    *acc_reward_per_share,
                )
                .await
            }
            EventKind::PoolSet {
                pool_id,
                alloc_point,
                rewarder,
                overwrite,
            } => {
                self.handle_pool_set(meta, *pool_id, *alloc_point, *rewarder, *overwrite)
                    .await
            }
            EventKind::TokenTransfer { from, to, value } => {
                self.handle_token_transfer(meta, *from, *to, *value).await
            }
        }
    }

    /// Load a farm or fail: position events for an unknown pool mean the
    /// pool-addition event was missed, which cannot be recovered from here.
    async fn farm(&self, pool_id: u64) -> Result<Farm, IndexError> {
        let id = FarmId::new(pool_id);
        self.repo
            .get_farm(id)
            .await?
            .ok_or(IndexError::MissingFarm(id))
    }
}
