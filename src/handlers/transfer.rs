//! Reward-token transfer buffering.
//!
//! A transfer is only interesting when its sender is a known chef (paying out
//! the primary reward) or a known rewarder (paying out an extra reward).
//! Everything else on a tracked token is user-to-user traffic and ignored.

use alloy_primitives::{Address, U256};
use tracing::debug;

use crate::domain::EventMeta;
use crate::error::IndexError;

use super::Indexer;

impl Indexer {
    pub(super) async fn handle_token_transfer(
        &self,
        meta: &EventMeta,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<(), IndexError> {
        // meta.address is the token contract that emitted the transfer
        let token = meta.address;

        if let Some(chef) = self.repo.get_chef(from).await? {
            if chef.reward_token == token {
                self.repo
                    .put_primary_transfer(meta.tx_hash, to, value)
                    .await?;
                debug!(tx = %meta.tx_hash, to = %to, amount = %value, "primary reward transfer buffered");
                return Ok(());
            }
        }

        if self.repo.get_rewarder(from).await?.is_some() {
            self.repo
                .put_extra_transfer(meta.tx_hash, token, to, value)
                .await?;
            debug!(tx = %meta.tx_hash, token = %token, to = %to, "extra reward transfer buffered");
        }

        Ok(())
    }
}
