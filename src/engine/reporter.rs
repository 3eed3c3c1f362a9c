//! Assembly of normalized position reports.
//!
//! Claimable balances come from two places: the primary reward is computed
//! locally from the fixed-point index, extra-token claimables are queried
//! live from the rewarder (no local index exists for them). Reward movements
//! are drained from the transfer correlator.

use alloy_primitives::{Address, U256};

use crate::chain::ChainClient;
use crate::domain::{address_key, Farm, TokenBalance, UserInfo};
use crate::engine::ledger;
use crate::error::IndexError;
use crate::store::Repository;

/// Market key a farm reports under: `{chef}-{farm}`.
pub fn market_id(farm: &Farm) -> String {
    format!("{}-{}", address_key(&farm.chef), farm.id)
}

/// Post-event claimable balances for `account`: computed primary claimable
/// first, then whatever extra-token claimables the rewarder reports. A
/// reverted rewarder call means no extras, not an error.
pub async fn reward_balances(
    chain: &dyn ChainClient,
    farm: &Farm,
    account: Address,
    info: &UserInfo,
) -> Result<Vec<TokenBalance>, IndexError> {
    let claimable = ledger::claimable_primary(info, farm.acc_reward_per_share)?;
    let mut balances = vec![TokenBalance::new(
        farm.primary_reward_token(),
        account,
        claimable,
    )];

    if let Some(pending) = chain
        .pending_tokens(farm.rewarder, farm.id.as_u64(), account, U256::ZERO)
        .await?
    {
        for (token, amount) in pending.tokens.iter().zip(pending.amounts.iter()) {
            balances.push(TokenBalance::new(*token, account, *amount));
        }
    }

    Ok(balances)
}

/// Reward amounts actually paid out in this transaction, taken from the
/// correlated transfer entries and deleting them as they are consumed. The
/// receiver recorded on each transfer wins over the event's own account: the
/// contract allows harvesting to a different address.
pub async fn harvested_rewards(
    repo: &Repository,
    farm: &Farm,
    tx_hash: alloy_primitives::B256,
) -> Result<Vec<TokenBalance>, IndexError> {
    let mut movements = Vec::new();

    if let Some(transfer) = repo.consume_primary_transfer(tx_hash).await? {
        movements.push(TokenBalance::new(
            farm.primary_reward_token(),
            transfer.receiver,
            transfer.amount,
        ));
    }

    for token in farm.extra_reward_tokens() {
        if let Some(transfer) = repo.consume_extra_transfer(tx_hash, *token).await? {
            movements.push(TokenBalance::new(*token, transfer.receiver, transfer.amount));
        }
    }

    Ok(movements)
}
