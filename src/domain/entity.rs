//! Persisted entities reconstructed from the event log.

use alloy_primitives::{Address, B256, I256, U256};

use super::primitives::FarmId;

/// Farm manager contract instance. Created once, on the first pool-addition
/// event seen for the contract; never deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chef {
    pub id: Address,
    /// Primary reward token distributed by the manager itself.
    pub reward_token: Address,
}

/// Auxiliary reward contract attached to a farm. Existence is what the
/// transfer correlator matches sender addresses against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewarder {
    pub id: Address,
}

/// A single staking pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Farm {
    pub id: FarmId,
    pub chef: Address,
    pub rewarder: Address,
    pub alloc_point: U256,
    /// Token users stake into the farm.
    pub lp_token: Address,
    /// Reward-token set; index 0 is always the chef's primary reward token,
    /// the rest are extras discovered from the rewarder at creation.
    pub reward_tokens: Vec<Address>,
    pub created: u64,
    pub created_at_block: u64,
    pub created_at_tx: B256,
    pub total_supply: U256,
    /// Accumulated reward per staked unit, fixed-point at scale 10^12.
    pub acc_reward_per_share: U256,
    pub last_reward_block: u64,
}

impl Farm {
    pub fn primary_reward_token(&self) -> Address {
        self.reward_tokens[0]
    }

    pub fn extra_reward_tokens(&self) -> &[Address] {
        &self.reward_tokens[1..]
    }
}

/// Per-(user, farm) position accounting.
///
/// `amount` never goes negative. `reward_debt` may be transiently negative,
/// but `floor(amount * acc / SCALE) - reward_debt` must be non-negative
/// immediately after any settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub user: Address,
    pub farm: FarmId,
    pub amount: U256,
    pub reward_debt: I256,
}

impl UserInfo {
    /// Fresh position with zero stake and zero debt.
    pub fn new(user: Address, farm: FarmId) -> Self {
        UserInfo {
            user,
            farm,
            amount: U256::ZERO,
            reward_debt: I256::ZERO,
        }
    }
}

/// Immutable audit row, one per Deposit event (including zero-amount ones).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarmDeposit {
    /// `{tx}-{log_index}`
    pub id: String,
    pub tx_hash: B256,
    pub farm: FarmId,
    pub depositor: Address,
    pub receiver: Address,
    pub amount: U256,
}

/// Immutable audit row, one per Withdraw or EmergencyWithdraw event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarmWithdrawal {
    /// `{tx}-{log_index}`
    pub id: String,
    pub tx_hash: B256,
    pub farm: FarmId,
    pub withdrawer: Address,
    pub receiver: Address,
    pub amount: U256,
}

/// Point-in-time copy of a farm's allocation and supply, written before each
/// pool-update is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarmSnapshot {
    /// `{tx}-{log_index}`
    pub id: String,
    pub farm: FarmId,
    pub alloc_point: U256,
    pub total_supply: U256,
    pub timestamp: u64,
    pub tx_hash: B256,
    pub tx_index: u64,
    pub block_number: u64,
    pub log_index: u64,
}

/// A reward-token transfer observed ahead of the Harvest/Withdraw event that
/// will claim it. Transaction-scoped: deleted when consumed, never allowed to
/// outlive its transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTransfer {
    pub receiver: Address,
    pub amount: U256,
}

/// Uniform (token, account, amount) triple used for reporting movements and
/// balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBalance {
    pub token: Address,
    pub account: Address,
    pub amount: U256,
}

impl TokenBalance {
    pub fn new(token: Address, account: Address, amount: U256) -> Self {
        TokenBalance {
            token,
            account,
            amount,
        }
    }
}
