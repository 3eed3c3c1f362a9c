use alloy_primitives::{Address, U256};
use thiserror::Error;

use crate::chain::ChainError;
use crate::domain::FarmId;
use crate::market::MarketError;

/// Per-event failure taxonomy.
///
/// Expected absences (reverted read calls, missing correlated transfers) are
/// never surfaced here; they resolve to empty results inside the handlers.
/// Everything below is non-recoverable for the event it occurred in: the
/// caller decides whether to halt or skip, the core never partially applies.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("unknown farm {0}")]
    MissingFarm(FarmId),
    #[error("no position recorded for user {user} in farm {farm}")]
    MissingUserInfo { user: Address, farm: FarmId },
    #[error("withdraw of {requested} exceeds staked {staked} for user {user} in farm {farm}")]
    InsufficientStake {
        user: Address,
        farm: FarmId,
        requested: U256,
        staked: U256,
    },
    #[error("negative claimable reward for user {user} in farm {farm}")]
    NegativeClaimable { user: Address, farm: FarmId },
    #[error("fixed-point arithmetic overflow")]
    Overflow,
    #[error(transparent)]
    Store(#[from] sqlx::Error),
    #[error("chain read failed: {0}")]
    Chain(#[from] ChainError),
    #[error("accounting sink rejected report: {0}")]
    Sink(#[from] MarketError),
}
