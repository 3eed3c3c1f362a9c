//! Pure computation engine for the farm accounting logic.

use alloy_primitives::{Address, U256};

use crate::domain::TokenBalance;

pub mod ledger;
pub mod reporter;

pub use ledger::ACC_REWARD_PRECISION;

/// Normalized movement report emitted once per position-changing event.
///
/// Farms have no ownership token, so the output fields are always zero; they
/// are kept so the external accounting collaborator receives one uniform
/// shape for every market type it aggregates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionReport {
    pub account: Address,
    /// Market key: `{chef}-{farm}`.
    pub market: String,
    pub output_amount: U256,
    pub input_movements: Vec<TokenBalance>,
    pub reward_movements: Vec<TokenBalance>,
    pub output_balance: U256,
    pub input_balances: Vec<TokenBalance>,
    pub reward_balances: Vec<TokenBalance>,
}
