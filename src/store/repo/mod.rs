//! Repository layer over the entity store.
//!
//! Methods are organized across submodules by concern:
//! - `farms.rs` - chefs, rewarders, farms, snapshots, tracked tokens
//! - `positions.rs` - per-(user, farm) positions and audit rows
//! - `transfers.rs` - the transaction-scoped transfer correlator
//!
//! Handlers never reach into the pool directly; the injected `Repository` is
//! the only way entities are read or written.

mod farms;
mod positions;
mod transfers;

use alloy_primitives::{Address, B256, I256, U256};
use sqlx::sqlite::SqlitePool;
use std::str::FromStr;

use crate::domain::FarmId;

/// Repository for all entity operations.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }
}

// Column decode helpers. Values in these columns are only ever written by
// this crate, so a parse failure means store corruption and surfaces as a
// decode error rather than being papered over.

fn decode_err(msg: String) -> sqlx::Error {
    sqlx::Error::Decode(msg.into())
}

fn parse_address(s: &str) -> Result<Address, sqlx::Error> {
    Address::from_str(s).map_err(|e| decode_err(format!("bad address {s}: {e}")))
}

fn parse_tx_hash(s: &str) -> Result<B256, sqlx::Error> {
    B256::from_str(s).map_err(|e| decode_err(format!("bad tx hash {s}: {e}")))
}

fn parse_u256(s: &str) -> Result<U256, sqlx::Error> {
    U256::from_str_radix(s, 10).map_err(|e| decode_err(format!("bad amount {s}: {e}")))
}

fn parse_i256(s: &str) -> Result<I256, sqlx::Error> {
    I256::from_dec_str(s).map_err(|e| decode_err(format!("bad signed amount {s}: {e}")))
}

fn parse_farm_id(s: &str) -> Result<FarmId, sqlx::Error> {
    FarmId::from_str(s).map_err(|e| decode_err(format!("bad farm id {s}: {e}")))
}

fn parse_token_list(s: &str) -> Result<Vec<Address>, sqlx::Error> {
    serde_json::from_str(s).map_err(|e| decode_err(format!("bad token list {s}: {e}")))
}

fn encode_token_list(tokens: &[Address]) -> Result<String, sqlx::Error> {
    serde_json::to_string(tokens).map_err(|e| decode_err(format!("token list encode: {e}")))
}
