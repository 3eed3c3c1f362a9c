//! Domain primitives: farm identifiers and entity-key formatting.

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Pool identifier assigned by the farm manager contract.
///
/// Persisted in its decimal string form; pool ids are never reused, so the
/// string doubles as the farm's stable entity key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct FarmId(pub u64);

impl FarmId {
    pub fn new(pool_id: u64) -> Self {
        FarmId(pool_id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for FarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FarmId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(FarmId)
    }
}

/// Canonical entity key for an address: 0x-prefixed lowercase hex.
pub fn address_key(address: &Address) -> String {
    format!("{:#x}", address)
}

/// Canonical entity key for a transaction hash: 0x-prefixed lowercase hex.
pub fn tx_key(tx_hash: &B256) -> String {
    format!("{:#x}", tx_hash)
}

/// Entity key for a per-(user, farm) position: `{user}-{farm}`.
pub fn user_info_key(user: &Address, farm: &FarmId) -> String {
    format!("{:#x}-{}", user, farm)
}

/// Entity key for per-log records (audit rows, snapshots): `{tx}-{log_index}`.
pub fn log_key(tx_hash: &B256, log_index: u64) -> String {
    format!("{:#x}-{}", tx_hash, log_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_farm_id_display_is_decimal() {
        assert_eq!(FarmId::new(0).to_string(), "0");
        assert_eq!(FarmId::new(42).to_string(), "42");
    }

    #[test]
    fn test_farm_id_round_trip() {
        let id = FarmId::new(17);
        assert_eq!(id.to_string().parse::<FarmId>().unwrap(), id);
    }

    #[test]
    fn test_address_key_is_lowercase() {
        let addr = address!("6B3595068778DD592e39A122f4f5a5cF09C90fE2");
        assert_eq!(
            address_key(&addr),
            "0x6b3595068778dd592e39a122f4f5a5cf09c90fe2"
        );
    }

    #[test]
    fn test_user_info_key_format() {
        let user = address!("00000000000000000000000000000000000000a1");
        let key = user_info_key(&user, &FarmId::new(3));
        assert_eq!(key, "0x00000000000000000000000000000000000000a1-3");
    }

    #[test]
    fn test_log_key_format() {
        let tx = B256::repeat_byte(0x11);
        let key = log_key(&tx, 7);
        assert!(key.starts_with("0x1111"));
        assert!(key.ends_with("-7"));
    }
}
