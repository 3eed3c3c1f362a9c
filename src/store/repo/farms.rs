//! Chef, rewarder, farm, snapshot, and tracked-token operations.

use alloy_primitives::Address;
use sqlx::Row;

use crate::domain::{address_key, tx_key, Chef, Farm, FarmId, FarmSnapshot, Rewarder};

use super::{
    encode_token_list, parse_address, parse_token_list, parse_tx_hash, parse_u256, Repository,
};

impl Repository {
    pub async fn get_chef(&self, id: Address) -> Result<Option<Chef>, sqlx::Error> {
        let row = sqlx::query("SELECT id, reward_token FROM chefs WHERE id = ?")
            .bind(address_key(&id))
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| {
            Ok(Chef {
                id: parse_address(&row.get::<String, _>("id"))?,
                reward_token: parse_address(&row.get::<String, _>("reward_token"))?,
            })
        })
        .transpose()
    }

    pub async fn put_chef(&self, chef: &Chef) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT OR REPLACE INTO chefs (id, reward_token) VALUES (?, ?)")
            .bind(address_key(&chef.id))
            .bind(address_key(&chef.reward_token))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn get_rewarder(&self, id: Address) -> Result<Option<Rewarder>, sqlx::Error> {
        let row = sqlx::query("SELECT id FROM rewarders WHERE id = ?")
            .bind(address_key(&id))
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| {
            Ok(Rewarder {
                id: parse_address(&row.get::<String, _>("id"))?,
            })
        })
        .transpose()
    }

    pub async fn put_rewarder(&self, rewarder: &Rewarder) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT OR REPLACE INTO rewarders (id) VALUES (?)")
            .bind(address_key(&rewarder.id))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn get_farm(&self, id: FarmId) -> Result<Option<Farm>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, chef, rewarder, alloc_point, lp_token, reward_tokens,
                   created, created_at_block, created_at_tx, total_supply,
                   acc_reward_per_share, last_reward_block
            FROM farms WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            Ok(Farm {
                id,
                chef: parse_address(&row.get::<String, _>("chef"))?,
                rewarder: parse_address(&row.get::<String, _>("rewarder"))?,
                alloc_point: parse_u256(&row.get::<String, _>("alloc_point"))?,
                lp_token: parse_address(&row.get::<String, _>("lp_token"))?,
                reward_tokens: parse_token_list(&row.get::<String, _>("reward_tokens"))?,
                created: row.get::<i64, _>("created") as u64,
                created_at_block: row.get::<i64, _>("created_at_block") as u64,
                created_at_tx: parse_tx_hash(&row.get::<String, _>("created_at_tx"))?,
                total_supply: parse_u256(&row.get::<String, _>("total_supply"))?,
                acc_reward_per_share: parse_u256(&row.get::<String, _>("acc_reward_per_share"))?,
                last_reward_block: row.get::<i64, _>("last_reward_block") as u64,
            })
        })
        .transpose()
    }

    pub async fn put_farm(&self, farm: &Farm) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO farms
            (id, chef, rewarder, alloc_point, lp_token, reward_tokens, created,
             created_at_block, created_at_tx, total_supply, acc_reward_per_share,
             last_reward_block)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(farm.id.to_string())
        .bind(address_key(&farm.chef))
        .bind(address_key(&farm.rewarder))
        .bind(farm.alloc_point.to_string())
        .bind(address_key(&farm.lp_token))
        .bind(encode_token_list(&farm.reward_tokens)?)
        .bind(farm.created as i64)
        .bind(farm.created_at_block as i64)
        .bind(tx_key(&farm.created_at_tx))
        .bind(farm.total_supply.to_string())
        .bind(farm.acc_reward_per_share.to_string())
        .bind(farm.last_reward_block as i64)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Snapshots are append-only; writing the same log twice is idempotent.
    pub async fn insert_snapshot(&self, snapshot: &FarmSnapshot) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO farm_snapshots
            (id, farm, alloc_point, total_supply, timestamp, tx_hash, tx_index,
             block_number, log_index)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(&snapshot.id)
        .bind(snapshot.farm.to_string())
        .bind(snapshot.alloc_point.to_string())
        .bind(snapshot.total_supply.to_string())
        .bind(snapshot.timestamp as i64)
        .bind(tx_key(&snapshot.tx_hash))
        .bind(snapshot.tx_index as i64)
        .bind(snapshot.block_number as i64)
        .bind(snapshot.log_index as i64)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn snapshots_for_farm(&self, id: FarmId) -> Result<Vec<FarmSnapshot>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, farm, alloc_point, total_supply, timestamp, tx_hash,
                   tx_index, block_number, log_index
            FROM farm_snapshots WHERE farm = ?
            ORDER BY block_number ASC, tx_index ASC, log_index ASC
            "#,
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(FarmSnapshot {
                    id: row.get::<String, _>("id"),
                    farm: id,
                    alloc_point: parse_u256(&row.get::<String, _>("alloc_point"))?,
                    total_supply: parse_u256(&row.get::<String, _>("total_supply"))?,
                    timestamp: row.get::<i64, _>("timestamp") as u64,
                    tx_hash: parse_tx_hash(&row.get::<String, _>("tx_hash"))?,
                    tx_index: row.get::<i64, _>("tx_index") as u64,
                    block_number: row.get::<i64, _>("block_number") as u64,
                    log_index: row.get::<i64, _>("log_index") as u64,
                })
            })
            .collect()
    }

    pub async fn is_token_tracked(&self, token: Address) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM tracked_tokens WHERE id = ?")
            .bind(address_key(&token))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    pub async fn mark_token_tracked(&self, token: Address) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT OR IGNORE INTO tracked_tokens (id) VALUES (?)")
            .bind(address_key(&token))
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::init_db;
    use alloy_primitives::{address, B256, U256};
    use tempfile::TempDir;

    async fn setup() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        let pool = init_db(&db_path).await.expect("init_db failed");
        (Repository::new(pool), temp_dir)
    }

    fn farm() -> Farm {
        Farm {
            id: FarmId::new(7),
            chef: address!("0000000000000000000000000000000000000c0f"),
            rewarder: address!("00000000000000000000000000000000000000ee"),
            alloc_point: U256::from(100u64),
            lp_token: address!("00000000000000000000000000000000000000f1"),
            reward_tokens: vec![
                address!("0000000000000000000000000000000000000051"),
                address!("0000000000000000000000000000000000000052"),
            ],
            created: 1_650_000_000,
            created_at_block: 42,
            created_at_tx: B256::repeat_byte(0x01),
            total_supply: U256::ZERO,
            acc_reward_per_share: U256::from(2_000_000_000u64),
            last_reward_block: 42,
        }
    }

    #[tokio::test]
    async fn test_farm_round_trip() {
        let (repo, _dir) = setup().await;
        let farm = farm();
        repo.put_farm(&farm).await.unwrap();
        let loaded = repo.get_farm(farm.id).await.unwrap().unwrap();
        assert_eq!(loaded, farm);
        assert!(repo.get_farm(FarmId::new(999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_chef_and_rewarder_round_trip() {
        let (repo, _dir) = setup().await;
        let chef = Chef {
            id: address!("0000000000000000000000000000000000000c0f"),
            reward_token: address!("0000000000000000000000000000000000000051"),
        };
        repo.put_chef(&chef).await.unwrap();
        assert_eq!(repo.get_chef(chef.id).await.unwrap().unwrap(), chef);

        let rewarder = Rewarder {
            id: address!("00000000000000000000000000000000000000ee"),
        };
        repo.put_rewarder(&rewarder).await.unwrap();
        assert_eq!(
            repo.get_rewarder(rewarder.id).await.unwrap().unwrap(),
            rewarder
        );
        assert!(repo.get_rewarder(chef.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_snapshot_insert_is_idempotent() {
        let (repo, _dir) = setup().await;
        let snapshot = FarmSnapshot {
            id: "0x01-3".to_string(),
            farm: FarmId::new(7),
            alloc_point: U256::from(100u64),
            total_supply: U256::from(5000u64),
            timestamp: 1_650_000_000,
            tx_hash: B256::repeat_byte(0x01),
            tx_index: 0,
            block_number: 42,
            log_index: 3,
        };
        repo.insert_snapshot(&snapshot).await.unwrap();
        repo.insert_snapshot(&snapshot).await.unwrap();
        let snapshots = repo.snapshots_for_farm(FarmId::new(7)).await.unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0], snapshot);
    }

    #[tokio::test]
    async fn test_tracked_tokens() {
        let (repo, _dir) = setup().await;
        let token = address!("0000000000000000000000000000000000000051");
        assert!(!repo.is_token_tracked(token).await.unwrap());
        repo.mark_token_tracked(token).await.unwrap();
        repo.mark_token_tracked(token).await.unwrap();
        assert!(repo.is_token_tracked(token).await.unwrap());
    }
}
