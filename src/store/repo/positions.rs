//! Per-(user, farm) position state and immutable audit rows.

use alloy_primitives::Address;
use sqlx::Row;

use crate::domain::{
    address_key, tx_key, user_info_key, FarmDeposit, FarmId, FarmWithdrawal, UserInfo,
};

use super::{parse_address, parse_i256, parse_farm_id, parse_tx_hash, parse_u256, Repository};

impl Repository {
    pub async fn get_user_info(
        &self,
        user: Address,
        farm: FarmId,
    ) -> Result<Option<UserInfo>, sqlx::Error> {
        let row = sqlx::query("SELECT user, farm, amount, reward_debt FROM user_infos WHERE id = ?")
            .bind(user_info_key(&user, &farm))
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| {
            Ok(UserInfo {
                user: parse_address(&row.get::<String, _>("user"))?,
                farm: parse_farm_id(&row.get::<String, _>("farm"))?,
                amount: parse_u256(&row.get::<String, _>("amount"))?,
                reward_debt: parse_i256(&row.get::<String, _>("reward_debt"))?,
            })
        })
        .transpose()
    }

    pub async fn put_user_info(&self, info: &UserInfo) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO user_infos (id, user, farm, amount, reward_debt)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_info_key(&info.user, &info.farm))
        .bind(address_key(&info.user))
        .bind(info.farm.to_string())
        .bind(info.amount.to_string())
        .bind(info.reward_debt.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Audit rows are append-only; re-processing the same log is a no-op.
    pub async fn insert_deposit(&self, deposit: &FarmDeposit) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO farm_deposits (id, tx_hash, farm, depositor, receiver, amount)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(&deposit.id)
        .bind(tx_key(&deposit.tx_hash))
        .bind(deposit.farm.to_string())
        .bind(address_key(&deposit.depositor))
        .bind(address_key(&deposit.receiver))
        .bind(deposit.amount.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn insert_withdrawal(&self, withdrawal: &FarmWithdrawal) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO farm_withdrawals (id, tx_hash, farm, withdrawer, receiver, amount)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(&withdrawal.id)
        .bind(tx_key(&withdrawal.tx_hash))
        .bind(withdrawal.farm.to_string())
        .bind(address_key(&withdrawal.withdrawer))
        .bind(address_key(&withdrawal.receiver))
        .bind(withdrawal.amount.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_deposit(&self, id: &str) -> Result<Option<FarmDeposit>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT id, tx_hash, farm, depositor, receiver, amount FROM farm_deposits WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            Ok(FarmDeposit {
                id: row.get::<String, _>("id"),
                tx_hash: parse_tx_hash(&row.get::<String, _>("tx_hash"))?,
                farm: parse_farm_id(&row.get::<String, _>("farm"))?,
                depositor: parse_address(&row.get::<String, _>("depositor"))?,
                receiver: parse_address(&row.get::<String, _>("receiver"))?,
                amount: parse_u256(&row.get::<String, _>("amount"))?,
            })
        })
        .transpose()
    }

    pub async fn get_withdrawal(&self, id: &str) -> Result<Option<FarmWithdrawal>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT id, tx_hash, farm, withdrawer, receiver, amount FROM farm_withdrawals WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            Ok(FarmWithdrawal {
                id: row.get::<String, _>("id"),
                tx_hash: parse_tx_hash(&row.get::<String, _>("tx_hash"))?,
                farm: parse_farm_id(&row.get::<String, _>("farm"))?,
                withdrawer: parse_address(&row.get::<String, _>("withdrawer"))?,
                receiver: parse_address(&row.get::<String, _>("receiver"))?,
                amount: parse_u256(&row.get::<String, _>("amount"))?,
            })
        })
        .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::init_db;
    use alloy_primitives::{address, B256, I256, U256};
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

    #[tokio::test]
    async fn test_user_info_round_trip_with_negative_debt() {
        let (repo, _dir) = setup().await;
        let info = UserInfo {
            user: address!("00000000000000000000000000000000000000a1"),
            farm: FarmId::new(3),
            amount: U256::from(600u64),
            reward_debt: -I256::try_from(U256::from(5u64)).unwrap(),
        };
        repo.put_user_info(&info).await.unwrap();
        let loaded = repo
            .get_user_info(info.user, info.farm)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded, info);
    }

    #[tokio::test]
    async fn test_user_info_upsert_overwrites() {
        let (repo, _dir) = setup().await;
        let mut info = UserInfo::new(
            address!("00000000000000000000000000000000000000a1"),
            FarmId::new(3),
        );
        repo.put_user_info(&info).await.unwrap();
        info.amount = U256::from(42u64);
        repo.put_user_info(&info).await.unwrap();
        let loaded = repo
            .get_user_info(info.user, info.farm)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.amount, U256::from(42u64));
    }

    #[tokio::test]
    async fn test_audit_rows_are_append_only() {
        let (repo, _dir) = setup().await;
        let deposit = FarmDeposit {
            id: "0xaa-0".to_string(),
            tx_hash: B256::repeat_byte(0xaa),
            farm: FarmId::new(1),
            depositor: address!("00000000000000000000000000000000000000a1"),
            receiver: address!("00000000000000000000000000000000000000a2"),
            amount: U256::from(400u64),
        };
        repo.insert_deposit(&deposit).await.unwrap();

        // a second insert under the same log id must not overwrite
        let mut altered = deposit.clone();
        altered.amount = U256::from(999u64);
        repo.insert_deposit(&altered).await.unwrap();

        let loaded = repo.get_deposit("0xaa-0").await.unwrap().unwrap();
        assert_eq!(loaded.amount, U256::from(400u64));
    }
}
