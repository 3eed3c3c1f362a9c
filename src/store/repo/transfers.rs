//! Transfer correlator: transaction-scoped pending reward transfers.
//!
//! A reward-token Transfer log arrives before the Harvest/Withdraw log of the
//! same transaction that explains it. Entries are keyed by transaction hash
//! (primary) or (transaction hash, token) (extras), replaced on re-observation
//! within a transaction, and deleted on consumption. Keys recur across
//! transactions, so an entry outliving its transaction would misattribute a
//! later payout; consumption is therefore destructive.

use alloy_primitives::{Address, B256, U256};
use sqlx::Row;

use crate::domain::{address_key, tx_key, PendingTransfer};

use super::{parse_address, parse_u256, Repository};

impl Repository {
    pub async fn put_primary_transfer(
        &self,
        tx_hash: B256,
        receiver: Address,
        amount: U256,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO pending_reward_transfers (tx_hash, receiver, amount)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(tx_key(&tx_hash))
        .bind(address_key(&receiver))
        .bind(amount.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Return and delete the primary pending transfer for a transaction.
    pub async fn consume_primary_transfer(
        &self,
        tx_hash: B256,
    ) -> Result<Option<PendingTransfer>, sqlx::Error> {
        let key = tx_key(&tx_hash);
        let mut tx = self.pool.begin().await?;

        let row =
            sqlx::query("SELECT receiver, amount FROM pending_reward_transfers WHERE tx_hash = ?")
                .bind(&key)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM pending_reward_transfers WHERE tx_hash = ?")
            .bind(&key)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(Some(PendingTransfer {
            receiver: parse_address(&row.get::<String, _>("receiver"))?,
            amount: parse_u256(&row.get::<String, _>("amount"))?,
        }))
    }

    pub async fn put_extra_transfer(
        &self,
        tx_hash: B256,
        token: Address,
        receiver: Address,
        amount: U256,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO pending_extra_reward_transfers
            (tx_hash, token, receiver, amount)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(tx_key(&tx_hash))
        .bind(address_key(&token))
        .bind(address_key(&receiver))
        .bind(amount.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Return and delete the pending transfer of `token` for a transaction.
    pub async fn consume_extra_transfer(
        &self,
        tx_hash: B256,
        token: Address,
    ) -> Result<Option<PendingTransfer>, sqlx::Error> {
        let key = tx_key(&tx_hash);
        let token_key = address_key(&token);
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT receiver, amount FROM pending_extra_reward_transfers WHERE tx_hash = ? AND token = ?",
        )
        .bind(&key)
        .bind(&token_key)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM pending_extra_reward_transfers WHERE tx_hash = ? AND token = ?")
            .bind(&key)
            .bind(&token_key)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(Some(PendingTransfer {
            receiver: parse_address(&row.get::<String, _>("receiver"))?,
            amount: parse_u256(&row.get::<String, _>("amount"))?,
        }))
    }

    /// True iff an unconsumed primary transfer exists for the transaction, or
    /// an unconsumed extra transfer exists for any of the given tokens. This
    /// is the gate that tells a standalone Harvest apart from one whose
    /// rewards were already drained by a Withdraw earlier in the transaction.
    pub async fn has_pending_transfer(
        &self,
        tx_hash: B256,
        extra_tokens: &[Address],
    ) -> Result<bool, sqlx::Error> {
        let key = tx_key(&tx_hash);

        let primary = sqlx::query("SELECT 1 FROM pending_reward_transfers WHERE tx_hash = ?")
            .bind(&key)
            .fetch_optional(&self.pool)
            .await?;
        if primary.is_some() {
            return Ok(true);
        }

        for token in extra_tokens {
            let extra = sqlx::query(
                "SELECT 1 FROM pending_extra_reward_transfers WHERE tx_hash = ? AND token = ?",
            )
            .bind(&key)
            .bind(address_key(token))
            .fetch_optional(&self.pool)
            .await?;
            if extra.is_some() {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Number of pending entries across both correlator tables. Test hook for
    /// the no-entry-outlives-its-transaction property.
    pub async fn pending_transfer_count(&self) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            r#"
            SELECT (SELECT COUNT(*) FROM pending_reward_transfers)
                 + (SELECT COUNT(*) FROM pending_extra_reward_transfers)
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }
}
