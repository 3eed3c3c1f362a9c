//! Position-changing event handlers: deposit, withdraw, emergency withdraw,
//! harvest.
//!
//! Each handler writes its audit row first, short-circuits zero amounts, then
//! applies the ledger transition and emits exactly one report. The acting
//! `user` need not be the `to` receiver of the funds: deposits credit the
//! receiver's position, withdrawals debit the acting user's.

use alloy_primitives::{Address, U256};
use tracing::debug;

use crate::domain::{log_key, EventMeta, FarmDeposit, FarmWithdrawal, TokenBalance, UserInfo};
use crate::engine::{ledger, reporter, PositionReport};
use crate::error::IndexError;

use super::Indexer;

impl Indexer {
    pub(super) async fn handle_deposit(
        &self,
        meta: &EventMeta,
        pool_id: u64,
        user: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), IndexError> {
        let farm = self.farm(pool_id).await?;

        self.repo
            .insert_deposit(&FarmDeposit {
                id: log_key(&meta.tx_hash, meta.log_index),
                tx_hash: meta.tx_hash,
                farm: farm.id,
                depositor: user,
                receiver: to,
                amount,
            })
            .await?;

        // zero-value deposits leave no trace beyond the audit row
        if amount.is_zero() {
            return Ok(());
        }

        let mut info = self
            .repo
            .get_user_info(to, farm.id)
            .await?
            .unwrap_or_else(|| UserInfo::new(to, farm.id));
        ledger::apply_deposit(&mut info, amount, farm.acc_reward_per_share)?;
        self.repo.put_user_info(&info).await?;

        let report = PositionReport {
            account: to,
            market: reporter::market_id(&farm),
            output_amount: U256::ZERO,
            input_movements: vec![TokenBalance::new(farm.lp_token, to, amount)],
            reward_movements: Vec::new(),
            output_balance: U256::ZERO,
            input_balances: vec![TokenBalance::new(farm.lp_token, to, info.amount)],
            reward_balances: reporter::reward_balances(self.chain.as_ref(), &farm, to, &info)
                .await?,
        };
        self.sink.report_investment(&report).await?;

        Ok(())
    }

    pub(super) async fn handle_withdraw(
        &self,
        meta: &EventMeta,
        pool_id: u64,
        user: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), IndexError> {
        let farm = self.farm(pool_id).await?;

        self.repo
            .insert_withdrawal(&FarmWithdrawal {
                id: log_key(&meta.tx_hash, meta.log_index),
                tx_hash: meta.tx_hash,
                farm: farm.id,
                withdrawer: user,
                receiver: to,
                amount,
            })
            .await?;

        if amount.is_zero() {
            return Ok(());
        }

        // A withdraw against an unknown position means a missed deposit;
        // fabricating a zero position here would corrupt the ledger.
        let mut info = self
            .repo
            .get_user_info(user, farm.id)
            .await?
            .ok_or(IndexError::MissingUserInfo {
                user,
                farm: farm.id,
            })?;
        ledger::apply_withdraw(&mut info, amount, farm.acc_reward_per_share)?;
        self.repo.put_user_info(&info).await?;

        // A withdraw also pays out pending rewards server-side; drain the
        // correlated transfers of this transaction.
        let reward_movements = reporter::harvested_rewards(&self.repo, &farm, meta.tx_hash).await?;

        let report = PositionReport {
            account: to,
            market: reporter::market_id(&farm),
            output_amount: U256::ZERO,
            input_movements: vec![TokenBalance::new(farm.lp_token, to, amount)],
            reward_movements,
            output_balance: U256::ZERO,
            input_balances: vec![TokenBalance::new(farm.lp_token, user, info.amount)],
            reward_balances: reporter::reward_balances(self.chain.as_ref(), &farm, user, &info)
                .await?,
        };
        self.sink.report_redemption(&report).await?;

        Ok(())
    }

    pub(super) async fn handle_emergency_withdraw(
        &self,
        meta: &EventMeta,
        pool_id: u64,
        user: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), IndexError> {
        let farm = self.farm(pool_id).await?;

        self.repo
            .insert_withdrawal(&FarmWithdrawal {
                id: log_key(&meta.tx_hash, meta.log_index),
                tx_hash: meta.tx_hash,
                farm: farm.id,
                withdrawer: user,
                receiver: to,
                amount,
            })
            .await?;

        if amount.is_zero() {
            return Ok(());
        }

        let mut info = self
            .repo
            .get_user_info(user, farm.id)
            .await?
            .ok_or(IndexError::MissingUserInfo {
                user,
                farm: farm.id,
            })?;
        // full reset, accrued rewards forfeited
        ledger::apply_emergency_withdraw(&mut info);
        self.repo.put_user_info(&info).await?;

        let report = PositionReport {
            account: to,
            market: reporter::market_id(&farm),
            output_amount: U256::ZERO,
            input_movements: vec![TokenBalance::new(farm.lp_token, to, amount)],
            reward_movements: Vec::new(),
            output_balance: U256::ZERO,
            input_balances: vec![TokenBalance::new(farm.lp_token, user, info.amount)],
            reward_balances: reporter::reward_balances(self.chain.as_ref(), &farm, user, &info)
                .await?,
        };
        self.sink.report_redemption(&report).await?;

        Ok(())
    }

    pub(super) async fn handle_harvest(
        &self,
        meta: &EventMeta,
        pool_id: u64,
        user: Address,
        amount: U256,
    ) -> Result<(), IndexError> {
        let farm = self.farm(pool_id).await?;

        // No unconsumed correlated transfer means the rewards were already
        // drained by a Withdraw earlier in this transaction (or indexing
        // started mid-stream); either way there is nothing left to settle.
        if !self
            .repo
            .has_pending_transfer(meta.tx_hash, farm.extra_reward_tokens())
            .await?
        {
            debug!(farm = %farm.id, user = %user, "harvest without pending transfer, skipping");
            return Ok(());
        }

        if amount.is_zero() {
            return Ok(());
        }

        let mut info = self
            .repo
            .get_user_info(user, farm.id)
            .await?
            .unwrap_or_else(|| UserInfo::new(user, farm.id));
        ledger::apply_harvest(&mut info, amount)?;
        self.repo.put_user_info(&info).await?;

        let reward_movements = reporter::harvested_rewards(&self.repo, &farm, meta.tx_hash).await?;

        let report = PositionReport {
            account: user,
            market: reporter::market_id(&farm),
            output_amount: U256::ZERO,
            input_movements: Vec::new(),
            reward_movements,
            output_balance: U256::ZERO,
            input_balances: vec![TokenBalance::new(farm.lp_token, user, info.amount)],
            reward_balances: reporter::reward_balances(self.chain.as_ref(), &farm, user, &info)
                .await?,
        };
        self.sink.report_redemption(&report).await?;

        Ok(())
    }
}
