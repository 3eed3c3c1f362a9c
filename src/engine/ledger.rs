//! Fixed-point reward/position accounting for a single (user, farm) pair.
//!
//! Every transition here mirrors the on-chain accounting bit for bit: amounts
//! and the accumulated-reward-per-share index are 256-bit integers, the index
//! carries 10^12 fixed-point precision, and all division is floor division.
//! Replacing any of this with floating point would drift from the contract.

use alloy_primitives::{I256, U256};

use crate::domain::UserInfo;
use crate::error::IndexError;

/// Fixed-point scale of the accumulated-reward-per-share index, hard-coded to
/// match the farm manager contract.
pub const ACC_REWARD_PRECISION: U256 = U256::from_limbs([1_000_000_000_000, 0, 0, 0]);

/// `floor(amount * acc / SCALE)` as a signed value, for debt arithmetic.
fn accrued(amount: U256, acc_reward_per_share: U256) -> Result<I256, IndexError> {
    let scaled = amount
        .checked_mul(acc_reward_per_share)
        .ok_or(IndexError::Overflow)?
        / ACC_REWARD_PRECISION;
    I256::try_from(scaled).map_err(|_| IndexError::Overflow)
}

/// Deposit: stake grows, debt grows by the deposit's share of the index.
pub fn apply_deposit(
    info: &mut UserInfo,
    amount: U256,
    acc_reward_per_share: U256,
) -> Result<(), IndexError> {
    let delta = accrued(amount, acc_reward_per_share)?;
    info.amount = info.amount.checked_add(amount).ok_or(IndexError::Overflow)?;
    info.reward_debt = info
        .reward_debt
        .checked_add(delta)
        .ok_or(IndexError::Overflow)?;
    Ok(())
}

/// Withdraw: stake shrinks, debt shrinks by the withdrawal's share of the
/// index. A withdrawal exceeding the staked amount means a missed or
/// misordered event upstream and is refused.
pub fn apply_withdraw(
    info: &mut UserInfo,
    amount: U256,
    acc_reward_per_share: U256,
) -> Result<(), IndexError> {
    if info.amount < amount {
        return Err(IndexError::InsufficientStake {
            user: info.user,
            farm: info.farm,
            requested: amount,
            staked: info.amount,
        });
    }
    let delta = accrued(amount, acc_reward_per_share)?;
    info.amount -= amount;
    info.reward_debt = info
        .reward_debt
        .checked_sub(delta)
        .ok_or(IndexError::Overflow)?;
    Ok(())
}

/// Emergency withdraw: full reset, accrued rewards forfeited.
pub fn apply_emergency_withdraw(info: &mut UserInfo) {
    info.amount = U256::ZERO;
    info.reward_debt = I256::ZERO;
}

/// Harvest: the claimed primary-reward amount is folded into the debt, so the
/// same rewards cannot be claimed again.
pub fn apply_harvest(info: &mut UserInfo, claimed: U256) -> Result<(), IndexError> {
    let claimed = I256::try_from(claimed).map_err(|_| IndexError::Overflow)?;
    info.reward_debt = info
        .reward_debt
        .checked_add(claimed)
        .ok_or(IndexError::Overflow)?;
    Ok(())
}

/// Claimable primary reward: `floor(amount * acc / SCALE) - reward_debt`.
///
/// Negative claimable at reporting time is an invariant violation, not a
/// value to clamp.
pub fn claimable_primary(
    info: &UserInfo,
    acc_reward_per_share: U256,
) -> Result<U256, IndexError> {
    let earned = accrued(info.amount, acc_reward_per_share)?;
    let claimable = earned
        .checked_sub(info.reward_debt)
        .ok_or(IndexError::Overflow)?;
    if claimable.is_negative() {
        return Err(IndexError::NegativeClaimable {
            user: info.user,
            farm: info.farm,
        });
    }
    Ok(claimable.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FarmId;
    use alloy_primitives::Address;

    fn info() -> UserInfo {
        UserInfo::new(Address::repeat_byte(0xa1), FarmId::new(0))
    }

    fn u(v: u64) -> U256 {
        U256::from(v)
    }

    #[test]
    fn test_deposit_withdraw_signed_sum() {
        let mut info = info();
        apply_deposit(&mut info, u(1000), U256::ZERO).unwrap();
        apply_deposit(&mut info, u(500), U256::ZERO).unwrap();
        apply_withdraw(&mut info, u(300), U256::ZERO).unwrap();
        apply_withdraw(&mut info, u(1200), U256::ZERO).unwrap();
        assert_eq!(info.amount, U256::ZERO);
        assert_eq!(info.reward_debt, I256::ZERO);
    }

    #[test]
    fn test_withdraw_below_zero_is_refused() {
        let mut info = info();
        apply_deposit(&mut info, u(100), U256::ZERO).unwrap();
        let err = apply_withdraw(&mut info, u(101), U256::ZERO).unwrap_err();
        assert!(matches!(err, IndexError::InsufficientStake { .. }));
        // no partial mutation
        assert_eq!(info.amount, u(100));
    }

    #[test]
    fn test_floor_division_boundary() {
        // amount=3, acc=1, SCALE=10^12: 3*1/10^12 floors to 0.
        let mut info = info();
        apply_deposit(&mut info, u(3), u(1)).unwrap();
        assert_eq!(info.amount, u(3));
        assert_eq!(info.reward_debt, I256::ZERO);
    }

    #[test]
    fn test_reward_debt_accumulates_incrementally() {
        let mut info = info();
        // 1000 staked at acc = 2e9 -> debt = 1000 * 2e9 / 1e12 = 2
        apply_deposit(&mut info, u(1000), u(2_000_000_000)).unwrap();
        assert_eq!(info.reward_debt, I256::try_from(u(2)).unwrap());
        // withdrawing 400 at the same index removes floor(400*2e9/1e12) = 0
        apply_withdraw(&mut info, u(400), u(2_000_000_000)).unwrap();
        assert_eq!(info.amount, u(600));
        assert_eq!(info.reward_debt, I256::try_from(u(2)).unwrap());
    }

    #[test]
    fn test_reward_debt_can_go_negative_transiently() {
        let mut info = info();
        apply_deposit(&mut info, u(1000), U256::ZERO).unwrap();
        // index moved to 5e9 between deposit and withdraw
        apply_withdraw(&mut info, u(1000), u(5_000_000_000)).unwrap();
        assert_eq!(info.reward_debt, -I256::try_from(u(5)).unwrap());
    }

    #[test]
    fn test_emergency_withdraw_resets_everything() {
        let mut info = info();
        apply_deposit(&mut info, u(1000), u(7_000_000_000)).unwrap();
        apply_harvest(&mut info, u(3)).unwrap();
        apply_emergency_withdraw(&mut info);
        assert_eq!(info.amount, U256::ZERO);
        assert_eq!(info.reward_debt, I256::ZERO);
    }

    #[test]
    fn test_harvest_settles_claimable_to_zero() {
        let mut info = info();
        apply_deposit(&mut info, u(1000), U256::ZERO).unwrap();
        let acc = u(5_000_000_000);
        let claimable = claimable_primary(&info, acc).unwrap();
        assert_eq!(claimable, u(5));
        apply_harvest(&mut info, claimable).unwrap();
        assert_eq!(claimable_primary(&info, acc).unwrap(), U256::ZERO);
    }

    #[test]
    fn test_negative_claimable_is_an_error() {
        let mut info = info();
        // debt with no stake: claimable would be negative
        apply_harvest(&mut info, u(10)).unwrap();
        let err = claimable_primary(&info, U256::ZERO).unwrap_err();
        assert!(matches!(err, IndexError::NegativeClaimable { .. }));
    }

    #[test]
    fn test_overflow_is_detected() {
        let mut info = info();
        info.amount = U256::MAX;
        let err = claimable_primary(&info, u(2)).unwrap_err();
        assert!(matches!(err, IndexError::Overflow));
    }
}
