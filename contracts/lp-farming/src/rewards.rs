use soroban_sdk::{log, Env};

use crate::errors::ContractError;
use crate::storage::{self, Emission, Pool, Position};

/// Precision multiplier for accumulated reward per share (1e12).
pub const ACC_PRECISION: i128 = 1_000_000_000_000;

/// Reward-weighted length of the ledger range `[from, to)`.
///
/// Ledgers before `bonus_end` count `bonus_multiplier` times; the rest count
/// once. A range straddling the boundary is split, so a pool left untouched
/// across the whole bonus window still gets exactly the bonus it earned.
pub fn multiplier(from: u64, to: u64, bonus_end: u64, bonus_multiplier: u64) -> u64 {
    if to <= from {
        return 0;
    }
    if to <= bonus_end {
        (to - from).saturating_mul(bonus_multiplier)
    } else if from >= bonus_end {
        to - from
    } else {
        (bonus_end - from)
            .saturating_mul(bonus_multiplier)
            .saturating_add(to - bonus_end)
    }
}

/// Bring `pool` up to ledger `now` without touching storage.
///
/// Idle intervals (nothing staked, or no weight anywhere) only move
/// `last_accrual_block`; their emission is not carried forward.
pub fn accrue(pool: &mut Pool, emission: &Emission, now: u64) -> Result<(), ContractError> {
    if now <= pool.last_accrual_block {
        return Ok(());
    }
    if pool.total_staked == 0 || emission.total_weight == 0 {
        pool.last_accrual_block = now;
        return Ok(());
    }

    let blocks = multiplier(
        pool.last_accrual_block,
        now,
        emission.bonus_end_block,
        emission.bonus_multiplier,
    );
    let reward = (blocks as i128)
        .checked_mul(emission.reward_rate)
        .and_then(|r| r.checked_mul(pool.weight as i128))
        .ok_or(ContractError::MathOverflow)?
        / emission.total_weight as i128;
    let increment = reward
        .checked_mul(ACC_PRECISION)
        .ok_or(ContractError::MathOverflow)?
        / pool.total_staked;

    pool.acc_reward_per_share = pool
        .acc_reward_per_share
        .checked_add(increment)
        .ok_or(ContractError::MathOverflow)?;
    pool.last_accrual_block = now;
    Ok(())
}

/// Settle a pool's accumulator to the current ledger and persist it.
/// Returns the updated pool.
pub fn update_pool(env: &Env, pool_id: u32) -> Result<Pool, ContractError> {
    let mut pool = storage::get_pool(env, pool_id)?;
    let now = current_block(env);
    if now <= pool.last_accrual_block {
        return Ok(pool);
    }

    accrue(&mut pool, &storage::get_emission(env), now)?;
    storage::set_pool(env, pool_id, &pool);
    log!(env, "pool settled", pool_id, now, pool.acc_reward_per_share);
    Ok(pool)
}

/// View-only: the pool as it would look if settled now. Nothing is written.
pub fn simulate_pool(env: &Env, pool_id: u32) -> Result<Pool, ContractError> {
    let mut pool = storage::get_pool(env, pool_id)?;
    accrue(&mut pool, &storage::get_emission(env), current_block(env))?;
    Ok(pool)
}

/// Accrued value of `amount` at accumulator `acc_reward_per_share`.
pub fn compute_reward_debt(amount: i128, acc_reward_per_share: i128) -> Result<i128, ContractError> {
    amount
        .checked_mul(acc_reward_per_share)
        .map(|v| v / ACC_PRECISION)
        .ok_or(ContractError::MathOverflow)
}

/// Reward earned since the position's last settlement, excluding
/// `pending_rewards`. Caller must settle the pool first.
pub fn unsettled(pool: &Pool, position: &Position) -> Result<i128, ContractError> {
    Ok(compute_reward_debt(position.amount, pool.acc_reward_per_share)? - position.reward_debt)
}

/// Total claimable reward for a position against a settled pool.
pub fn pending_of(pool: &Pool, position: &Position) -> Result<i128, ContractError> {
    Ok(unsettled(pool, position)? + position.pending_rewards)
}

pub fn current_block(env: &Env) -> u64 {
    env.ledger().sequence() as u64
}
