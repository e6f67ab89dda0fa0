#![no_std]

mod errors;
mod events;
mod lock;
pub mod rewards;
mod storage;


pub use errors::ContractError;
pub use storage::{Pool, Position};

use lock::PoolLock;
use soroban_sdk::{contract, contractimpl, log, token, Address, Env};

#[contract]
pub struct LpFarmingContract;

#[contractimpl]
impl LpFarmingContract {
    // ========== Admin Functions ==========

    /// One-time initialization of the emission schedule.
    ///
    /// * `reward_rate` – reward units emitted per ledger across all pools.
    /// * `start_block` – ledger at which accrual begins.
    /// * `bonus_end_block` – ledgers before this one earn `bonus_multiplier`x.
    pub fn initialize(
        env: Env,
        admin: Address,
        reward_token: Address,
        reward_rate: i128,
        start_block: u64,
        bonus_end_block: u64,
        bonus_multiplier: u64,
    ) -> Result<(), ContractError> {
        if storage::has_admin(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        if reward_rate < 0 || bonus_multiplier == 0 {
            return Err(ContractError::InvalidConfig);
        }

        storage::set_admin(&env, &admin);
        storage::set_reward_token(&env, &reward_token);
        storage::set_reward_rate(&env, reward_rate);
        storage::set_start_block(&env, start_block);
        storage::set_bonus_end_block(&env, bonus_end_block);
        storage::set_bonus_multiplier(&env, bonus_multiplier);
        storage::set_total_weight(&env, 0);
        storage::set_pool_count(&env, 0);
        storage::set_paused(&env, false);
        storage::extend_instance_ttl(&env);

        log!(&env, "initialized", admin, reward_rate, start_block, bonus_end_block);
        Ok(())
    }

    /// Register a new stake token. Returns the pool id.
    ///
    /// Pass `with_update` to settle every existing pool first; otherwise their
    /// unsettled history is accrued against the enlarged total weight.
    pub fn add_pool(
        env: Env,
        admin: Address,
        weight: u32,
        stake_token: Address,
        min_stake: i128,
        max_stake: i128,
        with_update: bool,
    ) -> Result<u32, ContractError> {
        Self::require_admin(&env, &admin)?;
        storage::extend_instance_ttl(&env);

        Self::require_valid_bounds(min_stake, max_stake)?;
        if stake_token == storage::get_reward_token(&env)? {
            return Err(ContractError::StakeTokenIsRewardToken);
        }
        if storage::has_stake_token(&env, &stake_token) {
            return Err(ContractError::PoolAlreadyExists);
        }
        let total_weight = storage::get_total_weight(&env)
            .checked_add(weight as u64)
            .ok_or(ContractError::MathOverflow)?;

        if with_update {
            Self::settle_all_pools(&env)?;
        }

        let pool_id = storage::get_pool_count(&env);
        let now = rewards::current_block(&env);
        storage::set_pool(
            &env,
            pool_id,
            &Pool {
                stake_token: stake_token.clone(),
                weight,
                last_accrual_block: now.max(storage::get_start_block(&env)),
                acc_reward_per_share: 0,
                total_staked: 0,
                min_stake,
                max_stake,
            },
        );
        storage::set_stake_token_index(&env, &stake_token, pool_id);
        storage::set_pool_count(&env, pool_id + 1);
        storage::set_total_weight(&env, total_weight);

        events::publish_pool_added(&env, pool_id, stake_token, weight, min_stake, max_stake);
        log!(&env, "pool added", pool_id, weight, total_weight);
        Ok(pool_id)
    }

    /// Change a pool's allocation weight. Weight 0 deprecates the pool: it stops
    /// earning but stakers keep every exit path.
    ///
    /// The target pool is always settled first. Pass `with_update` to settle
    /// every other pool as well; otherwise their unsettled history is accrued
    /// against the new total weight.
    pub fn set_pool_weight(
        env: Env,
        admin: Address,
        pool_id: u32,
        weight: u32,
        with_update: bool,
    ) -> Result<(), ContractError> {
        Self::require_admin(&env, &admin)?;
        Self::require_valid_pool(&env, pool_id)?;
        storage::extend_instance_ttl(&env);

        if with_update {
            Self::settle_all_pools(&env)?;
        }

        let _lock = PoolLock::acquire(&env, pool_id)?;
        let mut pool = rewards::update_pool(&env, pool_id)?;

        let old_weight = pool.weight;
        let total_weight = (storage::get_total_weight(&env) - old_weight as u64)
            .checked_add(weight as u64)
            .ok_or(ContractError::MathOverflow)?;

        pool.weight = weight;
        storage::set_pool(&env, pool_id, &pool);
        storage::set_total_weight(&env, total_weight);

        events::publish_pool_weight_set(&env, pool_id, old_weight, weight, total_weight);
        log!(&env, "pool weight set", pool_id, old_weight, weight);
        Ok(())
    }

    /// Change a pool's stake bounds. Existing positions above the new maximum
    /// are left alone; only later deposits are checked.
    pub fn set_pool_bounds(
        env: Env,
        admin: Address,
        pool_id: u32,
        min_stake: i128,
        max_stake: i128,
    ) -> Result<(), ContractError> {
        Self::require_admin(&env, &admin)?;
        Self::require_valid_pool(&env, pool_id)?;
        Self::require_valid_bounds(min_stake, max_stake)?;
        storage::extend_instance_ttl(&env);

        let _lock = PoolLock::acquire(&env, pool_id)?;
        let mut pool = storage::get_pool(&env, pool_id)?;
        pool.min_stake = min_stake;
        pool.max_stake = max_stake;
        storage::set_pool(&env, pool_id, &pool);

        events::publish_pool_bounds_set(&env, pool_id, min_stake, max_stake);
        Ok(())
    }

    /// Update the global reward rate (reward units per ledger).
    /// Settles all pools first so the new rate only applies from now on.
    pub fn set_reward_rate(env: Env, admin: Address, new_rate: i128) -> Result<(), ContractError> {
        Self::require_admin(&env, &admin)?;
        if new_rate < 0 {
            return Err(ContractError::InvalidConfig);
        }
        storage::extend_instance_ttl(&env);

        Self::settle_all_pools(&env)?;

        let old_rate = storage::get_reward_rate(&env);
        storage::set_reward_rate(&env, new_rate);

        events::publish_reward_rate_set(&env, old_rate, new_rate);
        log!(&env, "reward rate set", old_rate, new_rate);
        Ok(())
    }

    /// Stop new deposits. Withdrawals, harvests and emergency exits stay open.
    pub fn pause(env: Env, admin: Address) -> Result<(), ContractError> {
        Self::require_admin(&env, &admin)?;
        storage::extend_instance_ttl(&env);
        storage::set_paused(&env, true);
        events::publish_paused(&env, true);
        Ok(())
    }

    pub fn unpause(env: Env, admin: Address) -> Result<(), ContractError> {
        Self::require_admin(&env, &admin)?;
        storage::extend_instance_ttl(&env);
        storage::set_paused(&env, false);
        events::publish_paused(&env, false);
        Ok(())
    }

    /// Transfer admin role to a new address.
    pub fn set_admin(env: Env, admin: Address, new_admin: Address) -> Result<(), ContractError> {
        Self::require_admin(&env, &admin)?;
        storage::extend_instance_ttl(&env);
        storage::set_admin(&env, &new_admin);
        events::publish_admin_changed(&env, admin, new_admin);
        Ok(())
    }

    /// Transfer reward tokens into the contract's reserve.
    pub fn fund(env: Env, funder: Address, amount: i128) -> Result<(), ContractError> {
        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        funder.require_auth();

        let reward_token = storage::get_reward_token(&env)?;
        Self::transfer(
            &env,
            &reward_token,
            &funder,
            &env.current_contract_address(),
            amount,
        )?;
        storage::extend_instance_ttl(&env);

        Ok(())
    }

    // ========== Settlement ==========

    /// Settle one pool's accumulator to the current ledger. Anyone may call.
    pub fn update_pool(env: Env, pool_id: u32) -> Result<Pool, ContractError> {
        Self::require_valid_pool(&env, pool_id)?;
        storage::extend_instance_ttl(&env);

        let _lock = PoolLock::acquire(&env, pool_id)?;
        rewards::update_pool(&env, pool_id)
    }

    /// Settle every pool. Anyone may call.
    pub fn mass_update_pools(env: Env) -> Result<(), ContractError> {
        storage::extend_instance_ttl(&env);
        Self::settle_all_pools(&env)
    }

    // ========== User Functions ==========

    /// Stake `amount` of the pool's token. Rewards earned so far by an
    /// existing position are carried in `pending_rewards`, not paid.
    pub fn deposit(env: Env, user: Address, pool_id: u32, amount: i128) -> Result<(), ContractError> {
        user.require_auth();
        Self::require_valid_pool(&env, pool_id)?;
        storage::extend_instance_ttl(&env);

        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        if storage::is_paused(&env) {
            return Err(ContractError::SystemPaused);
        }

        let bounds = storage::get_pool(&env, pool_id)?;
        let mut position = storage::get_position(&env, pool_id, &user);
        if amount < bounds.min_stake {
            return Err(ContractError::BelowMinimumStake);
        }
        let new_amount = position
            .amount
            .checked_add(amount)
            .ok_or(ContractError::MathOverflow)?;
        if new_amount > bounds.max_stake {
            return Err(ContractError::AboveMaximumStake);
        }

        let _lock = PoolLock::acquire(&env, pool_id)?;
        let mut pool = rewards::update_pool(&env, pool_id)?;

        if position.amount > 0 {
            let earned = rewards::unsettled(&pool, &position)?;
            position.pending_rewards += earned;
        }

        // Custody first: a failed pull aborts before any bookkeeping.
        Self::transfer(
            &env,
            &pool.stake_token,
            &user,
            &env.current_contract_address(),
            amount,
        )?;

        position.amount = new_amount;
        position.last_stake_time = env.ledger().timestamp();
        position.reward_debt = rewards::compute_reward_debt(new_amount, pool.acc_reward_per_share)?;
        pool.total_staked += amount;

        storage::set_pool(&env, pool_id, &pool);
        storage::set_position(&env, pool_id, &user, &position);

        events::publish_deposit(&env, user, pool_id, amount);
        Ok(())
    }

    /// Unstake `amount` and pay out everything owed. `amount == 0` only harvests.
    pub fn withdraw(env: Env, user: Address, pool_id: u32, amount: i128) -> Result<(), ContractError> {
        user.require_auth();
        Self::require_valid_pool(&env, pool_id)?;
        storage::extend_instance_ttl(&env);

        if amount < 0 {
            return Err(ContractError::InvalidAmount);
        }
        let mut position = storage::get_position(&env, pool_id, &user);
        if position.amount < amount {
            return Err(ContractError::InsufficientStakedBalance);
        }

        let _lock = PoolLock::acquire(&env, pool_id)?;
        let mut pool = rewards::update_pool(&env, pool_id)?;
        let pending = rewards::pending_of(&pool, &position)?;

        position.amount -= amount;
        position.reward_debt =
            rewards::compute_reward_debt(position.amount, pool.acc_reward_per_share)?;
        position.pending_rewards = 0;
        pool.total_staked -= amount;

        storage::set_pool(&env, pool_id, &pool);
        storage::set_position(&env, pool_id, &user, &position);

        if pending > 0 {
            let paid = Self::safe_reward_transfer(&env, &user, pending)?;
            events::publish_reward_paid(&env, user.clone(), pool_id, pending, paid);
        }
        if amount > 0 {
            Self::transfer(
                &env,
                &pool.stake_token,
                &env.current_contract_address(),
                &user,
                amount,
            )?;
        }

        events::publish_withdraw(&env, user, pool_id, amount);
        Ok(())
    }

    /// Pay out everything owed without touching the stake. Returns the amount paid.
    pub fn harvest(env: Env, user: Address, pool_id: u32) -> Result<i128, ContractError> {
        user.require_auth();
        Self::require_valid_pool(&env, pool_id)?;
        storage::extend_instance_ttl(&env);

        let _lock = PoolLock::acquire(&env, pool_id)?;
        let pool = rewards::update_pool(&env, pool_id)?;
        let mut position = storage::get_position(&env, pool_id, &user);
        let pending = rewards::pending_of(&pool, &position)?;
        if pending <= 0 {
            return Ok(0);
        }

        position.reward_debt =
            rewards::compute_reward_debt(position.amount, pool.acc_reward_per_share)?;
        position.pending_rewards = 0;
        storage::set_position(&env, pool_id, &user, &position);

        let paid = Self::safe_reward_transfer(&env, &user, pending)?;
        events::publish_reward_paid(&env, user, pool_id, pending, paid);
        Ok(paid)
    }

    /// Return the full stake and forfeit every unpaid reward. Skips settlement
    /// and the reward token entirely, so it works when rewards cannot be paid.
    /// Returns the amount of stake returned.
    pub fn emergency_withdraw(env: Env, user: Address, pool_id: u32) -> Result<i128, ContractError> {
        user.require_auth();
        Self::require_valid_pool(&env, pool_id)?;
        storage::extend_instance_ttl(&env);

        let _lock = PoolLock::acquire(&env, pool_id)?;
        let mut pool = storage::get_pool(&env, pool_id)?;
        let mut position = storage::get_position(&env, pool_id, &user);
        let amount = position.amount;

        pool.total_staked -= amount;
        position.amount = 0;
        position.reward_debt = 0;
        position.pending_rewards = 0;

        storage::set_pool(&env, pool_id, &pool);
        storage::set_position(&env, pool_id, &user, &position);

        if amount > 0 {
            Self::transfer(
                &env,
                &pool.stake_token,
                &env.current_contract_address(),
                &user,
                amount,
            )?;
        }

        events::publish_emergency_withdraw(&env, user, pool_id, amount);
        Ok(amount)
    }

    // ========== View Functions ==========

    /// Query unclaimed rewards for a user in a pool as if settled now.
    pub fn pending_reward(env: Env, pool_id: u32, user: Address) -> Result<i128, ContractError> {
        let pool = rewards::simulate_pool(&env, pool_id)?;
        let position = storage::get_position(&env, pool_id, &user);
        rewards::pending_of(&pool, &position)
    }

    /// Number of registered pools.
    pub fn get_pool_count(env: Env) -> u32 {
        storage::get_pool_count(&env)
    }

    /// Query pool state as last persisted.
    pub fn get_pool(env: Env, pool_id: u32) -> Result<Pool, ContractError> {
        storage::get_pool(&env, pool_id)
    }

    /// Query a user's position; absent positions read as zero.
    pub fn get_position(env: Env, pool_id: u32, user: Address) -> Position {
        storage::get_position(&env, pool_id, &user)
    }

    /// Reward-weighted ledger count between two ledgers.
    pub fn multiplier(env: Env, from: u64, to: u64) -> u64 {
        rewards::multiplier(
            from,
            to,
            storage::get_bonus_end_block(&env),
            storage::get_bonus_multiplier(&env),
        )
    }

    pub fn get_reward_rate(env: Env) -> i128 {
        storage::get_reward_rate(&env)
    }

    pub fn get_total_weight(env: Env) -> u64 {
        storage::get_total_weight(&env)
    }

    pub fn is_paused(env: Env) -> bool {
        storage::is_paused(&env)
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        storage::get_admin(&env)
    }

    /// Contract's reward token balance available for payouts.
    pub fn reward_balance(env: Env) -> Result<i128, ContractError> {
        let reward_token = storage::get_reward_token(&env)?;
        let token_client = token::Client::new(&env, &reward_token);
        Ok(token_client.balance(&env.current_contract_address()))
    }

    /// Rewards owed but not paid because the reserve ran short.
    pub fn reward_shortfall(env: Env) -> i128 {
        storage::get_reward_shortfall(&env)
    }

    // ========== Internal Helpers ==========

    fn require_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
        caller.require_auth();
        let admin = storage::get_admin(env)?;
        if *caller != admin {
            return Err(ContractError::UnauthorizedAdminAction);
        }
        Ok(())
    }

    fn require_valid_pool(env: &Env, pool_id: u32) -> Result<(), ContractError> {
        let count = storage::get_pool_count(env);
        if pool_id >= count {
            return Err(ContractError::InvalidPoolId);
        }
        Ok(())
    }

    fn require_valid_bounds(min_stake: i128, max_stake: i128) -> Result<(), ContractError> {
        if min_stake < 0 || max_stake <= 0 || min_stake > max_stake {
            return Err(ContractError::InvalidStakeBounds);
        }
        Ok(())
    }

    fn settle_all_pools(env: &Env) -> Result<(), ContractError> {
        for pool_id in 0..storage::get_pool_count(env) {
            let _lock = PoolLock::acquire(env, pool_id)?;
            rewards::update_pool(env, pool_id)?;
        }
        Ok(())
    }

    /// Pay up to `amount` of reward, clamped to the reserve. Returns what was
    /// paid; any remainder is recorded as shortfall instead of failing.
    fn safe_reward_transfer(env: &Env, to: &Address, amount: i128) -> Result<i128, ContractError> {
        let reward_token = storage::get_reward_token(env)?;
        let this = env.current_contract_address();
        let balance = match token::Client::new(env, &reward_token).try_balance(&this) {
            Ok(Ok(balance)) => balance,
            _ => return Err(ContractError::ExternalTransferFailed),
        };

        let paid = amount.min(balance).max(0);
        if paid > 0 {
            Self::transfer(env, &reward_token, &this, to, paid)?;
        }
        if paid < amount {
            storage::add_reward_shortfall(env, amount - paid);
            log!(env, "reward short-paid", to.clone(), amount, paid);
        }
        Ok(paid)
    }

    fn transfer(
        env: &Env,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        match token::Client::new(env, token).try_transfer(from, to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(ContractError::ExternalTransferFailed),
        }
    }
}
