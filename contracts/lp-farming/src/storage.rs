use soroban_sdk::{contracttype, Address, Env};

use crate::errors::ContractError;

// Storage TTL constants (in ledgers, ~5 seconds each)
const INSTANCE_TTL_THRESHOLD: u32 = 17_280; // ~1 day
const INSTANCE_TTL_EXTEND: u32 = 518_400; // ~30 days
const PERSISTENT_TTL_THRESHOLD: u32 = 17_280; // ~1 day
const PERSISTENT_TTL_EXTEND: u32 = 518_400; // ~30 days

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    RewardToken,
    RewardRate,
    StartBlock,
    BonusEndBlock,
    BonusMultiplier,
    TotalWeight,
    Paused,
    PoolCount,
    RewardShortfall,
    Pool(u32),
    StakeTokenIndex(Address),
    Position(u32, Address),
    Lock(u32),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pool {
    pub stake_token: Address,
    pub weight: u32,
    pub last_accrual_block: u64,
    pub acc_reward_per_share: i128,
    pub total_staked: i128,
    pub min_stake: i128,
    pub max_stake: i128,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Position {
    pub amount: i128,
    pub reward_debt: i128,
    pub pending_rewards: i128,
    pub last_stake_time: u64,
}

/// Emission schedule shared by every pool.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Emission {
    pub reward_rate: i128,
    pub bonus_end_block: u64,
    pub bonus_multiplier: u64,
    pub total_weight: u64,
}

// --- Instance storage helpers (global config and registry counters) ---

pub fn has_admin(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Admin)
}

pub fn get_admin(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(ContractError::NotInitialized)
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
}

pub fn get_reward_token(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::RewardToken)
        .ok_or(ContractError::NotInitialized)
}

pub fn set_reward_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::RewardToken, token);
}

pub fn get_reward_rate(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::RewardRate)
        .unwrap_or(0)
}

pub fn set_reward_rate(env: &Env, rate: i128) {
    env.storage().instance().set(&DataKey::RewardRate, &rate);
}

pub fn get_start_block(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::StartBlock)
        .unwrap_or(0)
}

pub fn set_start_block(env: &Env, block: u64) {
    env.storage().instance().set(&DataKey::StartBlock, &block);
}

pub fn get_bonus_end_block(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::BonusEndBlock)
        .unwrap_or(0)
}

pub fn set_bonus_end_block(env: &Env, block: u64) {
    env.storage().instance().set(&DataKey::BonusEndBlock, &block);
}

pub fn get_bonus_multiplier(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::BonusMultiplier)
        .unwrap_or(1)
}

pub fn set_bonus_multiplier(env: &Env, multiplier: u64) {
    env.storage()
        .instance()
        .set(&DataKey::BonusMultiplier, &multiplier);
}

pub fn get_total_weight(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::TotalWeight)
        .unwrap_or(0)
}

pub fn set_total_weight(env: &Env, total: u64) {
    env.storage().instance().set(&DataKey::TotalWeight, &total);
}

pub fn get_emission(env: &Env) -> Emission {
    Emission {
        reward_rate: get_reward_rate(env),
        bonus_end_block: get_bonus_end_block(env),
        bonus_multiplier: get_bonus_multiplier(env),
        total_weight: get_total_weight(env),
    }
}

pub fn is_paused(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Paused)
        .unwrap_or(false)
}

pub fn set_paused(env: &Env, paused: bool) {
    env.storage().instance().set(&DataKey::Paused, &paused);
}

pub fn get_pool_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::PoolCount)
        .unwrap_or(0)
}

pub fn set_pool_count(env: &Env, count: u32) {
    env.storage().instance().set(&DataKey::PoolCount, &count);
}

pub fn get_reward_shortfall(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::RewardShortfall)
        .unwrap_or(0)
}

pub fn add_reward_shortfall(env: &Env, unpaid: i128) {
    let total = get_reward_shortfall(env).saturating_add(unpaid);
    env.storage()
        .instance()
        .set(&DataKey::RewardShortfall, &total);
}

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

// --- Persistent storage helpers (Pool, StakeTokenIndex, Position) ---

pub fn get_pool(env: &Env, pool_id: u32) -> Result<Pool, ContractError> {
    let key = DataKey::Pool(pool_id);
    let pool: Pool = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(ContractError::InvalidPoolId)?;
    extend_persistent(env, &key);
    Ok(pool)
}

pub fn set_pool(env: &Env, pool_id: u32, pool: &Pool) {
    let key = DataKey::Pool(pool_id);
    env.storage().persistent().set(&key, pool);
    extend_persistent(env, &key);
}

pub fn has_stake_token(env: &Env, stake_token: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::StakeTokenIndex(stake_token.clone()))
}

pub fn set_stake_token_index(env: &Env, stake_token: &Address, pool_id: u32) {
    let key = DataKey::StakeTokenIndex(stake_token.clone());
    env.storage().persistent().set(&key, &pool_id);
    extend_persistent(env, &key);
}

/// Positions are created lazily; an absent entry reads as the zero position.
pub fn get_position(env: &Env, pool_id: u32, user: &Address) -> Position {
    let key = DataKey::Position(pool_id, user.clone());
    match env.storage().persistent().get::<_, Position>(&key) {
        Some(position) => {
            extend_persistent(env, &key);
            position
        }
        None => Position::default(),
    }
}

pub fn set_position(env: &Env, pool_id: u32, user: &Address, position: &Position) {
    let key = DataKey::Position(pool_id, user.clone());
    env.storage().persistent().set(&key, position);
    extend_persistent(env, &key);
}

fn extend_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}
