use soroban_sdk::{contracttype, symbol_short, Address, Env};

// ── Position events ─────────────────────────────────────────────────────────

/// Fired when a user adds stake to a pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositEvent {
    pub user: Address,
    pub pool_id: u32,
    pub amount: i128,
}

/// Fired when a user takes stake back out (amount may be zero).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawEvent {
    pub user: Address,
    pub pool_id: u32,
    pub amount: i128,
}

/// Fired when rewards are paid. `paid` falls short of `owed` only when the
/// reward reserve cannot cover the payout.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardPaidEvent {
    pub user: Address,
    pub pool_id: u32,
    pub owed: i128,
    pub paid: i128,
}

/// Fired when a user exits without rewards.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyWithdrawEvent {
    pub user: Address,
    pub pool_id: u32,
    pub amount: i128,
}

// ── Admin events ────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolAddedEvent {
    pub pool_id: u32,
    pub stake_token: Address,
    pub weight: u32,
    pub min_stake: i128,
    pub max_stake: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolWeightSetEvent {
    pub pool_id: u32,
    pub old_weight: u32,
    pub new_weight: u32,
    pub total_weight: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolBoundsSetEvent {
    pub pool_id: u32,
    pub min_stake: i128,
    pub max_stake: i128,
}

pub fn publish_deposit(env: &Env, user: Address, pool_id: u32, amount: i128) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), user.clone()),
        DepositEvent {
            user,
            pool_id,
            amount,
        },
    );
}

pub fn publish_withdraw(env: &Env, user: Address, pool_id: u32, amount: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), user.clone()),
        WithdrawEvent {
            user,
            pool_id,
            amount,
        },
    );
}

pub fn publish_reward_paid(env: &Env, user: Address, pool_id: u32, owed: i128, paid: i128) {
    env.events().publish(
        (symbol_short!("RWD_PAID"), user.clone()),
        RewardPaidEvent {
            user,
            pool_id,
            owed,
            paid,
        },
    );
}

pub fn publish_emergency_withdraw(env: &Env, user: Address, pool_id: u32, amount: i128) {
    env.events().publish(
        (symbol_short!("EMERG_WD"), user.clone()),
        EmergencyWithdrawEvent {
            user,
            pool_id,
            amount,
        },
    );
}

pub fn publish_pool_added(
    env: &Env,
    pool_id: u32,
    stake_token: Address,
    weight: u32,
    min_stake: i128,
    max_stake: i128,
) {
    env.events().publish(
        (symbol_short!("POOL_ADD"),),
        PoolAddedEvent {
            pool_id,
            stake_token,
            weight,
            min_stake,
            max_stake,
        },
    );
}

pub fn publish_pool_weight_set(
    env: &Env,
    pool_id: u32,
    old_weight: u32,
    new_weight: u32,
    total_weight: u64,
) {
    env.events().publish(
        (symbol_short!("POOL_WGT"),),
        PoolWeightSetEvent {
            pool_id,
            old_weight,
            new_weight,
            total_weight,
        },
    );
}

pub fn publish_pool_bounds_set(env: &Env, pool_id: u32, min_stake: i128, max_stake: i128) {
    env.events().publish(
        (symbol_short!("POOL_BND"),),
        PoolBoundsSetEvent {
            pool_id,
            min_stake,
            max_stake,
        },
    );
}

pub fn publish_reward_rate_set(env: &Env, old_rate: i128, new_rate: i128) {
    env.events()
        .publish((symbol_short!("RWD_RATE"),), (old_rate, new_rate));
}

pub fn publish_paused(env: &Env, paused: bool) {
    env.events().publish((symbol_short!("PAUSED"),), paused);
}

pub fn publish_admin_changed(env: &Env, old_admin: Address, new_admin: Address) {
    env.events()
        .publish((symbol_short!("ADMIN"), old_admin), new_admin);
}
