use soroban_sdk::Env;

use crate::errors::ContractError;
use crate::storage::DataKey;

/// Exclusive hold on one pool for the duration of a state-changing call.
///
/// The flag lives in temporary storage and is cleared when the guard drops,
/// so every return path (including `?`) releases it. A token contract that
/// calls back into the same pool while the guard is held gets `PoolLocked`.
pub struct PoolLock {
    env: Env,
    key: DataKey,
}

impl PoolLock {
    pub fn acquire(env: &Env, pool_id: u32) -> Result<Self, ContractError> {
        let key = DataKey::Lock(pool_id);
        let storage = env.storage().temporary();
        if storage.has(&key) {
            return Err(ContractError::PoolLocked);
        }
        storage.set(&key, &true);
        Ok(Self {
            env: env.clone(),
            key,
        })
    }
}

impl Drop for PoolLock {
    fn drop(&mut self) {
        self.env.storage().temporary().remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LpFarmingContract;

    #[test]
    fn second_acquire_on_same_pool_fails() {
        let env = Env::default();
        let contract_id = env.register(LpFarmingContract, ());
        env.as_contract(&contract_id, || {
            let _held = PoolLock::acquire(&env, 0).unwrap();
            assert_eq!(
                PoolLock::acquire(&env, 0).err(),
                Some(ContractError::PoolLocked)
            );
            // Other pools stay available.
            assert!(PoolLock::acquire(&env, 1).is_ok());
        });
    }

    #[test]
    fn drop_releases_the_pool() {
        let env = Env::default();
        let contract_id = env.register(LpFarmingContract, ());
        env.as_contract(&contract_id, || {
            {
                let _held = PoolLock::acquire(&env, 3).unwrap();
            }
            assert!(PoolLock::acquire(&env, 3).is_ok());
        });
    }
}
