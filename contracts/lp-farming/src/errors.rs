use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    UnauthorizedAdminAction = 3,
    InvalidPoolId = 4,
    PoolAlreadyExists = 5,
    BelowMinimumStake = 6,
    AboveMaximumStake = 7,
    InsufficientStakedBalance = 8,
    SystemPaused = 9,
    ExternalTransferFailed = 10,
    InvalidAmount = 11,
    InvalidStakeBounds = 12,
    InvalidConfig = 13,
    StakeTokenIsRewardToken = 14,
    /// A state-changing call re-entered a pool that is mid-operation.
    PoolLocked = 15,
    MathOverflow = 16,
}
