//! Error types for the staking engine.

use shared_types::{display_address, Address, Amount, BasisPoints, PoolId, Timestamp};

/// Staking engine error taxonomy.
///
/// Every error is surfaced synchronously to the immediate caller; nothing is
/// retried internally. When an operation fails, no state mutation survives.
#[derive(Debug, thiserror::Error)]
pub enum StakingError {
    #[error("amount must be greater than zero")]
    ZeroAmount,

    #[error("pool already registered: {}", display_address(.0))]
    DuplicatePool(PoolId),

    #[error("invalid rate: {0} basis points")]
    InvalidRate(BasisPoints),

    #[error("invalid fee: {bps} basis points exceeds scale {scale}")]
    InvalidFee { bps: BasisPoints, scale: BasisPoints },

    #[error("staking duration must be greater than zero")]
    InvalidDuration,

    #[error("pool not found: {}", display_address(.0))]
    PoolNotFound(PoolId),

    #[error("pool not empty: {} has {total_staked} staked", display_address(.pool))]
    PoolNotEmpty { pool: PoolId, total_staked: Amount },

    #[error("insufficient stake in pool {}", display_address(.pool))]
    InsufficientStake { pool: PoolId },

    #[error("lock not matured: matures at {matures_at}, now {now}")]
    LockNotMatured { matures_at: Timestamp, now: Timestamp },

    #[error("insufficient ledger balance: have {balance}, need {required}")]
    InsufficientBalance { balance: Amount, required: Amount },

    #[error("reward treasury exhausted: have {available}, need {required}")]
    TreasuryExhausted { available: Amount, required: Amount },

    #[error("arithmetic overflow in {0}")]
    ArithmeticOverflow(&'static str),

    #[error("unauthorized: {} is not an admin", display_address(.0))]
    Unauthorized(Address),

    #[error("staking is paused")]
    Paused,

    #[error(
        "operation already in flight for {} in pool {}",
        display_address(.account),
        display_address(.pool)
    )]
    OperationInFlight { account: Address, pool: PoolId },

    #[error("migration cursor {cursor} out of range: pool has {members} members")]
    InvalidCursor { cursor: usize, members: usize },

    #[error("ledger error: {0}")]
    Ledger(String),
}

/// Result type for staking operations.
pub type StakingResult<T> = Result<T, StakingError>;
