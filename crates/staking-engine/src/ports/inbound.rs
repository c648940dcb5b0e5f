//! Driving ports (inbound API).

use crate::domain::{MigrationProgress, PoolRate, StakingResult};
use async_trait::async_trait;
use shared_types::{Address, Amount, BasisPoints, PoolId, PoolSummary, PositionSummary};

/// Primary staking API.
#[async_trait]
pub trait StakingApi: Send + Sync {
    /// Lock `amount` of the caller's value into `pool`.
    ///
    /// Settles accrual first, pulls the principal into custody, burns the
    /// entry fee from the fee allowance, and restarts the lock for this
    /// (caller, pool) only.
    async fn stake(&self, caller: Address, pool: PoolId, amount: Amount) -> StakingResult<()>;

    /// Withdraw the caller's full principal plus accrued rewards, net of the
    /// ordinary fee. Only available once the lock has matured.
    ///
    /// Returns the payout delivered to the caller.
    async fn unstake(&self, caller: Address, pool: PoolId) -> StakingResult<Amount>;

    /// Withdraw before the lock matures, paying the early-unstake penalty
    /// instead of the ordinary fee.
    async fn early_unstake(&self, caller: Address, pool: PoolId) -> StakingResult<Amount>;

    /// Read-only projection of the reward the stake would earn if settled
    /// now; mutates nothing.
    async fn pending_reward(&self, account: Address, pool: PoolId) -> StakingResult<Amount>;

    /// The caller's overall position, if any.
    async fn position(&self, account: Address) -> Option<PositionSummary>;

    /// One pool's summary, if registered.
    async fn pool(&self, pool: PoolId) -> Option<PoolSummary>;

    /// All pool ids, in insertion order.
    async fn list_pools(&self) -> Vec<PoolId>;
}

/// Administrative control surface. Every operation requires the authorizer's
/// admin capability.
#[async_trait]
pub trait StakingAdminApi: Send + Sync {
    /// Register a new pool.
    async fn create_pool(
        &self,
        caller: Address,
        pool: PoolId,
        rate: PoolRate,
    ) -> StakingResult<()>;

    /// Change an EMPTY pool's rate. Live principal must be migrated instead.
    async fn update_pool_rate(
        &self,
        caller: Address,
        pool: PoolId,
        rate: PoolRate,
    ) -> StakingResult<()>;

    /// Migrate one batch of a pool's stakers to a new rate: settle each at
    /// their stamped old rate, then restamp. All-or-nothing per user,
    /// resumable via the returned cursor.
    async fn migrate_pool(
        &self,
        caller: Address,
        pool: PoolId,
        new_rate: PoolRate,
        cursor: usize,
        limit: usize,
    ) -> StakingResult<MigrationProgress>;

    /// Change the lock/normalization period. Settles every live stake at
    /// the old duration first.
    async fn set_staking_duration(&self, caller: Address, duration_secs: u64) -> StakingResult<()>;

    async fn set_staking_fee(&self, caller: Address, fee_bps: BasisPoints) -> StakingResult<()>;

    async fn set_early_unstake_fee(
        &self,
        caller: Address,
        fee_bps: BasisPoints,
    ) -> StakingResult<()>;

    /// Change the global fallback rate. Settles every follows-global stake
    /// at the old rate first; settled rewards are never recomputed.
    async fn set_reward_rate(&self, caller: Address, rate_bps: BasisPoints) -> StakingResult<()>;

    /// Pause or resume stake entry. Exits and queries always work.
    async fn set_paused(&self, caller: Address, paused: bool) -> StakingResult<()>;

    /// Pull `amount` from the caller into custody and credit the reward
    /// treasury / fee allowance.
    async fn fund_treasury(&self, caller: Address, amount: Amount) -> StakingResult<()>;
}
