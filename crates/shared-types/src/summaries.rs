//! # Query Summaries
//!
//! Read-only projections returned by the engine's query endpoints. These are
//! the cross-crate DTOs: the engine produces them, clients and the test suite
//! consume them.

use crate::entities::{Address, Amount, BasisPoints, PoolId, Timestamp};
use serde::{Deserialize, Serialize};

/// Summary of a staking pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSummary {
    /// The pool identifier.
    pub id: PoolId,
    /// The pool's yield rate in basis points; `None` means the pool follows
    /// the global fallback rate.
    pub rate_bps: Option<BasisPoints>,
    /// Sum of all member principals currently in the pool.
    pub total_staked: Amount,
    /// Number of accounts with live principal in the pool.
    pub staker_count: u64,
    /// Timestamp of the last accrual settlement touching this pool.
    pub last_update: Timestamp,
    /// Timestamp the pool was registered.
    pub created_at: Timestamp,
}

/// Summary of one user's stake in one pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeSummary {
    /// The pool this stake is committed to.
    pub pool: PoolId,
    /// Principal currently committed.
    pub principal: Amount,
    /// Rate snapshot stamped at entry or migration; `None` follows the
    /// global fallback rate.
    pub rate_bps: Option<BasisPoints>,
    /// Lock start for this pool stake.
    pub staked_at: Timestamp,
    /// Start of the current accrual window.
    pub last_settled: Timestamp,
}

/// Summary of a user's overall position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSummary {
    /// The account this position belongs to.
    pub account: Address,
    /// Principal summed across all pools.
    pub total_staked: Amount,
    /// Accrued, unpaid reward.
    pub rewards: Amount,
    /// Per-pool stakes with live principal.
    pub stakes: Vec<StakeSummary>,
}
