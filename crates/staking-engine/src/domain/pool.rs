//! Pool entities and the insertion-ordered pool registry.

use super::error::{StakingError, StakingResult};
use serde::{Deserialize, Serialize};
use shared_types::{Amount, BasisPoints, PoolId, PoolSummary, Timestamp};
use std::collections::HashMap;

/// Yield rate configuration of a pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolRate {
    /// Fixed per-pool rate in basis points.
    Fixed(BasisPoints),
    /// The pool follows the global fallback rate in force during each
    /// accrual window.
    Global,
}

impl PoolRate {
    /// Resolve to concrete basis points against the global fallback.
    pub fn resolve(&self, global_bps: BasisPoints) -> BasisPoints {
        match self {
            Self::Fixed(bps) => *bps,
            Self::Global => global_bps,
        }
    }

    /// The fixed rate, if any.
    pub fn as_fixed(&self) -> Option<BasisPoints> {
        match self {
            Self::Fixed(bps) => Some(*bps),
            Self::Global => None,
        }
    }
}

/// A staking pool: a named bucket of staked principal with its own yield
/// rate. Pools are never destroyed, only drained to zero.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pool {
    pub id: PoolId,
    pub rate: PoolRate,
    /// Sum of all member principals currently in the pool.
    pub total_staked: Amount,
    /// Number of accounts with live principal.
    pub staker_count: u64,
    /// Timestamp of the last accrual settlement touching this pool.
    pub last_update: Timestamp,
    pub created_at: Timestamp,
}

impl Pool {
    pub fn new(id: PoolId, rate: PoolRate, now: Timestamp) -> Self {
        Self {
            id,
            rate,
            total_staked: 0,
            staker_count: 0,
            last_update: now,
            created_at: now,
        }
    }

    pub fn summary(&self) -> PoolSummary {
        PoolSummary {
            id: self.id,
            rate_bps: self.rate.as_fixed(),
            total_staked: self.total_staked,
            staker_count: self.staker_count,
            last_update: self.last_update,
            created_at: self.created_at,
        }
    }
}

/// Registry of pools, listable in insertion order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PoolRegistry {
    pools: HashMap<PoolId, Pool>,
    /// Insertion order for deterministic listing.
    order: Vec<PoolId>,
}

impl PoolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new pool. Fails if the id is already taken.
    pub fn register(&mut self, pool: Pool) -> StakingResult<()> {
        if self.pools.contains_key(&pool.id) {
            return Err(StakingError::DuplicatePool(pool.id));
        }
        self.order.push(pool.id);
        self.pools.insert(pool.id, pool);
        Ok(())
    }

    pub fn contains(&self, id: &PoolId) -> bool {
        self.pools.contains_key(id)
    }

    pub fn get(&self, id: &PoolId) -> Option<&Pool> {
        self.pools.get(id)
    }

    pub fn get_mut(&mut self, id: &PoolId) -> Option<&mut Pool> {
        self.pools.get_mut(id)
    }

    /// All pool ids in insertion order.
    pub fn ids(&self) -> &[PoolId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
