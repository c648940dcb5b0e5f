//! Per-user stake accounting.

use super::pool::PoolRate;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, PoolId, PositionSummary, StakeSummary, Timestamp};
use std::collections::HashMap;

/// One user's stake in a single pool.
///
/// The record is created on first stake and retained with zero principal
/// after a full exit, so per-pool membership indices never shift.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStake {
    /// Principal currently committed to this pool.
    pub principal: Amount,
    /// Rate snapshot stamped at entry or migration time. Stakes in a
    /// partially-migrated pool keep accruing at their stamped rate until
    /// their migration batch restamps them.
    pub rate: PoolRate,
    /// Lock start for this pool stake only; a stake into another pool never
    /// touches it.
    pub staked_at: Timestamp,
    /// Start of the current accrual window.
    pub last_settled: Timestamp,
}

impl PoolStake {
    pub fn summary(&self, pool: PoolId) -> StakeSummary {
        StakeSummary {
            pool,
            principal: self.principal,
            rate_bps: self.rate.as_fixed(),
            staked_at: self.staked_at,
            last_settled: self.last_settled,
        }
    }
}

/// A user's overall position: per-pool stakes plus the global reward
/// accumulator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPosition {
    /// Principal summed across all pools.
    pub total_staked: Amount,
    /// Accrued, unpaid reward. Non-decreasing between settlements; reset to
    /// zero on payout.
    pub rewards: Amount,
    pub stakes: HashMap<PoolId, PoolStake>,
}

impl UserPosition {
    pub fn stake_in(&self, pool: &PoolId) -> Option<&PoolStake> {
        self.stakes.get(pool)
    }

    /// Live principal in one pool (zero when never staked or fully exited).
    pub fn principal_in(&self, pool: &PoolId) -> Amount {
        self.stakes.get(pool).map_or(0, |stake| stake.principal)
    }

    pub fn summary(&self, account: Address) -> PositionSummary {
        let mut stakes: Vec<StakeSummary> = self
            .stakes
            .iter()
            .filter(|(_, stake)| stake.principal > 0)
            .map(|(pool, stake)| stake.summary(*pool))
            .collect();
        stakes.sort_by_key(|stake| stake.pool);
        PositionSummary {
            account,
            total_staked: self.total_staked,
            rewards: self.rewards,
            stakes,
        }
    }
}

/// All user positions plus a stable per-pool membership index.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PositionBook {
    positions: HashMap<Address, UserPosition>,
    /// Per-pool membership in first-stake order. Append-only: exited members
    /// keep a zero-principal stake record, so a migration cursor taken
    /// before an exit stays valid.
    members: HashMap<PoolId, Vec<Address>>,
}

impl PositionBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self, account: &Address) -> Option<&UserPosition> {
        self.positions.get(account)
    }

    pub fn position_mut(&mut self, account: &Address) -> Option<&mut UserPosition> {
        self.positions.get_mut(account)
    }

    /// The pool's membership index, in first-stake order.
    pub fn members(&self, pool: &PoolId) -> &[Address] {
        self.members.get(pool).map_or(&[], Vec::as_slice)
    }

    /// Fetch the stake record for (account, pool), creating the position and
    /// a zero stake record (and the membership entry) on first contact.
    pub fn ensure_stake(
        &mut self,
        account: Address,
        pool: PoolId,
        rate: PoolRate,
        now: Timestamp,
    ) -> &mut PoolStake {
        let position = self.positions.entry(account).or_default();
        if !position.stakes.contains_key(&pool) {
            position.stakes.insert(
                pool,
                PoolStake {
                    principal: 0,
                    rate,
                    staked_at: now,
                    last_settled: now,
                },
            );
            self.members.entry(pool).or_default().push(account);
        }
        position
            .stakes
            .get_mut(&pool)
            .expect("stake record just ensured")
    }

    pub fn stake(&self, account: &Address, pool: &PoolId) -> Option<&PoolStake> {
        self.positions
            .get(account)
            .and_then(|position| position.stakes.get(pool))
    }

    pub fn stake_mut(&mut self, account: &Address, pool: &PoolId) -> Option<&mut PoolStake> {
        self.positions
            .get_mut(account)
            .and_then(|position| position.stakes.get_mut(pool))
    }

    /// Iterate every (account, pool) pair with a stake record.
    pub fn stake_keys(&self) -> Vec<(Address, PoolId)> {
        self.positions
            .iter()
            .flat_map(|(account, position)| {
                position.stakes.keys().map(move |pool| (*account, *pool))
            })
            .collect()
    }

    /// Sum of member principals in one pool, for invariant checks.
    pub fn staked_total_in(&self, pool: &PoolId) -> Amount {
        self.members(pool)
            .iter()
            .map(|account| {
                self.positions
                    .get(account)
                    .map_or(0, |position| position.principal_in(pool))
            })
            .sum()
    }
}
