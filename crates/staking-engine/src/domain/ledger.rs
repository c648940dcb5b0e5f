//! The stake ledger: pools, positions, configuration, and the reward
//! treasury, with the settle-then-mutate primitives every operation is built
//! from.
//!
//! Mutating primitives return receipts that let the service reverse a
//! committed delta when a downstream ledger call fails. Reversal is surgical
//! (deltas only), so concurrent operations on other users are never
//! clobbered.

use super::accrual;
use super::config::StakingConfig;
use super::error::{StakingError, StakingResult};
use super::pool::{PoolRate, PoolRegistry};
use super::position::PositionBook;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, PoolId, Timestamp};

/// Receipt of one accrual settlement, sufficient to reverse it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettleReceipt {
    /// Reward credited to the user's accumulator.
    pub increment: Amount,
    /// `last_settled` before the settlement; `None` when there was no stake
    /// record to settle.
    pub prev_last_settled: Option<Timestamp>,
    /// Pool `last_update` before the settlement.
    pub prev_pool_update: Option<Timestamp>,
}

impl SettleReceipt {
    fn empty() -> Self {
        Self {
            increment: 0,
            prev_last_settled: None,
            prev_pool_update: None,
        }
    }
}

/// Receipt of one committed exit, sufficient to reverse it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExitReceipt {
    pub principal: Amount,
    /// Rewards paid out (the user's whole accumulator at exit time).
    pub rewards: Amount,
    pub rate: PoolRate,
    pub staked_at: Timestamp,
    pub last_settled: Timestamp,
}

/// The engine's entire book: registry, positions, configuration, treasury.
///
/// The treasury is the engine's general fee allowance: it funds reward
/// payouts and the stake-entry fee burn. The custody account on the external
/// ledger always holds `sum of principals + treasury`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StakeLedger {
    pub pools: PoolRegistry,
    pub positions: PositionBook,
    pub config: StakingConfig,
    pub treasury: Amount,
    pub paused: bool,
}

impl StakeLedger {
    pub fn new(config: StakingConfig) -> StakingResult<Self> {
        config.validate()?;
        Ok(Self {
            pools: PoolRegistry::new(),
            positions: PositionBook::new(),
            config,
            treasury: 0,
            paused: false,
        })
    }

    /// The reward the stake would earn if settled at `now`, without mutating
    /// anything. Backwards clocks contribute zero elapsed time.
    pub fn projected_increment(
        &self,
        account: &Address,
        pool: &PoolId,
        now: Timestamp,
    ) -> StakingResult<Amount> {
        let Some(stake) = self.positions.stake(account, pool) else {
            return Ok(0);
        };
        let elapsed = now.saturating_sub(stake.last_settled);
        accrual::reward_increment(
            stake.principal,
            stake.rate.resolve(self.config.reward_rate_bps),
            elapsed,
            self.config.staking_duration_secs,
        )
    }

    /// Settle accrued reward for one (account, pool) stake up to `now`,
    /// crediting the user's accumulator and advancing the accrual window.
    ///
    /// Must run before any change to the stake's principal or rate; stale
    /// windows would otherwise be priced against post-change values.
    pub fn settle(
        &mut self,
        account: &Address,
        pool: &PoolId,
        now: Timestamp,
    ) -> StakingResult<SettleReceipt> {
        let increment = self.projected_increment(account, pool, now)?;

        let Some(stake) = self.positions.stake_mut(account, pool) else {
            return Ok(SettleReceipt::empty());
        };
        let prev_last_settled = stake.last_settled;
        // never move the window backwards under a stale clock
        stake.last_settled = stake.last_settled.max(now);

        let position = self
            .positions
            .position_mut(account)
            .expect("position exists for settled stake");
        position.rewards = position
            .rewards
            .checked_add(increment)
            .ok_or(StakingError::ArithmeticOverflow("reward accumulator"))?;

        let prev_pool_update = self.pools.get(pool).map(|p| p.last_update);
        if let Some(pool_entry) = self.pools.get_mut(pool) {
            pool_entry.last_update = pool_entry.last_update.max(now);
        }

        Ok(SettleReceipt {
            increment,
            prev_last_settled: Some(prev_last_settled),
            prev_pool_update,
        })
    }

    /// Reverse a settlement (failed-ledger rollback).
    pub fn unsettle(&mut self, account: &Address, pool: &PoolId, receipt: &SettleReceipt) {
        if let Some(prev) = receipt.prev_last_settled {
            if let Some(stake) = self.positions.stake_mut(account, pool) {
                stake.last_settled = prev;
            }
            if let Some(position) = self.positions.position_mut(account) {
                position.rewards = position.rewards.saturating_sub(receipt.increment);
            }
        }
        if let Some(prev) = receipt.prev_pool_update {
            if let Some(pool_entry) = self.pools.get_mut(pool) {
                pool_entry.last_update = prev;
            }
        }
    }

    /// Verify the additions a stake of `amount` would perform cannot
    /// overflow, before any external transfer is attempted.
    pub fn check_stake_capacity(
        &self,
        account: &Address,
        pool: &PoolId,
        amount: Amount,
    ) -> StakingResult<()> {
        let pool_entry = self
            .pools
            .get(pool)
            .ok_or(StakingError::PoolNotFound(*pool))?;
        pool_entry
            .total_staked
            .checked_add(amount)
            .ok_or(StakingError::ArithmeticOverflow("pool total"))?;
        if let Some(position) = self.positions.position(account) {
            position
                .total_staked
                .checked_add(amount)
                .ok_or(StakingError::ArithmeticOverflow("position total"))?;
            position
                .principal_in(pool)
                .checked_add(amount)
                .ok_or(StakingError::ArithmeticOverflow("stake principal"))?;
        }
        Ok(())
    }

    /// Commit a stake entry: increase principal and totals, restart the lock
    /// and accrual window for this (account, pool), restamp the rate from
    /// the pool's current configuration.
    pub fn apply_stake(
        &mut self,
        account: Address,
        pool: PoolId,
        amount: Amount,
        now: Timestamp,
    ) -> StakingResult<()> {
        let pool_rate = self
            .pools
            .get(&pool)
            .ok_or(StakingError::PoolNotFound(pool))?
            .rate;

        let stake = self.positions.ensure_stake(account, pool, pool_rate, now);
        let was_empty = stake.principal == 0;
        stake.principal = stake
            .principal
            .checked_add(amount)
            .ok_or(StakingError::ArithmeticOverflow("stake principal"))?;
        stake.rate = pool_rate;
        stake.staked_at = now;
        stake.last_settled = now;

        let position = self
            .positions
            .position_mut(&account)
            .expect("position exists after ensure_stake");
        position.total_staked = position
            .total_staked
            .checked_add(amount)
            .ok_or(StakingError::ArithmeticOverflow("position total"))?;

        let pool_entry = self
            .pools
            .get_mut(&pool)
            .expect("pool presence checked above");
        pool_entry.total_staked = pool_entry
            .total_staked
            .checked_add(amount)
            .ok_or(StakingError::ArithmeticOverflow("pool total"))?;
        if was_empty && amount > 0 {
            pool_entry.staker_count += 1;
        }
        pool_entry.last_update = pool_entry.last_update.max(now);
        Ok(())
    }

    /// Reverse a committed stake entry (failed-ledger rollback).
    pub fn revert_stake(&mut self, account: &Address, pool: &PoolId, amount: Amount) {
        let mut emptied = false;
        if let Some(stake) = self.positions.stake_mut(account, pool) {
            stake.principal = stake.principal.saturating_sub(amount);
            emptied = stake.principal == 0;
        }
        if let Some(position) = self.positions.position_mut(account) {
            position.total_staked = position.total_staked.saturating_sub(amount);
        }
        if let Some(pool_entry) = self.pools.get_mut(pool) {
            pool_entry.total_staked = pool_entry.total_staked.saturating_sub(amount);
            if emptied {
                pool_entry.staker_count = pool_entry.staker_count.saturating_sub(1);
            }
        }
    }

    /// Commit an exit: zero the pool stake and the reward accumulator,
    /// decrement the totals, and draw the rewards from the treasury.
    ///
    /// The caller must have settled first; the receipt carries everything
    /// needed to reverse the exit.
    pub fn apply_exit(
        &mut self,
        account: &Address,
        pool: &PoolId,
        now: Timestamp,
    ) -> StakingResult<ExitReceipt> {
        let stake = self
            .positions
            .stake(account, pool)
            .ok_or(StakingError::InsufficientStake { pool: *pool })?;
        if stake.principal == 0 {
            return Err(StakingError::InsufficientStake { pool: *pool });
        }
        let receipt = ExitReceipt {
            principal: stake.principal,
            rewards: self
                .positions
                .position(account)
                .map_or(0, |position| position.rewards),
            rate: stake.rate,
            staked_at: stake.staked_at,
            last_settled: stake.last_settled,
        };

        if self.treasury < receipt.rewards {
            return Err(StakingError::TreasuryExhausted {
                available: self.treasury,
                required: receipt.rewards,
            });
        }

        let stake = self
            .positions
            .stake_mut(account, pool)
            .expect("stake presence checked above");
        stake.principal = 0;

        let position = self
            .positions
            .position_mut(account)
            .expect("position presence checked above");
        position.total_staked = position
            .total_staked
            .checked_sub(receipt.principal)
            .ok_or(StakingError::ArithmeticOverflow("position total"))?;
        position.rewards = 0;

        self.treasury -= receipt.rewards;

        let pool_entry = self
            .pools
            .get_mut(pool)
            .ok_or(StakingError::PoolNotFound(*pool))?;
        pool_entry.total_staked = pool_entry
            .total_staked
            .checked_sub(receipt.principal)
            .ok_or(StakingError::ArithmeticOverflow("pool total"))?;
        pool_entry.staker_count = pool_entry.staker_count.saturating_sub(1);
        pool_entry.last_update = pool_entry.last_update.max(now);

        Ok(receipt)
    }

    /// Reverse a committed exit (failed-ledger rollback).
    pub fn revert_exit(&mut self, account: &Address, pool: &PoolId, receipt: &ExitReceipt) {
        if let Some(stake) = self.positions.stake_mut(account, pool) {
            stake.principal = receipt.principal;
            stake.rate = receipt.rate;
            stake.staked_at = receipt.staked_at;
            stake.last_settled = receipt.last_settled;
        }
        if let Some(position) = self.positions.position_mut(account) {
            position.total_staked = position.total_staked.saturating_add(receipt.principal);
            position.rewards = receipt.rewards;
        }
        self.treasury = self.treasury.saturating_add(receipt.rewards);
        if let Some(pool_entry) = self.pools.get_mut(pool) {
            pool_entry.total_staked = pool_entry.total_staked.saturating_add(receipt.principal);
            pool_entry.staker_count += 1;
        }
    }

    /// Settle every live stake up to `now` (duration changes must price the
    /// old window before the normalizer moves).
    pub fn settle_all(&mut self, now: Timestamp) -> StakingResult<()> {
        for (account, pool) in self.positions.stake_keys() {
            self.settle(&account, &pool, now)?;
        }
        Ok(())
    }

    /// Settle every live stake stamped with the follows-global rate (rate
    /// changes must price the old window before the rate moves).
    pub fn settle_global_rate_stakes(&mut self, now: Timestamp) -> StakingResult<()> {
        for (account, pool) in self.positions.stake_keys() {
            let follows_global = self
                .positions
                .stake(&account, &pool)
                .map_or(false, |stake| {
                    stake.principal > 0 && stake.rate == PoolRate::Global
                });
            if follows_global {
                self.settle(&account, &pool, now)?;
            }
        }
        Ok(())
    }

    pub fn treasury_credit(&mut self, amount: Amount) -> StakingResult<()> {
        self.treasury = self
            .treasury
            .checked_add(amount)
            .ok_or(StakingError::ArithmeticOverflow("treasury"))?;
        Ok(())
    }

    pub fn treasury_debit(&mut self, amount: Amount) -> StakingResult<()> {
        if self.treasury < amount {
            return Err(StakingError::TreasuryExhausted {
                available: self.treasury,
                required: amount,
            });
        }
        self.treasury -= amount;
        Ok(())
    }

    /// Every pool total must equal the sum of its member principals, and
    /// every staker count must match the number of live members.
    pub fn is_consistent(&self) -> bool {
        self.pools.ids().iter().all(|id| {
            let Some(pool) = self.pools.get(id) else {
                return false;
            };
            let live_members = self
                .positions
                .members(id)
                .iter()
                .filter(|account| {
                    self.positions
                        .position(account)
                        .map_or(0, |position| position.principal_in(id))
                        > 0
                })
                .count() as u64;
            pool.total_staked == self.positions.staked_total_in(id)
                && pool.staker_count == live_members
        })
    }
}
