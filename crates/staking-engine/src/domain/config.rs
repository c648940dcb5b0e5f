//! Engine configuration.

use super::error::{StakingError, StakingResult};
use serde::{Deserialize, Serialize};
use shared_types::{BasisPoints, BASIS_POINT_SCALE};

/// Global staking configuration, owned by the admin surface.
///
/// `staking_duration_secs` is both the minimum holding period before
/// penalty-free exit and the normalization period over which rates are
/// defined: a rate of 1000 bp yields 10% of principal over one full duration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingConfig {
    /// Minimum holding period and accrual normalization period, in seconds.
    pub staking_duration_secs: u64,
    /// Fee applied on ordinary unstake, and burned from the fee allowance on
    /// every stake entry.
    pub staking_fee_bps: BasisPoints,
    /// Penalty applied instead of the ordinary fee when the holding period
    /// has not elapsed.
    pub early_unstake_fee_bps: BasisPoints,
    /// Global fallback rate for pools that follow the global rate.
    pub reward_rate_bps: BasisPoints,
    /// Upper bound on users processed per migration batch.
    pub max_migration_batch: usize,
}

impl Default for StakingConfig {
    fn default() -> Self {
        Self {
            staking_duration_secs: 30 * 24 * 60 * 60,
            staking_fee_bps: 100,
            early_unstake_fee_bps: 2_000,
            reward_rate_bps: 1_000,
            max_migration_batch: 64,
        }
    }
}

impl StakingConfig {
    /// Reject malformed configuration before it reaches the ledger.
    pub fn validate(&self) -> StakingResult<()> {
        if self.staking_duration_secs == 0 {
            return Err(StakingError::InvalidDuration);
        }
        if self.staking_fee_bps > BASIS_POINT_SCALE {
            return Err(StakingError::InvalidFee {
                bps: self.staking_fee_bps,
                scale: BASIS_POINT_SCALE,
            });
        }
        if self.early_unstake_fee_bps > BASIS_POINT_SCALE {
            return Err(StakingError::InvalidFee {
                bps: self.early_unstake_fee_bps,
                scale: BASIS_POINT_SCALE,
            });
        }
        if self.reward_rate_bps == 0 {
            return Err(StakingError::InvalidRate(0));
        }
        Ok(())
    }
}
