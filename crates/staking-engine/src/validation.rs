//! Stateless validation logic for staking requests.

use crate::domain::{PoolRate, StakingError, StakingResult};
use shared_types::{Amount, BasisPoints, Timestamp, BASIS_POINT_SCALE};

pub struct StakeValidator;

impl StakeValidator {
    pub fn validate_amount(amount: Amount) -> StakingResult<()> {
        if amount == 0 {
            return Err(StakingError::ZeroAmount);
        }
        Ok(())
    }

    /// A fixed rate of zero is malformed; `Global` is always acceptable
    /// because the global fallback is validated at configuration time.
    pub fn validate_rate(rate: &PoolRate) -> StakingResult<()> {
        if let PoolRate::Fixed(0) = rate {
            return Err(StakingError::InvalidRate(0));
        }
        Ok(())
    }

    pub fn validate_fee(fee_bps: BasisPoints) -> StakingResult<()> {
        if fee_bps > BASIS_POINT_SCALE {
            return Err(StakingError::InvalidFee {
                bps: fee_bps,
                scale: BASIS_POINT_SCALE,
            });
        }
        Ok(())
    }

    /// Ordinary unstake is only available once the holding period elapsed.
    pub fn validate_maturity(
        now: Timestamp,
        staked_at: Timestamp,
        duration_secs: u64,
    ) -> StakingResult<()> {
        let matures_at = staked_at.saturating_add(duration_secs);
        if now < matures_at {
            return Err(StakingError::LockNotMatured { matures_at, now });
        }
        Ok(())
    }
}
