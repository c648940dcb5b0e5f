//! Reward accrual and fee arithmetic.
//!
//! All percentages are basis points over [`BASIS_POINT_SCALE`]. Integer
//! division truncates toward zero: residual fractional yield is forfeited,
//! not carried forward. Every multiplication is checked; overflow is
//! rejected, never wrapped.

use super::error::{StakingError, StakingResult};
use shared_types::{Amount, BasisPoints, BASIS_POINT_SCALE};

/// Reward accrued by `principal` at `rate_bps` over `elapsed_secs`, where the
/// rate is defined as the yield over one full `duration_secs` period:
///
/// ```text
/// increment = floor(principal * rate * elapsed / (duration * SCALE))
/// ```
///
/// Total over non-negative inputs; zero principal or zero elapsed time yields
/// zero, so settlement is idempotent when no time has passed.
pub fn reward_increment(
    principal: Amount,
    rate_bps: BasisPoints,
    elapsed_secs: u64,
    duration_secs: u64,
) -> StakingResult<Amount> {
    if principal == 0 || elapsed_secs == 0 {
        return Ok(0);
    }
    if duration_secs == 0 {
        return Err(StakingError::InvalidDuration);
    }

    let numerator = principal
        .checked_mul(rate_bps as Amount)
        .ok_or(StakingError::ArithmeticOverflow("reward numerator"))?
        .checked_mul(elapsed_secs as Amount)
        .ok_or(StakingError::ArithmeticOverflow("reward numerator"))?;

    // u64 * 10_000 always fits in u128
    let denominator = (duration_secs as Amount) * (BASIS_POINT_SCALE as Amount);

    Ok(numerator / denominator)
}

/// Fee taken from `amount` at `fee_bps`: `floor(amount * fee / SCALE)`.
///
/// With `fee_bps <= SCALE` the fee never exceeds the amount.
pub fn fee_amount(amount: Amount, fee_bps: BasisPoints) -> StakingResult<Amount> {
    let numerator = amount
        .checked_mul(fee_bps as Amount)
        .ok_or(StakingError::ArithmeticOverflow("fee numerator"))?;
    Ok(numerator / BASIS_POINT_SCALE as Amount)
}
