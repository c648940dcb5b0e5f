//! Published events (outgoing).
//!
//! Events are observability only: consumers may index, display, or ignore
//! them, but no engine behavior depends on delivery.

use crate::domain::PoolRate;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, PoolId};

/// Everything the engine announces to the outside world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakingEvent {
    Staked {
        user: Address,
        pool: PoolId,
        amount: Amount,
        /// Entry fee burned from the fee allowance.
        fee: Amount,
    },
    Unstaked {
        user: Address,
        pool: PoolId,
        amount: Amount,
        fee: Amount,
    },
    EarlyUnstaked {
        user: Address,
        pool: PoolId,
        amount: Amount,
        penalty: Amount,
    },
    RewardPaid {
        user: Address,
        pool: PoolId,
        amount: Amount,
    },
    PoolCreated {
        pool: PoolId,
        rate: PoolRate,
    },
    PoolUpdated {
        pool: PoolId,
        rate: PoolRate,
    },
    StatisticsUpdated {
        pool: PoolId,
        total_staked: Amount,
        staker_count: u64,
    },
    TreasuryFunded {
        amount: Amount,
        /// Treasury balance after the deposit.
        treasury: Amount,
    },
}

impl StakingEvent {
    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Staked { .. } => "staked",
            Self::Unstaked { .. } => "unstaked",
            Self::EarlyUnstaked { .. } => "early_unstaked",
            Self::RewardPaid { .. } => "reward_paid",
            Self::PoolCreated { .. } => "pool_created",
            Self::PoolUpdated { .. } => "pool_updated",
            Self::StatisticsUpdated { .. } => "statistics_updated",
            Self::TreasuryFunded { .. } => "treasury_funded",
        }
    }
}
