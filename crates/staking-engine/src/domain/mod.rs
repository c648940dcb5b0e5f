//! Domain model of the staking engine.
//!
//! Pure data and arithmetic: no ports, no locks, no IO. The service layer
//! drives these types under its own synchronization.

pub mod accrual;
pub mod config;
pub mod error;
pub mod ledger;
pub mod migration;
pub mod pool;
pub mod position;

pub use config::StakingConfig;
pub use error::{StakingError, StakingResult};
pub use ledger::{ExitReceipt, SettleReceipt, StakeLedger};
pub use migration::MigrationProgress;
pub use pool::{Pool, PoolRate, PoolRegistry};
pub use position::{PoolStake, PositionBook, UserPosition};
