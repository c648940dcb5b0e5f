//! # staking-engine
//!
//! Ledger-backed, multi-pool staking engine for Stakehouse.
//!
//! ## Architecture
//!
//! Participants lock fungible value into named pools, accrue yield
//! proportional to stake size, elapsed time, and the pool's rate, and
//! withdraw principal plus yield net of fees (ordinary unstake) or penalties
//! (early unstake). Value movement is delegated to an external token ledger
//! behind the `TokenLedger` port; the engine owns only the stake accounting.
//!
//! ```text
//! caller ──→ [accrual settlement] ──→ [entry/exit processor] ──→ TokenLedger
//!                                           │
//!                                           ↓
//!                               [pool registry / stake ledger]
//!                                           │
//!                                           ↓
//!                                      [event sink]
//! ```
//!
//! Every mutating operation settles accrued reward before touching principal
//! or rate, so no reward window is ever priced against post-change values.
//! All engine state is committed before the outbound payout transfer, and a
//! failed ledger call rolls the committed deltas back.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use staking_engine::{StakingDependencies, StakingService, StakingConfig};
//! use staking_engine::ports::StakingApi;
//!
//! let service = StakingService::new(StakingDependencies {
//!     ledger_client,
//!     authorizer,
//!     events,
//!     custody,
//!     config: StakingConfig::default(),
//! })?;
//!
//! service.stake(caller, pool, 1_000).await?;
//! ```
//!
//! ## Concurrency
//!
//! Operations on disjoint (account, pool) pairs proceed in parallel; an
//! in-flight guard per pair rejects reentrant exits. Migration is batched
//! and resumable so no call holds the book for an unbounded user set.

pub mod adapters;
pub mod domain;
pub mod events;
pub mod metrics;
pub mod ports;
pub mod service;
pub mod state;
pub mod validation;

// Re-export main types
pub use adapters::{InMemoryEventBus, InMemoryTokenLedger, StaticAuthorizer};
pub use domain::{
    MigrationProgress, Pool, PoolRate, PoolStake, StakeLedger, StakingConfig, StakingError,
    StakingResult, UserPosition,
};
pub use events::StakingEvent;
pub use ports::{
    Authorizer, EventSink, StakingAdminApi, StakingApi, SystemTimeSource, TimeSource, TokenLedger,
};
pub use service::{StakingDependencies, StakingService};
pub use state::StakingState;
