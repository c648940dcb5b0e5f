//! Mutable engine state.

use crate::domain::{StakeLedger, StakingConfig, StakingError, StakingResult};
use parking_lot::{Mutex, RwLock};
use shared_types::{Address, PoolId};
use std::collections::HashSet;

/// Encapsulates the mutable state of the staking engine: the stake ledger
/// book and the set of (account, pool) operations currently in flight.
///
/// The book is the only shared mutable state; every mutation happens inside
/// the settle-then-mutate sequence under the write lock. The in-flight set
/// rejects reentrant exits and keeps failed-ledger rollbacks race-free:
/// while a guard is held, no other operation can touch that (account, pool)
/// pair.
pub struct StakingState {
    pub ledger: RwLock<StakeLedger>,
    in_flight: Mutex<HashSet<(Address, PoolId)>>,
}

impl StakingState {
    pub fn new(config: StakingConfig) -> StakingResult<Self> {
        Ok(Self {
            ledger: RwLock::new(StakeLedger::new(config)?),
            in_flight: Mutex::new(HashSet::new()),
        })
    }

    /// Mark an (account, pool) operation in flight. Fails if one already is.
    pub fn try_begin(&self, account: Address, pool: PoolId) -> StakingResult<OpGuard<'_>> {
        let mut in_flight = self.in_flight.lock();
        if !in_flight.insert((account, pool)) {
            return Err(StakingError::OperationInFlight { account, pool });
        }
        Ok(OpGuard {
            state: self,
            key: (account, pool),
        })
    }

    /// Whether an operation is in flight for this pair (used by migration to
    /// stop a batch at a busy member).
    pub fn is_in_flight(&self, account: &Address, pool: &PoolId) -> bool {
        self.in_flight.lock().contains(&(*account, *pool))
    }
}

/// RAII marker for an in-flight (account, pool) operation.
pub struct OpGuard<'a> {
    state: &'a StakingState,
    key: (Address, PoolId),
}

impl Drop for OpGuard<'_> {
    fn drop(&mut self) {
        self.state.in_flight.lock().remove(&self.key);
    }
}
