//! Shared test harness: the engine wired to its in-memory adapters with a
//! manually advanced clock.

use shared_types::{Address, Amount, PoolId, Timestamp};
use staking_engine::{
    InMemoryEventBus, InMemoryTokenLedger, PoolRate, StakingAdminApi, StakingApi, StakingConfig,
    StakingDependencies, StakingService, StaticAuthorizer, TimeSource,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub const CUSTODY: Address = [0xEE; 20];
pub const ADMIN: Address = [0xAA; 20];
pub const START: u64 = 1_000_000;
pub const DURATION: u64 = 1_000;

pub fn addr(tag: u8) -> Address {
    let mut a = [0u8; 20];
    a[0] = tag;
    a
}

pub fn pool_id(tag: u8) -> PoolId {
    let mut id = [0u8; 20];
    id[0] = 0xF0;
    id[1] = tag;
    id
}

/// Manually advanced clock shared between the test and the engine.
#[derive(Clone)]
pub struct ManualClock(Arc<AtomicU64>);

impl ManualClock {
    pub fn starting_at(start: u64) -> Self {
        Self(Arc::new(AtomicU64::new(start)))
    }

    pub fn advance(&self, secs: u64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }

    pub fn set(&self, now: u64) {
        self.0.store(now, Ordering::SeqCst);
    }

    pub fn now(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Timestamp {
        self.0.load(Ordering::SeqCst)
    }
}

/// Test configuration: 1000s duration, 1% fee, 20% penalty, 10% fallback.
pub fn test_config() -> StakingConfig {
    StakingConfig {
        staking_duration_secs: DURATION,
        staking_fee_bps: 100,
        early_unstake_fee_bps: 2_000,
        reward_rate_bps: 1_000,
        max_migration_batch: 64,
    }
}

pub struct Harness {
    pub service: StakingService<InMemoryTokenLedger, StaticAuthorizer, InMemoryEventBus>,
    pub ledger: Arc<InMemoryTokenLedger>,
    pub events: Arc<InMemoryEventBus>,
    pub clock: ManualClock,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: StakingConfig) -> Self {
        let ledger = Arc::new(InMemoryTokenLedger::new(CUSTODY));
        let events = Arc::new(InMemoryEventBus::new());
        let authorizer = Arc::new(StaticAuthorizer::new([ADMIN]));
        let clock = ManualClock::starting_at(START);
        let service = StakingService::new(StakingDependencies {
            ledger_client: ledger.clone(),
            authorizer,
            events: events.clone(),
            custody: CUSTODY,
            config,
        })
        .expect("test config is valid")
        .with_time_source(Box::new(clock.clone()));
        Self {
            service,
            ledger,
            events,
            clock,
        }
    }

    pub async fn create_pool(&self, tag: u8, rate: PoolRate) -> PoolId {
        let id = pool_id(tag);
        self.service.create_pool(ADMIN, id, rate).await.unwrap();
        id
    }

    pub async fn fund_treasury(&self, amount: Amount) {
        self.ledger.credit(ADMIN, amount);
        self.service.fund_treasury(ADMIN, amount).await.unwrap();
    }

    pub async fn stake_as(&self, user: Address, pool: PoolId, amount: Amount) {
        self.ledger.credit(user, amount);
        self.service.stake(user, pool, amount).await.unwrap();
    }

    /// Total value visible to the test: listed accounts + custody + burned.
    /// Constant across every engine operation (value moves or burns, never
    /// appears or vanishes).
    pub fn total_value(&self, accounts: &[Address]) -> Amount {
        let held: Amount = accounts
            .iter()
            .map(|account| self.ledger.balance(account))
            .sum();
        held + self.ledger.custody_balance() + self.ledger.burned()
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
