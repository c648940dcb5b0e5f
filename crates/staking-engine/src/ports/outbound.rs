//! Driven ports (outbound dependencies).

use crate::events::StakingEvent;
use async_trait::async_trait;
use shared_types::{Address, Amount, Timestamp};

/// The fungible-value ledger the engine moves value through.
///
/// Assumed atomic and non-reentrant from the engine's perspective per call.
/// A failed call aborts the enclosing engine operation; the engine commits
/// its own state before the outbound payout transfer and rolls the deltas
/// back when a call fails.
#[async_trait]
pub trait TokenLedger: Send + Sync {
    /// Current balance of an account.
    async fn balance_of(&self, account: Address) -> Result<Amount, String>;

    /// Move value between two accounts (requires the payer's authorization
    /// at the ledger; the engine uses this to pull principal into custody).
    async fn transfer_from(
        &self,
        payer: Address,
        payee: Address,
        amount: Amount,
    ) -> Result<(), String>;

    /// Move value out of the engine's custody account.
    async fn transfer(&self, payee: Address, amount: Amount) -> Result<(), String>;

    /// Permanently destroy value held in the engine's custody account.
    async fn burn(&self, amount: Amount) -> Result<(), String>;
}

/// Capability check for the admin surface.
///
/// Modeled as a predicate so finer-grained roles can be added without
/// touching the accrual/exit logic.
pub trait Authorizer: Send + Sync {
    fn is_admin(&self, caller: &Address) -> bool;
}

/// Sink for published events. Delivery failures are logged, never fatal:
/// events are observability, not behavior.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn publish(&self, event: StakingEvent) -> Result<(), String>;
}

/// Time source for accrual windows and lock maturity.
pub trait TimeSource: Send + Sync {
    /// Current unix timestamp in seconds.
    fn now(&self) -> Timestamp;
}

/// Default time source using system time.
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}
