//! # Staking Metrics
//!
//! Prometheus metrics for monitoring engine activity.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! staking-engine = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `staking_stakes_total` - Counter of successful stake entries
//! - `staking_exits_total` - Counter of exits (by kind)
//! - `staking_rejections_total` - Counter of rejected operations (by reason)
//! - `staking_rewards_paid_total` - Running total of reward value paid out

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_counter, register_counter_vec, register_int_counter, Counter, CounterVec, IntCounter};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Total successful stake entries
    pub static ref STAKES_TOTAL: IntCounter = register_int_counter!(
        "staking_stakes_total",
        "Total number of successful stake entries"
    )
    .expect("Failed to create STAKES_TOTAL metric");

    /// Total exits, labeled by kind (unstake / early_unstake)
    pub static ref EXITS_TOTAL: CounterVec = register_counter_vec!(
        "staking_exits_total",
        "Total number of exits",
        &["kind"]
    )
    .expect("Failed to create EXITS_TOTAL metric");

    /// Total rejected operations, labeled by reason
    pub static ref REJECTIONS_TOTAL: CounterVec = register_counter_vec!(
        "staking_rejections_total",
        "Total number of rejected operations",
        &["reason"]
    )
    .expect("Failed to create REJECTIONS_TOTAL metric");

    /// Running total of reward value paid out
    pub static ref REWARDS_PAID_TOTAL: Counter = register_counter!(
        "staking_rewards_paid_total",
        "Total reward value paid out, in base units"
    )
    .expect("Failed to create REWARDS_PAID_TOTAL metric");
}

/// Record a successful stake entry
#[cfg(feature = "metrics")]
pub fn record_stake() {
    STAKES_TOTAL.inc();
}

/// Record an exit with its kind
#[cfg(feature = "metrics")]
pub fn record_exit(kind: &str) {
    EXITS_TOTAL.with_label_values(&[kind]).inc();
}

/// Record a rejected operation with its reason
#[cfg(feature = "metrics")]
pub fn record_rejection(reason: &str) {
    REJECTIONS_TOTAL.with_label_values(&[reason]).inc();
}

/// Record reward value paid out
#[cfg(feature = "metrics")]
pub fn record_rewards_paid(amount: u128) {
    REWARDS_PAID_TOTAL.inc_by(amount as f64);
}

// No-op implementations when metrics feature is disabled
#[cfg(not(feature = "metrics"))]
pub fn record_stake() {}

#[cfg(not(feature = "metrics"))]
pub fn record_exit(_kind: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_rejection(_reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_rewards_paid(_amount: u128) {}
