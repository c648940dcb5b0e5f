//! # Shared Types Crate
//!
//! This crate contains the primitive types and cross-crate query summaries
//! used by the staking engine and its clients.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate types are defined here.
//! - **Fixed-Point Percentages**: Fees and rates are basis points over
//!   [`BASIS_POINT_SCALE`]; there is exactly one scale in the system.
//! - **Integer Amounts**: All value amounts are non-negative `u128` in the
//!   ledger's base unit; no decimal scaling is assumed.

pub mod entities;
pub mod summaries;

pub use entities::*;
pub use summaries::*;
