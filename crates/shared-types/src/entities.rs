//! # Core Primitive Types
//!
//! Defines the primitive identity, value, and time types used across the
//! workspace.
//!
//! ## Clusters
//!
//! - **Identity**: `Address`, `PoolId`
//! - **Value**: `Amount`, `BasisPoints`, `BASIS_POINT_SCALE`
//! - **Time**: `Timestamp`

/// A 20-byte Ethereum-style address.
///
/// Accounts and pools are both keyed by addresses; a pool id is simply an
/// address reserved for that pool.
pub type Address = [u8; 20];

/// Identifier of a staking pool (an address-like key, unique per pool).
pub type PoolId = Address;

/// A value amount in the ledger's base unit.
///
/// `u128` leaves ample headroom above any realistic token supply; all
/// arithmetic on amounts is explicitly checked, never wrapping.
pub type Amount = u128;

/// A unix timestamp in seconds.
pub type Timestamp = u64;

/// A percentage expressed in basis points (1 bp = 0.01%).
pub type BasisPoints = u32;

/// The fixed-point denominator for all fee and rate percentages.
///
/// 10 000 basis points = 100%. Every percentage in the system is scaled by
/// this single denominator.
pub const BASIS_POINT_SCALE: u32 = 10_000;

/// Render an address as `0x`-prefixed lowercase hex.
pub fn display_address(addr: &Address) -> String {
    let mut out = String::with_capacity(2 + addr.len() * 2);
    out.push_str("0x");
    for byte in addr {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
