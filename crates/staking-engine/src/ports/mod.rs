//! Ports of the staking engine: inbound APIs and outbound dependencies.

pub mod inbound;
pub mod outbound;

pub use inbound::{StakingAdminApi, StakingApi};
pub use outbound::{Authorizer, EventSink, SystemTimeSource, TimeSource, TokenLedger};
