//! In-memory adapters for the engine's outbound ports.

pub mod authorizer;
pub mod event_bus;
pub mod memory_ledger;

pub use authorizer::StaticAuthorizer;
pub use event_bus::InMemoryEventBus;
pub use memory_ledger::InMemoryTokenLedger;
