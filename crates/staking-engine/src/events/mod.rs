//! Event payloads published by the engine.

pub mod published;

pub use published::StakingEvent;
