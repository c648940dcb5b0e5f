//! # Stakehouse Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── support.rs        # Shared harness (in-memory ports, manual clock)
//! │
//! ├── integration/      # End-to-end staking flows
//! │   ├── lifecycle.rs
//! │   └── migration.rs
//! │
//! └── adversarial/      # Hostile-input and value-extraction attempts
//!     └── value_extraction.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p stakehouse-tests
//!
//! # By category
//! cargo test -p stakehouse-tests integration::
//! cargo test -p stakehouse-tests adversarial::
//! ```

#![allow(dead_code)]

pub mod adversarial;
pub mod integration;
pub mod support;
