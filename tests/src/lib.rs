//! # Endorser Selection Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Shared peers, policies and collaborators
//! └── integration/      # End-to-end selection scenarios
//!     ├── policy_scenarios.rs
//!     └── membership_flows.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p selection-tests
//!
//! # By category
//! cargo test -p selection-tests integration::policy_scenarios::
//!
//! # Benchmarks
//! cargo bench -p selection-tests
//! ```

pub mod fixtures;
pub mod integration;
