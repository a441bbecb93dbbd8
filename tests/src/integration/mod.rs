//! # Integration Scenarios
//!
//! - `policy_scenarios`: policies compiled and resolved through the service
//! - `membership_flows`: gossip identities and membership feeding selection

pub mod membership_flows;
pub mod policy_scenarios;
