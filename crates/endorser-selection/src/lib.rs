//! # Endorser Selection
//!
//! Picks the set of peers whose endorsements satisfy the endorsement policies
//! of one or more chaincodes, using live channel membership.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure types, no I/O
//!   - `Item` / `Group` / `GroupOfGroups` / `PeerGroup`: policy algebra terms
//!   - `SignaturePolicyEnvelope`: encoded endorsement policy
//!   - `SelectionConfig`: configuration with validation
//!
//! - **Algorithms Layer** (`algorithms/`)
//!   - Group algebra: `and`, `nof`, `reduce`, `collapse`
//!   - `SignaturePolicyCompiler`: policy tree to group algebra
//!   - `PeerGroupResolver`: alternatives to one concrete peer group
//!   - `RandomLbp` / `RoundRobinLbp`: load-balance policies
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `EndorserSelectionApi`: Driving port (inbound API)
//!   - `ChaincodeDataProvider`, `MembershipManager`, `GossipView`,
//!     `LoadBalancePolicy`: Driven ports
//!
//! - **Adapters Layer** (`adapters/`)
//!   - `MembershipCache`: TTL-bounded membership with stale fallback
//!   - `CachedChaincodeDataProvider`: chaincode data cache
//!   - `PkiIdMspMapper`: PKI ID to MSP table fed by identity gossip
//!   - `GossipMembershipSource`: gossip members as peers
//!
//! - **Service Layer** (`service/`)
//!   - `SelectionService`: resolver cache, implements `EndorserSelectionApi`
//!   - `SelectionContext`: composition root
//!
//! ## Invariants
//!
//! - At most one resolver is built per `(channel, sorted chaincodes)` key.
//! - No live peers for a required organization yields an empty endorser
//!   list, never an error.
//! - Unknown PKI IDs map to an empty MSP ID, never an error.
//!
//! ## Usage Example
//!
//! ```ignore
//! use endorser_selection::{SelectionConfig, SelectionContext, EndorserSelectionApi};
//! use std::sync::Arc;
//!
//! let ctx = SelectionContext::new(gossip_view, chaincode_provider, SelectionConfig::from_env()?)?;
//! ctx.start_identity_listener(identity_messages);
//!
//! let endorsers = ctx.get_endorsers_for_chaincode("mychannel", &["asset", "token"])?;
//! ```

#![warn(missing_docs)]

pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::{
    CachedChaincodeDataProvider, ExpiringRef, GossipMembershipSource, MembershipCache,
    PkiIdMspMapper,
};
pub use algorithms::{PeerGroupResolver, RandomLbp, RoundRobinLbp, SignaturePolicyCompiler};
pub use domain::{
    ChaincodeData, ChannelMembership, ErrorKind, EventSource, Group, GroupOfGroups, Item,
    LoadBalanceKind, Peer, PeerGroup, PeerRetriever, SelectionConfig, SelectionError,
    SelectionResult, SignaturePolicyEnvelope,
};
pub use ports::{
    ChaincodeDataProvider, EndorserSelectionApi, GossipView, LoadBalancePolicy,
    MembershipManager, MembershipSource,
};
pub use service::{SelectionContext, SelectionService};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
