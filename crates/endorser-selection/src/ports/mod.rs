//! # Ports Layer - Hexagonal Architecture Boundaries
//!
//! - **Driving Ports (Inbound):** the selection API offered to callers
//! - **Driven Ports (Outbound):** chaincode data, membership and
//!   load-balancing collaborators supplied by the host

pub mod inbound;
pub mod outbound;

pub use inbound::EndorserSelectionApi;
pub use outbound::{
    ChaincodeDataProvider, GossipView, LoadBalancePolicy, MembershipManager, MembershipSource,
    MockChaincodeDataProvider, MockMembershipSource, StaticMembershipManager,
};
