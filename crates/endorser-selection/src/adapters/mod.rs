//! # Adapters Layer
//!
//! Caches and gossip plumbing implementing the outbound ports.

pub mod chaincode_cache;
pub mod expiring;
pub mod gossip_membership;
pub mod identity_mapper;
pub mod membership_cache;

pub use chaincode_cache::CachedChaincodeDataProvider;
pub use expiring::ExpiringRef;
pub use gossip_membership::GossipMembershipSource;
pub use identity_mapper::PkiIdMspMapper;
pub use membership_cache::MembershipCache;
