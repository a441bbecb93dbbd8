//! # Domain Layer - Endorser Selection
//!
//! Pure types shared by every other layer.
//!
//! ## Components
//!
//! - `group`: Item / Group / GroupOfGroups / PeerGroup sum types
//! - `policy`: signature policy envelope and principal model
//! - `entities`: Peer, ChannelMembership, ChaincodeData, ResolverKey
//! - `gossip`: PKI IDs and identity-update gossip messages
//! - `config`: SelectionConfig and load-balance kinds
//! - `errors`: SelectionError enumeration

pub mod config;
pub mod entities;
pub mod errors;
pub mod gossip;
pub mod group;
pub mod policy;

pub use config::*;
pub use entities::*;
pub use errors::*;
pub use gossip::*;
pub use group::*;
pub use policy::{
    MspPrincipal, MspRole, MspRoleType, OrganizationUnit, PrincipalClassification,
    SignaturePolicy, SignaturePolicyEnvelope,
};
