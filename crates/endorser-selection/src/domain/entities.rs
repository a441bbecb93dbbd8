//! # Domain Entities
//!
//! Peers, membership snapshots and cache keys.

use super::errors::SelectionError;
use super::gossip::PkiId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A network peer as seen by the selection subsystem.
///
/// Immutable once built; shared read-only across caches and resolvers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Peer {
    /// Endpoint in `host:port` form
    pub url: String,
    /// Organization (MSP) the peer belongs to
    pub msp_id: String,
    /// Ledger height on the queried channel, when known
    pub ledger_height: Option<u64>,
    /// Roles advertised on the queried channel
    pub roles: Vec<String>,
}

impl Peer {
    /// Create a peer without channel metadata.
    pub fn new(url: impl Into<String>, msp_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            msp_id: msp_id.into(),
            ledger_height: None,
            roles: Vec::new(),
        }
    }

    /// Attach the channel ledger height.
    #[must_use]
    pub fn with_ledger_height(mut self, height: u64) -> Self {
        self.ledger_height = Some(height);
        self
    }

    /// Attach the channel roles.
    #[must_use]
    pub fn with_roles(mut self, roles: Vec<String>) -> Self {
        self.roles = roles;
        self
    }

    /// Host part of the endpoint (everything before the last `:`).
    pub fn host(&self) -> &str {
        let addr = self
            .url
            .split_once("://")
            .map_or(self.url.as_str(), |(_, rest)| rest);
        addr.rsplit_once(':').map_or(addr, |(host, _)| host)
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.url, self.msp_id)
    }
}

/// Snapshot of a channel's membership.
///
/// A populated `query_error` with non-empty `peers` is stale-but-usable; a
/// populated `query_error` with empty `peers` is a hard failure.
#[derive(Clone, Debug)]
pub struct ChannelMembership {
    /// Peers joined to the channel
    pub peers: Vec<Peer>,
    /// Failure of the most recent query, if any
    pub query_error: Option<SelectionError>,
    /// Whether membership is refreshed in the background
    pub polling_enabled: bool,
}

impl ChannelMembership {
    /// Whether the snapshot cannot be used at all.
    pub fn is_hard_failure(&self) -> bool {
        self.query_error.is_some() && self.peers.is_empty()
    }
}

/// Chaincode metadata returned by the chaincode data provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeData {
    /// Chaincode name
    pub name: String,
    /// Chaincode version
    pub version: String,
    /// Encoded `SignaturePolicyEnvelope`
    pub policy: Vec<u8>,
}

/// Gossip properties of a network member on a channel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemberProperties {
    /// Ledger height on the channel
    pub ledger_height: u64,
    /// Advertised roles
    pub roles: Vec<String>,
}

/// A member as reported by the gossip view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkMember {
    /// Advertised endpoint
    pub endpoint: String,
    /// Gossip-layer identifier
    pub pki_id: PkiId,
    /// Channel properties, present for channel queries
    pub properties: Option<MemberProperties>,
}

/// Cache key for resolvers: channel plus sorted chaincode IDs.
///
/// Equal for any ordering of the same chaincode IDs.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolverKey {
    channel_id: String,
    chaincode_ids: Vec<String>,
}

impl ResolverKey {
    /// Build a key, normalizing chaincode ID order.
    pub fn new<S: AsRef<str>>(channel_id: &str, chaincode_ids: &[S]) -> Self {
        let mut chaincode_ids: Vec<String> =
            chaincode_ids.iter().map(|id| id.as_ref().to_string()).collect();
        chaincode_ids.sort();
        Self {
            channel_id: channel_id.to_string(),
            chaincode_ids,
        }
    }

    /// Channel of this key.
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// Sorted chaincode IDs.
    pub fn chaincode_ids(&self) -> &[String] {
        &self.chaincode_ids
    }
}

impl fmt::Display for ResolverKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.channel_id, self.chaincode_ids.join(","))
    }
}

/// Peer picked for event registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventSource {
    /// The selected channel peer
    pub peer: Peer,
    /// Selected peer host combined with the local event port
    pub event_address: String,
}
