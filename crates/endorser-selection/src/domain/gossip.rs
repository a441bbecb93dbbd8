//! # Gossip Messages
//!
//! The slice of the gossip wire model the selection subsystem consumes:
//! identity pull updates carrying peer certificates.

use super::errors::SelectionResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque gossip-layer peer identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PkiId(pub Vec<u8>);

impl PkiId {
    /// Wrap raw identifier bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }
}

impl fmt::Display for PkiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

/// Kind of pull-mediated gossip payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PullMsgType {
    /// Unset
    Undefined,
    /// Block dissemination
    Block,
    /// Peer identity dissemination
    Identity,
}

/// Signed gossip envelope; only the payload matters here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Encoded inner message
    pub payload: Vec<u8>,
    /// Signature over the payload
    pub signature: Vec<u8>,
}

/// Body of a gossip message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GossipContent {
    /// Pull-protocol data update
    DataUpdate {
        /// Payload kind
        msg_type: PullMsgType,
        /// Envelopes carried by the update
        data: Vec<Envelope>,
    },
    /// Liveness announcement
    AliveMsg {
        /// Announcing peer
        pki_id: PkiId,
    },
    /// Anything else
    Other,
}

/// A received gossip message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GossipMessage {
    /// Channel tag, empty for channel-less messages
    pub channel: Vec<u8>,
    /// Body
    pub content: GossipContent,
}

impl GossipMessage {
    /// Pull data update carrying peer identities.
    pub fn is_identity_update(&self) -> bool {
        matches!(
            self.content,
            GossipContent::DataUpdate {
                msg_type: PullMsgType::Identity,
                ..
            }
        )
    }

    /// Build an identity update from peer identities.
    pub fn identity_update(identities: &[PeerIdentity]) -> SelectionResult<Self> {
        let data = identities
            .iter()
            .map(|identity| {
                Ok(Envelope {
                    payload: bincode::serialize(identity)?,
                    signature: Vec::new(),
                })
            })
            .collect::<SelectionResult<Vec<_>>>()?;
        Ok(Self {
            channel: Vec::new(),
            content: GossipContent::DataUpdate {
                msg_type: PullMsgType::Identity,
                data,
            },
        })
    }
}

/// Identity of a peer as disseminated by gossip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerIdentity {
    /// Gossip identifier
    pub pki_id: PkiId,
    /// Encoded [`SerializedIdentity`]
    pub cert: Vec<u8>,
}

impl PeerIdentity {
    /// Build an identity for `pki_id` belonging to `msp_id`.
    pub fn new(pki_id: PkiId, msp_id: &str) -> SelectionResult<Self> {
        let cert = bincode::serialize(&SerializedIdentity {
            msp_id: msp_id.to_string(),
            id_bytes: Vec::new(),
        })?;
        Ok(Self { pki_id, cert })
    }

    /// Decode an identity from an envelope payload.
    pub fn from_envelope(envelope: &Envelope) -> SelectionResult<Self> {
        Ok(bincode::deserialize(&envelope.payload)?)
    }

    /// MSP the certificate belongs to.
    pub fn msp_id(&self) -> SelectionResult<String> {
        let identity: SerializedIdentity = bincode::deserialize(&self.cert)?;
        Ok(identity.msp_id)
    }
}

/// MSP-qualified identity bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedIdentity {
    /// Owning MSP
    pub msp_id: String,
    /// Certificate bytes
    pub id_bytes: Vec<u8>,
}
