//! # Domain Errors
//!
//! Error types for the endorser selection subsystem.

use thiserror::Error;

/// Coarse classification of a [`SelectionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller supplied something unusable (empty chaincode list, bad threshold,
    /// unsupported principal, missing policy).
    InvalidInput,
    /// A collaborator (chaincode data, membership) failed.
    UpstreamFailure,
    /// Policy or identity bytes could not be decoded.
    UnmarshalFailure,
    /// The query succeeded but produced nothing usable.
    NotFound,
}

/// Endorser selection errors.
#[derive(Debug, Clone, Error)]
pub enum SelectionError {
    /// No chaincode IDs were given.
    #[error("at least one chaincode ID is required")]
    NoChaincodes,

    /// `n`-out-of threshold is zero, negative or larger than the item count.
    #[error("invalid threshold {threshold} for {available} items")]
    InvalidThreshold {
        /// Requested threshold
        threshold: i32,
        /// Number of items to choose from
        available: usize,
    },

    /// Signature policy envelope carries no rule.
    #[error("signature policy has no rule")]
    MissingPolicy,

    /// `SignedBy` references an identity that does not exist.
    #[error("principal index {index} out of range ({count} identities)")]
    PrincipalIndexOutOfRange {
        /// Referenced index
        index: i32,
        /// Number of identities in the envelope
        count: usize,
    },

    /// Principal classification the compiler cannot map to an MSP.
    #[error("unsupported principal classification: {0}")]
    UnsupportedPrincipal(String),

    /// Policy reduced to no alternatives at all.
    #[error("policy yields no endorsement alternatives")]
    EmptyPolicy,

    /// Chaincode data lookup failed.
    #[error("error querying chaincode data for {chaincode_id} on channel {channel_id}: {reason}")]
    ChaincodeQuery {
        /// Channel queried
        channel_id: String,
        /// Chaincode queried
        chaincode_id: String,
        /// Upstream failure
        reason: String,
    },

    /// Membership lookup failed.
    #[error("error querying membership of channel {channel_id}: {reason}")]
    MembershipQuery {
        /// Channel queried
        channel_id: String,
        /// Upstream failure
        reason: String,
    },

    /// Bytes could not be decoded.
    #[error("unmarshal failure: {0}")]
    Unmarshal(String),

    /// Membership answered but holds no peers.
    #[error("no peers available on channel {channel_id}")]
    NoPeers {
        /// Channel queried
        channel_id: String,
    },

    /// Configuration value rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Selection failed; wraps the underlying cause with channel context.
    #[error("could not get endorsers for chaincode(s) {chaincodes} on channel {channel_id}: {source}")]
    EndorsersUnavailable {
        /// Channel queried
        channel_id: String,
        /// Comma separated chaincode IDs
        chaincodes: String,
        /// Underlying cause
        #[source]
        source: Box<SelectionError>,
    },
}

impl SelectionError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoChaincodes
            | Self::InvalidThreshold { .. }
            | Self::MissingPolicy
            | Self::PrincipalIndexOutOfRange { .. }
            | Self::UnsupportedPrincipal(_)
            | Self::EmptyPolicy
            | Self::InvalidConfig(_) => ErrorKind::InvalidInput,
            Self::ChaincodeQuery { .. } | Self::MembershipQuery { .. } => {
                ErrorKind::UpstreamFailure
            }
            Self::Unmarshal(_) => ErrorKind::UnmarshalFailure,
            Self::NoPeers { .. } => ErrorKind::NotFound,
            Self::EndorsersUnavailable { source, .. } => source.kind(),
        }
    }
}

impl From<bincode::Error> for SelectionError {
    fn from(err: bincode::Error) -> Self {
        Self::Unmarshal(err.to_string())
    }
}

/// Result type for selection operations.
pub type SelectionResult<T> = Result<T, SelectionError>;
