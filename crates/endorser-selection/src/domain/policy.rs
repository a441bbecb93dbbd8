//! # Signature Policy Model
//!
//! Wire representation of endorsement policies: a tree of `SignedBy` leaves
//! and `NOutOf` combinators over a list of MSP principals.
//!
//! ```rust
//! use endorser_selection::domain::policy::{n_out_of, signed_by, signed_by_msp_member};
//! use endorser_selection::domain::SignaturePolicyEnvelope;
//!
//! // Org1 AND Org2
//! let envelope = SignaturePolicyEnvelope::new(
//!     n_out_of(2, vec![signed_by(0), signed_by(1)]),
//!     vec![
//!         signed_by_msp_member("Org1MSP").unwrap(),
//!         signed_by_msp_member("Org2MSP").unwrap(),
//!     ],
//! );
//! let bytes = envelope.to_bytes().unwrap();
//! assert_eq!(SignaturePolicyEnvelope::from_bytes(&bytes).unwrap(), envelope);
//! ```

use super::errors::{SelectionError, SelectionResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A node of the policy tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignaturePolicy {
    /// Satisfied by a signature of `identities[index]`
    SignedBy(i32),
    /// Satisfied when `n` of `rules` are satisfied
    NOutOf {
        /// Threshold
        n: i32,
        /// Sub-policies
        rules: Vec<SignaturePolicy>,
    },
}

/// Policy tree plus the principals its leaves reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePolicyEnvelope {
    /// Format version
    pub version: i32,
    /// Root of the tree
    pub rule: Option<SignaturePolicy>,
    /// Principals referenced by `SignedBy`
    pub identities: Vec<MspPrincipal>,
}

impl SignaturePolicyEnvelope {
    /// Envelope with version 0.
    pub fn new(rule: SignaturePolicy, identities: Vec<MspPrincipal>) -> Self {
        Self {
            version: 0,
            rule: Some(rule),
            identities,
        }
    }

    /// Encode for storage in [`ChaincodeData::policy`](super::ChaincodeData).
    pub fn to_bytes(&self) -> SelectionResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode policy bytes.
    pub fn from_bytes(bytes: &[u8]) -> SelectionResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// How `MspPrincipal::principal` must be interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrincipalClassification {
    /// Encoded [`MspRole`]
    Role,
    /// Encoded [`OrganizationUnit`]
    OrganizationUnit,
    /// A specific serialized identity
    Identity,
}

impl fmt::Display for PrincipalClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Role => write!(f, "ROLE"),
            Self::OrganizationUnit => write!(f, "ORGANIZATION_UNIT"),
            Self::Identity => write!(f, "IDENTITY"),
        }
    }
}

/// A principal referenced from the policy tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MspPrincipal {
    /// Interpretation of `principal`
    pub classification: PrincipalClassification,
    /// Encoded principal
    pub principal: Vec<u8>,
}

impl MspPrincipal {
    /// MSP identifier named by this principal.
    ///
    /// `Identity` principals are not supported.
    pub fn msp_id(&self) -> SelectionResult<String> {
        match self.classification {
            PrincipalClassification::Role => {
                let role: MspRole = bincode::deserialize(&self.principal)?;
                Ok(role.msp_identifier)
            }
            PrincipalClassification::OrganizationUnit => {
                let unit: OrganizationUnit = bincode::deserialize(&self.principal)?;
                Ok(unit.msp_identifier)
            }
            PrincipalClassification::Identity => Err(SelectionError::UnsupportedPrincipal(
                self.classification.to_string(),
            )),
        }
    }
}

/// Role within an MSP.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MspRoleType {
    /// Any member
    Member,
    /// Administrator
    Admin,
    /// Client identity
    Client,
    /// Peer identity
    Peer,
}

/// `ROLE` principal payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MspRole {
    /// Owning MSP
    pub msp_identifier: String,
    /// Required role
    pub role: MspRoleType,
}

/// `ORGANIZATION_UNIT` principal payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationUnit {
    /// Owning MSP
    pub msp_identifier: String,
    /// Organizational unit name
    pub organizational_unit_identifier: String,
    /// Hash of the certifying chain
    pub certifiers_identifier: Vec<u8>,
}

/// `SignedBy(index)` leaf.
pub fn signed_by(index: i32) -> SignaturePolicy {
    SignaturePolicy::SignedBy(index)
}

/// `n`-out-of combinator.
pub fn n_out_of(n: i32, rules: Vec<SignaturePolicy>) -> SignaturePolicy {
    SignaturePolicy::NOutOf { n, rules }
}

/// Member-role principal for `msp_id`.
pub fn signed_by_msp_member(msp_id: &str) -> SelectionResult<MspPrincipal> {
    msp_role_principal(msp_id, MspRoleType::Member)
}

/// Role principal for `msp_id`.
pub fn msp_role_principal(msp_id: &str, role: MspRoleType) -> SelectionResult<MspPrincipal> {
    Ok(MspPrincipal {
        classification: PrincipalClassification::Role,
        principal: bincode::serialize(&MspRole {
            msp_identifier: msp_id.to_string(),
            role,
        })?,
    })
}

/// Organizational-unit principal for `msp_id`.
pub fn organization_unit_principal(msp_id: &str, unit: &str) -> SelectionResult<MspPrincipal> {
    Ok(MspPrincipal {
        classification: PrincipalClassification::OrganizationUnit,
        principal: bincode::serialize(&OrganizationUnit {
            msp_identifier: msp_id.to_string(),
            organizational_unit_identifier: unit.to_string(),
            certifiers_identifier: Vec::new(),
        })?,
    })
}

/// Policy satisfied by a member of any one of `msp_ids`.
pub fn signed_by_any_member(msp_ids: &[&str]) -> SelectionResult<SignaturePolicyEnvelope> {
    let identities = msp_ids
        .iter()
        .map(|id| signed_by_msp_member(id))
        .collect::<SelectionResult<Vec<_>>>()?;
    let count = i32::try_from(identities.len()).map_err(|_| SelectionError::InvalidThreshold {
        threshold: i32::MAX,
        available: identities.len(),
    })?;
    let rules = (0..count).map(signed_by).collect();
    Ok(SignaturePolicyEnvelope::new(n_out_of(1, rules), identities))
}
