//! # Signature Policy Compiler
//!
//! Translates a signature policy tree into group algebra terms:
//!
//! - `SignedBy(i)` becomes a disjunction with one child, the deferred MSP
//!   peer group of `identities[i]`.
//! - `NOutOf(n, rules)` becomes `Nof(n)` over the compiled rules.
//!
//! MSP membership is not touched here; leaves resolve through the
//! [`PeerRetriever`] when a resolver materializes them.

use crate::domain::{
    Group, GroupOfGroups, MspPrincipal, PeerGroup, PeerRetriever, SelectionError,
    SelectionResult, SignaturePolicy, SignaturePolicyEnvelope,
};
use tracing::debug;

/// Compiles signature policies against a membership lookup.
pub struct SignaturePolicyCompiler {
    retriever: PeerRetriever,
}

impl SignaturePolicyCompiler {
    /// Compiler whose MSP leaves resolve through `retriever`.
    pub fn new(retriever: PeerRetriever) -> Self {
        Self { retriever }
    }

    /// Decode and compile policy bytes.
    pub fn compile_bytes(&self, policy: &[u8]) -> SelectionResult<GroupOfGroups> {
        let envelope = SignaturePolicyEnvelope::from_bytes(policy)?;
        self.compile(&envelope)
    }

    /// Compile an envelope.
    ///
    /// # Errors
    ///
    /// No partial result is ever returned; a missing rule, an out-of-range or
    /// unsupported principal, or an invalid threshold fails the whole policy.
    pub fn compile(&self, envelope: &SignaturePolicyEnvelope) -> SelectionResult<GroupOfGroups> {
        let rule = envelope.rule.as_ref().ok_or(SelectionError::MissingPolicy)?;
        self.compile_rule(rule, &envelope.identities)
    }

    fn compile_rule(
        &self,
        rule: &SignaturePolicy,
        identities: &[MspPrincipal],
    ) -> SelectionResult<GroupOfGroups> {
        match rule {
            SignaturePolicy::SignedBy(index) => {
                let principal = usize::try_from(*index)
                    .ok()
                    .and_then(|i| identities.get(i))
                    .ok_or(SelectionError::PrincipalIndexOutOfRange {
                        index: *index,
                        count: identities.len(),
                    })?;
                let msp_id = principal.msp_id()?;
                debug!(msp_id = %msp_id, "Compiled SignedBy leaf");
                Ok(GroupOfGroups::new(vec![Group::Peers(PeerGroup::msp(
                    msp_id,
                    self.retriever.clone(),
                ))]))
            }
            SignaturePolicy::NOutOf { n, rules } => {
                let compiled = rules
                    .iter()
                    .map(|sub| self.compile_rule(sub, identities).map(Group::OfGroups))
                    .collect::<SelectionResult<Vec<_>>>()?;
                GroupOfGroups::new(compiled).nof(*n)
            }
        }
    }
}
