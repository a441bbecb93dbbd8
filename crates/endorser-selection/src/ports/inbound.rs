//! # Driving Ports (Inbound API)
//!
//! What the endorser selection subsystem offers to the transaction
//! submission layer.

use crate::domain::{EventSource, Peer, SelectionResult};

/// Endorser selection API - inbound port.
pub trait EndorserSelectionApi: Send + Sync {
    /// Peers whose combined endorsements satisfy the policies of every
    /// chaincode in `chaincode_ids` on `channel_id`.
    ///
    /// An empty list means no combination is currently available (for
    /// example an MSP with no live peers); callers retry after membership
    /// refreshes.
    fn get_endorsers_for_chaincode(
        &self,
        channel_id: &str,
        chaincode_ids: &[&str],
    ) -> SelectionResult<Vec<Peer>>;

    /// A random live peer of `channel_id` to register for events with.
    fn get_peer_for_events(&self, channel_id: &str) -> SelectionResult<EventSource>;
}
