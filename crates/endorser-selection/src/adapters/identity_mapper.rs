//! # PKI-ID to MSP Mapper
//!
//! Learns which organization each gossip PKI ID belongs to by listening to
//! identity pull updates. A single listener task writes; lookups from any
//! thread only take the read lock. Entries are never removed.

use crate::domain::{GossipContent, GossipMessage, PeerIdentity, PkiId};
use futures::{Stream, StreamExt};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// PKI ID to MSP ID table fed by identity gossip.
#[derive(Debug, Default)]
pub struct PkiIdMspMapper {
    table: RwLock<HashMap<PkiId, String>>,
}

impl PkiIdMspMapper {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// MSP of `pki_id`, or an empty string when it has not been seen yet.
    pub fn msp_id(&self, pki_id: &PkiId) -> String {
        match self.table.read().get(pki_id) {
            Some(msp_id) => msp_id.clone(),
            None => {
                warn!(pki_id = %pki_id, "MSP ID not found for PKI ID");
                String::new()
            }
        }
    }

    /// Number of known PKI IDs.
    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    /// Whether no PKI ID is known.
    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }

    /// Record `pki_id -> msp_id` if new or changed.
    pub fn upsert(&self, pki_id: PkiId, msp_id: String) {
        if self.table.read().get(&pki_id) == Some(&msp_id) {
            return;
        }

        let mut table = self.table.write();
        match table.insert(pki_id.clone(), msp_id.clone()) {
            None => info!(pki_id = %pki_id, msp_id = %msp_id, "Added PKI ID mapping"),
            Some(previous) if previous != msp_id => info!(
                pki_id = %pki_id,
                old_msp_id = %previous,
                new_msp_id = %msp_id,
                "Overriding PKI ID mapping"
            ),
            Some(_) => {}
        }
    }

    /// Apply every identity carried by an identity update. Undecodable
    /// envelopes are skipped.
    pub fn handle_message(&self, message: &GossipMessage) {
        let GossipContent::DataUpdate { data, .. } = &message.content else {
            return;
        };
        if !message.is_identity_update() {
            return;
        }

        for envelope in data {
            let decoded = PeerIdentity::from_envelope(envelope)
                .and_then(|identity| Ok((identity.msp_id()?, identity.pki_id)));
            match decoded {
                Ok((msp_id, pki_id)) => self.upsert(pki_id, msp_id),
                Err(e) => warn!(error = %e, "Skipping undecodable peer identity"),
            }
        }
    }

    /// Consume `messages` until the stream ends, applying identity updates.
    pub async fn run<St>(self: Arc<Self>, messages: St)
    where
        St: Stream<Item = GossipMessage> + Send,
    {
        debug!("PKI ID mapper listening for identity updates");
        let mut updates = Box::pin(messages.filter(|msg| {
            let keep = msg.is_identity_update();
            async move { keep }
        }));

        while let Some(message) = updates.next().await {
            self.handle_message(&message);
        }
        debug!("Identity update stream ended");
    }

    /// Spawn [`run`](Self::run) on the current tokio runtime.
    pub fn spawn_listener<St>(self: &Arc<Self>, messages: St) -> JoinHandle<()>
    where
        St: Stream<Item = GossipMessage> + Send + 'static,
    {
        tokio::spawn(self.clone().run(messages))
    }
}
