//! # Membership Cache
//!
//! TTL-bounded view over a [`MembershipSource`]. Every query reloads at most
//! once per TTL; a failed reload keeps the last good peer list and records the
//! failure alongside it.

use super::expiring::ExpiringRef;
use crate::domain::{ChannelMembership, Peer, SelectionError, SelectionResult};
use crate::ports::{MembershipManager, MembershipSource};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

#[derive(Clone, Debug, Default)]
struct Snapshot {
    peers: Vec<Peer>,
    error: Option<SelectionError>,
}

impl Snapshot {
    fn reload(previous: Option<&Snapshot>, result: SelectionResult<Vec<Peer>>) -> Self {
        match result {
            Ok(peers) => Self { peers, error: None },
            Err(err) => Self {
                peers: previous.map(|s| s.peers.clone()).unwrap_or_default(),
                error: Some(err),
            },
        }
    }
}

/// Cached membership for all peers and for each channel.
pub struct MembershipCache<S: MembershipSource + 'static> {
    source: Arc<S>,
    ttl: Duration,
    polling_enabled: bool,
    all: ExpiringRef<Snapshot>,
    channels: RwLock<HashMap<String, Arc<ExpiringRef<Snapshot>>>>,
}

impl<S: MembershipSource + 'static> MembershipCache<S> {
    /// Cache over `source` whose entries live for `ttl`.
    pub fn new(source: Arc<S>, ttl: Duration, polling_enabled: bool) -> Self {
        let all_source = source.clone();
        let all = ExpiringRef::new(ttl, move |previous: Option<&Snapshot>| {
            Snapshot::reload(previous, all_source.all_peers())
        });
        Self {
            source,
            ttl,
            polling_enabled,
            all,
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// Drop cached answers so the next query reloads.
    pub fn invalidate(&self) {
        self.all.invalidate();
        for cell in self.channels.read().values() {
            cell.invalidate();
        }
    }

    fn channel_cell(&self, channel_id: &str) -> Arc<ExpiringRef<Snapshot>> {
        if let Some(cell) = self.channels.read().get(channel_id) {
            return cell.clone();
        }

        let mut channels = self.channels.write();
        channels
            .entry(channel_id.to_string())
            .or_insert_with(|| {
                debug!(channel_id = %channel_id, "Creating channel membership cache");
                let source = self.source.clone();
                let channel = channel_id.to_string();
                Arc::new(ExpiringRef::new(self.ttl, move |previous: Option<&Snapshot>| {
                    Snapshot::reload(previous, source.peers_of_channel(&channel))
                }))
            })
            .clone()
    }

    fn usable(snapshot: Snapshot) -> SelectionResult<Vec<Peer>> {
        match snapshot.error {
            Some(err) if snapshot.peers.is_empty() => Err(err),
            _ => Ok(snapshot.peers),
        }
    }
}

impl<S: MembershipSource + 'static> MembershipSource for MembershipCache<S> {
    fn all_peers(&self) -> SelectionResult<Vec<Peer>> {
        Self::usable(self.all.get())
    }

    fn peers_of_channel(&self, channel_id: &str) -> SelectionResult<Vec<Peer>> {
        Self::usable(self.channel_cell(channel_id).get())
    }
}

impl<S: MembershipSource + 'static> MembershipManager for MembershipCache<S> {
    fn get_peers_of_channel(&self, channel_id: &str) -> ChannelMembership {
        let snapshot = self.channel_cell(channel_id).get();

        if let Some(err) = &snapshot.error {
            if snapshot.peers.is_empty() {
                error!(channel_id = %channel_id, error = %err, "Membership query failed");
            } else {
                warn!(
                    channel_id = %channel_id,
                    error = %err,
                    peers = snapshot.peers.len(),
                    "Membership query failed, using last known peers"
                );
            }
        }

        ChannelMembership {
            peers: snapshot.peers,
            query_error: snapshot.error,
            polling_enabled: self.polling_enabled,
        }
    }
}
