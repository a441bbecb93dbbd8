//! Caching decorator for a [`ChaincodeDataProvider`].
//!
//! Successful lookups are kept until explicitly invalidated; failures are
//! never cached.

use crate::domain::{ChaincodeData, SelectionResult};
use crate::ports::ChaincodeDataProvider;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

type CacheKey = (String, String);

/// Chaincode data cache keyed by `(channel, chaincode)`.
pub struct CachedChaincodeDataProvider<P: ChaincodeDataProvider> {
    inner: Arc<P>,
    entries: RwLock<HashMap<CacheKey, ChaincodeData>>,
    fill: Mutex<()>,
}

impl<P: ChaincodeDataProvider> CachedChaincodeDataProvider<P> {
    /// Wrap `inner`.
    pub fn new(inner: Arc<P>) -> Self {
        Self {
            inner,
            entries: RwLock::new(HashMap::new()),
            fill: Mutex::new(()),
        }
    }

    /// Forget one chaincode.
    pub fn invalidate(&self, channel_id: &str, chaincode_id: &str) {
        self.entries
            .write()
            .remove(&(channel_id.to_string(), chaincode_id.to_string()));
    }

    /// Forget everything.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<P: ChaincodeDataProvider> ChaincodeDataProvider for CachedChaincodeDataProvider<P> {
    fn query_chaincode_data(
        &self,
        channel_id: &str,
        chaincode_id: &str,
    ) -> SelectionResult<ChaincodeData> {
        let key = (channel_id.to_string(), chaincode_id.to_string());
        if let Some(data) = self.entries.read().get(&key) {
            return Ok(data.clone());
        }

        let _fill = self.fill.lock();
        if let Some(data) = self.entries.read().get(&key) {
            return Ok(data.clone());
        }

        debug!(channel_id = %channel_id, chaincode = %chaincode_id, "Querying chaincode data");
        let data = self.inner.query_chaincode_data(channel_id, chaincode_id)?;
        self.entries.write().insert(key, data.clone());
        Ok(data)
    }
}
