use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use payapp_sdk::objects::DedupKey;
use tokio::sync::RwLock;

use super::DedupStore;

/// In-process dedup store.
///
/// Grows without bound; long-lived hosts call [`DedupStore::clear`]
/// periodically. Clones share the same set.
#[derive(Debug, Default, Clone)]
pub struct MemoryDedupStore {
    keys: Arc<RwLock<HashSet<DedupKey>>>,
}

impl MemoryDedupStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.keys.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.keys.read().await.is_empty()
    }
}

#[async_trait]
impl DedupStore for MemoryDedupStore {
    async fn contains(&self, key: &DedupKey) -> anyhow::Result<bool> {
        Ok(self.keys.read().await.contains(key))
    }

    async fn insert(&self, key: DedupKey) -> anyhow::Result<()> {
        self.keys.write().await.insert(key);
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        let mut keys = self.keys.write().await;
        let removed = keys.len();
        keys.clear();
        tracing::debug!(removed, "Cleared in-memory dedup store");
        Ok(())
    }
}
