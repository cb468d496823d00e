//! Storage for dedup keys of feedback deliveries that were already handled.
//!
//! PayApp delivers feedback at least once. The processor records a key after
//! a delivery has been dispatched successfully and skips later deliveries
//! with the same key. [`MemoryDedupStore`] keeps keys in process memory,
//! which is enough for a single instance; multi-instance deployments should
//! plug in a shared store.

mod memory;

pub use memory::MemoryDedupStore;

use async_trait::async_trait;
use payapp_sdk::objects::DedupKey;
use std::sync::Arc;

#[async_trait]
pub trait DedupStore: Send + Sync {
    /// Whether the key has already been recorded.
    async fn contains(&self, key: &DedupKey) -> anyhow::Result<bool>;

    /// Record a key as processed.
    async fn insert(&self, key: DedupKey) -> anyhow::Result<()>;

    /// Forget every recorded key (default: no-op).
    async fn clear(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl<S: DedupStore + ?Sized> DedupStore for Arc<S> {
    async fn contains(&self, key: &DedupKey) -> anyhow::Result<bool> {
        (**self).contains(key).await
    }

    async fn insert(&self, key: DedupKey) -> anyhow::Result<()> {
        (**self).insert(key).await
    }

    async fn clear(&self) -> anyhow::Result<()> {
        (**self).clear().await
    }
}
