//! Application state shared across all request handlers.

use payapp_core::dedup::MemoryDedupStore;
use payapp_core::processors::FeedbackProcessor;
use std::sync::Arc;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Validates and dispatches inbound feedback.
    pub processor: Arc<FeedbackProcessor<MemoryDedupStore>>,
}

impl AppState {
    pub fn new(processor: FeedbackProcessor<MemoryDedupStore>) -> Self {
        Self {
            processor: Arc::new(processor),
        }
    }
}
