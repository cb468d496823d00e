//! Signal handling for graceful shutdown and background maintenance.

use payapp_core::dedup::DedupStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::Notify;

/// Creates a future that completes when a shutdown signal is received.
///
/// Listens for SIGTERM and SIGINT (Ctrl+C).
pub async fn shutdown_signal() {
    tokio::select! {
        _ = wait_for(SignalKind::terminate()) => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
        _ = wait_for(SignalKind::interrupt()) => {
            tracing::info!("Received SIGINT, initiating graceful shutdown");
        }
    }
}

async fn wait_for(kind: SignalKind) {
    match signal(kind) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            tracing::error!(error = %e, ?kind, "Failed to install signal handler");
            std::future::pending::<()>().await;
        }
    }
}

/// Spawns a task that clears `store` every `interval`.
///
/// Returns a Notify that stops the task.
pub fn spawn_dedup_clear_task<S>(store: S, interval: Duration) -> Arc<Notify>
where
    S: DedupStore + 'static,
{
    let shutdown_notify = Arc::new(Notify::new());
    let shutdown_notify_clone = shutdown_notify.clone();

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match store.clear().await {
                        Ok(()) => tracing::info!("Dedup store cleared"),
                        Err(e) => tracing::error!(error = %e, "Failed to clear dedup store"),
                    }
                }
                _ = shutdown_notify_clone.notified() => {
                    tracing::debug!("Dedup clear task shutting down");
                    break;
                }
            }
        }
    });

    shutdown_notify
}

#[cfg(test)]
mod tests {
    use super::*;
    use payapp_core::dedup::MemoryDedupStore;
    use payapp_sdk::objects::DedupKey;

    #[tokio::test(start_paused = true)]
    async fn test_store_is_cleared_on_interval() {
        let store = MemoryDedupStore::new();
        store.insert(DedupKey::derive("1", 4, "", "")).await.unwrap();

        let stop = spawn_dedup_clear_task(store.clone(), Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(store.len().await, 1);

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert!(store.is_empty().await);
        stop.notify_one();
    }
}
