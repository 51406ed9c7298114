//! Debounced navigation requests: newest wins within a short window.
//!
//! Each pending request moves Idle -> Pending -> Committed, unless a newer
//! request for the same key arrives first, in which case the older one is
//! aborted and never commits.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

struct PendingNavigation {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Coalesces rapid repeated requests per key.
#[derive(Default)]
pub struct Debouncer {
    pending: Arc<Mutex<HashMap<String, PendingNavigation>>>,
    next_generation: AtomicU64,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `commit` to run after `window`. A newer request for the same
    /// key supersedes this one; the superseded task is aborted.
    pub fn schedule<F>(&self, key: &str, window: Duration, commit: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let pending = Arc::clone(&self.pending);
        let task_key = key.to_string();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            commit.await;
            let mut map = pending.lock().unwrap_or_else(|e| e.into_inner());
            if map
                .get(&task_key)
                .is_some_and(|p| p.generation == generation)
            {
                map.remove(&task_key);
            }
        });

        let mut map = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = map.insert(
            key.to_string(),
            PendingNavigation { generation, handle },
        ) {
            debug!("superseding pending navigation for {key}");
            previous.handle.abort();
        }
    }

    /// Abort every pending request.
    pub fn cancel_all(&self) {
        let mut map = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        for (_, pending) in map.drain() {
            pending.handle.abort();
        }
    }

    pub fn pending_count(&self) -> usize {
        let map = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        map.len()
    }
}
