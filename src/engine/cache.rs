//! Context caching and request coalescing.

use chrono::{DateTime, Duration, Utc};
use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use crate::error::NavigationError;
use crate::types::navigation::NavigationContext;
use crate::types::session::SessionSnapshot;

/// A cached context plus the instant it was computed.
#[derive(Debug, Clone)]
struct CachedContext {
    context: NavigationContext,
    cached_at: DateTime<Utc>,
}

/// TTL cache for derived contexts, keyed by session id.
#[derive(Default)]
pub struct ContextCache {
    entries: RwLock<HashMap<String, CachedContext>>,
}

impl ContextCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached context for a session, unless older than `window`.
    pub fn get_fresh(&self, session_id: &str, window: Duration) -> Option<NavigationContext> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let cached = entries.get(session_id)?;
        if Utc::now().signed_duration_since(cached.cached_at) <= window {
            Some(cached.context.clone())
        } else {
            None
        }
    }

    pub fn insert(&self, context: NavigationContext) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            context.session_id.clone(),
            CachedContext {
                context,
                cached_at: Utc::now(),
            },
        );
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.clear();
    }
}

/// One shared in-flight snapshot fetch.
pub type SharedSnapshotFuture =
    Shared<BoxFuture<'static, Result<SessionSnapshot, NavigationError>>>;

/// Coalesces concurrent fetches for the same operation id: callers awaiting
/// the same key share a single network round-trip.
#[derive(Default)]
pub struct InflightRequests {
    inner: Mutex<HashMap<String, SharedSnapshotFuture>>,
}

impl InflightRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// The existing in-flight future for `key`, or the one produced by
    /// `make`, installed for later callers.
    pub fn get_or_insert<F>(&self, key: &str, make: F) -> SharedSnapshotFuture
    where
        F: FnOnce() -> BoxFuture<'static, Result<SessionSnapshot, NavigationError>>,
    {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = inner.get(key) {
            return existing.clone();
        }
        let shared = make().shared();
        inner.insert(key.to_string(), shared.clone());
        shared
    }

    pub fn remove(&self, key: &str) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.remove(key);
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.clear();
    }
}
