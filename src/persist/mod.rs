//! Durable local persistence for navigation snapshots.
//!
//! The engine mirrors its in-memory state into a key/value store so a
//! reload or duplicated tab can pick up where the user left off. Stale
//! payloads are discarded rather than restored: 24 hours for the full
//! backup, 1 hour for per-session cached contexts.

pub mod file;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::NavigationError;
use crate::types::navigation::{NavigationContext, NavigationState};

/// Envelope version for the full navigation backup.
pub const NAVIGATION_STATE_VERSION: u32 = 1;

/// Storage key for the full navigation backup.
pub const NAVIGATION_STATE_KEY: &str = "navigation_state";

/// Storage key for one session's cached context.
pub fn context_cache_key(session_id: &str) -> String {
    format!("nav_cache_{session_id}")
}

/// Durable key/value storage consulted at startup and on unload.
pub trait StateStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, NavigationError>;
    fn set(&self, key: &str, value: &str) -> Result<(), NavigationError>;
    fn delete(&self, key: &str) -> Result<(), NavigationError>;
}

/// Full backup of the per-session histories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedNavigation {
    pub navigation_state: HashMap<String, Vec<NavigationState>>,
    pub timestamp: DateTime<Utc>,
    pub version: u32,
}

impl PersistedNavigation {
    pub fn is_fresh(&self, window_hours: i64) -> bool {
        Utc::now().signed_duration_since(self.timestamp) <= Duration::hours(window_hours)
    }
}

/// Cached context for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedContext {
    pub context: NavigationContext,
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
}

impl PersistedContext {
    pub fn is_fresh(&self, window_minutes: i64) -> bool {
        Utc::now().signed_duration_since(self.timestamp) <= Duration::minutes(window_minutes)
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, key: &str) -> Result<Option<String>, NavigationError> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), NavigationError> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), NavigationError> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}
