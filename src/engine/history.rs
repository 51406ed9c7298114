//! Per-session navigation history storage.
//!
//! Keyed get/set/delete so the backing container can be swapped (bounded
//! LRU, shared map) without touching orchestration logic.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::types::navigation::NavigationState;

/// Storage for per-session history stacks.
pub trait HistoryStore: Send + Sync {
    fn get(&self, session_id: &str) -> Option<Vec<NavigationState>>;
    fn set(&self, session_id: &str, history: Vec<NavigationState>);
    fn delete(&self, session_id: &str);
    fn session_ids(&self) -> Vec<String>;
    /// Snapshot of every session's history, for persistence.
    fn export(&self) -> HashMap<String, Vec<NavigationState>>;
}

/// Default in-memory store.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    sessions: RwLock<HashMap<String, Vec<NavigationState>>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn get(&self, session_id: &str) -> Option<Vec<NavigationState>> {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions.get(session_id).cloned()
    }

    fn set(&self, session_id: &str, history: Vec<NavigationState>) {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.insert(session_id.to_string(), history);
    }

    fn delete(&self, session_id: &str) {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.remove(session_id);
    }

    fn session_ids(&self) -> Vec<String> {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions.keys().cloned().collect()
    }

    fn export(&self) -> HashMap<String, Vec<NavigationState>> {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions.clone()
    }
}
