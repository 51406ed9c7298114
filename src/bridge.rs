//! Platform ports: native history integration and connectivity probing.
//!
//! The engine has no compile-time dependency on any concrete history API;
//! adapters implement these traits and feed externally driven navigation
//! back through `NavigationEngine::handle_external_navigation`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::NavigationError;
use crate::types::step::WorkflowStep;

/// Opaque state object written alongside each native history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub session_id: String,
    pub step: WorkflowStep,
    #[serde(default)]
    pub substep: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Native back/forward mechanism.
pub trait HistoryBridge: Send + Sync {
    /// Push a new entry with a display title and target address.
    fn push_entry(
        &self,
        entry: &HistoryEntry,
        title: &str,
        address: &str,
    ) -> Result<(), NavigationError>;

    /// Replace the current entry instead of pushing a new one.
    fn replace_entry(
        &self,
        entry: &HistoryEntry,
        title: &str,
        address: &str,
    ) -> Result<(), NavigationError>;
}

/// Runtime connectivity signal consulted before hitting the network.
pub trait ConnectivityProbe: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Default bridge that accepts every entry without doing anything. Hosts
/// without a native history mechanism run on this.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHistoryBridge;

impl HistoryBridge for NoopHistoryBridge {
    fn push_entry(
        &self,
        _entry: &HistoryEntry,
        _title: &str,
        _address: &str,
    ) -> Result<(), NavigationError> {
        Ok(())
    }

    fn replace_entry(
        &self,
        _entry: &HistoryEntry,
        _title: &str,
        _address: &str,
    ) -> Result<(), NavigationError> {
        Ok(())
    }
}

/// Default probe: the runtime is assumed connected.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

impl ConnectivityProbe for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }
}
