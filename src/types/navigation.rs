//! Navigation state, derived context, and breadcrumb records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::types::step::WorkflowStep;

/// How a navigation state entered the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Push,
    Back,
    Replace,
}

/// One point in a session's navigation history. Immutable once created; a
/// back navigation produces a new state object rather than mutating the old
/// one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationState {
    pub session_id: String,
    pub step: WorkflowStep,
    #[serde(default)]
    pub substep: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    pub transition: TransitionKind,
    #[serde(default)]
    pub source_address: Option<String>,
}

impl NavigationState {
    /// New forward-navigation state stamped with the current time.
    pub fn new(session_id: impl Into<String>, step: WorkflowStep) -> Self {
        Self {
            session_id: session_id.into(),
            step,
            substep: None,
            timestamp: Utc::now(),
            parameters: BTreeMap::new(),
            transition: TransitionKind::Push,
            source_address: None,
        }
    }

    pub fn with_substep(mut self, substep: impl Into<String>) -> Self {
        self.substep = Some(substep.into());
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn with_transition(mut self, transition: TransitionKind) -> Self {
        self.transition = transition;
        self
    }

    pub fn with_source_address(mut self, address: impl Into<String>) -> Self {
        self.source_address = Some(address.into());
        self
    }

    /// Copy of this state re-tagged as a back transition with a fresh
    /// timestamp.
    pub fn as_back(&self) -> Self {
        let mut state = self.clone();
        state.transition = TransitionKind::Back;
        state.timestamp = Utc::now();
        state
    }
}

/// A navigable (or blocked) route for one step, derived from the
/// prerequisite graph and a session snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationPath {
    pub step: WorkflowStep,
    pub address: String,
    pub label: String,
    pub accessible: bool,
    pub completed: bool,
    /// Whether the step belongs to the required main pipeline.
    pub required: bool,
    pub estimated_duration_minutes: u32,
    pub prerequisites: Vec<WorkflowStep>,
    pub warnings: Vec<String>,
}

/// Derived view of where a session can go, recomputed on demand. Never the
/// source of truth; progress always comes from the session snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationContext {
    pub session_id: String,
    pub current_address: String,
    pub available_paths: Vec<NavigationPath>,
    pub blocked_paths: Vec<NavigationPath>,
    pub recommended_next_steps: Vec<WorkflowStep>,
    /// Overall completion, 0..=100.
    pub completion_percentage: f64,
    pub critical_issues: Vec<String>,
}

/// Display metadata attached to a breadcrumb.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreadcrumbMeta {
    pub icon: String,
    pub description: String,
}

/// One entry per step the user has reached, in traversal order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub id: Uuid,
    pub label: String,
    pub address: String,
    pub step: WorkflowStep,
    pub completed: bool,
    pub accessible: bool,
    pub metadata: BreadcrumbMeta,
}
