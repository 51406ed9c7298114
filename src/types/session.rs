//! Read-only snapshot of a session as reported by the external session
//! service. The service owns and mutates this record; the engine only reads
//! it.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::types::step::WorkflowStep;

/// Per-step progress figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StepProgress {
    /// Completion of the step, 0..=100.
    pub completion_percent: f32,
    /// Accumulated active time on the step.
    pub time_spent_seconds: u64,
}

/// Authoritative progress record for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub current_step: WorkflowStep,
    #[serde(default)]
    pub completed_steps: HashSet<WorkflowStep>,
    #[serde(default)]
    pub step_progress: HashMap<WorkflowStep, StepProgress>,
    /// Feature identifiers the user has enabled for this session.
    #[serde(default)]
    pub enabled_features: HashSet<String>,
    /// Unresolved validation issue categories.
    #[serde(default)]
    pub validation_issues: Vec<String>,
    /// Checkpoints the backend reports as failed.
    #[serde(default)]
    pub failed_checkpoint_count: u32,
}

impl SessionSnapshot {
    pub fn new(session_id: impl Into<String>, current_step: WorkflowStep) -> Self {
        Self {
            session_id: session_id.into(),
            current_step,
            completed_steps: HashSet::new(),
            step_progress: HashMap::new(),
            enabled_features: HashSet::new(),
            validation_issues: Vec::new(),
            failed_checkpoint_count: 0,
        }
    }

    pub fn is_completed(&self, step: WorkflowStep) -> bool {
        self.completed_steps.contains(&step)
    }

    /// Progress for a step, defaulting to zero when untouched.
    pub fn progress_for(&self, step: WorkflowStep) -> StepProgress {
        self.step_progress.get(&step).copied().unwrap_or_default()
    }

    pub fn main_pipeline_complete(&self) -> bool {
        WorkflowStep::MAIN_PIPELINE
            .iter()
            .all(|s| self.completed_steps.contains(s))
    }

    pub fn validation_issue_count(&self) -> usize {
        self.validation_issues.len()
    }
}
