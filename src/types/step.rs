//! Workflow step enumeration and the prerequisite graph.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// One stage of the guided document workflow.
///
/// Declaration order is the canonical pipeline order. `Enrichment` is an
/// optional detour off `Analysis`; `Completed` is the terminal stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    Intake,
    Processing,
    Analysis,
    Features,
    Templates,
    Preview,
    Results,
    Enrichment,
    Completed,
}

impl WorkflowStep {
    /// Every step in canonical order.
    pub const ALL: [WorkflowStep; 9] = [
        WorkflowStep::Intake,
        WorkflowStep::Processing,
        WorkflowStep::Analysis,
        WorkflowStep::Features,
        WorkflowStep::Templates,
        WorkflowStep::Preview,
        WorkflowStep::Results,
        WorkflowStep::Enrichment,
        WorkflowStep::Completed,
    ];

    /// The required main pipeline, excluding the optional and terminal stages.
    pub const MAIN_PIPELINE: [WorkflowStep; 7] = [
        WorkflowStep::Intake,
        WorkflowStep::Processing,
        WorkflowStep::Analysis,
        WorkflowStep::Features,
        WorkflowStep::Templates,
        WorkflowStep::Preview,
        WorkflowStep::Results,
    ];

    /// Steps that must be completed before this one is reachable.
    pub fn prerequisites(self) -> &'static [WorkflowStep] {
        match self {
            WorkflowStep::Intake => &[],
            WorkflowStep::Processing => &[WorkflowStep::Intake],
            WorkflowStep::Analysis => &[WorkflowStep::Processing],
            WorkflowStep::Features | WorkflowStep::Enrichment => &[WorkflowStep::Analysis],
            WorkflowStep::Templates => &[WorkflowStep::Features],
            WorkflowStep::Preview => &[WorkflowStep::Templates],
            WorkflowStep::Results => &[WorkflowStep::Preview],
            WorkflowStep::Completed => &[WorkflowStep::Results],
        }
    }

    /// Whether every prerequisite of this step is in `completed`.
    pub fn accessible(self, completed: &HashSet<WorkflowStep>) -> bool {
        self.prerequisites().iter().all(|p| completed.contains(p))
    }

    /// First main-pipeline step not yet completed; `Enrichment` once the
    /// main pipeline is done, `Completed` once everything is.
    pub fn resume_point(completed: &HashSet<WorkflowStep>) -> WorkflowStep {
        for step in WorkflowStep::MAIN_PIPELINE {
            if !completed.contains(&step) {
                return step;
            }
        }
        if completed.contains(&WorkflowStep::Enrichment) {
            WorkflowStep::Completed
        } else {
            WorkflowStep::Enrichment
        }
    }

    pub fn is_main_pipeline(self) -> bool {
        !matches!(self, WorkflowStep::Enrichment | WorkflowStep::Completed)
    }

    pub fn is_optional(self) -> bool {
        matches!(self, WorkflowStep::Enrichment)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, WorkflowStep::Completed)
    }

    /// Stable key used in addresses and persisted payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowStep::Intake => "intake",
            WorkflowStep::Processing => "processing",
            WorkflowStep::Analysis => "analysis",
            WorkflowStep::Features => "features",
            WorkflowStep::Templates => "templates",
            WorkflowStep::Preview => "preview",
            WorkflowStep::Results => "results",
            WorkflowStep::Enrichment => "enrichment",
            WorkflowStep::Completed => "completed",
        }
    }

    /// Inverse of [`WorkflowStep::as_str`].
    pub fn from_key(key: &str) -> Option<WorkflowStep> {
        WorkflowStep::ALL.into_iter().find(|s| s.as_str() == key)
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trip() {
        for step in WorkflowStep::ALL {
            assert_eq!(WorkflowStep::from_key(step.as_str()), Some(step));
        }
        assert_eq!(WorkflowStep::from_key("bogus"), None);
    }

    #[test]
    fn test_prerequisite_graph_is_acyclic() {
        // Every prerequisite comes strictly earlier in canonical order, so
        // the graph cannot contain a cycle.
        let position = |step: WorkflowStep| {
            WorkflowStep::ALL.iter().position(|s| *s == step).unwrap()
        };
        for step in WorkflowStep::ALL {
            for prereq in step.prerequisites() {
                assert!(
                    position(*prereq) < position(step),
                    "{prereq} must precede {step}"
                );
            }
        }
    }

    #[test]
    fn test_accessible() {
        let mut completed = HashSet::new();
        assert!(WorkflowStep::Intake.accessible(&completed));
        assert!(!WorkflowStep::Processing.accessible(&completed));

        completed.insert(WorkflowStep::Intake);
        assert!(WorkflowStep::Processing.accessible(&completed));
        assert!(!WorkflowStep::Analysis.accessible(&completed));

        completed.insert(WorkflowStep::Processing);
        completed.insert(WorkflowStep::Analysis);
        // Enrichment branches off analysis, not off the tail of the pipeline
        assert!(WorkflowStep::Enrichment.accessible(&completed));
        assert!(!WorkflowStep::Templates.accessible(&completed));
    }

    #[test]
    fn test_resume_point_ordering() {
        let mut completed: HashSet<WorkflowStep> = HashSet::new();
        assert_eq!(WorkflowStep::resume_point(&completed), WorkflowStep::Intake);

        completed.insert(WorkflowStep::Intake);
        completed.insert(WorkflowStep::Processing);
        assert_eq!(
            WorkflowStep::resume_point(&completed),
            WorkflowStep::Analysis
        );

        for step in WorkflowStep::MAIN_PIPELINE {
            completed.insert(step);
        }
        assert_eq!(
            WorkflowStep::resume_point(&completed),
            WorkflowStep::Enrichment
        );

        completed.insert(WorkflowStep::Enrichment);
        assert_eq!(
            WorkflowStep::resume_point(&completed),
            WorkflowStep::Completed
        );
    }

    #[test]
    fn test_main_pipeline_membership() {
        assert!(WorkflowStep::Intake.is_main_pipeline());
        assert!(WorkflowStep::Results.is_main_pipeline());
        assert!(!WorkflowStep::Enrichment.is_main_pipeline());
        assert!(!WorkflowStep::Completed.is_main_pipeline());
        assert!(WorkflowStep::Enrichment.is_optional());
        assert!(WorkflowStep::Completed.is_terminal());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&WorkflowStep::Intake).unwrap();
        assert_eq!(json, "\"intake\"");
        let step: WorkflowStep = serde_json::from_str("\"enrichment\"").unwrap();
        assert_eq!(step, WorkflowStep::Enrichment);
    }
}
