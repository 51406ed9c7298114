//! Resume recommendation records produced by the advisor.

use serde::{Deserialize, Serialize};

use crate::types::step::WorkflowStep;

/// Urgency attached to a resume recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumePriority {
    Low,
    Medium,
    High,
}

/// Suggested step for a returning user to continue from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeRecommendation {
    pub recommended_step: WorkflowStep,
    pub reason: String,
    pub estimated_minutes_to_complete: u32,
    /// 0..=1.
    pub confidence: f64,
    pub priority: ResumePriority,
    /// Other incomplete steps worth considering, canonical order.
    pub alternatives: Vec<WorkflowStep>,
    /// Inputs the recommended step needs.
    pub required_data: Vec<String>,
    pub warnings: Vec<String>,
}
