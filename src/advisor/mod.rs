//! Resume recommendation heuristics.
//!
//! Pure functions over a session snapshot; no network or storage access.

use std::sync::Arc;

use crate::routes::RouteDirectory;
use crate::types::resume::{ResumePriority, ResumeRecommendation};
use crate::types::session::SessionSnapshot;
use crate::types::step::WorkflowStep;

// Confidence and priority are fixed heuristics; the fallback ordering in
// WorkflowStep::resume_point is what callers rely on.
const RESUME_CONFIDENCE: f64 = 0.9;
const RESUME_PRIORITY: ResumePriority = ResumePriority::High;

/// Suggests where a returning user should continue.
#[derive(Debug, Clone)]
pub struct ResumeAdvisor {
    routes: Arc<RouteDirectory>,
}

impl ResumeAdvisor {
    pub fn new(routes: Arc<RouteDirectory>) -> Self {
        Self { routes }
    }

    /// Recommendation for a returning user: the first main step not yet
    /// completed, then the optional enrichment stage, then the terminal
    /// completed stage.
    pub fn suggest_resume_point(&self, snapshot: &SessionSnapshot) -> ResumeRecommendation {
        let recommended = WorkflowStep::resume_point(&snapshot.completed_steps);
        let route = self.routes.route_for(recommended);

        let reason = if recommended.is_terminal() {
            "Every stage is complete; wrap up the session".to_string()
        } else if recommended.is_optional() {
            "The required pipeline is done; enrichment is still open".to_string()
        } else {
            format!(
                "Continue with {}",
                route.map_or(recommended.as_str(), |r| r.title)
            )
        };

        let alternatives: Vec<WorkflowStep> = WorkflowStep::MAIN_PIPELINE
            .into_iter()
            .filter(|s| *s != recommended && !snapshot.is_completed(*s))
            .take(2)
            .collect();

        let progress = snapshot.progress_for(recommended);
        let full_duration = route.map_or(0, |r| r.estimated_duration_minutes);
        let remaining_fraction =
            1.0 - f64::from(progress.completion_percent.clamp(0.0, 100.0)) / 100.0;
        let estimated_minutes_to_complete =
            (f64::from(full_duration) * remaining_fraction).ceil() as u32;

        let mut warnings = Vec::new();
        if !snapshot.validation_issues.is_empty() {
            warnings.push(format!(
                "{} unresolved validation issue(s)",
                snapshot.validation_issue_count()
            ));
        }

        ResumeRecommendation {
            recommended_step: recommended,
            reason,
            estimated_minutes_to_complete,
            confidence: RESUME_CONFIDENCE,
            priority: RESUME_PRIORITY,
            alternatives,
            required_data: route
                .map(|r| r.required_data.iter().map(ToString::to_string).collect())
                .unwrap_or_default(),
            warnings,
        }
    }

    /// Human-readable action per unmet condition.
    pub fn next_actions(&self, snapshot: &SessionSnapshot) -> Vec<String> {
        let mut actions = Vec::new();

        let current = snapshot.current_step;
        let progress = snapshot.progress_for(current);
        if !snapshot.is_completed(current) && progress.completion_percent < 100.0 {
            let label = self
                .routes
                .route_for(current)
                .map_or(current.as_str(), |r| r.title);
            actions.push(format!(
                "Finish {} ({:.0}% complete)",
                label, progress.completion_percent
            ));
        }

        for category in &snapshot.validation_issues {
            actions.push(format!("Resolve {category} validation issues"));
        }

        actions
    }

    /// Steps that may be safely skipped: only the optional enrichment stage,
    /// and only once the analysis it builds on is complete.
    pub fn skippable_steps(&self, snapshot: &SessionSnapshot) -> Vec<WorkflowStep> {
        if snapshot.is_completed(WorkflowStep::Analysis)
            && !snapshot.is_completed(WorkflowStep::Enrichment)
        {
            vec![WorkflowStep::Enrichment]
        } else {
            Vec::new()
        }
    }
}
