//! Derived context computation: reachability, completion, critical issues.
//!
//! Everything here is synchronous and pure; the orchestrator fetches the
//! snapshot, then runs these to completion without further I/O.

use std::collections::BTreeMap;

use crate::routes::RouteDirectory;
use crate::types::navigation::{NavigationContext, NavigationPath};
use crate::types::session::SessionSnapshot;
use crate::types::step::WorkflowStep;

/// Weight of the main pipeline in the completion percentage.
const MAIN_PIPELINE_WEIGHT: f64 = 80.0;
/// Flat bonus for completing the optional enrichment stage.
const ENRICHMENT_BONUS: f64 = 10.0;
/// Bonus per enabled feature, and its cap.
const FEATURE_BONUS: f64 = 2.0;
const FEATURE_BONUS_CAP: f64 = 10.0;

/// Overall completion in `[0, 100]`: weighted main-pipeline completion,
/// partial credit for the step in progress, plus enrichment and feature
/// bonuses.
pub fn completion_percentage(snapshot: &SessionSnapshot) -> f64 {
    let main_count = WorkflowStep::MAIN_PIPELINE.len() as f64;
    let per_step_weight = MAIN_PIPELINE_WEIGHT / main_count;

    let completed_main = WorkflowStep::MAIN_PIPELINE
        .iter()
        .filter(|s| snapshot.is_completed(**s))
        .count() as f64;
    let mut total = completed_main / main_count * MAIN_PIPELINE_WEIGHT;

    let current = snapshot.current_step;
    if current.is_main_pipeline() && !snapshot.is_completed(current) {
        let percent = f64::from(
            snapshot
                .progress_for(current)
                .completion_percent
                .clamp(0.0, 100.0),
        );
        total += percent / 100.0 * per_step_weight;
    }

    if snapshot.is_completed(WorkflowStep::Enrichment) {
        total += ENRICHMENT_BONUS;
    }

    total += (FEATURE_BONUS * snapshot.enabled_features.len() as f64).min(FEATURE_BONUS_CAP);

    total.clamp(0.0, 100.0)
}

/// Split every route into available and blocked paths using the
/// prerequisite graph. Evaluated fresh on every call.
pub fn build_paths(
    routes: &RouteDirectory,
    snapshot: &SessionSnapshot,
) -> (Vec<NavigationPath>, Vec<NavigationPath>) {
    let mut available = Vec::new();
    let mut blocked = Vec::new();

    for route in routes.all_routes() {
        let step = route.step;
        let accessible = step.accessible(&snapshot.completed_steps);
        let prerequisites = step.prerequisites().to_vec();

        let warnings = if accessible {
            Vec::new()
        } else {
            prerequisites
                .iter()
                .filter(|p| !snapshot.is_completed(**p))
                .map(|p| {
                    let label = routes.route_for(*p).map_or(p.as_str(), |r| r.title);
                    format!("Complete {label} first")
                })
                .collect()
        };

        let path = NavigationPath {
            step,
            address: routes.address_for(&snapshot.session_id, step, None, &BTreeMap::new()),
            label: route.title.to_string(),
            accessible,
            completed: snapshot.is_completed(step),
            required: step.is_main_pipeline(),
            estimated_duration_minutes: route.estimated_duration_minutes,
            prerequisites,
            warnings,
        };

        if accessible {
            available.push(path);
        } else {
            blocked.push(path);
        }
    }

    (available, blocked)
}

/// Same rule as the resume advisor's first branch, plus the optional
/// enrichment detour when it is open.
pub fn recommended_next_steps(snapshot: &SessionSnapshot) -> Vec<WorkflowStep> {
    let primary = WorkflowStep::resume_point(&snapshot.completed_steps);
    let mut steps = vec![primary];

    if primary != WorkflowStep::Enrichment
        && snapshot.is_completed(WorkflowStep::Analysis)
        && !snapshot.is_completed(WorkflowStep::Enrichment)
    {
        steps.push(WorkflowStep::Enrichment);
    }

    steps
}

/// Issue summaries derived from what the snapshot reports.
pub fn critical_issues(snapshot: &SessionSnapshot) -> Vec<String> {
    let mut issues = Vec::new();
    if !snapshot.validation_issues.is_empty() {
        issues.push(format!(
            "{} unresolved validation issue(s)",
            snapshot.validation_issue_count()
        ));
    }
    if snapshot.failed_checkpoint_count > 0 {
        issues.push(format!(
            "{} failed checkpoint(s)",
            snapshot.failed_checkpoint_count
        ));
    }
    issues
}

/// Assemble the full derived context for a snapshot.
pub fn build_context(routes: &RouteDirectory, snapshot: &SessionSnapshot) -> NavigationContext {
    let (available_paths, blocked_paths) = build_paths(routes, snapshot);

    NavigationContext {
        session_id: snapshot.session_id.clone(),
        current_address: routes.address_for(
            &snapshot.session_id,
            snapshot.current_step,
            None,
            &BTreeMap::new(),
        ),
        available_paths,
        blocked_paths,
        recommended_next_steps: recommended_next_steps(snapshot),
        completion_percentage: completion_percentage(snapshot),
        critical_issues: critical_issues(snapshot),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::session::StepProgress;

    fn snapshot_with_completed(steps: &[WorkflowStep]) -> SessionSnapshot {
        let mut snapshot = SessionSnapshot::new("s1", WorkflowStep::Intake);
        for step in steps {
            snapshot.completed_steps.insert(*step);
        }
        snapshot
    }

    #[test]
    fn test_worked_example_bounds() {
        // completed {intake, processing}, analysis in progress at 75%
        let mut snapshot =
            snapshot_with_completed(&[WorkflowStep::Intake, WorkflowStep::Processing]);
        snapshot.current_step = WorkflowStep::Analysis;
        snapshot.step_progress.insert(
            WorkflowStep::Analysis,
            StepProgress {
                completion_percent: 75.0,
                time_spent_seconds: 600,
            },
        );

        let two_of_seven = 2.0 / 7.0 * 80.0; // ~22.9
        let three_of_seven = 3.0 / 7.0 * 80.0; // ~34.3
        let percent = completion_percentage(&snapshot);
        assert!(percent > two_of_seven, "{percent} <= {two_of_seven}");
        assert!(percent < three_of_seven, "{percent} >= {three_of_seven}");
    }

    #[test]
    fn test_enrichment_and_feature_bonuses() {
        let mut snapshot = snapshot_with_completed(&WorkflowStep::MAIN_PIPELINE);
        snapshot.current_step = WorkflowStep::Completed;
        assert_eq!(completion_percentage(&snapshot), 80.0);

        snapshot.completed_steps.insert(WorkflowStep::Enrichment);
        assert_eq!(completion_percentage(&snapshot), 90.0);

        for i in 0..3 {
            snapshot.enabled_features.insert(format!("feature-{i}"));
        }
        assert_eq!(completion_percentage(&snapshot), 96.0);

        // The feature bonus caps at 10, and the total clamps at 100
        for i in 3..20 {
            snapshot.enabled_features.insert(format!("feature-{i}"));
        }
        assert_eq!(completion_percentage(&snapshot), 100.0);
    }

    #[test]
    fn test_paths_partition_by_accessibility() {
        let snapshot = snapshot_with_completed(&[WorkflowStep::Intake]);
        let routes = RouteDirectory::new();
        let (available, blocked) = build_paths(&routes, &snapshot);

        let available_steps: Vec<WorkflowStep> =
            available.iter().map(|p| p.step).collect();
        assert!(available_steps.contains(&WorkflowStep::Intake));
        assert!(available_steps.contains(&WorkflowStep::Processing));
        assert!(!available_steps.contains(&WorkflowStep::Analysis));

        let analysis = blocked
            .iter()
            .find(|p| p.step == WorkflowStep::Analysis)
            .unwrap();
        assert!(!analysis.accessible);
        assert_eq!(analysis.warnings, vec!["Complete Processing first"]);
        assert_eq!(available.len() + blocked.len(), WorkflowStep::ALL.len());
    }

    #[test]
    fn test_recommended_next_steps_includes_open_enrichment() {
        let snapshot = snapshot_with_completed(&[
            WorkflowStep::Intake,
            WorkflowStep::Processing,
            WorkflowStep::Analysis,
        ]);
        let steps = recommended_next_steps(&snapshot);
        assert_eq!(steps, vec![WorkflowStep::Features, WorkflowStep::Enrichment]);
    }

    #[test]
    fn test_critical_issues() {
        let mut snapshot = SessionSnapshot::new("s1", WorkflowStep::Preview);
        assert!(critical_issues(&snapshot).is_empty());

        snapshot.validation_issues.push("contact".to_string());
        snapshot.validation_issues.push("dates".to_string());
        snapshot.failed_checkpoint_count = 1;

        let issues = critical_issues(&snapshot);
        assert_eq!(issues.len(), 2);
        assert!(issues[0].contains("2 unresolved validation issue"));
        assert!(issues[1].contains("1 failed checkpoint"));
    }

    #[test]
    fn test_build_context_shape() {
        let mut snapshot =
            snapshot_with_completed(&[WorkflowStep::Intake, WorkflowStep::Processing]);
        snapshot.current_step = WorkflowStep::Analysis;

        let context = build_context(&RouteDirectory::new(), &snapshot);
        assert_eq!(context.session_id, "s1");
        assert_eq!(
            context.current_address,
            "/workflow/analysis?session=s1&step=analysis"
        );
        assert_eq!(context.recommended_next_steps, vec![WorkflowStep::Analysis]);
        assert!(context.completion_percentage > 0.0);
    }
}
