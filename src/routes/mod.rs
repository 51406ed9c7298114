//! Static route directory and address codec.
//!
//! One route per workflow step, built once at construction. Addresses carry
//! the session and step as mandatory query keys so a link can be shared or
//! restored after a reload.

use chrono::Utc;
use std::collections::BTreeMap;
use url::form_urlencoded;

use crate::types::navigation::{NavigationState, TransitionKind};
use crate::types::step::WorkflowStep;

/// Query keys the codec owns; caller parameters may not shadow them.
const RESERVED_KEYS: [&str; 3] = ["session", "step", "substep"];

/// Immutable route metadata for one workflow step.
#[derive(Debug, Clone)]
pub struct RouteDefinition {
    pub step: WorkflowStep,
    pub address_template: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub estimated_duration_minutes: u32,
    /// Inputs the step needs before it can produce anything.
    pub required_data: &'static [&'static str],
}

/// The static directory, in pipeline order.
static ROUTES: &[RouteDefinition] = &[
    RouteDefinition {
        step: WorkflowStep::Intake,
        address_template: "/workflow/intake",
        title: "Intake",
        icon: "clipboard",
        description: "Collect the source document and basic details",
        estimated_duration_minutes: 5,
        required_data: &["source document"],
    },
    RouteDefinition {
        step: WorkflowStep::Processing,
        address_template: "/workflow/processing",
        title: "Processing",
        icon: "gear",
        description: "Extract and normalize the uploaded content",
        estimated_duration_minutes: 2,
        required_data: &["intake submission"],
    },
    RouteDefinition {
        step: WorkflowStep::Analysis,
        address_template: "/workflow/analysis",
        title: "Analysis",
        icon: "chart",
        description: "Review the automated content analysis",
        estimated_duration_minutes: 8,
        required_data: &["processed content"],
    },
    RouteDefinition {
        step: WorkflowStep::Features,
        address_template: "/workflow/features",
        title: "Feature Selection",
        icon: "sliders",
        description: "Choose which sections and extras to include",
        estimated_duration_minutes: 6,
        required_data: &["analysis results"],
    },
    RouteDefinition {
        step: WorkflowStep::Templates,
        address_template: "/workflow/templates",
        title: "Template Selection",
        icon: "layout",
        description: "Pick a layout for the final document",
        estimated_duration_minutes: 4,
        required_data: &["selected features"],
    },
    RouteDefinition {
        step: WorkflowStep::Preview,
        address_template: "/workflow/preview",
        title: "Preview",
        icon: "eye",
        description: "Inspect the assembled document before export",
        estimated_duration_minutes: 5,
        required_data: &["selected template"],
    },
    RouteDefinition {
        step: WorkflowStep::Results,
        address_template: "/workflow/results",
        title: "Results",
        icon: "download",
        description: "Export and share the finished document",
        estimated_duration_minutes: 3,
        required_data: &["approved preview"],
    },
    RouteDefinition {
        step: WorkflowStep::Enrichment,
        address_template: "/workflow/enrichment",
        title: "Enrichment",
        icon: "sparkles",
        description: "Optional extras layered on top of the analysis",
        estimated_duration_minutes: 10,
        required_data: &["analysis results"],
    },
    RouteDefinition {
        step: WorkflowStep::Completed,
        address_template: "/workflow/completed",
        title: "Completed",
        icon: "check",
        description: "Session wrap-up",
        estimated_duration_minutes: 1,
        required_data: &[],
    },
];

/// Step-to-route lookup and NavigationState/address conversion. No state
/// beyond the static table; no side effects.
#[derive(Debug, Clone, Default)]
pub struct RouteDirectory;

impl RouteDirectory {
    pub fn new() -> Self {
        Self
    }

    /// Route metadata for a step.
    pub fn route_for(&self, step: WorkflowStep) -> Option<&'static RouteDefinition> {
        ROUTES.iter().find(|r| r.step == step)
    }

    /// Every route, in pipeline order.
    pub fn all_routes(&self) -> &'static [RouteDefinition] {
        ROUTES
    }

    /// Deterministic address for a navigation target. All supplied
    /// parameters are preserved as query pairs; reserved keys are skipped
    /// since the codec writes them itself.
    pub fn address_for(
        &self,
        session_id: &str,
        step: WorkflowStep,
        substep: Option<&str>,
        parameters: &BTreeMap<String, String>,
    ) -> String {
        let template = self
            .route_for(step)
            .map_or("/workflow", |r| r.address_template);

        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("session", session_id);
        query.append_pair("step", step.as_str());
        if let Some(substep) = substep {
            query.append_pair("substep", substep);
        }
        for (key, value) in parameters {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            query.append_pair(key, value);
        }

        format!("{}?{}", template, query.finish())
    }

    /// Inverse of [`RouteDirectory::address_for`]. Returns `None` when the
    /// address lacks a session or step key or is not well formed; callers
    /// treat that as "no navigable state", not as failure. Unrecognized
    /// query keys round-trip into the parameter map.
    pub fn parse_address(&self, address: &str) -> Option<NavigationState> {
        let (_, query) = address.split_once('?')?;

        let mut session_id = None;
        let mut step = None;
        let mut substep = None;
        let mut parameters = BTreeMap::new();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "session" => session_id = Some(value.into_owned()),
                "step" => step = WorkflowStep::from_key(&value),
                "substep" => substep = Some(value.into_owned()),
                other => {
                    parameters.insert(other.to_string(), value.into_owned());
                }
            }
        }

        Some(NavigationState {
            session_id: session_id?,
            step: step?,
            substep,
            timestamp: Utc::now(),
            parameters,
            transition: TransitionKind::Push,
            source_address: Some(address.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_covers_every_step() {
        let directory = RouteDirectory::new();
        for step in WorkflowStep::ALL {
            assert!(directory.route_for(step).is_some(), "missing route for {step}");
        }
        assert_eq!(directory.all_routes().len(), WorkflowStep::ALL.len());
    }

    #[test]
    fn test_address_for_basic() {
        let directory = RouteDirectory::new();
        let address = directory.address_for("s1", WorkflowStep::Analysis, None, &BTreeMap::new());
        assert_eq!(address, "/workflow/analysis?session=s1&step=analysis");
    }

    #[test]
    fn test_round_trip_with_substep_and_parameters() {
        let directory = RouteDirectory::new();
        let mut params = BTreeMap::new();
        params.insert("variant".to_string(), "b".to_string());
        params.insert("ref".to_string(), "email campaign".to_string());

        let address =
            directory.address_for("s1", WorkflowStep::Features, Some("extras"), &params);
        let state = directory.parse_address(&address).unwrap();

        assert_eq!(state.session_id, "s1");
        assert_eq!(state.step, WorkflowStep::Features);
        assert_eq!(state.substep.as_deref(), Some("extras"));
        assert_eq!(state.parameters, params);
        assert_eq!(state.source_address.as_deref(), Some(address.as_str()));
    }

    #[test]
    fn test_parse_rejects_missing_keys() {
        let directory = RouteDirectory::new();
        assert!(directory.parse_address("/workflow/analysis").is_none());
        assert!(directory
            .parse_address("/workflow/analysis?step=analysis")
            .is_none());
        assert!(directory
            .parse_address("/workflow/analysis?session=s1")
            .is_none());
        assert!(directory
            .parse_address("/workflow/analysis?session=s1&step=bogus")
            .is_none());
    }

    #[test]
    fn test_parse_tolerates_unknown_parameters() {
        let directory = RouteDirectory::new();
        let state = directory
            .parse_address("/workflow/preview?session=s1&step=preview&utm=promo&theme=dark")
            .unwrap();
        assert_eq!(state.parameters.get("utm").map(String::as_str), Some("promo"));
        assert_eq!(state.parameters.get("theme").map(String::as_str), Some("dark"));
    }

    #[test]
    fn test_reserved_parameters_are_not_duplicated() {
        let directory = RouteDirectory::new();
        let mut params = BTreeMap::new();
        params.insert("session".to_string(), "spoofed".to_string());

        let address = directory.address_for("s1", WorkflowStep::Intake, None, &params);
        let state = directory.parse_address(&address).unwrap();
        assert_eq!(state.session_id, "s1");
        assert!(state.parameters.is_empty());
    }
}
