//! Wayfinder - workflow navigation and resume engine for guided document
//! pipelines.
//!
//! Models the workflow as a prerequisite DAG, converts navigation states to
//! shareable addresses, keeps per-session history synchronized with a
//! native back/forward bridge, and recommends where a returning user should
//! resume. Survives reloads, duplicated tabs, and transient network failure
//! through caching, bounded retry, and debouncing.

pub mod advisor;
pub mod bridge;
pub mod config;
pub mod engine;
pub mod error;
pub mod global;
pub mod logging;
pub mod persist;
pub mod routes;
pub mod session;
pub mod types;

pub use advisor::ResumeAdvisor;
pub use config::EngineConfig;
pub use engine::NavigationEngine;
pub use error::NavigationError;
pub use routes::{RouteDefinition, RouteDirectory};
pub use session::SessionService;
pub use types::navigation::{
    Breadcrumb, NavigationContext, NavigationPath, NavigationState, TransitionKind,
};
pub use types::resume::{ResumePriority, ResumeRecommendation};
pub use types::session::{SessionSnapshot, StepProgress};
pub use types::step::WorkflowStep;
