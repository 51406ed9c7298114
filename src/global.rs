//! Process-wide engine handle for the application boundary.
//!
//! The engine itself is explicitly constructed with injected collaborators;
//! this module only offers the one-instance-per-process convenience for
//! hosts that want it. Nothing in the core depends on it.

use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::engine::NavigationEngine;

static ENGINE: OnceCell<Arc<NavigationEngine>> = OnceCell::new();

/// Install the process-wide engine. Fails if one is already installed,
/// handing the rejected engine back to the caller.
pub fn install(engine: Arc<NavigationEngine>) -> Result<(), Arc<NavigationEngine>> {
    ENGINE.set(engine)
}

/// The process-wide engine, if one has been installed.
pub fn engine() -> Option<Arc<NavigationEngine>> {
    ENGINE.get().cloned()
}
