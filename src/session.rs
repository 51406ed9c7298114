//! External session service port.
//!
//! The remote store owns the authoritative session record; the engine only
//! reads snapshots through this trait, so any backend (or a test fake) can
//! stand in.

use async_trait::async_trait;

use crate::error::NavigationError;
use crate::types::session::SessionSnapshot;

/// Remote store holding the authoritative progress record per session.
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Fetch the snapshot for a session, or `None` when the service has no
    /// record of it. Transport failures map to
    /// [`NavigationError::Transient`] so the retry layer can re-attempt
    /// them.
    async fn get_snapshot(
        &self,
        session_id: &str,
    ) -> Result<Option<SessionSnapshot>, NavigationError>;
}
