//! Navigation orchestration: history, context, breadcrumbs, persistence.
//!
//! `NavigationEngine` is the only component exposed to callers. It composes
//! the route directory and resume advisor, owns the per-session history
//! stacks, and is the sole writer to the history bridge and the local state
//! store.

pub mod cache;
pub mod context;
pub mod debounce;
pub mod history;
pub mod retry;

use chrono::{Duration as ChronoDuration, Utc};
use futures_util::FutureExt;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::advisor::ResumeAdvisor;
use crate::bridge::{
    AlwaysOnline, ConnectivityProbe, HistoryBridge, HistoryEntry, NoopHistoryBridge,
};
use crate::config::EngineConfig;
use crate::error::NavigationError;
use crate::persist::{
    context_cache_key, MemoryStateStore, PersistedContext, PersistedNavigation, StateStore,
    NAVIGATION_STATE_KEY, NAVIGATION_STATE_VERSION,
};
use crate::routes::RouteDirectory;
use crate::session::SessionService;
use crate::types::navigation::{
    Breadcrumb, BreadcrumbMeta, NavigationContext, NavigationState, TransitionKind,
};
use crate::types::session::SessionSnapshot;

use self::cache::{ContextCache, InflightRequests};
use self::debounce::Debouncer;
use self::history::{HistoryStore, MemoryHistoryStore};
use self::retry::RetryPolicy;

/// Capacity of the navigation event channel.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// The stateful core of the workflow navigation engine.
pub struct NavigationEngine {
    config: EngineConfig,
    routes: Arc<RouteDirectory>,
    advisor: ResumeAdvisor,
    session_service: Arc<dyn SessionService>,
    history_bridge: Arc<dyn HistoryBridge>,
    connectivity: Arc<dyn ConnectivityProbe>,
    state_store: Arc<dyn StateStore>,
    histories: Arc<dyn HistoryStore>,
    context_cache: ContextCache,
    inflight: InflightRequests,
    debouncer: Debouncer,
    retry: RetryPolicy,
    events: RwLock<broadcast::Sender<NavigationState>>,
}

impl NavigationEngine {
    /// Engine with default in-memory stores and no-op platform bridges.
    /// Collaborators are swapped in through the `with_*` builders.
    pub fn new(
        config: EngineConfig,
        routes: Arc<RouteDirectory>,
        advisor: ResumeAdvisor,
        session_service: Arc<dyn SessionService>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let retry = RetryPolicy::from_config(&config.retry);
        Self {
            config,
            routes,
            advisor,
            session_service,
            history_bridge: Arc::new(NoopHistoryBridge),
            connectivity: Arc::new(AlwaysOnline),
            state_store: Arc::new(MemoryStateStore::new()),
            histories: Arc::new(MemoryHistoryStore::new()),
            context_cache: ContextCache::new(),
            inflight: InflightRequests::new(),
            debouncer: Debouncer::new(),
            retry,
            events: RwLock::new(events),
        }
    }

    pub fn with_history_bridge(mut self, bridge: Arc<dyn HistoryBridge>) -> Self {
        self.history_bridge = bridge;
        self
    }

    pub fn with_connectivity(mut self, probe: Arc<dyn ConnectivityProbe>) -> Self {
        self.connectivity = probe;
        self
    }

    pub fn with_state_store(mut self, store: Arc<dyn StateStore>) -> Self {
        self.state_store = store;
        self
    }

    pub fn with_history_store(mut self, store: Arc<dyn HistoryStore>) -> Self {
        self.histories = store;
        self
    }

    /// The advisor this engine consults, for callers that want resume
    /// recommendations directly.
    pub fn advisor(&self) -> &ResumeAdvisor {
        &self.advisor
    }

    /// Subscribe to externally driven navigation events.
    pub fn subscribe(&self) -> broadcast::Receiver<NavigationState> {
        let events = self.events.read().unwrap_or_else(|e| e.into_inner());
        events.subscribe()
    }

    fn emit(&self, state: NavigationState) {
        let sender = {
            let events = self.events.read().unwrap_or_else(|e| e.into_inner());
            events.clone()
        };
        // send only fails when nobody is subscribed
        let _ = sender.send(state);
    }

    /// Record a forward navigation and mirror it to the native history.
    #[instrument(skip(self, state), fields(session = %state.session_id, step = %state.step))]
    pub fn push_state(&self, state: NavigationState) {
        let mut history = self.histories.get(&state.session_id).unwrap_or_default();
        history.push(state.clone());
        self.histories.set(&state.session_id, history);
        self.write_bridge_entry(&state, false);
    }

    /// Replace the history tail instead of appending.
    #[instrument(skip(self, state), fields(session = %state.session_id, step = %state.step))]
    pub fn replace_state(&self, state: NavigationState) {
        let state = state.with_transition(TransitionKind::Replace);
        let mut history = self.histories.get(&state.session_id).unwrap_or_default();
        history.pop();
        history.push(state.clone());
        self.histories.set(&state.session_id, history);
        self.write_bridge_entry(&state, true);
    }

    /// Debounced navigation: rapid repeated requests for the same
    /// (session, step) key collapse into the most recent one.
    pub fn request_navigation(self: &Arc<Self>, state: NavigationState) {
        let key = format!("{}:{}", state.session_id, state.step);
        let window = Duration::from_millis(self.config.debounce_window_ms);
        let engine = Arc::clone(self);
        self.debouncer.schedule(&key, window, async move {
            engine.push_state(state);
        });
    }

    /// Handle a back navigation for a session: pop the tail and return a
    /// copy of the new tail tagged as a back transition. Returns `None`
    /// with no current state or fewer than two entries; history is left
    /// untouched in that case. The popped entry is gone for good - there is
    /// no forward stack to restore it from.
    pub fn handle_back_navigation(&self, session_id: &str) -> Option<NavigationState> {
        let mut history = self.histories.get(session_id)?;
        if history.len() < 2 {
            return None;
        }
        history.pop();
        let tail = history.last().cloned()?;
        self.histories.set(session_id, history);

        let back = tail.as_back();
        self.emit(back.clone());
        Some(back)
    }

    /// Externally driven navigation (native back/forward) resolved from an
    /// address. Emits a navigation event; returns `None` for addresses that
    /// carry no navigable state.
    pub fn handle_external_navigation(&self, address: &str) -> Option<NavigationState> {
        let state = self.routes.parse_address(address)?;
        debug!(
            "external navigation to {} for session {}",
            state.step, state.session_id
        );
        self.emit(state.clone());
        Some(state)
    }

    /// The primary read operation: derived reachability, recommendations,
    /// completion, and issues for a session.
    #[instrument(skip(self))]
    pub async fn get_navigation_context(
        &self,
        session_id: &str,
    ) -> Result<NavigationContext, NavigationError> {
        if !self.connectivity.is_online() {
            if let Some(cached) = self.cached_context(session_id) {
                debug!("offline: serving cached context for {session_id}");
                return Ok(cached);
            }
        }

        let snapshot = self.fetch_snapshot(session_id).await?;
        let context = context::build_context(&self.routes, &snapshot);
        self.cache_context(&context);
        Ok(context)
    }

    /// One breadcrumb per step the user has reached, in canonical order.
    pub fn generate_breadcrumbs(&self, snapshot: &SessionSnapshot) -> Vec<Breadcrumb> {
        let mut crumbs = Vec::new();
        for route in self.routes.all_routes() {
            let step = route.step;
            let reached = snapshot.is_completed(step) || snapshot.current_step == step;
            if !reached {
                continue;
            }
            crumbs.push(Breadcrumb {
                id: Uuid::new_v4(),
                label: route.title.to_string(),
                address: self.routes.address_for(
                    &snapshot.session_id,
                    step,
                    None,
                    &BTreeMap::new(),
                ),
                step,
                completed: snapshot.is_completed(step),
                accessible: step.accessible(&snapshot.completed_steps),
                metadata: BreadcrumbMeta {
                    icon: route.icon.to_string(),
                    description: route.description.to_string(),
                },
            });
        }
        crumbs
    }

    /// Mirror every session history to the durable store.
    pub fn persist(&self) {
        let payload = PersistedNavigation {
            navigation_state: self.histories.export(),
            timestamp: Utc::now(),
            version: NAVIGATION_STATE_VERSION,
        };
        match serde_json::to_string(&payload) {
            Ok(raw) => {
                if let Err(err) = self.state_store.set(NAVIGATION_STATE_KEY, &raw) {
                    warn!("failed to persist navigation state: {err}");
                }
            }
            Err(err) => warn!("failed to serialize navigation state: {err}"),
        }
    }

    /// Restore histories persisted by an earlier process. Stale or corrupt
    /// backups are deleted and ignored. Returns whether anything was
    /// restored.
    pub fn restore(&self) -> bool {
        let raw = match self.state_store.get(NAVIGATION_STATE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return false,
            Err(err) => {
                warn!("unreadable navigation backup: {err}");
                let _ = self.state_store.delete(NAVIGATION_STATE_KEY);
                return false;
            }
        };

        let payload: PersistedNavigation = match serde_json::from_str(&raw) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("corrupt navigation backup: {err}");
                let _ = self.state_store.delete(NAVIGATION_STATE_KEY);
                return false;
            }
        };

        if payload.version != NAVIGATION_STATE_VERSION
            || !payload.is_fresh(self.config.state_freshness_hours as i64)
        {
            debug!("discarding stale navigation backup");
            let _ = self.state_store.delete(NAVIGATION_STATE_KEY);
            return false;
        }

        for (session_id, history) in payload.navigation_state {
            self.histories.set(&session_id, history);
        }
        info!("restored navigation histories");
        true
    }

    /// Cancel pending debounces, drop caches, detach listeners, and bound
    /// per-session history growth.
    pub fn cleanup(&self) {
        self.debouncer.cancel_all();
        self.context_cache.clear();
        self.inflight.clear();

        {
            let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
            let mut events = self.events.write().unwrap_or_else(|e| e.into_inner());
            *events = sender;
        }

        let retention = self.config.history_retention;
        for session_id in self.histories.session_ids() {
            if let Some(history) = self.histories.get(&session_id) {
                if history.len() > retention {
                    let truncated = history[history.len() - retention..].to_vec();
                    self.histories.set(&session_id, truncated);
                }
            }
        }
    }

    /// Current tail of a session's history.
    pub fn current_state(&self, session_id: &str) -> Option<NavigationState> {
        self.histories.get(session_id)?.last().cloned()
    }

    pub fn history_len(&self, session_id: &str) -> usize {
        self.histories.get(session_id).map_or(0, |h| h.len())
    }

    fn write_bridge_entry(&self, state: &NavigationState, replace: bool) {
        let address = self.routes.address_for(
            &state.session_id,
            state.step,
            state.substep.as_deref(),
            &state.parameters,
        );
        let title = self.routes.route_for(state.step).map_or_else(
            || self.config.product_name.clone(),
            |r| format!("{} - {}", self.config.product_name, r.title),
        );
        let entry = HistoryEntry {
            session_id: state.session_id.clone(),
            step: state.step,
            substep: state.substep.clone(),
            timestamp: state.timestamp,
        };

        let result = if replace {
            self.history_bridge.replace_entry(&entry, &title, &address)
        } else {
            self.history_bridge.push_entry(&entry, &title, &address)
        };
        if let Err(err) = result {
            // Navigation bookkeeping must never crash the caller
            warn!("history bridge write failed: {err}");
        }
    }

    /// Fresh in-memory cached context, falling back to the persisted
    /// per-session cache.
    fn cached_context(&self, session_id: &str) -> Option<NavigationContext> {
        let window = ChronoDuration::minutes(self.config.cache_freshness_minutes as i64);
        if let Some(context) = self.context_cache.get_fresh(session_id, window) {
            return Some(context);
        }
        self.persisted_context(session_id)
    }

    fn persisted_context(&self, session_id: &str) -> Option<NavigationContext> {
        let key = context_cache_key(session_id);
        let raw = match self.state_store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!("unreadable cached context for {session_id}: {err}");
                let _ = self.state_store.delete(&key);
                return None;
            }
        };

        match serde_json::from_str::<PersistedContext>(&raw) {
            Ok(cached) if cached.is_fresh(self.config.cache_freshness_minutes as i64) => {
                Some(cached.context)
            }
            Ok(_) => {
                // Stale entries are discarded rather than restored
                let _ = self.state_store.delete(&key);
                None
            }
            Err(err) => {
                warn!("corrupt cached context for {session_id}: {err}");
                let _ = self.state_store.delete(&key);
                None
            }
        }
    }

    fn cache_context(&self, context: &NavigationContext) {
        self.context_cache.insert(context.clone());

        let persisted = PersistedContext {
            context: context.clone(),
            timestamp: Utc::now(),
            session_id: context.session_id.clone(),
        };
        match serde_json::to_string(&persisted) {
            Ok(raw) => {
                let key = context_cache_key(&context.session_id);
                if let Err(err) = self.state_store.set(&key, &raw) {
                    warn!("failed to persist context cache: {err}");
                }
            }
            Err(err) => warn!("failed to serialize context cache: {err}"),
        }
    }

    /// Fetch a snapshot, sharing one in-flight request per session and
    /// retrying transient failures with exponential backoff.
    async fn fetch_snapshot(
        &self,
        session_id: &str,
    ) -> Result<SessionSnapshot, NavigationError> {
        let key = format!("snapshot:{session_id}");
        let shared = self.inflight.get_or_insert(&key, || {
            let service = Arc::clone(&self.session_service);
            let retry = self.retry.clone();
            let session_id = session_id.to_string();
            async move {
                retry
                    .run("get_snapshot", || {
                        let service = Arc::clone(&service);
                        let session_id = session_id.clone();
                        async move {
                            match service.get_snapshot(&session_id).await? {
                                Some(snapshot) => Ok(snapshot),
                                None => Err(NavigationError::not_found(session_id)),
                            }
                        }
                    })
                    .await
            }
            .boxed()
        });

        let result = shared.await;
        self.inflight.remove(&key);
        result
    }
}
