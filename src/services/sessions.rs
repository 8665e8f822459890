//! Per-session state (visit counter) behind a pluggable store

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::AppResult;

/// State kept for one browser session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub num_visits: u64,
}

/// Storage for session state, keyed by session id
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session; expired or unknown sessions are `None`
    async fn load(&self, session_id: &str) -> AppResult<Option<SessionState>>;

    /// Save a session, resetting its expiry to `ttl` from now
    async fn save(&self, session_id: &str, state: &SessionState, ttl: Duration) -> AppResult<()>;
}

/// Process-local store, for single instance deployments and tests
#[derive(Default)]
pub struct MemorySessionStore {
    /// Expiry of `None` means the ttl is too large to represent
    sessions: RwLock<HashMap<String, (SessionState, Option<Instant>)>>,
}

fn is_live(expires_at: &Option<Instant>, now: Instant) -> bool {
    expires_at.map_or(true, |at| at > now)
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, session_id: &str) -> AppResult<Option<SessionState>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(session_id)
            .filter(|(_, expires_at)| is_live(expires_at, Instant::now()))
            .map(|(state, _)| state.clone()))
    }

    async fn save(&self, session_id: &str, state: &SessionState, ttl: Duration) -> AppResult<()> {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();
        sessions.retain(|_, (_, expires_at)| is_live(expires_at, now));
        sessions.insert(session_id.to_string(), (state.clone(), now.checked_add(ttl)));
        Ok(())
    }
}

#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn SessionStore>,
    ttl: Duration,
}

impl SessionService {
    pub fn new(store: Arc<dyn SessionStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Count a visit. Returns the number of visits before this one.
    pub async fn record_visit(&self, session_id: &str) -> AppResult<u64> {
        let mut state = self.store.load(session_id).await?.unwrap_or_default();
        let previous = state.num_visits;
        state.num_visits += 1;
        self.store.save(session_id, &state, self.ttl).await?;

        tracing::debug!("Session {} visit #{}", session_id, state.num_visits);
        Ok(previous)
    }
}
