use super::state::{Facet, FilterState};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

/// Filter state together with the number of mutations applied so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSnapshot {
    pub revision: u64,
    pub state: FilterState,
}

/// Shared filter context for one browsing session.
///
/// Every clone observes and mutates the same state. Each mutation is applied
/// as a whole under the channel lock, so readers never see a half-cleared state.
#[derive(Debug, Clone)]
pub struct FilterSession {
    sender: Arc<watch::Sender<FilterSnapshot>>,
}

impl Default for FilterSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterSession {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(FilterSnapshot::default());
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Latest state. Take one at the start of every derived computation.
    pub fn snapshot(&self) -> FilterSnapshot {
        self.sender.borrow().clone()
    }

    pub fn state(&self) -> FilterState {
        self.sender.borrow().state.clone()
    }

    /// Receiver notified after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<FilterSnapshot> {
        self.sender.subscribe()
    }

    pub fn set_query(&self, query: impl Into<String>) -> FilterSnapshot {
        let query = query.into();
        self.mutate(|state| state.set_query(query))
    }

    pub fn set_filter(&self, facet: Facet, value: impl Into<String>) -> FilterSnapshot {
        let value = value.into();
        self.mutate(|state| state.set_filter(facet, value))
    }

    pub fn clear_all(&self) -> FilterSnapshot {
        self.mutate(FilterState::clear_all)
    }

    fn mutate<F>(&self, apply: F) -> FilterSnapshot
    where
        F: FnOnce(&mut FilterState),
    {
        let mut updated = FilterSnapshot::default();
        self.sender.send_modify(|snapshot| {
            apply(&mut snapshot.state);
            snapshot.revision += 1;
            updated = snapshot.clone();
        });
        updated
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = SessionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| SessionError::InvalidId(raw.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("browsing session '{0}' not found")]
    NotFound(SessionId),
    #[error("'{0}' is not a valid session id")]
    InvalidId(String),
}

/// Sessions untouched for this long are dropped on the next registry access.
pub const DEFAULT_SESSION_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug)]
struct SessionEntry {
    session: FilterSession,
    last_seen: Instant,
}

/// Live browsing sessions. A session lives until it is closed or sits idle
/// for longer than the registry's TTL; nothing is persisted.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<SessionId, SessionEntry>>>,
    idle_ttl: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_idle_ttl(DEFAULT_SESSION_IDLE_TTL)
    }
}

impl SessionRegistry {
    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            idle_ttl,
        }
    }

    pub fn idle_ttl(&self) -> Duration {
        self.idle_ttl
    }

    pub fn open(&self) -> (SessionId, FilterSession) {
        let id = SessionId::random();
        let session = FilterSession::new();
        let now = Instant::now();

        let mut sessions = self.lock();
        self.sweep(&mut sessions, now);
        sessions.insert(
            id,
            SessionEntry {
                session: session.clone(),
                last_seen: now,
            },
        );
        debug!(session = %id, live = sessions.len(), "browsing session opened");
        (id, session)
    }

    /// Fetch a live session and mark it as seen.
    pub fn get(&self, id: &SessionId) -> Result<FilterSession, SessionError> {
        let now = Instant::now();
        let mut sessions = self.lock();
        self.sweep(&mut sessions, now);

        let entry = sessions.get_mut(id).ok_or(SessionError::NotFound(*id))?;
        entry.last_seen = now;
        Ok(entry.session.clone())
    }

    pub fn close(&self, id: &SessionId) -> Result<(), SessionError> {
        match self.lock().remove(id) {
            Some(_) => {
                debug!(session = %id, "browsing session closed");
                Ok(())
            }
            None => Err(SessionError::NotFound(*id)),
        }
    }

    /// Number of live sessions, after dropping idle ones.
    pub fn len(&self) -> usize {
        let mut sessions = self.lock();
        self.sweep(&mut sessions, Instant::now());
        sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sweep(&self, sessions: &mut HashMap<SessionId, SessionEntry>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < self.idle_ttl);

        let expired = before - sessions.len();
        if expired > 0 {
            debug!(
                expired,
                idle_ttl_secs = self.idle_ttl.as_secs(),
                "idle browsing sessions dropped"
            );
        }
    }

    // A handler that panicked mid-request leaves the map itself consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
