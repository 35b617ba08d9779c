//! Per-session score storage
//!
//! Sessions are keyed by a UUID carried in the `introquiz_session` cookie.
//! The store is owned by [`crate::AppState`] and handed to the quiz service
//! on each call.

use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

/// Cookie carrying the session id
pub const SESSION_COOKIE: &str = "introquiz_session";

/// Opaque session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value.trim()).ok().map(Self)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The two most recently submitted player scores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    #[serde(rename = "player1Score")]
    pub player1_score: i64,
    #[serde(rename = "player2Score")]
    pub player2_score: i64,
}

/// Sessions idle longer than this are dropped
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Upper bound on stored sessions; the least recently used is evicted
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct SessionEntry {
    record: ScoreRecord,
    last_seen: Instant,
    /// Touch order, breaks ties between equal instants
    seq: u64,
}

#[derive(Debug, Default)]
struct SessionMap {
    entries: HashMap<SessionId, SessionEntry>,
    next_seq: u64,
}

impl SessionMap {
    fn touch(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}

/// Session id -> last submitted scores
///
/// Last write wins. Entries idle past the TTL are pruned on every write and
/// ignored on read; at capacity the least recently used entry is evicted.
/// Locks are never held across an await point.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<SessionMap>>,
    ttl: Duration,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_SESSION_TTL, DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with an explicit idle TTL and capacity (at least 1)
    pub fn with_limits(ttl: Duration, max_sessions: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionMap::default())),
            ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    fn expired(&self, entry: &SessionEntry, now: Instant) -> bool {
        now.duration_since(entry.last_seen) >= self.ttl
    }

    /// Last record for a live session; reading keeps the session alive
    pub fn get(&self, id: SessionId) -> Option<ScoreRecord> {
        let now = Instant::now();
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let map = &mut *guard;

        let expired = self.expired(map.entries.get(&id)?, now);
        if expired {
            map.entries.remove(&id);
            return None;
        }

        let seq = map.touch();
        let entry = map.entries.get_mut(&id)?;
        entry.last_seen = now;
        entry.seq = seq;
        Some(entry.record)
    }

    /// Overwrite the session's record wholesale
    pub fn put(&self, id: SessionId, record: ScoreRecord) {
        let now = Instant::now();
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let map = &mut *guard;

        let before = map.entries.len();
        map.entries.retain(|_, entry| !self.expired(entry, now));
        let pruned = before - map.entries.len();
        if pruned > 0 {
            debug!("Pruned {} idle sessions", pruned);
        }

        if !map.entries.contains_key(&id) && map.entries.len() >= self.max_sessions {
            let oldest = map
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.seq)
                .map(|(key, _)| *key);
            if let Some(oldest) = oldest {
                map.entries.remove(&oldest);
                debug!("Session store full, evicted {}", oldest);
            }
        }

        let seq = map.touch();
        map.entries.insert(
            id,
            SessionEntry {
                record,
                last_seen: now,
                seq,
            },
        );
    }

    /// Stored sessions, including idle ones not yet pruned
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Find a valid session id among the request's cookies
pub fn session_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| SessionId::parse(value))
}

/// `Set-Cookie` value for a new session
pub fn session_cookie(id: SessionId) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id)
}

/// Middleware: attach a [`SessionId`] to every request, issuing a cookie
/// when the caller has none
pub async fn ensure_session(mut request: Request, next: Next) -> Response {
    let existing = session_from_headers(request.headers());
    let session_id = existing.unwrap_or_default();
    request.extensions_mut().insert(session_id);

    let mut response = next.run(request).await;

    if existing.is_none() {
        debug!("Issuing new session {}", session_id);
        if let Ok(value) = HeaderValue::from_str(&session_cookie(session_id)) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}
