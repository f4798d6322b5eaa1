//! session.rs — in-memory keyword index cache keyed by session id.
//!
//! Each entry keeps the document snapshot its index was built from, so a
//! lookup never resolves positions against a newer load.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::analyze::keywords::KeywordIndex;
use crate::document::DocumentSet;
use crate::report::{AnalyticsEngine, AnalyticsSession};

/// Request header carrying the caller's session id.
pub const SESSION_HEADER: &str = "x-session-id";

#[derive(Debug, Clone)]
struct SessionEntry {
    documents: DocumentSet,
    index: KeywordIndex,
    stored_at: Instant,
}

#[derive(Debug)]
pub struct SessionStore {
    inner: RwLock<HashMap<String, SessionEntry>>,
    ttl: Duration,
    cap: usize,
}

impl SessionStore {
    pub fn new(ttl: Duration, cap: usize) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            ttl,
            cap: cap.max(1),
        }
    }

    /// Store (or replace) the index of a session, evicting the oldest entries over the cap.
    pub fn put(&self, id: &str, documents: DocumentSet, index: KeywordIndex) {
        let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
        map.insert(
            id.to_string(),
            SessionEntry {
                documents,
                index,
                stored_at: Instant::now(),
            },
        );
        while map.len() > self.cap {
            let oldest = map
                .iter()
                .min_by_key(|(_, e)| e.stored_at)
                .map(|(k, _)| k.clone());
            match oldest {
                Some(k) => {
                    map.remove(&k);
                    debug!(target: "session", evicted = %k, "session evicted over cap");
                }
                None => break,
            }
        }
        publish_len(map.len());
    }

    /// Restore a session with its cached snapshot and index; `None` when unknown or expired.
    pub fn session(&self, id: &str, engine: AnalyticsEngine) -> Option<AnalyticsSession> {
        let entry = {
            let map = self.inner.read().unwrap_or_else(|e| e.into_inner());
            map.get(id).cloned()
        }?;
        if entry.stored_at.elapsed() > self.ttl {
            self.remove(id);
            debug!(target: "session", id, "session expired");
            return None;
        }
        Some(AnalyticsSession::with_index(
            engine,
            entry.documents,
            Some(entry.index),
        ))
    }

    pub fn remove(&self, id: &str) {
        let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
        map.remove(id);
        publish_len(map.len());
    }

    /// Drop every expired entry; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let before = map.len();
        map.retain(|_, e| e.stored_at.elapsed() <= self.ttl);
        publish_len(map.len());
        before - map.len()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn publish_len(len: usize) {
    metrics::gauge!("analytics_sessions").set(len as f64);
}
