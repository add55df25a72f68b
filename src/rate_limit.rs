//! Request rate limiting
//!
//! Counting is delegated to a [`RateLimitStore`] so the in-process map can be
//! swapped for a shared store (or a deterministic fake in tests).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::{header::AUTHORIZATION, HeaderMap};
use parking_lot::Mutex;

/// Counter state for one key right after an increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCount {
    /// Requests counted in the current window, this one included
    pub count: u32,
    /// Time until the current window closes
    pub reset_in: Duration,
}

/// Counter store keyed by client. The store owns the window length.
pub trait RateLimitStore: Send + Sync {
    /// Count one more request for `key` in its current window
    fn increment(&self, key: &str) -> WindowCount;

    /// Forget the counter for `key`
    fn reset(&self, key: &str);
}

#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    count: u32,
    reset_at: Instant,
}

/// Fixed-window counters held in process memory
pub struct InMemoryRateLimitStore {
    window: Duration,
    entries: Mutex<HashMap<String, WindowEntry>>,
}

impl InMemoryRateLimitStore {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Drop counters whose window has elapsed; returns how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.reset_at > now);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    fn increment(&self, key: &str) -> WindowCount {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let entry = entries.entry(key.to_string()).or_insert(WindowEntry {
            count: 0,
            reset_at: now + self.window,
        });
        if now >= entry.reset_at {
            *entry = WindowEntry {
                count: 0,
                reset_at: now + self.window,
            };
        }
        entry.count = entry.count.saturating_add(1);
        WindowCount {
            count: entry.count,
            reset_in: entry.reset_at.saturating_duration_since(now),
        }
    }

    fn reset(&self, key: &str) {
        self.entries.lock().remove(key);
    }
}

/// Verdict for a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time until the client's window closes
    pub reset_in: Duration,
}

impl RateDecision {
    /// Whole seconds until the window closes, rounded up and never zero
    pub fn retry_after_secs(&self) -> u64 {
        let secs = self.reset_in.as_secs() + u64::from(self.reset_in.subsec_nanos() > 0);
        secs.max(1)
    }
}

/// Applies a request budget per client key
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    limit: u32,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>, limit: u32) -> Self {
        Self { store, limit }
    }

    pub fn check(&self, key: &str) -> RateDecision {
        let window = self.store.increment(key);
        RateDecision {
            allowed: window.count <= self.limit,
            limit: self.limit,
            remaining: self.limit.saturating_sub(window.count),
            reset_in: window.reset_in,
        }
    }
}

/// Identify the caller: a credential prefix when one is sent, else the forwarded IP
pub fn client_key(headers: &HeaderMap) -> String {
    let credential = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.get(7..))
        .unwrap_or("");

    if !credential.is_empty() {
        let prefix: String = credential.chars().take(16).collect();
        return format!("key:{}", prefix);
    }

    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or("unknown");
    format!("ip:{}", ip)
}
