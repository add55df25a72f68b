//! Tracking of open event streams

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Counts open event streams
#[derive(Debug, Clone, Default)]
pub struct StreamTracker {
    active: Arc<AtomicUsize>,
}

impl StreamTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new stream; it stays counted until the guard is dropped
    pub fn open(&self, agent_id: String) -> StreamGuard {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(agent = %agent_id, active, "event stream opened");
        StreamGuard {
            active: self.active.clone(),
            agent_id,
            opened_at: Instant::now(),
        }
    }

    /// Get active stream count
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

/// Owned by one stream; releases its slot when the stream is dropped
#[derive(Debug)]
pub struct StreamGuard {
    active: Arc<AtomicUsize>,
    agent_id: String,
    opened_at: Instant,
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        let active = self.active.fetch_sub(1, Ordering::SeqCst) - 1;
        tracing::info!(
            agent = %self.agent_id,
            active,
            open_secs = self.opened_at.elapsed().as_secs(),
            "event stream closed"
        );
    }
}
