//! ---
//! courier_section: "01-core-functionality"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Queue engine with FIFO delivery and request correlation."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Snapshot of queue activity counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    /// Envelopes appended to the FIFO, requests included.
    pub put: u64,
    /// Envelopes handed to consumers by `get` / `try_get`.
    pub delivered: u64,
    /// Requests registered.
    pub requests: u64,
    /// Responses accepted by `respond_to`.
    pub responses: u64,
    /// Requests that timed out before a response arrived.
    pub expired: u64,
    /// Responses rejected because no matching request was outstanding.
    pub unmatched: u64,
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub(crate) put: AtomicU64,
    pub(crate) delivered: AtomicU64,
    pub(crate) requests: AtomicU64,
    pub(crate) responses: AtomicU64,
    pub(crate) expired: AtomicU64,
    pub(crate) unmatched: AtomicU64,
}

impl Counters {
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> QueueStats {
        QueueStats {
            put: self.put.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            requests: self.requests.load(Ordering::Relaxed),
            responses: self.responses.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            unmatched: self.unmatched.load(Ordering::Relaxed),
        }
    }
}
