//! ---
//! courier_section: "01-core-functionality"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Queue engine with FIFO delivery and request correlation."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::fmt;
use std::time::{Duration, Instant};

use courier_msg::{Envelope, MsgUid};
use tracing::{debug, trace};

use crate::config::QueueConfig;
use crate::correlation::CorrelationTable;
use crate::error::UnmatchedResponse;
use crate::fifo::Fifo;
use crate::stats::{Counters, QueueStats};

/// Thread-safe message queue supporting one-way messaging and
/// request/response.
///
/// Share it between threads by reference (scoped threads) or via `Arc`.
/// Timeouts are measured on the monotonic clock; a zero timeout waits
/// indefinitely.
pub struct Queue {
    name: String,
    fifo: Fifo,
    pending: CorrelationTable,
    counters: Counters,
    get_timeout: Duration,
    request_timeout: Duration,
}

impl Queue {
    /// Create an unnamed queue with indefinite default timeouts.
    pub fn new() -> Self {
        Self::with_config(&QueueConfig::default())
    }

    /// Create a queue with the given log label.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::new()
        }
    }

    /// Create a queue from configuration.
    pub fn with_config(config: &QueueConfig) -> Self {
        Self {
            name: config.name.clone(),
            fifo: Fifo::default(),
            pending: CorrelationTable::default(),
            counters: Counters::default(),
            get_timeout: config.get_timeout,
            request_timeout: config.request_timeout,
        }
    }

    /// Log label of this queue.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a message to the tail of the queue. Never blocks.
    pub fn put(&self, msg: impl Into<Envelope>) {
        let envelope = msg.into();
        let uid = envelope.unique_id();
        let msg_id = envelope.msg_id();
        let depth = self.fifo.push(envelope);
        Counters::bump(&self.counters.put);
        trace!(queue = %self.name, %uid, msg_id, depth, "message queued");
    }

    /// Take the head of the queue, blocking for at most `timeout`.
    ///
    /// A zero `timeout` blocks until a message arrives. Returns `None` if the
    /// timeout elapses with the queue still empty.
    pub fn get(&self, timeout: Duration) -> Option<Envelope> {
        self.get_until(deadline_after(timeout))
    }

    /// Take the head of the queue, blocking until `deadline` at the latest.
    pub fn get_deadline(&self, deadline: Instant) -> Option<Envelope> {
        self.get_until(Some(deadline))
    }

    /// [`Queue::get`] with the configured default timeout.
    pub fn get_default(&self) -> Option<Envelope> {
        self.get(self.get_timeout)
    }

    /// Take the head of the queue if there is one. Never blocks.
    pub fn try_get(&self) -> Option<Envelope> {
        let envelope = self.fifo.try_pop();
        if let Some(envelope) = &envelope {
            self.record_delivery(envelope);
        }
        envelope
    }

    /// Put `msg` on the queue and block until a consumer answers it with
    /// [`Queue::respond_to`], or until `timeout` elapses.
    ///
    /// A zero `timeout` waits indefinitely. On timeout `None` is returned and
    /// the request stays in the queue; it may still be consumed normally.
    pub fn request(&self, msg: impl Into<Envelope>, timeout: Duration) -> Option<Envelope> {
        let envelope = msg.into();
        let uid = envelope.unique_id();
        let registration = self.pending.register(uid);
        Counters::bump(&self.counters.requests);
        debug!(
            queue = %self.name,
            %uid,
            msg_id = envelope.msg_id(),
            timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            "request registered"
        );

        self.put(envelope);

        match registration.wait(deadline_after(timeout)) {
            Some(response) => {
                debug!(queue = %self.name, %uid, response_msg_id = response.msg_id(), "response received");
                Some(response)
            }
            None => {
                Counters::bump(&self.counters.expired);
                debug!(queue = %self.name, %uid, "request expired without response");
                None
            }
        }
    }

    /// [`Queue::request`] with the configured default timeout.
    pub fn request_default(&self, msg: impl Into<Envelope>) -> Option<Envelope> {
        self.request(msg, self.request_timeout)
    }

    /// Answer the outstanding request whose envelope had uid `request_uid`.
    ///
    /// Returns `false` if no such request is waiting (never made, already
    /// answered or timed out); the response is then dropped. Never blocks.
    pub fn respond_to(&self, request_uid: MsgUid, response: impl Into<Envelope>) -> bool {
        self.try_respond_to(request_uid, response).is_ok()
    }

    /// Like [`Queue::respond_to`], but an unmatched response is handed back.
    pub fn try_respond_to(
        &self,
        request_uid: MsgUid,
        response: impl Into<Envelope>,
    ) -> Result<(), UnmatchedResponse> {
        match self.pending.fulfil(request_uid, response.into()) {
            Ok(()) => {
                Counters::bump(&self.counters.responses);
                trace!(queue = %self.name, uid = %request_uid, "response delivered");
                Ok(())
            }
            Err(response) => {
                Counters::bump(&self.counters.unmatched);
                debug!(queue = %self.name, uid = %request_uid, "no outstanding request for response");
                Err(UnmatchedResponse {
                    uid: request_uid,
                    response,
                })
            }
        }
    }

    /// Number of queued messages.
    pub fn len(&self) -> usize {
        self.fifo.len()
    }

    /// Whether the queue holds no messages.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of requests currently waiting for a response.
    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }

    /// Snapshot of the activity counters.
    pub fn stats(&self) -> QueueStats {
        self.counters.snapshot()
    }

    fn get_until(&self, deadline: Option<Instant>) -> Option<Envelope> {
        let envelope = self.fifo.pop_until(deadline)?;
        self.record_delivery(&envelope);
        Some(envelope)
    }

    fn record_delivery(&self, envelope: &Envelope) {
        Counters::bump(&self.counters.delivered);
        trace!(queue = %self.name, uid = %envelope.unique_id(), msg_id = envelope.msg_id(), "message delivered");
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queue")
            .field("name", &self.name)
            .field("len", &self.len())
            .field("pending_requests", &self.pending_requests())
            .finish()
    }
}

/// Zero means no deadline; so does a timeout too large to represent.
fn deadline_after(timeout: Duration) -> Option<Instant> {
    if timeout.is_zero() {
        None
    } else {
        Instant::now().checked_add(timeout)
    }
}
