//! ---
//! courier_section: "01-core-functionality"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Queue engine with FIFO delivery and request correlation."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use courier_msg::{Envelope, MsgUid};
use parking_lot::{Condvar, Mutex};

/// One-shot response slot for an outstanding request.
#[derive(Debug)]
struct PendingRequest {
    response: Option<Envelope>,
    signal: Arc<Condvar>,
}

/// Outstanding requests keyed by the uid of the request envelope.
///
/// Guarded by its own lock, never held together with the FIFO lock.
#[derive(Debug, Default)]
pub(crate) struct CorrelationTable {
    pending: Mutex<HashMap<MsgUid, PendingRequest>>,
}

impl CorrelationTable {
    /// Register a request. The entry lives until the returned handle is
    /// waited on or dropped.
    pub(crate) fn register(&self, uid: MsgUid) -> Registration<'_> {
        let signal = Arc::new(Condvar::new());
        self.pending.lock().insert(
            uid,
            PendingRequest {
                response: None,
                signal: Arc::clone(&signal),
            },
        );
        Registration {
            table: self,
            uid,
            signal,
            settled: false,
        }
    }

    /// Store `response` for `uid` and wake its waiter. Gives the response
    /// back if the request is unknown, expired or already answered.
    pub(crate) fn fulfil(&self, uid: MsgUid, response: Envelope) -> Result<(), Envelope> {
        let mut pending = self.pending.lock();
        match pending.get_mut(&uid) {
            Some(entry) if entry.response.is_none() => {
                entry.response = Some(response);
                entry.signal.notify_one();
                Ok(())
            }
            _ => Err(response),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.lock().len()
    }
}

/// Handle held by the requesting thread while its entry is registered.
pub(crate) struct Registration<'a> {
    table: &'a CorrelationTable,
    uid: MsgUid,
    signal: Arc<Condvar>,
    settled: bool,
}

impl Registration<'_> {
    /// Block until a response is stored or `deadline` passes (`None` waits
    /// forever). The entry is removed under the same lock acquisition that
    /// decides the outcome, so a filled slot always wins over the deadline.
    pub(crate) fn wait(mut self, deadline: Option<Instant>) -> Option<Envelope> {
        let mut pending = self.table.pending.lock();
        let outcome = loop {
            let Some(entry) = pending.get_mut(&self.uid) else {
                break None;
            };
            if let Some(response) = entry.response.take() {
                break Some(response);
            }
            match deadline {
                Some(deadline) if Instant::now() >= deadline => break None,
                Some(deadline) => {
                    self.signal.wait_until(&mut pending, deadline);
                }
                None => self.signal.wait(&mut pending),
            }
        };
        pending.remove(&self.uid);
        self.settled = true;
        outcome
    }
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.table.pending.lock().remove(&self.uid);
        }
    }
}
