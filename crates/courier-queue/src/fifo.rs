//! ---
//! courier_section: "01-core-functionality"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Queue engine with FIFO delivery and request correlation."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::collections::VecDeque;
use std::time::Instant;

use courier_msg::Envelope;
use parking_lot::{Condvar, Mutex};

/// Unbounded FIFO with a "non-empty" condition for blocking consumers.
#[derive(Debug, Default)]
pub(crate) struct Fifo {
    queue: Mutex<VecDeque<Envelope>>,
    not_empty: Condvar,
}

impl Fifo {
    /// Append to the tail and wake one waiting consumer. Returns the new depth.
    pub(crate) fn push(&self, envelope: Envelope) -> usize {
        let depth = {
            let mut queue = self.queue.lock();
            queue.push_back(envelope);
            queue.len()
        };
        self.not_empty.notify_one();
        depth
    }

    /// Pop the head, waiting until `deadline` (or forever when `None`).
    pub(crate) fn pop_until(&self, deadline: Option<Instant>) -> Option<Envelope> {
        let mut queue = self.queue.lock();
        loop {
            if let Some(envelope) = queue.pop_front() {
                return Some(envelope);
            }
            match deadline {
                None => self.not_empty.wait(&mut queue),
                Some(deadline) => {
                    if self.not_empty.wait_until(&mut queue, deadline).timed_out() {
                        // A notification may have raced the timeout; take it if so.
                        return queue.pop_front();
                    }
                }
            }
        }
    }

    pub(crate) fn try_pop(&self) -> Option<Envelope> {
        self.queue.lock().pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.lock().len()
    }
}
