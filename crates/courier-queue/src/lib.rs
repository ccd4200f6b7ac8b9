//! ---
//! courier_section: "01-core-functionality"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Queue engine with FIFO delivery and request correlation."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
//! In-process message queue.
//!
//! A [`Queue`] offers fire-and-forget delivery (`put` / `get` / `try_get`) and
//! synchronous request/response (`request` / `respond_to`) over the same FIFO.
//! The FIFO and the table of outstanding requests are guarded by separate
//! locks, so a thread blocked waiting for a response never holds up ordinary
//! traffic.
#![warn(missing_docs)]

mod correlation;
mod fifo;

pub mod config;
pub mod error;
pub mod queue;
pub mod stats;

pub use config::QueueConfig;
pub use courier_msg::{DataMsg, Envelope, Message, Msg, MsgUid};
pub use error::{ConfigError, UnmatchedResponse};
pub use queue::Queue;
pub use stats::QueueStats;
