//! ---
//! courier_section: "02-messaging-data-model"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Message envelopes and unique id generation."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
//! Message envelopes carried by the courier queue.
//!
//! Every message has a caller-assigned discriminator (`msg_id`) and a
//! process-wide unique id assigned at construction. Messages are never
//! cloned: a message has exactly one owner, and the only way to hand it to
//! the queue is to move it into an [`Envelope`].
#![warn(missing_docs)]

pub mod envelope;
pub mod message;
pub mod uid;

pub use envelope::Envelope;
pub use message::{DataMsg, Message, Msg, MsgHeader};
pub use uid::MsgUid;
