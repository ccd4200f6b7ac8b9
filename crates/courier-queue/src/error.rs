//! ---
//! courier_section: "01-core-functionality"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Queue engine with FIFO delivery and request correlation."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use courier_msg::{Envelope, MsgUid};

/// Returned when a response names a request that is not outstanding.
///
/// The request may never have existed, may already have been answered, or
/// may have timed out. The rejected response is handed back untouched.
#[derive(Debug, thiserror::Error)]
#[error("no outstanding request with uid {uid}")]
pub struct UnmatchedResponse {
    /// Uid the responder tried to answer.
    pub uid: MsgUid,
    /// The response that was not delivered.
    pub response: Envelope,
}

impl UnmatchedResponse {
    /// Recover the rejected response.
    pub fn into_response(self) -> Envelope {
        self.response
    }
}

/// Rejected queue configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The queue name is empty or whitespace only.
    #[error("queue name must not be empty")]
    EmptyName,
}
