//! ---
//! courier_section: "02-messaging-data-model"
//! courier_subsection: "module"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Message envelopes and unique id generation."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Last unique id handed out. The first generated id is `1`.
///
/// 64 bits do not wrap in practice; exhaustion is not handled.
static LAST_UID: AtomicU64 = AtomicU64::new(0);

/// Process-wide unique identifier assigned to every message at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MsgUid(u64);

impl MsgUid {
    /// Generate a fresh id. Safe to call from any number of threads.
    pub fn next() -> Self {
        Self(LAST_UID.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Raw numeric value, mainly for logging and reports.
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MsgUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<MsgUid> for u64 {
    fn from(uid: MsgUid) -> Self {
        uid.0
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn ids_increase_within_a_thread() {
        let first = MsgUid::next();
        let second = MsgUid::next();
        assert!(second > first);
        assert_ne!(first.as_u64(), 0);
        assert_eq!(u64::from(second), second.as_u64());
    }

    #[test]
    fn concurrent_generation_never_collides() {
        const N: usize = 1000;
        let (left, right) = std::thread::scope(|scope| {
            let left = scope.spawn(|| (0..N).map(|_| MsgUid::next()).collect::<Vec<_>>());
            let right = scope.spawn(|| (0..N).map(|_| MsgUid::next()).collect::<Vec<_>>());
            (
                left.join().expect("left generator"),
                right.join().expect("right generator"),
            )
        });

        let unique: HashSet<MsgUid> = left.iter().chain(right.iter()).copied().collect();
        assert_eq!(unique.len(), 2 * N);
    }

    #[test]
    fn serializes_as_bare_integer() {
        let uid = MsgUid::next();
        let json = serde_json::to_string(&uid).expect("serialize uid");
        assert_eq!(json, uid.as_u64().to_string());
    }
}
