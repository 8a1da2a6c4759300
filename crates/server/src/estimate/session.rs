//! Supersession tracking for estimation requests.
//!
//! A client that uploads a new file under the same session id supersedes its
//! in-flight request. Each upload bumps the session's generation; the result
//! is only delivered if its generation is still current, otherwise it is
//! dropped, not merged. Requests without a session id are independent.

use std::collections::HashMap;
use std::sync::Mutex;

/// Per-session generation counters.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    inner: Mutex<HashMap<String, u64>>,
}

impl SessionRegistry {
    /// Start a new request for this session, superseding any in-flight one.
    /// Returns the generation to check at delivery time.
    pub fn begin(&self, session: &str) -> u64 {
        let mut map = self.lock();
        let generation = map.entry(session.to_string()).or_insert(0);
        *generation += 1;
        *generation
    }

    /// True if no later request has started for this session.
    pub fn is_current(&self, session: &str, generation: u64) -> bool {
        self.lock().get(session).copied() == Some(generation)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, u64>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
