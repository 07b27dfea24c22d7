//! Per-session text buffers.
//!
//! Sessions are independent: one session's buffer never influences another's
//! ranking. The map is guarded by a plain mutex; every access is a short
//! critical section with no I/O inside.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct SessionStore {
    buffers: Mutex<HashMap<String, String>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `delta` to the session buffer, creating the session on first
    /// use. Returns the full buffer after the append.
    pub fn append(&self, session_id: &str, delta: &str) -> String {
        let mut buffers = self.lock();
        let buffer = buffers.entry(session_id.to_string()).or_default();
        buffer.push_str(delta);
        buffer.clone()
    }

    /// Replace the session buffer wholesale.
    pub fn replace(&self, session_id: &str, text: &str) {
        self.lock().insert(session_id.to_string(), text.to_string());
    }

    /// Drop the session. Unknown ids are a no-op.
    pub fn remove(&self, session_id: &str) {
        self.lock().remove(session_id);
    }

    pub fn buffer(&self, session_id: &str) -> Option<String> {
        self.lock().get(session_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.buffers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_accumulates_exactly() {
        let store = SessionStore::new();
        store.append("s1", "expor");
        store.append("s1", "t");
        let buffer = store.append("s1", "ar para csv");
        assert_eq!(buffer, "exportar para csv");
        assert_eq!(store.buffer("s1").as_deref(), Some("exportar para csv"));
    }

    #[test]
    fn sessions_are_isolated() {
        let store = SessionStore::new();
        store.append("a", "export");
        store.append("b", "email");
        assert_eq!(store.buffer("a").as_deref(), Some("export"));
        assert_eq!(store.buffer("b").as_deref(), Some("email"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn replace_overwrites_and_remove_is_idempotent() {
        let store = SessionStore::new();
        store.append("s", "old text");
        store.replace("s", "new");
        assert_eq!(store.buffer("s").as_deref(), Some("new"));
        store.remove("s");
        store.remove("s");
        assert!(store.buffer("s").is_none());
        assert!(store.is_empty());
    }
}
