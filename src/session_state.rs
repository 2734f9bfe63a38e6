use std::sync::{Arc, Mutex};
use tokio::sync::watch;

use crate::models::ChatMessage;

/// Shared session store: which document the session is looking at, and
/// how far into the chat stream it has read.
///
/// Cloning hands out another handle to the same state. Observers of the
/// current document subscribe through a watch channel and see only actual
/// changes; setting the same id twice notifies once.
#[derive(Clone)]
pub struct SessionState {
    inner: Arc<Mutex<Inner>>,
    document_tx: Arc<watch::Sender<String>>,
}

struct Inner {
    document_id: String,
    last_chat_since: String,
}

impl SessionState {
    pub fn new() -> Self {
        let (document_tx, _) = watch::channel(String::new());
        Self {
            inner: Arc::new(Mutex::new(Inner {
                document_id: String::new(),
                last_chat_since: String::new(),
            })),
            document_tx: Arc::new(document_tx),
        }
    }

    pub fn document_id(&self) -> String {
        self.inner.lock().unwrap().document_id.clone()
    }

    pub fn set_document_id(&self, id: &str) {
        let mut inner = self.inner.lock().unwrap();
        if inner.document_id != id {
            inner.document_id = id.to_string();
            let _ = self.document_tx.send(id.to_string());
        }
    }

    /// Watch for document changes. The receiver starts on the value at
    /// subscription time.
    pub fn subscribe_document(&self) -> watch::Receiver<String> {
        self.document_tx.subscribe()
    }

    pub fn last_chat_since(&self) -> String {
        self.inner.lock().unwrap().last_chat_since.clone()
    }

    pub fn set_last_chat_since(&self, since: &str) {
        self.inner.lock().unwrap().last_chat_since = since.to_string();
    }

    /// Move the chat watermark to the newest message in a poll result, so
    /// the next poll only asks for what came after it. An empty batch
    /// leaves the watermark where it was.
    pub fn advance_chat_watermark(&self, messages: &[ChatMessage]) {
        if let Some(last) = messages.last() {
            self.set_last_chat_since(&last.timestamp);
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(timestamp: &str) -> ChatMessage {
        ChatMessage {
            timestamp: timestamp.to_string(),
            agent_id: "agent-1".to_string(),
            message: "hi".to_string(),
            document_id: "doc-1".to_string(),
        }
    }

    #[test]
    fn test_set_document_id_notifies_on_change_only() {
        let state = SessionState::new();
        let rx = state.subscribe_document();

        state.set_document_id("doc-1");
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow(), "doc-1");

        let rx = state.subscribe_document();
        state.set_document_id("doc-1");
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_clones_share_state() {
        let state = SessionState::new();
        let other = state.clone();
        state.set_document_id("doc-9");
        assert_eq!(other.document_id(), "doc-9");
    }

    #[test]
    fn test_chat_watermark_advances_to_last_message() {
        let state = SessionState::new();
        state.advance_chat_watermark(&[
            message("2025-06-01T10:00:00Z"),
            message("2025-06-01T10:00:05Z"),
        ]);
        assert_eq!(state.last_chat_since(), "2025-06-01T10:00:05Z");

        state.advance_chat_watermark(&[]);
        assert_eq!(state.last_chat_since(), "2025-06-01T10:00:05Z");
    }
}
