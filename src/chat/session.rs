use tracing::warn;

use super::{ChatBackend, ChatError, ChatMessage, CONNECTION_TROUBLE, GREETING};

pub const QUICK_ACTIONS: [&str; 4] = [
  "Suggest today's workout",
  "Help with meal prep",
  "Explain proper squat form",
  "How to increase my protein?",
];

/// One visible conversation. At most one send is outstanding; a send
/// attempted while loading is dropped.
#[derive(Debug, Clone)]
pub struct ChatSession {
  user_id: String,
  messages: Vec<ChatMessage>,
  loading: bool,
}

impl ChatSession {
  pub fn new(user_id: impl Into<String>) -> Self {
    Self {
      user_id: user_id.into(),
      messages: vec![ChatMessage::assistant(GREETING)],
      loading: false,
    }
  }

  pub fn user_id(&self) -> &str {
    &self.user_id
  }

  pub fn messages(&self) -> &[ChatMessage] {
    &self.messages
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }

  /// Quick actions are offered until the first exchange starts
  pub fn quick_actions(&self) -> &'static [&'static str] {
    if self.messages.len() == 1 && !self.loading {
      &QUICK_ACTIONS
    } else {
      &[]
    }
  }

  /// Append the user's message and enter the loading state. Returns false
  /// (and changes nothing) for blank input or while a reply is pending.
  pub fn begin_send(&mut self, text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() || self.loading {
      return false;
    }
    self.messages.push(ChatMessage::user(text));
    self.loading = true;
    true
  }

  /// Append the backend's reply, or the connection apology on failure
  pub fn finish_send(&mut self, reply: Result<String, ChatError>) -> &ChatMessage {
    let content = match reply {
      Ok(text) => text,
      Err(e) => {
        warn!(error = %e, "Chat reply failed");
        CONNECTION_TROUBLE.to_string()
      }
    };
    self.loading = false;
    self.messages.push(ChatMessage::assistant(content));
    &self.messages[self.messages.len() - 1]
  }

  /// Full round trip through a backend
  pub async fn send(
    &mut self,
    backend: &dyn ChatBackend,
    text: &str,
  ) -> Option<&ChatMessage> {
    if !self.begin_send(text) {
      return None;
    }
    let reply = backend.send_message(&self.messages, &self.user_id).await;
    Some(self.finish_send(reply))
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::chat::Role;
  use async_trait::async_trait;
  use std::sync::Mutex;

  struct Scripted {
    reply: Option<String>,
    seen: Mutex<Vec<usize>>,
  }

  #[async_trait]
  impl ChatBackend for Scripted {
    async fn send_message(
      &self,
      transcript: &[ChatMessage],
      _user_id: &str,
    ) -> Result<String, ChatError> {
      self.seen.lock().unwrap().push(transcript.len());
      self.reply.clone().ok_or(ChatError::Request("offline".to_string()))
    }
  }

  #[test]
  fn test_new_session_greets() {
    let session = ChatSession::new("u");
    assert_eq!(session.messages().len(), 1);
    assert_eq!(session.messages()[0].role, Role::Assistant);
    assert_eq!(session.messages()[0].content, GREETING);
    assert_eq!(session.quick_actions().len(), 4);
  }

  #[test]
  fn test_blank_input_ignored() {
    let mut session = ChatSession::new("u");
    assert!(!session.begin_send("   "));
    assert_eq!(session.messages().len(), 1);
    assert!(!session.is_loading());
  }

  #[test]
  fn test_send_while_loading_ignored() {
    let mut session = ChatSession::new("u");
    assert!(session.begin_send("first"));
    assert!(session.quick_actions().is_empty());
    assert!(!session.begin_send("second"));
    assert_eq!(session.messages().len(), 2);

    session.finish_send(Ok("reply".to_string()));
    assert!(!session.is_loading());
    assert!(session.begin_send("second"));
  }

  #[test]
  fn test_failure_appends_apology() {
    let mut session = ChatSession::new("u");
    session.begin_send("hello");
    let reply = session.finish_send(Err(ChatError::Api("boom".to_string())));
    assert_eq!(reply.content, CONNECTION_TROUBLE);
    assert_eq!(reply.role, Role::Assistant);
    assert!(!session.is_loading());
  }

  #[tokio::test]
  async fn test_send_passes_transcript_with_new_message() {
    let backend = Scripted {
      reply: Some("Do 3 sets".to_string()),
      seen: Mutex::new(Vec::new()),
    };
    let mut session = ChatSession::new("u");

    let reply = session.send(&backend, QUICK_ACTIONS[0]).await.unwrap();
    assert_eq!(reply.content, "Do 3 sets");
    assert_eq!(session.messages().len(), 3);
    assert_eq!(session.messages()[1].content, "Suggest today's workout");
    assert_eq!(*backend.seen.lock().unwrap(), vec![2]);
  }

  #[tokio::test]
  async fn test_send_failure_stays_interactive() {
    let backend = Scripted { reply: None, seen: Mutex::new(Vec::new()) };
    let mut session = ChatSession::new("u");

    let reply = session.send(&backend, "hi").await.unwrap();
    assert_eq!(reply.content, CONNECTION_TROUBLE);
    assert!(session.send(&backend, "again").await.is_some());
    assert_eq!(session.messages().len(), 5);
  }
}
