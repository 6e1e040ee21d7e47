use crate::api::client::{ChatApi, ChatError, ChatResult};
use crate::types::{
    InteractiveButton, InteractivePayload, LocationPayload, Message, MessageDraft, MessageKind,
    Sender,
};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicUsize, Ordering};
use time::OffsetDateTime;
use uuid::Uuid;

/// Source of replies to user messages. The store calls this once per outgoing
/// user message; the result (or failure) is folded back into the log.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, message: &Message) -> ChatResult<Message>;
}

/// Dispatches to the remote chat backend.
pub struct RemoteResponder {
    api: ChatApi,
}

impl RemoteResponder {
    pub fn new(api: ChatApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Responder for RemoteResponder {
    async fn respond(&self, message: &Message) -> ChatResult<Message> {
        let text = message.text_body().unwrap_or_default();
        self.api.send_chat(text).await
    }
}

/// Demo responder: cycles through a static list of example replies, assigning
/// a fresh id and timestamp to each. Mirrors the demo backend's reply picker.
pub struct CannedResponder {
    replies: Vec<MessageDraft>,
    index: AtomicUsize,
}

static EXAMPLE_REPLIES: Lazy<Vec<MessageDraft>> = Lazy::new(build_example_replies);

impl CannedResponder {
    pub fn new() -> Self {
        Self::with_replies(example_replies())
    }

    pub fn with_replies(replies: Vec<MessageDraft>) -> Self {
        Self {
            replies,
            index: AtomicUsize::new(0),
        }
    }
}

impl Default for CannedResponder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Responder for CannedResponder {
    async fn respond(&self, _message: &Message) -> ChatResult<Message> {
        if self.replies.is_empty() {
            return Err(ChatError::new("no example replies configured"));
        }
        let index = self.index.fetch_add(1, Ordering::Relaxed) % self.replies.len();
        Ok(Message::from_draft(
            self.replies[index].clone(),
            Uuid::new_v4().to_string(),
            OffsetDateTime::now_utc(),
        ))
    }
}

/// The built-in example replies, one per payload family the renderer supports.
pub fn example_replies() -> Vec<MessageDraft> {
    EXAMPLE_REPLIES.clone()
}

fn build_example_replies() -> Vec<MessageDraft> {
    vec![
        MessageDraft::text(Sender::Bot, "Hi! How can I help you today?"),
        MessageDraft::text(
            Sender::Bot,
            "Thanks for reaching out. Could you tell me a bit more?",
        ),
        MessageDraft {
            from: Sender::Bot,
            kind: MessageKind::Location,
            location: Some(LocationPayload {
                name: Some("Kochi Office".to_string()),
                address: Some("MG Road, Kochi, Kerala, India".to_string()),
                latitude: Some(9.9312),
                longitude: Some(76.2673),
            }),
            ..Default::default()
        },
        MessageDraft {
            from: Sender::Bot,
            kind: MessageKind::Interactive,
            interactive: Some(InteractivePayload {
                header: None,
                body: Some("Choose an option:".to_string()),
                footer: Some("Tap any button to continue".to_string()),
                buttons: vec![
                    InteractiveButton {
                        kind: "reply".to_string(),
                        title: Some("Confirm".to_string()),
                        payload: Some("confirm_123".to_string()),
                    },
                    InteractiveButton {
                        kind: "url".to_string(),
                        title: Some("Visit Website".to_string()),
                        payload: Some("https://example.com".to_string()),
                    },
                    InteractiveButton {
                        kind: "email".to_string(),
                        title: Some("Email Support".to_string()),
                        payload: Some("support@example.com".to_string()),
                    },
                ],
            }),
            ..Default::default()
        },
        MessageDraft::text(Sender::Bot, "Is there anything else I can do for you?"),
    ]
}
