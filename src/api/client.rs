use crate::types::{Message, MessageKind};
use serde::Deserialize;

// ============================================
// Error Types
// ============================================

#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct ChatError(String);

impl ChatError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<anyhow::Error> for ChatError {
    fn from(err: anyhow::Error) -> Self {
        ChatError::new(err.to_string())
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::new(err.to_string())
    }
}

pub type ChatResult<T> = Result<T, ChatError>;

// ============================================
// HTTP Client
// ============================================

#[derive(serde::Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// Result of a media upload; `url` may come back relative to the API base.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct MediaUpload {
    #[serde(rename = "mediaId")]
    pub media_id: String,
    pub url: String,
}

/// Client for the chat backend endpoints.
pub struct ChatApi {
    client: reqwest::Client,
    base_url: String,
}

impl ChatApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /api/chat` with the user's text body. The backend's reply is a
    /// complete message object and is returned as-is; any transport or parse
    /// failure is a single error, the caller decides how to surface it.
    pub async fn send_chat(&self, text: &str) -> ChatResult<Message> {
        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&ChatRequest { message: text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::new(format!("chat endpoint returned {status}")));
        }

        let reply = response
            .json::<Message>()
            .await
            .map_err(|err| ChatError::new(format!("invalid chat reply: {err}")))?;
        Ok(reply)
    }

    /// `POST /api/media` multipart upload. Returns the stored media id and an
    /// absolute URL.
    pub async fn upload_media(
        &self,
        filename: &str,
        mime: &str,
        bytes: Vec<u8>,
        kind: MessageKind,
    ) -> ChatResult<MediaUpload> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime)
            .map_err(|err| ChatError::new(format!("invalid mime type {mime}: {err}")))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("type", media_type_field(kind));

        let response = self
            .client
            .post(format!("{}/api/media", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::new(format!("media upload failed {status}: {body}")));
        }

        let mut upload = response
            .json::<MediaUpload>()
            .await
            .map_err(|err| ChatError::new(format!("invalid media reply: {err}")))?;
        if upload.url.starts_with('/') {
            upload.url = format!("{}{}", self.base_url, upload.url);
        }
        Ok(upload)
    }
}

fn media_type_field(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Image => "image",
        MessageKind::Video => "video",
        MessageKind::Audio => "audio",
        MessageKind::Sticker => "sticker",
        _ => "document",
    }
}
