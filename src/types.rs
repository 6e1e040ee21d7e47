use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    #[default]
    User,
    Bot,
    System,
}

/// Content kind of a message. `File` uses the backend's `document` vocabulary
/// on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    Image,
    Video,
    Audio,
    #[serde(rename = "document")]
    File,
    Sticker,
    Contact,
    Location,
    Interactive,
    Notification,
    Date,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Sent,
    Delivered,
    Read,
    Info,
    Error,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextPayload {
    #[serde(default)]
    pub body: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// Interactive card: optional header image, body text, and a button row.
/// Button payloads are open-ended; renderers must tolerate any subset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractivePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<MediaPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<InteractiveButton>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractiveButton {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    #[serde(default)]
    pub body: String,
}

/// One entry in the chat history.
///
/// Wire shape matches the widget backend: the payload lives under a key named
/// after the message kind (`{"type": "text", "text": {"body": "..."}}`). Every
/// payload field is optional so a malformed entry renders as a blank bubble
/// instead of failing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub from: Sender,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(with = "time::serde::rfc3339")]
    pub ts: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<MediaPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<MediaPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<MediaPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<MediaPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticker: Option<MediaPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactive: Option<InteractivePayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    /// Display label for synthetic date separators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Message {
    pub fn from_draft(draft: MessageDraft, id: String, ts: OffsetDateTime) -> Self {
        Self {
            id,
            from: draft.from,
            kind: draft.kind,
            ts,
            text: draft.text,
            image: draft.image,
            video: draft.video,
            audio: draft.audio,
            document: draft.document,
            sticker: draft.sticker,
            contact: draft.contact,
            location: draft.location,
            interactive: draft.interactive,
            notification: draft.notification,
            status: draft.status,
            label: None,
        }
    }

    /// Synthetic separator inserted before the first message of each day.
    pub fn date_separator(label: &str, ts: OffsetDateTime) -> Self {
        Self {
            id: format!("date-{label}"),
            from: Sender::System,
            kind: MessageKind::Date,
            ts,
            text: None,
            image: None,
            video: None,
            audio: None,
            document: None,
            sticker: None,
            contact: None,
            location: None,
            interactive: None,
            notification: None,
            status: None,
            label: Some(label.to_string()),
        }
    }

    pub fn text_body(&self) -> Option<&str> {
        self.text.as_ref().map(|t| t.body.as_str())
    }
}

/// A message as submitted by the UI, before the store assigns `id` and `ts`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageDraft {
    pub from: Sender,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<MediaPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<MediaPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<MediaPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<MediaPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticker: Option<MediaPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactive: Option<InteractivePayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl MessageDraft {
    pub fn text(from: Sender, body: impl Into<String>) -> Self {
        Self {
            from,
            kind: MessageKind::Text,
            text: Some(TextPayload { body: body.into() }),
            ..Default::default()
        }
    }

    pub fn notification(from: Sender, body: impl Into<String>, status: Status) -> Self {
        Self {
            from,
            kind: MessageKind::Notification,
            notification: Some(NotificationPayload { body: body.into() }),
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn media(from: Sender, kind: MessageKind, payload: MediaPayload) -> Self {
        let mut draft = Self {
            from,
            kind,
            ..Default::default()
        };
        match kind {
            MessageKind::Image => draft.image = Some(payload),
            MessageKind::Video => draft.video = Some(payload),
            MessageKind::Audio => draft.audio = Some(payload),
            MessageKind::Sticker => draft.sticker = Some(payload),
            _ => draft.document = Some(payload),
        }
        draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn message_wire_shape() {
        let msg = Message::from_draft(
            MessageDraft::text(Sender::User, "hello"),
            "m1".to_string(),
            datetime!(2025-01-02 03:04:05 UTC),
        );
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["from"], "user");
        assert_eq!(json["type"], "text");
        assert_eq!(json["text"]["body"], "hello");
        assert!(json.get("image").is_none());
        assert!(json.get("status").is_none());
    }

    #[test]
    fn tolerates_missing_payload_fields() {
        let raw =
            r#"{"id":"x","from":"bot","type":"image","ts":"2025-01-02T03:04:05Z","image":{}}"#;
        let msg: Message = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.kind, MessageKind::Image);
        assert!(msg.image.unwrap().url.is_none());
    }

    #[test]
    fn file_kind_uses_document_vocabulary() {
        assert_eq!(
            serde_json::to_value(MessageKind::File).unwrap(),
            serde_json::json!("document")
        );
    }
}
