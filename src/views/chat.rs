use crate::api::{ChatApi, cached_config};
use crate::store::MessageStore;
use crate::theme::UiConfig;
use crate::types::{
    MediaPayload, Message, MessageDraft, MessageKind, Sender, Status,
};
use dioxus::events::Key;
use dioxus::prelude::*;
use std::time::Duration;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

const STORE_POLL_INTERVAL: Duration = Duration::from_millis(80);

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]");

fn format_message_timestamp(ts: OffsetDateTime) -> Option<String> {
    let mut datetime = ts;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime.format(MESSAGE_TIME_FORMAT).ok()
}

fn send_text(store: &MessageStore, text: &str) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return;
    }
    store.send_message(MessageDraft::text(Sender::User, trimmed));
}

fn media_kind_for(name: &str) -> (MessageKind, &'static str) {
    let extension = name.rsplit('.').next().unwrap_or_default().to_lowercase();
    match extension.as_str() {
        "png" => (MessageKind::Image, "image/png"),
        "jpg" | "jpeg" => (MessageKind::Image, "image/jpeg"),
        "gif" => (MessageKind::Image, "image/gif"),
        "webp" => (MessageKind::Image, "image/webp"),
        "mp4" => (MessageKind::Video, "video/mp4"),
        "webm" => (MessageKind::Video, "video/webm"),
        "mp3" => (MessageKind::Audio, "audio/mpeg"),
        "wav" => (MessageKind::Audio, "audio/wav"),
        "ogg" => (MessageKind::Audio, "audio/ogg"),
        _ => (MessageKind::File, "application/octet-stream"),
    }
}

async fn upload_and_send(store: MessageStore, name: String, bytes: Vec<u8>) {
    let Some(config) = cached_config() else {
        tracing::warn!("media upload skipped: no backend configured");
        return;
    };
    let (kind, mime) = media_kind_for(&name);
    let api = ChatApi::new(config.api_url.clone());
    match api.upload_media(&name, mime, bytes, kind).await {
        Ok(upload) => {
            store.send_message(MessageDraft::media(
                Sender::User,
                kind,
                MediaPayload {
                    id: Some(upload.media_id),
                    url: Some(upload.url),
                    mime: Some(mime.to_string()),
                    filename: Some(name),
                    caption: None,
                },
            ));
        }
        Err(err) => {
            tracing::warn!("media upload failed: {err}");
            store.add_message(MessageDraft::notification(
                Sender::System,
                "Media upload failed.",
                Status::Error,
            ));
        }
    }
}

#[component]
pub fn ChatView(store: MessageStore, ui: UiConfig) -> Element {
    let mut grouped = use_signal(Vec::<Message>::new);
    let mut typing = use_signal(|| false);
    let mut input = use_signal(String::new);

    // Poll the store revision and refresh the derived view on change.
    use_future({
        let store = store.clone();
        move || {
            let store = store.clone();
            async move {
                let mut seen = u64::MAX;
                loop {
                    let revision = store.revision();
                    if revision != seen {
                        seen = revision;
                        grouped.set(store.grouped_by_date());
                        typing.set(store.is_typing());
                    }
                    tokio::time::sleep(STORE_POLL_INTERVAL).await;
                }
            }
        }
    });

    let keydown_store = store.clone();
    let click_store = store.clone();
    let upload_store = store.clone();
    let grouped_snapshot = grouped();

    rsx! {
        div { class: "chat-list",
            for msg in grouped_snapshot.iter() {
                MessageRow { key: "{msg.id}", msg: msg.clone() }
            }
            if typing() {
                div { class: "typing-dots", "typing…" }
            }
        }
        form { class: "composer", onsubmit: move |ev| ev.prevent_default(),
            label { class: "attach",
                input {
                    r#type: "file",
                    style: "display: none;",
                    onchange: move |ev| {
                        if let Some(file_engine) = ev.files() {
                            let store = upload_store.clone();
                            spawn(async move {
                                for name in file_engine.files() {
                                    if let Some(bytes) = file_engine.read_file(&name).await {
                                        upload_and_send(store.clone(), name, bytes).await;
                                    }
                                }
                            });
                        }
                    },
                }
                "+"
            }
            input {
                r#type: "text",
                placeholder: "{ui.input.placeholder}",
                value: "{input}",
                oninput: move |ev| input.set(ev.value()),
                onkeydown: move |ev| {
                    if ev.key() == Key::Enter {
                        ev.prevent_default();
                        send_text(&keydown_store, &input());
                        input.set(String::new());
                    }
                },
                autofocus: true,
            }
            button {
                r#type: "button",
                onclick: move |_| {
                    send_text(&click_store, &input());
                    input.set(String::new());
                },
                "➤"
            }
        }
    }
}

#[component]
fn MessageRow(msg: Message) -> Element {
    if msg.kind == MessageKind::Date {
        let label = msg.label.clone().unwrap_or_default();
        return rsx! {
            div { class: "date-separator", "{label}" }
        };
    }

    let row_class = match msg.from {
        Sender::User => "message-row user",
        Sender::Bot => "message-row bot",
        Sender::System => "message-row system",
    };
    let bubble_class = match msg.from {
        Sender::User => "bubble user",
        _ => "bubble bot",
    };
    let timestamp = format_message_timestamp(msg.ts);

    rsx! {
        div { class: "{row_class}",
            if msg.kind == MessageKind::Notification {
                NotificationBanner { msg: msg.clone() }
            } else {
                div { class: "{bubble_class}",
                    MessageContent { msg: msg.clone() }
                    if let Some(ts) = timestamp {
                        div { class: "message-time", "{ts}" }
                    }
                }
            }
        }
    }
}

/// Per-kind payload rendering. Missing payload fields render as blanks, never
/// as errors.
#[component]
fn MessageContent(msg: Message) -> Element {
    match msg.kind {
        MessageKind::Text => {
            let body = msg.text_body().unwrap_or_default().to_string();
            rsx! { span { "{body}" } }
        }
        MessageKind::Image | MessageKind::Sticker => {
            let url = msg
                .image
                .as_ref()
                .or(msg.sticker.as_ref())
                .and_then(|m| m.url.clone())
                .unwrap_or_default();
            rsx! { img { src: "{url}", alt: "image" } }
        }
        MessageKind::Video => {
            let url = msg
                .video
                .as_ref()
                .and_then(|m| m.url.clone())
                .unwrap_or_default();
            rsx! { video { src: "{url}", controls: true } }
        }
        MessageKind::Audio => {
            let url = msg
                .audio
                .as_ref()
                .and_then(|m| m.url.clone())
                .unwrap_or_default();
            rsx! { audio { src: "{url}", controls: true } }
        }
        MessageKind::File => {
            let payload = msg.document.clone().unwrap_or_default();
            let url = payload.url.unwrap_or_default();
            let name = payload.filename.unwrap_or_else(|| "document".to_string());
            rsx! { a { href: "{url}", "{name}" } }
        }
        MessageKind::Contact => {
            let payload = msg.contact.clone().unwrap_or_default();
            let name = payload.name.unwrap_or_default();
            let phone = payload.phone.unwrap_or_default();
            rsx! {
                div {
                    div { "{name}" }
                    div { "{phone}" }
                }
            }
        }
        MessageKind::Location => {
            let payload = msg.location.clone().unwrap_or_default();
            let name = payload.name.unwrap_or_default();
            let address = payload.address.unwrap_or_default();
            rsx! {
                div {
                    div { "📍 {name}" }
                    div { "{address}" }
                }
            }
        }
        MessageKind::Interactive => {
            let payload = msg.interactive.clone().unwrap_or_default();
            let body = payload.body.unwrap_or_default();
            rsx! {
                div { class: "interactive-card",
                    div { class: "card-body", "{body}" }
                    for (i, btn) in payload.buttons.iter().enumerate() {
                        button { key: "{i}", r#type: "button",
                            {btn.title.clone().unwrap_or_default()}
                        }
                    }
                    if let Some(footer) = payload.footer {
                        div { class: "card-footer", "{footer}" }
                    }
                }
            }
        }
        _ => rsx! { span {} },
    }
}

#[component]
fn NotificationBanner(msg: Message) -> Element {
    let body = msg
        .notification
        .as_ref()
        .map(|n| n.body.clone())
        .unwrap_or_default();
    let color = match msg.status {
        Some(Status::Error) => "var(--status-error)",
        Some(Status::Info) | None => "var(--status-info)",
        _ => "var(--status-success)",
    };
    rsx! {
        div { class: "system-banner", style: "background: {color};", "{body}" }
    }
}
