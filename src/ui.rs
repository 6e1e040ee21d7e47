use crate::api::{CannedResponder, ChatApi, RemoteResponder, init_config};
use crate::storage::HistoryStorage;
use crate::store::MessageStore;
use crate::theme::{BASE_CSS, UiConfig, config_css};
use crate::views::ChatView;
use dioxus::prelude::*;
use std::sync::Arc;

fn default_storage() -> Box<dyn HistoryStorage> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        Box::new(crate::storage::FileHistory::new())
    }
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(crate::storage::MemoryHistory::new())
    }
}

#[component]
pub fn App() -> Element {
    let store = use_hook(|| MessageStore::new(default_storage()));
    let mut ui_config = use_signal(UiConfig::default);

    // Fetch-once config; without a configured origin the widget runs against
    // the canned demo responder.
    use_future({
        let store = store.clone();
        move || {
            let store = store.clone();
            async move {
                match std::env::var("FLOATCHAT_ORIGIN") {
                    Ok(origin) => match init_config(&origin).await {
                        Ok(config) => {
                            ui_config.set(config.ui.clone());
                            store.set_responder(Some(Arc::new(RemoteResponder::new(
                                ChatApi::new(config.api_url.clone()),
                            ))));
                        }
                        Err(err) => {
                            tracing::warn!("config fetch failed, falling back to demo replies: {err}");
                            store.set_responder(Some(Arc::new(CannedResponder::new())));
                        }
                    },
                    Err(_) => {
                        store.set_responder(Some(Arc::new(CannedResponder::new())));
                    }
                }
            }
        }
    });

    let css = format!("{}\n{}", config_css(&ui_config()), BASE_CSS);

    rsx! {
        style { dangerous_inner_html: "{css}" }
        div { class: "chat-shell",
            ChatHeader { store: store.clone(), ui: ui_config() }
            ChatView { store: store.clone(), ui: ui_config() }
        }
    }
}

#[component]
fn ChatHeader(store: MessageStore, ui: UiConfig) -> Element {
    let clear_store = store.clone();
    rsx! {
        div { class: "chat-header",
            if !ui.header.icon.is_empty() {
                img { src: "{ui.header.icon}", alt: "" }
            }
            span { "{ui.header.text}" }
            span { class: "spacer" }
            button {
                r#type: "button",
                title: "Clear chat",
                onclick: move |_| clear_store.clear_messages(),
                "🗑"
            }
        }
    }
}
