/// API module for Floatchat
///
/// This module covers everything that talks to the chat backend:
///
/// - `client` - reqwest wrapper for the `/api/chat` and `/api/media` endpoints
/// - `config` - fetch-once `config.json` loading (API base URL + per-domain UI)
/// - `responder` - the seam between the message store and a reply source,
///   with a remote implementation and a canned demo implementation
///
/// # Usage
///
/// ```rust,no_run
/// use floatchat::api::ChatApi;
///
/// # async fn example() -> anyhow::Result<()> {
/// let api = ChatApi::new("http://localhost:5000");
/// let reply = api.send_chat("hello").await?;
/// # Ok(())
/// # }
/// ```
mod client;
mod config;
mod responder;

// Re-export main types
pub use client::{ChatApi, ChatError, ChatResult, MediaUpload};
pub use config::{WidgetConfig, cached_config, init_config};
pub use responder::{CannedResponder, RemoteResponder, Responder, example_replies};
