//! Widget configuration with an initialize-once lifecycle.
//!
//! The config is fetched from `GET {origin}/config.json` exactly once per
//! process: the first successful fetch is cached for the lifetime of the
//! process and every later call returns the cached value. A failed fetch
//! leaves the cell empty so the next call retries.

use crate::theme::UiConfig;
use anyhow::Context;
use serde::Deserialize;
use tokio::sync::OnceCell;

static WIDGET_CONFIG: OnceCell<WidgetConfig> = OnceCell::const_new();

#[derive(Clone, Debug, Default, Deserialize)]
pub struct WidgetConfig {
    /// Base URL of the chat backend (`{API_URL}/api/chat`, `/api/media`).
    #[serde(rename = "API_URL", default)]
    pub api_url: String,
    /// Per-domain UI theming; absent fields fall back to defaults.
    #[serde(default)]
    pub ui: UiConfig,
}

impl WidgetConfig {
    /// Config for running without a remote backend.
    pub fn offline() -> Self {
        Self::default()
    }
}

async fn fetch_config(origin: &str) -> anyhow::Result<WidgetConfig> {
    let origin = origin.trim_end_matches('/');
    let url = format!("{origin}/config.json");
    let response = reqwest::get(&url)
        .await
        .with_context(|| format!("fetch {url}"))?;
    let config = response
        .json::<WidgetConfig>()
        .await
        .with_context(|| format!("parse {url}"))?;
    tracing::debug!(api_url = %config.api_url, "widget config loaded");
    Ok(config)
}

/// Fetch-once config initialization. Safe to call from multiple places; only
/// the first successful fetch wins.
pub async fn init_config(origin: &str) -> anyhow::Result<&'static WidgetConfig> {
    WIDGET_CONFIG
        .get_or_try_init(|| fetch_config(origin))
        .await
}

/// Cached config, if `init_config` has succeeded at least once.
pub fn cached_config() -> Option<&'static WidgetConfig> {
    WIDGET_CONFIG.get()
}
