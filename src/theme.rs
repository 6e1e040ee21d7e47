//! Per-domain UI configuration and the CSS it renders to.
//!
//! Every field has a default matching the stock widget look, so a domain's
//! `config.json` only has to override what it cares about.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderConfig {
    pub text: String,
    pub icon: String,
    pub color: String,
    pub text_color: String,
    pub font: String,
    pub font_weight: u32,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            text: "Chat".to_string(),
            icon: String::new(),
            color: "#05c9fa".to_string(),
            text_color: "#ffffff".to_string(),
            font: "'Poppins', sans-serif".to_string(),
            font_weight: 600,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BodyConfig {
    pub bg: String,
    pub font: String,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            bg: "#F5F7FA".to_string(),
            font: "'Poppins', sans-serif".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BubbleConfig {
    pub bg: String,
    pub text_color: String,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            bg: "#EDEDED".to_string(),
            text_color: "#000000".to_string(),
        }
    }
}

fn user_bubble_default() -> BubbleConfig {
    BubbleConfig {
        bg: "#4A90E2".to_string(),
        text_color: "#ffffff".to_string(),
    }
}

/// Status palette for system notifications.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemPalette {
    pub info: String,
    pub warning: String,
    pub success: String,
    pub error: String,
}

impl Default for SystemPalette {
    fn default() -> Self {
        Self {
            info: "#2196f3".to_string(),
            warning: "#ff9800".to_string(),
            success: "#4caf50".to_string(),
            error: "#f44336".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct InputConfig {
    pub placeholder: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            placeholder: "Ask me anything...".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UiConfig {
    pub header: HeaderConfig,
    pub body: BodyConfig,
    pub user_message: BubbleConfig,
    pub bot_message: BubbleConfig,
    pub system_message: SystemPalette,
    pub input: InputConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            header: HeaderConfig::default(),
            body: BodyConfig::default(),
            user_message: user_bubble_default(),
            bot_message: BubbleConfig::default(),
            system_message: SystemPalette::default(),
            input: InputConfig::default(),
        }
    }
}

/// Render the configured palette as CSS variables consumed by the chat view.
pub fn config_css(ui: &UiConfig) -> String {
    format!(
        r#":root {{
    --header-bg: {header_bg};
    --header-text: {header_text};
    --header-font: {header_font};
    --header-weight: {header_weight};
    --body-bg: {body_bg};
    --body-font: {body_font};
    --bubble-user-bg: {user_bg};
    --bubble-user-text: {user_text};
    --bubble-bot-bg: {bot_bg};
    --bubble-bot-text: {bot_text};
    --status-info: {info};
    --status-warning: {warning};
    --status-success: {success};
    --status-error: {error};
}}"#,
        header_bg = ui.header.color,
        header_text = ui.header.text_color,
        header_font = ui.header.font,
        header_weight = ui.header.font_weight,
        body_bg = ui.body.bg,
        body_font = ui.body.font,
        user_bg = ui.user_message.bg,
        user_text = ui.user_message.text_color,
        bot_bg = ui.bot_message.bg,
        bot_text = ui.bot_message.text_color,
        info = ui.system_message.info,
        warning = ui.system_message.warning,
        success = ui.system_message.success,
        error = ui.system_message.error,
    )
}

/// Layout CSS shared by every theme.
pub const BASE_CSS: &str = r#"
body { margin: 0; background: var(--body-bg); font-family: var(--body-font); }
.chat-shell { display: flex; flex-direction: column; height: 100vh; }
.chat-header { background: var(--header-bg); color: var(--header-text); font-family: var(--header-font); font-weight: var(--header-weight); padding: 0.75rem 1rem; display: flex; align-items: center; gap: 0.5rem; }
.chat-header img { width: 28px; height: 28px; border-radius: 50%; }
.chat-header .spacer { flex: 1; }
.chat-header button { background: transparent; border: none; color: var(--header-text); cursor: pointer; }
.chat-list { flex: 1; overflow-y: auto; padding: 0.75rem; display: flex; flex-direction: column; gap: 0.4rem; }
.message-row { display: flex; }
.message-row.user { justify-content: flex-end; }
.message-row.bot { justify-content: flex-start; }
.message-row.system { justify-content: center; }
.bubble { max-width: 75%; padding: 0.5rem 0.75rem; border-radius: 12px; word-break: break-word; }
.bubble.user { background: var(--bubble-user-bg); color: var(--bubble-user-text); }
.bubble.bot { background: var(--bubble-bot-bg); color: var(--bubble-bot-text); }
.bubble img, .bubble video { max-width: 100%; border-radius: 8px; }
.date-separator { align-self: center; font-size: 0.75rem; color: #888; padding: 0.2rem 0.6rem; background: rgba(0,0,0,0.06); border-radius: 10px; }
.system-banner { font-size: 0.8rem; color: #ffffff; padding: 0.3rem 0.8rem; border-radius: 10px; }
.typing-dots { font-style: italic; color: #888; padding: 0 0.75rem; }
.message-time { font-size: 0.65rem; color: #999; margin-top: 0.15rem; }
.composer { display: flex; gap: 0.5rem; padding: 0.6rem; background: #ffffff; border-top: 1px solid #e0e0e0; }
.composer input[type=text] { flex: 1; border: 1px solid #d0d0d0; border-radius: 18px; padding: 0.5rem 0.9rem; outline: none; }
.composer button { border: none; background: var(--header-bg); color: var(--header-text); border-radius: 50%; width: 38px; height: 38px; cursor: pointer; }
.interactive-card { border: 1px solid #d0d0d0; border-radius: 10px; overflow: hidden; }
.interactive-card .card-body { padding: 0.5rem 0.75rem; }
.interactive-card .card-footer { padding: 0 0.75rem 0.5rem; font-size: 0.75rem; color: #777; }
.interactive-card button { display: block; width: 100%; border: none; border-top: 1px solid #e6e6e6; background: #fafafa; padding: 0.5rem; cursor: pointer; color: #007bff; }
"#;
