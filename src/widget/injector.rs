//! Self-healing widget injection.
//!
//! The injector guarantees a launcher button and a hidden chat frame exist on
//! the host page, re-inserting them whenever the page's own scripts tear them
//! down. Lifecycle per page load: wait out a stabilization delay (`Idle`),
//! run one injection pass (`Armed`), then watch the mutation feed for the
//! rest of the page's lifetime (`Watching`). There is no teardown.
//!
//! Correctness rests entirely on the idempotence guard: a pass checks marker
//! presence before inserting, so overlapping passes triggered by a mutation
//! storm cannot duplicate elements.

use crate::widget::page::HostPage;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// Marker class of the launcher button.
pub const LAUNCHER_CLASS: &str = "chatbot-btn";

/// Marker class of the embedded chat frame.
pub const FRAME_CLASS: &str = "chatbot-frame";

/// Element id guarding the one-time style insertion.
pub const STYLE_ID: &str = "chatbot-style";

pub const LAUNCHER_LABEL: &str = "\u{1f4ac}";

/// Wait for the host page to stop rebuilding itself before the first pass.
pub const DEFAULT_STABILIZE_DELAY: Duration = Duration::from_secs(2);

/// Widget stylesheet inserted once per page, keyed by [`STYLE_ID`].
pub const WIDGET_CSS: &str = r#"
.chatbot-btn {
  position: fixed;
  bottom: 20px;
  right: 20px;
  width: 60px;
  height: 60px;
  background: #007bff;
  color: white;
  font-size: 28px;
  border: none;
  border-radius: 50%;
  cursor: grab;
  box-shadow: 0 4px 10px rgba(0,0,0,0.2);
  z-index: 99999;
  user-select: none;
}
.chatbot-btn:active {
  cursor: grabbing;
}
.chatbot-frame {
  position: fixed;
  bottom: 90px;
  right: 20px;
  width: 350px;
  height: 500px;
  border: none;
  border-radius: 10px;
  box-shadow: 0 4px 20px rgba(0,0,0,0.3);
  z-index: 99998;
  display: none;
}
"#;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InjectorState {
    Idle,
    Armed,
    Watching,
}

#[derive(Clone, Debug)]
pub struct InjectorConfig {
    /// URL the chat frame points at.
    pub chat_url: String,
    pub stabilize_delay: Duration,
}

impl InjectorConfig {
    pub fn new(chat_url: impl Into<String>) -> Self {
        Self {
            chat_url: chat_url.into(),
            stabilize_delay: DEFAULT_STABILIZE_DELAY,
        }
    }
}

pub struct Injector {
    config: InjectorConfig,
    state: InjectorState,
}

impl Injector {
    pub fn new(config: InjectorConfig) -> Self {
        Self {
            config,
            state: InjectorState::Idle,
        }
    }

    pub fn state(&self) -> InjectorState {
        self.state
    }

    /// One reconciliation pass. Each insertion is guarded by its own presence
    /// check, so a pass over an intact page is a no-op and a pass over a
    /// partially torn-down page repairs only what is missing. Returns whether
    /// anything was inserted.
    pub fn inject(&self, page: &mut impl HostPage) -> bool {
        let mut changed = false;

        if !page.has_style(STYLE_ID) {
            page.insert_style(STYLE_ID, WIDGET_CSS);
            changed = true;
        }
        if !page.has_marker(FRAME_CLASS) {
            page.insert_frame(FRAME_CLASS, &self.config.chat_url);
            changed = true;
        }
        if !page.has_marker(LAUNCHER_CLASS) {
            page.insert_launcher(LAUNCHER_CLASS, LAUNCHER_LABEL);
            changed = true;
        }

        if changed {
            tracing::debug!("widget injected");
        }
        changed
    }

    /// Drive the full lifecycle: stabilization delay, first pass, then one
    /// reconciliation per mutation batch until the feed closes (page unload).
    pub async fn run<P: HostPage>(
        mut self,
        page: Arc<Mutex<P>>,
        mut mutations: mpsc::UnboundedReceiver<()>,
    ) {
        tokio::time::sleep(self.config.stabilize_delay).await;
        self.state = InjectorState::Armed;

        if let Ok(mut page) = page.lock() {
            self.inject(&mut *page);
        }
        self.state = InjectorState::Watching;

        while mutations.recv().await.is_some() {
            let Ok(mut page) = page.lock() else {
                continue;
            };
            if !page.has_marker(LAUNCHER_CLASS) || !page.has_marker(FRAME_CLASS) {
                tracing::debug!("widget missing after host mutation; re-injecting");
                self.inject(&mut *page);
            }
        }
    }
}

/// Launcher click handler. A click with `detail == 0` is synthetic (the
/// release of a drag gesture) and must not toggle the frame. Returns whether
/// the frame visibility changed.
pub fn toggle_on_click(page: &mut impl HostPage, detail: u32) -> bool {
    if detail == 0 {
        return false;
    }
    let visible = page.frame_visible();
    page.set_frame_visible(!visible);
    tracing::debug!(opened = !visible, "chat frame toggled");
    true
}
