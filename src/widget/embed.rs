//! Loader script served to third-party pages.
//!
//! The generated JS implements the same contract as [`crate::widget::Injector`]:
//! identical marker classes, style id, stabilization delay, idempotent
//! injection, MutationObserver-driven re-injection, drag-guarded toggle, and
//! viewport-clamped dragging.

use crate::widget::injector::{
    DEFAULT_STABILIZE_DELAY, FRAME_CLASS, LAUNCHER_CLASS, LAUNCHER_LABEL, STYLE_ID, WIDGET_CSS,
};

/// Render the embeddable widget loader pointed at the hosted chat UI.
pub fn loader_script(chat_url: &str) -> String {
    let delay_ms = DEFAULT_STABILIZE_DELAY.as_millis();
    format!(
        r#"(function () {{
  const CHAT_URL = "{chat_url}";

  function injectWidget() {{
    if (!document.getElementById("{STYLE_ID}")) {{
      const style = document.createElement("style");
      style.id = "{STYLE_ID}";
      style.innerHTML = `{WIDGET_CSS}`;
      document.head.appendChild(style);
    }}

    if (!document.querySelector(".{FRAME_CLASS}")) {{
      const iframe = document.createElement("iframe");
      iframe.className = "{FRAME_CLASS}";
      iframe.src = CHAT_URL;
      document.body.appendChild(iframe);
    }}

    if (document.querySelector(".{LAUNCHER_CLASS}")) {{
      return;
    }}

    const button = document.createElement("button");
    button.className = "{LAUNCHER_CLASS}";
    button.innerHTML = "{LAUNCHER_LABEL}";
    document.body.appendChild(button);

    button.addEventListener("click", (e) => {{
      if (e.detail === 0) return; // synthetic click from drag release
      const iframe = document.querySelector(".{FRAME_CLASS}");
      if (!iframe) return;
      const isHidden = iframe.style.display === "none" || iframe.style.display === "";
      iframe.style.display = isHidden ? "block" : "none";
    }});

    let offsetX, offsetY, isDragging = false;

    button.addEventListener("mousedown", (e) => {{
      isDragging = true;
      offsetX = e.clientX - button.getBoundingClientRect().left;
      offsetY = e.clientY - button.getBoundingClientRect().top;
      button.style.transition = "none";
    }});

    document.addEventListener("mousemove", (e) => {{
      if (!isDragging) return;
      let left = e.clientX - offsetX;
      let top = e.clientY - offsetY;
      left = Math.max(0, Math.min(window.innerWidth - button.offsetWidth, left));
      top = Math.max(0, Math.min(window.innerHeight - button.offsetHeight, top));
      button.style.left = left + "px";
      button.style.top = top + "px";
      button.style.right = "auto";
      button.style.bottom = "auto";
    }});

    document.addEventListener("mouseup", () => {{
      if (isDragging) {{
        isDragging = false;
        button.style.transition = "all 0.2s";
      }}
    }});
  }}

  function startObserver() {{
    const observer = new MutationObserver(() => {{
      if (!document.querySelector(".{LAUNCHER_CLASS}") || !document.querySelector(".{FRAME_CLASS}")) {{
        injectWidget();
      }}
    }});
    observer.observe(document.body, {{ childList: true, subtree: true }});
  }}

  function initWidget() {{
    setTimeout(() => {{
      injectWidget();
      startObserver();
    }}, {delay_ms});
  }}

  if (document.readyState === "complete" || document.readyState === "interactive") {{
    initWidget();
  }} else {{
    document.addEventListener("DOMContentLoaded", initWidget);
  }}
}})();
"#
    )
}
