//! The narrow slice of a host page the injector needs.
//!
//! Presence-in-DOM is the only widget state: elements are looked up by marker
//! class, styles by element id. The trait deliberately allows duplicate
//! insertions so the injector's idempotence guard is the only thing standing
//! between a mutation storm and duplicated widgets.

pub trait HostPage: Send {
    /// Number of elements carrying the marker class.
    fn count_marker(&self, class: &str) -> usize;

    fn has_marker(&self, class: &str) -> bool {
        self.count_marker(class) > 0
    }

    fn has_style(&self, id: &str) -> bool;
    fn insert_style(&mut self, id: &str, css: &str);

    /// Insert the chat frame, initially hidden, pointed at `src`.
    fn insert_frame(&mut self, class: &str, src: &str);
    fn insert_launcher(&mut self, class: &str, label: &str);

    fn frame_visible(&self) -> bool;
    fn set_frame_visible(&mut self, visible: bool);

    /// Viewport size in CSS pixels.
    fn viewport(&self) -> (f64, f64);
    fn launcher_size(&self) -> (f64, f64);

    /// Absolute launcher position. Implementations must also clear the
    /// fixed-corner anchoring (right/bottom offsets) when this is first used.
    fn move_launcher(&mut self, x: f64, y: f64);
    fn launcher_position(&self) -> Option<(f64, f64)>;

    /// Suspend or restore the launcher's transition animation.
    fn set_launcher_transition(&mut self, enabled: bool);
}

#[derive(Clone, Debug, PartialEq)]
enum ElementKind {
    Frame { src: String, visible: bool },
    Launcher { label: String },
}

#[derive(Clone, Debug, PartialEq)]
struct Element {
    class: String,
    kind: ElementKind,
}

/// In-memory page model used by tests and the headless demo shell. Faithfully
/// dumb: it happily holds duplicate elements and duplicate styles.
pub struct VirtualPage {
    styles: Vec<(String, String)>,
    elements: Vec<Element>,
    viewport: (f64, f64),
    launcher_size: (f64, f64),
    launcher_position: Option<(f64, f64)>,
    corner_anchored: bool,
    transition_enabled: bool,
}

impl VirtualPage {
    pub fn new() -> Self {
        Self::with_viewport(1280.0, 800.0)
    }

    pub fn with_viewport(width: f64, height: f64) -> Self {
        Self {
            styles: Vec::new(),
            elements: Vec::new(),
            viewport: (width, height),
            launcher_size: (60.0, 60.0),
            launcher_position: None,
            corner_anchored: true,
            transition_enabled: true,
        }
    }

    /// Simulate a host-page script deleting the first element with the class.
    pub fn remove_marker(&mut self, class: &str) -> bool {
        if let Some(pos) = self.elements.iter().position(|e| e.class == class) {
            self.elements.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn style_count(&self) -> usize {
        self.styles.len()
    }

    pub fn frame_src(&self) -> Option<&str> {
        self.elements.iter().find_map(|e| match &e.kind {
            ElementKind::Frame { src, .. } => Some(src.as_str()),
            _ => None,
        })
    }

    pub fn corner_anchored(&self) -> bool {
        self.corner_anchored
    }

    pub fn transition_enabled(&self) -> bool {
        self.transition_enabled
    }
}

impl Default for VirtualPage {
    fn default() -> Self {
        Self::new()
    }
}

impl HostPage for VirtualPage {
    fn count_marker(&self, class: &str) -> usize {
        self.elements.iter().filter(|e| e.class == class).count()
    }

    fn has_style(&self, id: &str) -> bool {
        self.styles.iter().any(|(style_id, _)| style_id == id)
    }

    fn insert_style(&mut self, id: &str, css: &str) {
        self.styles.push((id.to_string(), css.to_string()));
    }

    fn insert_frame(&mut self, class: &str, src: &str) {
        self.elements.push(Element {
            class: class.to_string(),
            kind: ElementKind::Frame {
                src: src.to_string(),
                visible: false,
            },
        });
    }

    fn insert_launcher(&mut self, class: &str, label: &str) {
        self.elements.push(Element {
            class: class.to_string(),
            kind: ElementKind::Launcher {
                label: label.to_string(),
            },
        });
    }

    fn frame_visible(&self) -> bool {
        self.elements
            .iter()
            .find_map(|e| match &e.kind {
                ElementKind::Frame { visible, .. } => Some(*visible),
                _ => None,
            })
            .unwrap_or(false)
    }

    fn set_frame_visible(&mut self, value: bool) {
        for element in &mut self.elements {
            if let ElementKind::Frame { visible, .. } = &mut element.kind {
                *visible = value;
            }
        }
    }

    fn viewport(&self) -> (f64, f64) {
        self.viewport
    }

    fn launcher_size(&self) -> (f64, f64) {
        self.launcher_size
    }

    fn move_launcher(&mut self, x: f64, y: f64) {
        self.launcher_position = Some((x, y));
        self.corner_anchored = false;
    }

    fn launcher_position(&self) -> Option<(f64, f64)> {
        self.launcher_position
    }

    fn set_launcher_transition(&mut self, enabled: bool) {
        self.transition_enabled = enabled;
    }
}
