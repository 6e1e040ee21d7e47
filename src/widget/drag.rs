//! Movable-launcher drag gesture.
//!
//! While a pointer-down-then-move sequence is active, the launcher follows
//! the pointer, clamped to the viewport. Absolute positioning permanently
//! replaces the fixed-corner anchoring for the session, and the launcher's
//! transition animation is suspended for the duration of the drag so the
//! drag itself is not animated.

use crate::widget::page::HostPage;

/// Clamp a proposed top-left position so the element stays fully inside the
/// viewport in both axes.
pub fn clamp_to_viewport(
    x: f64,
    y: f64,
    viewport: (f64, f64),
    element: (f64, f64),
) -> (f64, f64) {
    let max_x = (viewport.0 - element.0).max(0.0);
    let max_y = (viewport.1 - element.1).max(0.0);
    (x.clamp(0.0, max_x), y.clamp(0.0, max_y))
}

#[derive(Debug, Default)]
pub struct DragSession {
    active: bool,
    offset: (f64, f64),
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Pointer pressed on the launcher. `origin` is the launcher's current
    /// top-left corner; the offset keeps the grab point under the pointer.
    pub fn pointer_down(
        &mut self,
        pointer: (f64, f64),
        origin: (f64, f64),
        page: &mut impl HostPage,
    ) {
        self.active = true;
        self.offset = (pointer.0 - origin.0, pointer.1 - origin.1);
        page.set_launcher_transition(false);
    }

    /// Pointer moved anywhere on the document. No-op unless a drag is active.
    pub fn pointer_move(
        &mut self,
        pointer: (f64, f64),
        page: &mut impl HostPage,
    ) -> Option<(f64, f64)> {
        if !self.active {
            return None;
        }
        let proposed = (pointer.0 - self.offset.0, pointer.1 - self.offset.1);
        let clamped = clamp_to_viewport(
            proposed.0,
            proposed.1,
            page.viewport(),
            page.launcher_size(),
        );
        page.move_launcher(clamped.0, clamped.1);
        Some(clamped)
    }

    /// Pointer released. Restores the transition animation.
    pub fn pointer_up(&mut self, page: &mut impl HostPage) {
        if self.active {
            self.active = false;
            page.set_launcher_transition(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_in_both_axes() {
        let viewport = (800.0, 600.0);
        let size = (60.0, 60.0);
        assert_eq!(clamp_to_viewport(-50.0, -10.0, viewport, size), (0.0, 0.0));
        assert_eq!(
            clamp_to_viewport(1000.0, 900.0, viewport, size),
            (740.0, 540.0)
        );
        assert_eq!(
            clamp_to_viewport(100.0, 200.0, viewport, size),
            (100.0, 200.0)
        );
    }

    #[test]
    fn degenerate_viewport_pins_to_origin() {
        assert_eq!(
            clamp_to_viewport(10.0, 10.0, (40.0, 40.0), (60.0, 60.0)),
            (0.0, 0.0)
        );
    }
}
