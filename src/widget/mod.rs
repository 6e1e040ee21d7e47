/// Widget module for Floatchat
///
/// Everything that keeps the launcher button and chat frame alive on a host
/// page:
///
/// - `page` - the `HostPage` surface the injector drives, plus an in-memory
///   implementation for tests and the headless demo
/// - `injector` - the Idle/Armed/Watching reconciliation state machine
/// - `drag` - movable-launcher gesture with viewport clamping
/// - `embed` - the loader script shipped to third-party pages
pub mod drag;
pub mod embed;
pub mod injector;
pub mod page;

pub use drag::{DragSession, clamp_to_viewport};
pub use embed::loader_script;
pub use injector::{
    FRAME_CLASS, Injector, InjectorConfig, InjectorState, LAUNCHER_CLASS, STYLE_ID,
    toggle_on_click,
};
pub use page::{HostPage, VirtualPage};
