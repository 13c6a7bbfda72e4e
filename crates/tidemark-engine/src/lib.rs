//! tidemark-engine: Layout and interaction engine for timeline widgets
//!
//! This crate turns `.timeline` markup into either a paginated horizontal
//! strip or a vertical list that reveals items on scroll, including:
//! - Settings resolution from options and `data-*` attributes
//! - Structure validation and content wrapping
//! - Horizontal and vertical layout passes
//! - Paging controls and scroll-triggered reveal
//! - A headless DOM with a virtual clock for fixtures and scripted replay

pub mod classes;
pub mod dom;
pub mod headless;
pub mod layout;
pub mod lifecycle;
pub mod navigation;
pub mod settings;
pub mod structure;
pub mod widget;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used types
pub use dom::{DomAdapter, HostEvent, Listener, Rect, TimerKind, TimerToken, Viewport};
pub use headless::{
    load_options, load_script, FixtureError, HeadlessDom, NodeId, NodeSnapshot, PageFixture,
    ScriptStep,
};
pub use lifecycle::LifecycleState;
pub use navigation::{Cursor, Direction, NavControls};
pub use settings::{
    resolve, Mode, Resolution, SettingWarning, Settings, TimelineOptions, VerticalTrigger,
};
pub use structure::StructureError;
pub use widget::{TimelineInstance, TimelineWidget};
