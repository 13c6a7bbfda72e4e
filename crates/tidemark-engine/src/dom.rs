//! Rendering surface capability.
//!
//! The engine never touches a display directly. Everything it needs from
//! the host page (queries, geometry, class and style mutation, node
//! creation, listener registration, timers) goes through [`DomAdapter`].
//! [`crate::headless::HeadlessDom`] is the in-memory implementation used by
//! tests and the CLI.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::Duration;

/// Viewport dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// A bounding box relative to the viewport, as `getBoundingClientRect`
/// reports it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Event sources the engine subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listener<N> {
    /// Clicks on a specific node.
    Click(N),
    /// Window scroll.
    Scroll,
    /// Window resize.
    Resize,
}

/// What a pending timer is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerKind {
    /// Restore container opacity after a setup pass.
    Reveal,
    /// Quiet period after the last resize event.
    ResizeDebounce,
}

/// Identifies a scheduled timer. One pending timer exists per token;
/// scheduling again replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken {
    pub instance: usize,
    pub kind: TimerKind,
}

impl TimerToken {
    pub fn new(instance: usize, kind: TimerKind) -> Self {
        Self { instance, kind }
    }
}

/// Host events delivered to [`crate::TimelineWidget::handle_event`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent<N> {
    Click(N),
    Scroll,
    Resize,
    Timer(TimerToken),
}

/// The rendering surface.
///
/// Selectors passed to the query methods are single class selectors such
/// as `.timeline__wrap`.
pub trait DomAdapter {
    /// Handle to an element. Cheap to copy.
    type Node: Copy + Eq + Debug;

    fn viewport(&self) -> Viewport;

    /// First descendant of `root` matching `selector`, depth first.
    fn query_selector(&self, root: Self::Node, selector: &str) -> Option<Self::Node>;

    /// All descendants of `root` matching `selector`, in document order.
    fn query_selector_all(&self, root: Self::Node, selector: &str) -> Vec<Self::Node>;

    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Short human-readable name for diagnostics: `#id` when the element
    /// has an id, else `.class list`.
    fn describe(&self, node: Self::Node) -> String;

    /// Value of `data-<name>`; `name` is kebab case without the prefix.
    fn data_attribute(&self, node: Self::Node, name: &str) -> Option<String>;

    fn has_class(&self, node: Self::Node, class: &str) -> bool;
    fn add_class(&mut self, node: Self::Node, class: &str);
    fn remove_class(&mut self, node: Self::Node, class: &str);

    fn style(&self, node: Self::Node, property: &str) -> Option<String>;
    fn set_style(&mut self, node: Self::Node, property: &str, value: &str);
    /// Drop the inline `style` attribute entirely.
    fn clear_styles(&mut self, node: Self::Node);

    fn offset_width(&self, node: Self::Node) -> f64;
    fn offset_height(&self, node: Self::Node) -> f64;
    /// Left offset within the offset parent.
    fn offset_left(&self, node: Self::Node) -> f64;
    fn bounding_rect(&self, node: Self::Node) -> Rect;

    fn create_element(&mut self, tag: &str) -> Self::Node;
    fn append_child(&mut self, parent: Self::Node, child: Self::Node);
    fn insert_before(&mut self, parent: Self::Node, child: Self::Node, reference: Self::Node);
    /// Detach `node` from its parent and discard it. Listeners registered
    /// on the node or its descendants go with it.
    fn remove(&mut self, node: Self::Node);

    fn set_text(&mut self, node: Self::Node, text: &str);
    fn set_disabled(&mut self, node: Self::Node, disabled: bool);
    fn is_disabled(&self, node: Self::Node) -> bool;

    /// Subscribe to an event source. Subscribing twice is a no-op.
    fn listen(&mut self, listener: Listener<Self::Node>);

    /// Fire `token` after `delay`, replacing any pending timer with the
    /// same token.
    fn schedule(&mut self, token: TimerToken, delay: Duration);

    /// Drop a pending timer, if any.
    fn cancel(&mut self, token: TimerToken);
}

/// Wrap `node` in `wrapper`, keeping its position in the parent.
pub fn wrap_node<D: DomAdapter + ?Sized>(dom: &mut D, node: D::Node, wrapper: D::Node) {
    if let Some(parent) = dom.parent(node) {
        dom.insert_before(parent, wrapper, node);
    }
    dom.append_child(wrapper, node);
}

/// Parse a `"<n>px"` inline style value.
pub fn parse_px(value: &str) -> Option<f64> {
    value.strip_suffix("px")?.trim().parse().ok()
}
