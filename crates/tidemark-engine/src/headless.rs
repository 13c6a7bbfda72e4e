//! Headless DOM for tidemark.
//!
//! An in-memory [`DomAdapter`] with a virtual clock, so timelines can be
//! mounted, clicked, scrolled and resized without a browser. Pages are
//! described by JSON fixtures and interactions by scripts of
//! [`ScriptStep`]s.

use crate::dom::{parse_px, DomAdapter, HostEvent, Listener, Rect, TimerToken, Viewport};
use crate::settings::TimelineOptions;
use crate::widget::TimelineWidget;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

/// Handle to a node in a [`HeadlessDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
struct NodeData {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    data: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: Option<String>,
    disabled: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    natural_width: f64,
    natural_height: f64,
    top: f64,
    left: f64,
}

/// In-memory document.
///
/// Geometry is deliberately simple: an element's size is its inline
/// `width`/`height` in px when set, else its natural size from the
/// fixture. Siblings flow left to right for `offsetLeft`, and
/// `bounding_rect` uses the fixture's document position minus the
/// vertical scroll offset.
#[derive(Debug, Clone)]
pub struct HeadlessDom {
    nodes: Vec<NodeData>,
    /// Slots of removed nodes, reused by `create_element`.
    free: Vec<NodeId>,
    root: NodeId,
    viewport: Viewport,
    scroll_y: f64,
    now: Duration,
    timers: BTreeMap<TimerToken, Duration>,
    listeners: Vec<Listener<NodeId>>,
}

impl HeadlessDom {
    /// Create an empty document with a `body` root.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            nodes: vec![NodeData {
                tag: "body".into(),
                ..NodeData::default()
            }],
            free: Vec::new(),
            root: NodeId(0),
            viewport,
            scroll_y: 0.0,
            now: Duration::ZERO,
            timers: BTreeMap::new(),
            listeners: Vec::new(),
        }
    }

    /// Build a document from a page fixture.
    pub fn from_fixture(page: &PageFixture) -> Self {
        let mut dom = Self::new(page.viewport);
        let root = dom.root;
        for element in &page.body {
            dom.insert_fixture(root, element);
        }
        dom
    }

    fn insert_fixture(&mut self, parent: NodeId, element: &ElementFixture) -> NodeId {
        let node = self.push_node(NodeData {
            tag: element.tag.clone(),
            id: element.id.clone(),
            classes: element.classes.clone(),
            data: element.data.clone(),
            text: element.text.clone(),
            natural_width: element.width,
            natural_height: element.height,
            top: element.top,
            left: element.left,
            ..NodeData::default()
        });
        self.append_child(parent, node);
        for child in &element.children {
            self.insert_fixture(node, child);
        }
        node
    }

    fn push_node(&mut self, data: NodeData) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id.0] = data;
            return id;
        }
        self.nodes.push(data);
        NodeId(self.nodes.len() - 1)
    }

    /// Reset every node under `node` (inclusive) and queue its slot for reuse.
    fn release(&mut self, node: NodeId) {
        let data = std::mem::take(self.node_mut(node));
        for child in data.children {
            self.release(child);
        }
        self.listeners
            .retain(|listener| *listener != Listener::Click(node));
        self.free.push(node);
    }

    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn set_scroll_y(&mut self, y: f64) {
        self.scroll_y = y.max(0.0);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Append a new element under `parent` with the given classes.
    pub fn element(&mut self, parent: NodeId, tag: &str, classes: &[&str]) -> NodeId {
        let node = self.create_element(tag);
        self.node_mut(node).classes = classes.iter().map(ToString::to_string).collect();
        self.append_child(parent, node);
        node
    }

    pub fn set_id(&mut self, node: NodeId, id: &str) {
        self.node_mut(node).id = Some(id.to_string());
    }

    pub fn set_data(&mut self, node: NodeId, name: &str, value: &str) {
        self.node_mut(node)
            .data
            .insert(name.to_string(), value.to_string());
    }

    /// Natural (unstyled) size of an element.
    pub fn set_natural_size(&mut self, node: NodeId, width: f64, height: f64) {
        let data = self.node_mut(node);
        data.natural_width = width;
        data.natural_height = height;
    }

    /// Document position of an element.
    pub fn set_position(&mut self, node: NodeId, top: f64, left: f64) {
        let data = self.node_mut(node);
        data.top = top;
        data.left = left;
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        &self.node(node).classes
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.node(node).text.as_deref()
    }

    pub fn is_listening(&self, listener: Listener<NodeId>) -> bool {
        self.listeners.contains(&listener)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of node slots allocated, live or free.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Deadline of a pending timer.
    pub fn pending_timer(&self, token: TimerToken) -> Option<Duration> {
        self.timers.get(&token).copied()
    }

    /// Remove and return the earliest timer due at or before `until`,
    /// moving the clock to its deadline.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerToken> {
        let (token, deadline) = self
            .timers
            .iter()
            .filter(|(_, deadline)| **deadline <= until)
            .min_by_key(|(token, deadline)| (**deadline, **token))
            .map(|(token, deadline)| (*token, *deadline))?;
        self.timers.remove(&token);
        self.now = self.now.max(deadline);
        Some(token)
    }

    /// Move the clock forward without firing anything.
    fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    fn matches(&self, node: NodeId, selector: &str) -> bool {
        let data = self.node(node);
        match selector.strip_prefix('.') {
            Some(class) => data.classes.iter().any(|c| c == class),
            None => match selector.strip_prefix('#') {
                Some(id) => data.id.as_deref() == Some(id),
                None => data.tag == selector,
            },
        }
    }

    fn collect_matches(&self, node: NodeId, selector: &str, out: &mut Vec<NodeId>, first_only: bool) {
        for &child in &self.node(node).children {
            if first_only && !out.is_empty() {
                return;
            }
            if self.matches(child, selector) {
                out.push(child);
            }
            self.collect_matches(child, selector, out, first_only);
        }
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.node_mut(node).parent.take() {
            self.node_mut(parent).children.retain(|c| *c != node);
        }
    }

    fn style_px(&self, node: NodeId, property: &str) -> Option<f64> {
        self.node(node).styles.get(property).and_then(|v| parse_px(v))
    }

    /// Indented text rendering of the subtree under `node`.
    pub fn render(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.render_into(node, 0, &mut out);
        if out.ends_with('\n') {
            out.pop();
        }
        out
    }

    fn render_into(&self, node: NodeId, depth: usize, out: &mut String) {
        let data = self.node(node);
        let _ = write!(out, "{}{}", "  ".repeat(depth), data.tag);
        if let Some(id) = &data.id {
            let _ = write!(out, "#{id}");
        }
        for class in &data.classes {
            let _ = write!(out, ".{class}");
        }
        if data.disabled {
            out.push_str(" disabled");
        }
        if !data.styles.is_empty() {
            let styles: Vec<String> = data
                .styles
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect();
            let _ = write!(out, " [{}]", styles.join("; "));
        }
        if let Some(text) = &data.text {
            let _ = write!(out, " {text:?}");
        }
        out.push('\n');
        for &child in &data.children {
            self.render_into(child, depth + 1, out);
        }
    }

    /// Structured snapshot of the subtree under `node`.
    pub fn snapshot(&self, node: NodeId) -> NodeSnapshot {
        let data = self.node(node);
        NodeSnapshot {
            tag: data.tag.clone(),
            id: data.id.clone(),
            classes: data.classes.clone(),
            styles: data.styles.clone(),
            text: data.text.clone(),
            disabled: data.disabled,
            children: data.children.iter().map(|c| self.snapshot(*c)).collect(),
        }
    }
}

impl DomAdapter for HeadlessDom {
    type Node = NodeId;

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn query_selector(&self, root: NodeId, selector: &str) -> Option<NodeId> {
        let mut out = Vec::new();
        self.collect_matches(root, selector, &mut out, true);
        out.first().copied()
    }

    fn query_selector_all(&self, root: NodeId, selector: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_matches(root, selector, &mut out, false);
        out
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).children.clone()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    fn describe(&self, node: NodeId) -> String {
        let data = self.node(node);
        match &data.id {
            Some(id) => format!("#{id}"),
            None => format!(".{}", data.classes.join(" ")),
        }
    }

    fn data_attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.node(node).data.get(name).cloned()
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node).classes.iter().any(|c| c == class)
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if !self.has_class(node, class) {
            self.node_mut(node).classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        self.node_mut(node).classes.retain(|c| c != class);
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.node(node).styles.get(property).cloned()
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        self.node_mut(node)
            .styles
            .insert(property.to_string(), value.to_string());
    }

    fn clear_styles(&mut self, node: NodeId) {
        self.node_mut(node).styles.clear();
    }

    fn offset_width(&self, node: NodeId) -> f64 {
        self.style_px(node, "width")
            .unwrap_or(self.node(node).natural_width)
    }

    fn offset_height(&self, node: NodeId) -> f64 {
        self.style_px(node, "height")
            .unwrap_or(self.node(node).natural_height)
    }

    fn offset_left(&self, node: NodeId) -> f64 {
        let Some(parent) = self.node(node).parent else {
            return 0.0;
        };
        self.node(parent)
            .children
            .iter()
            .take_while(|c| **c != node)
            .fold(0.0, |left, c| left + self.offset_width(*c))
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        let data = self.node(node);
        Rect {
            top: data.top - self.scroll_y,
            left: data.left,
            width: self.offset_width(node),
            height: self.offset_height(node),
        }
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_node(NodeData {
            tag: tag.to_string(),
            ..NodeData::default()
        })
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        let siblings = &mut self.node_mut(parent).children;
        match siblings.iter().position(|c| *c == reference) {
            Some(at) => siblings.insert(at, child),
            None => siblings.push(child),
        }
    }

    fn remove(&mut self, node: NodeId) {
        if node == self.root || self.free.contains(&node) {
            return;
        }
        self.detach(node);
        self.release(node);
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        self.node_mut(node).text = Some(text.to_string());
    }

    fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        self.node_mut(node).disabled = disabled;
    }

    fn is_disabled(&self, node: NodeId) -> bool {
        self.node(node).disabled
    }

    fn listen(&mut self, listener: Listener<NodeId>) {
        if !self.listeners.contains(&listener) {
            self.listeners.push(listener);
        }
    }

    fn schedule(&mut self, token: TimerToken, delay: Duration) {
        self.timers.insert(token, self.now + delay);
    }

    fn cancel(&mut self, token: TimerToken) {
        self.timers.remove(&token);
    }
}

/// Serializable view of a node subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub styles: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

fn default_tag() -> String {
    "div".into()
}

fn default_containers() -> String {
    ".timeline".into()
}

/// One element of a page fixture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementFixture {
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    /// `data-*` attributes by kebab-case name.
    #[serde(default)]
    pub data: BTreeMap<String, String>,
    #[serde(default)]
    pub text: Option<String>,
    /// Natural width in px.
    #[serde(default)]
    pub width: f64,
    /// Natural height in px.
    #[serde(default)]
    pub height: f64,
    /// Document top in px.
    #[serde(default)]
    pub top: f64,
    /// Document left in px.
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub children: Vec<ElementFixture>,
}

/// A page to mount timelines on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageFixture {
    #[serde(default)]
    pub viewport: Viewport,
    /// Selector for the containers handed to the widget.
    #[serde(default = "default_containers")]
    pub containers: String,
    #[serde(default)]
    pub body: Vec<ElementFixture>,
}

impl PageFixture {
    /// Load a page fixture from a JSON file.
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        read_json(path)
    }
}

/// Load caller options from a JSON file.
pub fn load_options(path: &Path) -> Result<TimelineOptions, FixtureError> {
    read_json(path)
}

/// Load an interaction script from a JSON file.
pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>, FixtureError> {
    read_json(path)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, FixtureError> {
    let content = std::fs::read_to_string(path).map_err(FixtureError::Io)?;
    serde_json::from_str(&content).map_err(FixtureError::Parse)
}

/// One step of an interaction script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ScriptStep {
    /// Click the `index`-th element matching `selector`.
    Click {
        selector: String,
        #[serde(default)]
        index: usize,
    },
    /// Scroll the window to `y`.
    Scroll { y: f64 },
    /// Resize the viewport. Height is kept when omitted.
    Resize {
        width: f64,
        #[serde(default)]
        height: Option<f64>,
    },
    /// Advance the virtual clock, firing due timers.
    Advance { ms: u64 },
}

/// Errors from loading fixtures or running scripts.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// I/O error reading a fixture.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing fixture JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing a snapshot or report to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A script step referenced a missing element.
    #[error("No element matches '{selector}' at index {index}")]
    NoMatch { selector: String, index: usize },
}

impl TimelineWidget<HeadlessDom> {
    /// Mount the widget on every container matched by the page fixture.
    pub fn mount_page(page: &PageFixture, options: &TimelineOptions) -> Self {
        let dom = HeadlessDom::from_fixture(page);
        let containers = dom.query_selector_all(dom.root(), &page.containers);
        Self::mount(dom, &containers, options)
    }

    /// Advance the virtual clock, delivering every timer that falls due,
    /// including timers scheduled by earlier ones.
    pub fn advance(&mut self, by: Duration) {
        let until = self.dom().now() + by;
        while let Some(token) = self.dom_mut().pop_due(until) {
            self.handle_event(HostEvent::Timer(token));
        }
        self.dom_mut().set_now(until);
    }

    /// Click `node` if something listens for clicks on it.
    pub fn click(&mut self, node: NodeId) {
        if self.dom().is_listening(Listener::Click(node)) {
            self.handle_event(HostEvent::Click(node));
        }
    }

    pub fn scroll_to(&mut self, y: f64) {
        self.dom_mut().set_scroll_y(y);
        if self.dom().is_listening(Listener::Scroll) {
            self.handle_event(HostEvent::Scroll);
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.dom_mut().set_viewport(viewport);
        if self.dom().is_listening(Listener::Resize) {
            self.handle_event(HostEvent::Resize);
        }
    }

    /// Apply one script step.
    pub fn run_step(&mut self, step: &ScriptStep) -> Result<(), FixtureError> {
        match step {
            ScriptStep::Click { selector, index } => {
                let root = self.dom().root();
                let node = self
                    .dom()
                    .query_selector_all(root, selector)
                    .get(*index)
                    .copied()
                    .ok_or_else(|| FixtureError::NoMatch {
                        selector: selector.clone(),
                        index: *index,
                    })?;
                self.click(node);
            }
            ScriptStep::Scroll { y } => self.scroll_to(*y),
            ScriptStep::Resize { width, height } => {
                let current = self.dom().viewport();
                self.resize(Viewport::new(*width, height.unwrap_or(current.height)));
            }
            ScriptStep::Advance { ms } => self.advance(Duration::from_millis(*ms)),
        }
        Ok(())
    }
}
