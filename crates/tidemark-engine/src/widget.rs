//! Timeline orchestration.
//!
//! [`TimelineWidget`] owns the rendering surface and one
//! [`TimelineInstance`] per valid container. Setup runs synchronously in
//! container order; afterwards the host feeds [`HostEvent`]s to
//! [`TimelineWidget::handle_event`].

use crate::classes;
use crate::dom::{DomAdapter, HostEvent, Listener, TimerKind, TimerToken};
use crate::layout::{self, LayoutMetrics};
use crate::lifecycle::LifecycleState;
use crate::navigation::{self, Cursor, NavControls};
use crate::settings::{self, Settings, TimelineOptions};
use crate::structure;
use std::time::Duration;
use tracing::{debug, warn};

/// Delay before a container is made visible again after setup.
pub const REVEAL_DELAY: Duration = Duration::from_millis(500);

/// Quiet period after the last resize event before layout is redone.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);

/// One laid-out timeline.
#[derive(Debug, Clone)]
pub struct TimelineInstance<N> {
    container: N,
    wrap: N,
    scroller: N,
    items: Vec<N>,
    settings: Settings,
    state: LifecycleState,
    metrics: LayoutMetrics,
    cursor: Cursor,
    controls: Option<NavControls<N>>,
    revealed: Vec<bool>,
    stable_width: f64,
}

impl<N: Copy> TimelineInstance<N> {
    pub fn container(&self) -> N {
        self.container
    }

    pub fn wrap(&self) -> N {
        self.wrap
    }

    pub fn scroller(&self) -> N {
        self.scroller
    }

    pub fn items(&self) -> &[N] {
        &self.items
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn metrics(&self) -> LayoutMetrics {
        self.metrics
    }

    /// Index of the first visible item in horizontal mode.
    pub fn current_index(&self) -> usize {
        self.cursor.index()
    }

    pub fn controls(&self) -> Option<NavControls<N>> {
        self.controls
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }
}

/// The timeline widget over a rendering surface.
#[derive(Debug)]
pub struct TimelineWidget<D: DomAdapter> {
    dom: D,
    instances: Vec<TimelineInstance<D::Node>>,
    rejected: Vec<D::Node>,
}

impl<D: DomAdapter> TimelineWidget<D> {
    /// Build instances for `containers` and run the first setup pass.
    ///
    /// Containers missing required markup are skipped with a warning.
    /// Mounting again over containers that were already loaded reuses
    /// their wrapped content.
    pub fn mount(mut dom: D, containers: &[D::Node], options: &TimelineOptions) -> Self {
        let mut instances = Vec::new();
        let mut rejected = Vec::new();

        for &container in containers {
            let parts = match structure::validate(&dom, container) {
                Ok(parts) => parts,
                Err(err) => {
                    warn!("Timeline: {err}");
                    rejected.push(container);
                    continue;
                }
            };

            let name = dom.describe(container);
            let resolution = settings::resolve(
                |attribute| dom.data_attribute(container, attribute),
                options,
                parts.items.len(),
            );
            for warning in &resolution.warnings {
                warn!(container = %name, "Timeline: {warning}");
            }

            let item_count = parts.items.len();
            instances.push(TimelineInstance {
                container,
                wrap: parts.wrap,
                scroller: parts.scroller,
                items: parts.items,
                settings: resolution.settings,
                state: LifecycleState::Uninitialized,
                metrics: LayoutMetrics::default(),
                cursor: Cursor::default(),
                controls: None,
                revealed: vec![false; item_count],
                stable_width: dom.viewport().width,
            });
        }

        if !instances.is_empty() {
            dom.listen(Listener::Scroll);
            dom.listen(Listener::Resize);
        }

        let mut widget = Self {
            dom,
            instances,
            rejected,
        };
        widget.set_up_all();
        widget
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    /// Give the surface back, e.g. to mount again.
    pub fn into_dom(self) -> D {
        self.dom
    }

    pub fn instances(&self) -> &[TimelineInstance<D::Node>] {
        &self.instances
    }

    pub fn instance_for(&self, container: D::Node) -> Option<&TimelineInstance<D::Node>> {
        self.instances.iter().find(|i| i.container == container)
    }

    /// Lifecycle state of any container handed to [`Self::mount`].
    pub fn state_of(&self, container: D::Node) -> LifecycleState {
        if self.rejected.contains(&container) {
            return LifecycleState::StructurallyInvalid;
        }
        self.instance_for(container)
            .map_or(LifecycleState::Uninitialized, TimelineInstance::state)
    }

    /// Run a setup pass on every instance, in mount order.
    pub fn set_up_all(&mut self) {
        for index in 0..self.instances.len() {
            self.set_up(index);
        }
    }

    /// Deliver a host event.
    pub fn handle_event(&mut self, event: HostEvent<D::Node>) {
        match event {
            HostEvent::Click(node) => self.on_click(node),
            HostEvent::Scroll => self.on_scroll(),
            HostEvent::Resize => {
                for index in 0..self.instances.len() {
                    self.dom
                        .schedule(TimerToken::new(index, TimerKind::ResizeDebounce), RESIZE_DEBOUNCE);
                }
            }
            HostEvent::Timer(token) => self.on_timer(token),
        }
    }

    fn set_up(&mut self, index: usize) {
        let Some(instance) = self.instances.get_mut(index) else {
            return;
        };
        let dom = &mut self.dom;
        let container = instance.container;

        dom.set_style(container, "opacity", "0");
        if !dom.has_class(container, classes::LOADED) {
            let name = dom.describe(container);
            for problem in structure::wrap_contents(dom, container, &instance.items) {
                warn!(container = %name, "Timeline: {problem}");
            }
        }
        reset(dom, instance);

        let viewport = dom.viewport();
        instance.state = LifecycleState::transition(&instance.settings, viewport.width);
        for class in instance.state.container_classes() {
            dom.add_class(container, class);
        }
        debug!(
            container = %dom.describe(container),
            state = %instance.state,
            width = viewport.width,
            "timeline setup"
        );

        if instance.state == LifecycleState::LoadedHorizontal {
            set_up_horizontal(dom, instance);
        } else {
            layout::lay_out_vertical(dom, &instance.items, &instance.settings, &instance.revealed);
        }

        instance.stable_width = viewport.width;
        dom.cancel(TimerToken::new(index, TimerKind::ResizeDebounce));
        dom.schedule(TimerToken::new(index, TimerKind::Reveal), REVEAL_DELAY);
    }

    fn on_click(&mut self, node: D::Node) {
        let dom = &mut self.dom;
        for instance in &mut self.instances {
            if instance.state != LifecycleState::LoadedHorizontal {
                continue;
            }
            let Some(controls) = instance.controls else {
                continue;
            };
            let Some(direction) = controls.direction_of(node) else {
                continue;
            };
            let index = instance.cursor.step(direction);
            navigation::sync_controls(dom, &controls, &instance.cursor);
            layout::position_scroller(dom, instance.scroller, &instance.items, index);
            debug!(container = %dom.describe(instance.container), index, "timeline paged");
            return;
        }
    }

    fn on_scroll(&mut self) {
        let dom = &mut self.dom;
        for instance in &mut self.instances {
            if !instance.state.is_vertical() {
                continue;
            }
            layout::reveal_in_range(
                dom,
                &instance.items,
                instance.settings.vertical_trigger,
                &mut instance.revealed,
            );
        }
    }

    fn on_timer(&mut self, token: TimerToken) {
        let Some(instance) = self.instances.get(token.instance) else {
            return;
        };
        match token.kind {
            TimerKind::Reveal => {
                self.dom.set_style(instance.container, "opacity", "1");
            }
            TimerKind::ResizeDebounce => {
                let width = self.dom.viewport().width;
                #[allow(clippy::float_cmp)]
                let changed = width != instance.stable_width;
                if changed {
                    debug!(instance = token.instance, width, "viewport width changed");
                    self.set_up(token.instance);
                }
            }
        }
    }
}

/// Strip everything a previous setup pass added.
fn reset<D: DomAdapter + ?Sized>(dom: &mut D, instance: &mut TimelineInstance<D::Node>) {
    for class in [classes::HORIZONTAL, classes::MOBILE, classes::LOADED] {
        dom.remove_class(instance.container, class);
    }
    dom.clear_styles(instance.scroller);
    for &item in &instance.items {
        dom.clear_styles(item);
        for class in classes::ITEM_LAYOUT {
            dom.remove_class(item, class);
        }
    }
    navigation::remove_injected(dom, instance.container);
    instance.controls = None;
    instance.metrics = LayoutMetrics::default();
}

fn set_up_horizontal<D: DomAdapter + ?Sized>(dom: &mut D, instance: &mut TimelineInstance<D::Node>) {
    let settings = &instance.settings;
    instance.metrics = layout::lay_out_horizontal(
        dom,
        instance.wrap,
        instance.scroller,
        &instance.items,
        settings,
    );
    instance.cursor = Cursor::for_layout(
        settings.start_index,
        settings.rtl_mode,
        instance.items.len(),
        settings.visible_items,
        settings.move_items,
    );
    layout::position_scroller(dom, instance.scroller, &instance.items, instance.cursor.index());
    instance.controls = navigation::add_controls(dom, instance.container, &instance.items, &instance.cursor);
    if let Some(&first) = instance.items.first() {
        navigation::add_divider(dom, instance.container, first);
    }
}
