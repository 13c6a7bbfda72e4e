//! Paging controls for horizontal timelines.

use crate::classes;
use crate::dom::{DomAdapter, Listener};

/// Paging direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Index of the first visible item, kept within `[0, max_index]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    index: usize,
    max_index: usize,
    step: usize,
}

impl Cursor {
    /// `start` is clamped into range. The step is at least one item.
    pub fn new(start: usize, item_count: usize, visible_items: usize, step: usize) -> Self {
        let max_index = item_count.saturating_sub(visible_items);
        Self {
            index: start.min(max_index),
            max_index,
            step: step.max(1),
        }
    }

    /// Cursor for a layout pass: the last page in right-to-left mode,
    /// else `start`.
    pub fn for_layout(
        start: usize,
        rtl: bool,
        item_count: usize,
        visible_items: usize,
        step: usize,
    ) -> Self {
        let start = if rtl {
            item_count.saturating_sub(visible_items)
        } else {
            start
        };
        Self::new(start, item_count, visible_items, step)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn max_index(&self) -> usize {
        self.max_index
    }

    pub fn at_start(&self) -> bool {
        self.index == 0
    }

    pub fn at_end(&self) -> bool {
        self.index >= self.max_index
    }

    /// Move one step and return the new index.
    pub fn step(&mut self, direction: Direction) -> usize {
        self.index = match direction {
            Direction::Previous => self.index.saturating_sub(self.step),
            Direction::Next => (self.index + self.step).min(self.max_index),
        };
        self.index
    }
}

/// The injected previous/next buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavControls<N> {
    pub prev: N,
    pub next: N,
}

impl<N: Copy + Eq> NavControls<N> {
    /// Direction for a click on `node`, if it is one of the controls.
    pub fn direction_of(&self, node: N) -> Option<Direction> {
        if node == self.prev {
            Some(Direction::Previous)
        } else if node == self.next {
            Some(Direction::Next)
        } else {
            None
        }
    }
}

/// Append the buttons to `container`, level with the bottom of the first
/// item. Returns `None` when every item already fits.
pub fn add_controls<D: DomAdapter + ?Sized>(
    dom: &mut D,
    container: D::Node,
    items: &[D::Node],
    cursor: &Cursor,
) -> Option<NavControls<D::Node>> {
    if cursor.max_index() == 0 {
        return None;
    }
    let first = *items.first()?;
    let top = format!("{}px", dom.offset_height(first));

    let make = |dom: &mut D, modifier: &str, label: &str| {
        let button = dom.create_element("button");
        dom.add_class(button, classes::NAV_BUTTON);
        dom.add_class(button, modifier);
        dom.set_text(button, label);
        dom.set_style(button, "top", &top);
        button
    };
    let prev = make(&mut *dom, classes::NAV_PREV, "Previous");
    let next = make(&mut *dom, classes::NAV_NEXT, "Next");

    let controls = NavControls { prev, next };
    sync_controls(dom, &controls, cursor);
    dom.append_child(container, prev);
    dom.append_child(container, next);
    dom.listen(Listener::Click(prev));
    dom.listen(Listener::Click(next));
    Some(controls)
}

/// Disable each button at its boundary.
pub fn sync_controls<D: DomAdapter + ?Sized>(
    dom: &mut D,
    controls: &NavControls<D::Node>,
    cursor: &Cursor,
) {
    dom.set_disabled(controls.prev, cursor.at_start());
    dom.set_disabled(controls.next, cursor.at_end());
}

/// Replace the centre divider of `container`.
pub fn add_divider<D: DomAdapter + ?Sized>(dom: &mut D, container: D::Node, first_item: D::Node) {
    remove_all(dom, container, classes::DIVIDER);
    let divider = dom.create_element("span");
    dom.add_class(divider, classes::DIVIDER);
    let top = format!("{}px", dom.offset_height(first_item));
    dom.set_style(divider, "top", &top);
    dom.append_child(container, divider);
}

/// Remove the buttons and divider injected by earlier passes.
pub fn remove_injected<D: DomAdapter + ?Sized>(dom: &mut D, container: D::Node) {
    remove_all(dom, container, classes::NAV_BUTTON);
    remove_all(dom, container, classes::DIVIDER);
}

fn remove_all<D: DomAdapter + ?Sized>(dom: &mut D, container: D::Node, class: &str) {
    for node in dom.query_selector_all(container, &format!(".{class}")) {
        dom.remove(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Viewport;
    use crate::headless::{HeadlessDom, NodeId};

    fn page(items: usize) -> (HeadlessDom, NodeId, Vec<NodeId>) {
        let mut dom = HeadlessDom::new(Viewport::default());
        let root = dom.root();
        let container = dom.element(root, "div", &["timeline"]);
        let items = (0..items)
            .map(|_| {
                let item = dom.element(container, "div", &["timeline__item"]);
                dom.set_natural_size(item, 100.0, 140.0);
                item
            })
            .collect();
        (dom, container, items)
    }

    #[test]
    fn test_cursor_scenario_five_three_two() {
        let mut cursor = Cursor::new(0, 5, 3, 2);
        assert_eq!(cursor.max_index(), 2);
        assert_eq!(cursor.step(Direction::Next), 2);
        assert_eq!(cursor.step(Direction::Next), 2);
        assert!(cursor.at_end());
        assert!(!cursor.at_start());
    }

    #[test]
    fn test_cursor_never_leaves_range() {
        for items in 0..9 {
            for visible in 1..5 {
                for step in 1..4 {
                    for start in 0..items {
                        let mut cursor = Cursor::new(start, items, visible, step);
                        let max = items.saturating_sub(visible);
                        for _ in 0..10 {
                            assert!(cursor.step(Direction::Next) <= max);
                        }
                        for _ in 0..10 {
                            cursor.step(Direction::Previous);
                        }
                        assert_eq!(cursor.index(), 0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_cursor_rtl_starts_on_last_page() {
        let cursor = Cursor::for_layout(0, true, 7, 3, 1);
        assert_eq!(cursor.index(), 4);
        let cursor = Cursor::for_layout(1, true, 2, 3, 1);
        assert_eq!(cursor.index(), 0);
        let cursor = Cursor::for_layout(1, false, 7, 3, 1);
        assert_eq!(cursor.index(), 1);
    }

    #[test]
    fn test_controls_created_with_boundary_state() {
        let (mut dom, container, items) = page(5);
        let cursor = Cursor::new(0, 5, 3, 1);
        let controls = add_controls(&mut dom, container, &items, &cursor).unwrap();

        assert!(dom.is_disabled(controls.prev));
        assert!(!dom.is_disabled(controls.next));
        assert_eq!(dom.style(controls.prev, "top").as_deref(), Some("140px"));
        assert_eq!(dom.text(controls.next), Some("Next"));
        assert!(dom.has_class(controls.next, "timeline-nav-button--next"));
        assert!(dom.is_listening(Listener::Click(controls.prev)));
        assert_eq!(controls.direction_of(controls.next), Some(Direction::Next));
        assert_eq!(controls.direction_of(container), None);
    }

    #[test]
    fn test_no_controls_when_everything_fits() {
        let (mut dom, container, items) = page(3);
        let cursor = Cursor::new(0, 3, 3, 1);
        assert!(add_controls(&mut dom, container, &items, &cursor).is_none());
        assert!(dom
            .query_selector(container, ".timeline-nav-button")
            .is_none());
    }

    #[test]
    fn test_divider_is_replaced_not_duplicated() {
        let (mut dom, container, items) = page(4);
        add_divider(&mut dom, container, items[0]);
        add_divider(&mut dom, container, items[0]);

        let dividers = dom.query_selector_all(container, ".timeline-divider");
        assert_eq!(dividers.len(), 1);
        assert_eq!(dom.style(dividers[0], "top").as_deref(), Some("140px"));
    }

    #[test]
    fn test_remove_injected() {
        let (mut dom, container, items) = page(5);
        let cursor = Cursor::new(0, 5, 3, 1);
        add_controls(&mut dom, container, &items, &cursor);
        add_divider(&mut dom, container, items[0]);

        remove_injected(&mut dom, container);
        assert!(dom.query_selector(container, ".timeline-nav-button").is_none());
        assert!(dom.query_selector(container, ".timeline-divider").is_none());
        assert_eq!(dom.children(container).len(), 5);
    }
}
