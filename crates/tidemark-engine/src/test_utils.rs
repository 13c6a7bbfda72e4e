//! Page fixtures shared by the unit tests.

use crate::dom::Viewport;
use crate::headless::{ElementFixture, PageFixture};
use std::collections::BTreeMap;

/// Natural height of even items; odd items are [`ODD_HEIGHT`].
pub const EVEN_HEIGHT: f64 = 120.0;
pub const ODD_HEIGHT: f64 = 100.0;
/// Natural width of every `.timeline__wrap`.
pub const WRAP_WIDTH: f64 = 900.0;

fn div(classes: &[&str]) -> ElementFixture {
    ElementFixture {
        tag: "div".into(),
        classes: classes.iter().map(ToString::to_string).collect(),
        ..ElementFixture::default()
    }
}

fn item(index: usize, top: f64, height: f64) -> ElementFixture {
    let mut content = div(&["timeline__content"]);
    content.text = Some(format!("Item {}", index + 1));
    ElementFixture {
        height,
        top,
        children: vec![content],
        ..div(&["timeline__item"])
    }
}

fn container(id: &str, children: Vec<ElementFixture>) -> ElementFixture {
    ElementFixture {
        id: Some(id.to_string()),
        children,
        ..div(&["timeline"])
    }
}

fn wrapped(items: Vec<ElementFixture>) -> ElementFixture {
    ElementFixture {
        width: WRAP_WIDTH,
        children: vec![ElementFixture {
            children: items,
            ..div(&["timeline__items"])
        }],
        ..div(&["timeline__wrap"])
    }
}

/// Builds a [`PageFixture`] one container at a time.
pub struct PageBuilder {
    viewport: Viewport,
    body: Vec<ElementFixture>,
}

impl PageBuilder {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            body: Vec::new(),
        }
    }

    /// A valid container with `items` items spaced 400px apart.
    pub fn timeline(self, id: &str, items: usize) -> Self {
        self.timeline_with(id, items, BTreeMap::new())
    }

    /// A valid container configured for horizontal mode through data
    /// attributes.
    pub fn horizontal_timeline(self, id: &str, items: usize, visible: usize) -> Self {
        let data = BTreeMap::from([
            ("mode".to_string(), "horizontal".to_string()),
            ("visible-items".to_string(), visible.to_string()),
        ]);
        self.timeline_with(id, items, data)
    }

    /// A valid container whose items sit at the given document tops.
    pub fn vertical_timeline(mut self, id: &str, tops: &[f64]) -> Self {
        let items = tops
            .iter()
            .enumerate()
            .map(|(i, top)| item(i, *top, 200.0))
            .collect();
        self.body.push(container(id, vec![wrapped(items)]));
        self
    }

    /// A container with no `.timeline__wrap`.
    pub fn bare_container(mut self, id: &str) -> Self {
        self.body.push(container(id, Vec::new()));
        self
    }

    /// A container with a wrap but no `.timeline__items`.
    pub fn wrap_only_container(mut self, id: &str) -> Self {
        self.body.push(container(id, vec![div(&["timeline__wrap"])]));
        self
    }

    fn timeline_with(mut self, id: &str, items: usize, data: BTreeMap<String, String>) -> Self {
        let items = (0..items)
            .map(|i| {
                let height = if i % 2 == 0 { EVEN_HEIGHT } else { ODD_HEIGHT };
                item(i, i as f64 * 400.0, height)
            })
            .collect();
        let mut element = container(id, vec![wrapped(items)]);
        element.data = data;
        self.body.push(element);
        self
    }

    pub fn build(self) -> PageFixture {
        PageFixture {
            viewport: self.viewport,
            containers: ".timeline".into(),
            body: self.body,
        }
    }
}

/// One horizontal timeline `#story` in a 1200x800 viewport.
pub fn horizontal_page(items: usize, visible: usize) -> PageFixture {
    PageBuilder::new(Viewport::new(1200.0, 800.0))
        .horizontal_timeline("story", items, visible)
        .build()
}

/// One vertical timeline `#story` in a 1200x1000 viewport.
pub fn vertical_page(tops: &[f64]) -> PageFixture {
    PageBuilder::new(Viewport::new(1200.0, 1000.0))
        .vertical_timeline("story", tops)
        .build()
}
