//! Required markup checks and content wrapping.

use crate::classes;
use crate::dom::{wrap_node, DomAdapter};

/// A container's required markup was missing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructureError {
    #[error("{selector} could not be found as a direct descendant of {ancestor}")]
    Missing {
        selector: &'static str,
        ancestor: String,
    },

    #[error("{selector} could not be found in item {index} of {container}")]
    MissingContent {
        selector: &'static str,
        index: usize,
        container: String,
    },
}

/// The elements a valid container is made of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineParts<N> {
    pub wrap: N,
    pub scroller: N,
    pub items: Vec<N>,
}

/// Find the wrap, scroller and items of `container`.
pub fn validate<D: DomAdapter + ?Sized>(
    dom: &D,
    container: D::Node,
) -> Result<TimelineParts<D::Node>, StructureError> {
    let wrap = dom
        .query_selector(container, classes::WRAP)
        .ok_or_else(|| StructureError::Missing {
            selector: classes::WRAP,
            ancestor: dom.describe(container),
        })?;
    let scroller = dom
        .query_selector(wrap, classes::ITEMS)
        .ok_or(StructureError::Missing {
            selector: classes::ITEMS,
            ancestor: classes::WRAP.to_string(),
        })?;
    let items = dom.children(scroller);
    Ok(TimelineParts {
        wrap,
        scroller,
        items,
    })
}

/// Wrap each item's content in `.timeline__content__wrap` inside
/// `.timeline__item__inner`. Items without content are reported and left
/// alone.
pub fn wrap_contents<D: DomAdapter + ?Sized>(
    dom: &mut D,
    container: D::Node,
    items: &[D::Node],
) -> Vec<StructureError> {
    let mut problems = Vec::new();
    for (index, &item) in items.iter().enumerate() {
        let Some(content) = dom.query_selector(item, classes::CONTENT) else {
            problems.push(StructureError::MissingContent {
                selector: classes::CONTENT,
                index,
                container: dom.describe(container),
            });
            continue;
        };

        let content_wrap = dom.create_element("div");
        dom.add_class(content_wrap, classes::CONTENT_WRAP);
        wrap_node(dom, content, content_wrap);

        let inner = dom.create_element("div");
        dom.add_class(inner, classes::ITEM_INNER);
        wrap_node(dom, content_wrap, inner);
    }
    problems
}
