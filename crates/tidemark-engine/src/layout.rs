//! Horizontal and vertical layout.

use crate::classes;
use crate::dom::{DomAdapter, Rect, Viewport};
use crate::settings::{HorizontalStart, Settings, TriggerUnit, VerticalStart, VerticalTrigger};
use tracing::warn;

/// Measurements taken during a horizontal layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutMetrics {
    pub item_width: f64,
    pub scroller_width: f64,
    /// Height of the anchored row.
    pub top_row: f64,
    /// Height of the translated row.
    pub bottom_row: f64,
}

fn px(value: f64) -> String {
    format!("{value}px")
}

/// Size the items into a two-row strip inside the wrap.
///
/// Even and odd items form two rows; each row is as tall as its tallest
/// item. The row holding the first item is anchored unless
/// `horizontalStartPosition` is `bottom`, and the other row is pushed
/// below it by the anchored row's height.
pub fn lay_out_horizontal<D: DomAdapter + ?Sized>(
    dom: &mut D,
    wrap: D::Node,
    scroller: D::Node,
    items: &[D::Node],
    settings: &Settings,
) -> LayoutMetrics {
    let item_width = dom.offset_width(wrap) / settings.visible_items as f64;
    for &item in items {
        dom.set_style(item, "width", &px(item_width));
    }
    let scroller_width = item_width * items.len() as f64;
    dom.set_style(scroller, "width", &px(scroller_width));

    let mut even_tallest: f64 = 0.0;
    let mut odd_tallest: f64 = 0.0;
    for (i, &item) in items.iter().enumerate() {
        dom.set_style(item, "height", "auto");
        let height = dom.offset_height(item);
        if i % 2 == 0 {
            even_tallest = even_tallest.max(height);
        } else {
            odd_tallest = odd_tallest.max(height);
        }
    }

    let even_anchored = settings.horizontal_start_position == HorizontalStart::Top;
    let (top_row, bottom_row) = if even_anchored {
        (even_tallest, odd_tallest)
    } else {
        (odd_tallest, even_tallest)
    };
    let push_down = format!("translateY({top_row}px)");

    for (i, &item) in items.iter().enumerate() {
        let even = i % 2 == 0;
        let height = if even { even_tallest } else { odd_tallest };
        dom.set_style(item, "height", &px(height));
        if even == even_anchored {
            dom.add_class(item, classes::ITEM_TOP);
        } else {
            dom.add_class(item, classes::ITEM_BOTTOM);
            dom.set_style(item, "transform", &push_down);
        }
    }
    dom.set_style(scroller, "height", &px(even_tallest + odd_tallest));

    LayoutMetrics {
        item_width,
        scroller_width,
        top_row,
        bottom_row,
    }
}

/// Slide the strip so the item at `index` sits at the left edge.
pub fn position_scroller<D: DomAdapter + ?Sized>(
    dom: &mut D,
    scroller: D::Node,
    items: &[D::Node],
    index: usize,
) {
    let Some(&item) = items.get(index) else {
        return;
    };
    let offset = dom.offset_left(item);
    dom.set_style(scroller, "transform", &format!("translate3d(-{offset}px, 0, 0)"));
}

/// Vertical column of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Left,
    Right,
}

impl Column {
    pub fn class(self) -> &'static str {
        match self {
            Self::Left => classes::ITEM_LEFT,
            Self::Right => classes::ITEM_RIGHT,
        }
    }
}

/// Column for the item at `index`. Without `split` everything stacks left.
pub fn column_for(index: usize, start: VerticalStart, split: bool) -> Column {
    let right_parity = match start {
        VerticalStart::Left => 1,
        VerticalStart::Right => 0,
    };
    if split && index % 2 == right_parity {
        Column::Right
    } else {
        Column::Left
    }
}

/// Y coordinate of the trigger line for a viewport of `viewport_height`.
///
/// A px trigger that would put the line at or above the top of the
/// viewport falls back to the default percentage.
pub fn trigger_line(trigger: VerticalTrigger, viewport_height: f64) -> f64 {
    let trigger = if exceeds_viewport(trigger, viewport_height) {
        VerticalTrigger::DEFAULT
    } else {
        trigger
    };
    let line = match trigger.unit {
        TriggerUnit::Px => viewport_height - trigger.value,
        TriggerUnit::Percent => viewport_height * ((100.0 - trigger.value) / 100.0),
    };
    line.trunc()
}

/// Whether a px trigger is too large for a viewport of `viewport_height`.
pub fn exceeds_viewport(trigger: VerticalTrigger, viewport_height: f64) -> bool {
    trigger.unit == TriggerUnit::Px && trigger.value >= viewport_height
}

/// Whether `rect` overlaps the viewport shrunk vertically to the trigger line.
pub fn in_trigger_range(rect: Rect, viewport: Viewport, trigger: VerticalTrigger) -> bool {
    rect.top <= trigger_line(trigger, viewport.height)
        && rect.left <= viewport.width
        && rect.bottom() >= 0.0
        && rect.right() >= 0.0
}

/// Assign columns and entrance flags to every item.
///
/// Items already in the trigger band, or revealed earlier, are left
/// unflagged, as is every item before the last one found visible.
pub fn lay_out_vertical<D: DomAdapter + ?Sized>(
    dom: &mut D,
    items: &[D::Node],
    settings: &Settings,
    revealed: &[bool],
) {
    let viewport = dom.viewport();
    let split = viewport.width > f64::from(settings.force_vertical_mode);
    let mut last_visible = 0;

    if exceeds_viewport(settings.vertical_trigger, viewport.height) {
        warn!(
            "Timeline: verticalTrigger {} is not less than the viewport height ({}px), using {}",
            settings.vertical_trigger,
            viewport.height,
            VerticalTrigger::DEFAULT
        );
    }

    for (i, &item) in items.iter().enumerate() {
        dom.remove_class(item, classes::ANIMATED);
        dom.remove_class(item, classes::FADE_IN);

        let visible = revealed.get(i).copied().unwrap_or(false)
            || in_trigger_range(dom.bounding_rect(item), viewport, settings.vertical_trigger);
        if !visible && i > 0 {
            dom.add_class(item, classes::ANIMATED);
        } else {
            last_visible = i;
        }

        let column = column_for(i, settings.vertical_start_position, split);
        dom.add_class(item, column.class());
    }

    for &item in &items[..last_visible] {
        dom.remove_class(item, classes::ANIMATED);
        dom.remove_class(item, classes::FADE_IN);
    }
}

/// Mark every item in the trigger band as revealed. Returns how many
/// items were revealed for the first time.
pub fn reveal_in_range<D: DomAdapter + ?Sized>(
    dom: &mut D,
    items: &[D::Node],
    trigger: VerticalTrigger,
    revealed: &mut [bool],
) -> usize {
    let viewport = dom.viewport();
    let mut newly = 0;
    for (i, &item) in items.iter().enumerate() {
        if in_trigger_range(dom.bounding_rect(item), viewport, trigger) {
            dom.add_class(item, classes::FADE_IN);
            if let Some(seen) = revealed.get_mut(i) {
                if !*seen {
                    *seen = true;
                    newly += 1;
                }
            }
        }
    }
    newly
}
