//! Class names and selectors shared with external stylesheets.

pub const WRAP: &str = ".timeline__wrap";
pub const ITEMS: &str = ".timeline__items";
pub const CONTENT: &str = ".timeline__content";

pub const CONTENT_WRAP: &str = "timeline__content__wrap";
pub const ITEM_INNER: &str = "timeline__item__inner";

pub const HORIZONTAL: &str = "timeline--horizontal";
pub const MOBILE: &str = "timeline--mobile";
pub const LOADED: &str = "timeline--loaded";

pub const ITEM_LEFT: &str = "timeline__item--left";
pub const ITEM_RIGHT: &str = "timeline__item--right";
pub const ITEM_TOP: &str = "timeline__item--top";
pub const ITEM_BOTTOM: &str = "timeline__item--bottom";

pub const ANIMATED: &str = "animated";
pub const FADE_IN: &str = "fadeIn";

pub const NAV_BUTTON: &str = "timeline-nav-button";
pub const NAV_PREV: &str = "timeline-nav-button--prev";
pub const NAV_NEXT: &str = "timeline-nav-button--next";
pub const DIVIDER: &str = "timeline-divider";

/// Item classes a setup pass may leave behind.
pub const ITEM_LAYOUT: [&str; 6] = [ANIMATED, FADE_IN, ITEM_LEFT, ITEM_RIGHT, ITEM_TOP, ITEM_BOTTOM];
