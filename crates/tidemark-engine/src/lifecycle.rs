//! Per-container lifecycle states.

use crate::classes;
use crate::settings::{Mode, Settings};
use serde::Serialize;
use std::fmt;

/// Where a container is in its lifecycle. The container's state classes
/// are a function of this value alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleState {
    /// Accepted, not yet laid out.
    #[default]
    Uninitialized,
    /// Rejected for missing markup; never laid out.
    StructurallyInvalid,
    LoadedHorizontal,
    LoadedVertical,
    /// Vertical layout forced by a narrow viewport.
    MobileOverride,
}

impl LifecycleState {
    /// State after a setup pass at `viewport_width`.
    ///
    /// Horizontal layout needs the viewport strictly wider than the
    /// breakpoint.
    pub fn transition(settings: &Settings, viewport_width: f64) -> Self {
        if viewport_width <= f64::from(settings.force_vertical_mode) {
            Self::MobileOverride
        } else if settings.mode == Mode::Horizontal {
            Self::LoadedHorizontal
        } else {
            Self::LoadedVertical
        }
    }

    /// Classes the container carries in this state.
    pub fn container_classes(self) -> &'static [&'static str] {
        match self {
            Self::Uninitialized | Self::StructurallyInvalid => &[],
            Self::LoadedHorizontal => &[classes::HORIZONTAL, classes::LOADED],
            Self::LoadedVertical => &[classes::LOADED],
            Self::MobileOverride => &[classes::MOBILE, classes::LOADED],
        }
    }

    pub fn is_loaded(self) -> bool {
        matches!(
            self,
            Self::LoadedHorizontal | Self::LoadedVertical | Self::MobileOverride
        )
    }

    /// Whether items are laid out as a vertical list.
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::LoadedVertical | Self::MobileOverride)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::StructurallyInvalid => write!(f, "structurally-invalid"),
            Self::LoadedHorizontal => write!(f, "loaded-horizontal"),
            Self::LoadedVertical => write!(f, "loaded-vertical"),
            Self::MobileOverride => write!(f, "mobile-override"),
        }
    }
}
