//! Settings resolution for timeline instances.
//!
//! Every option is described once in [`OPTIONS`] and resolved by the same
//! pipeline: data attribute, then caller option, then default. Values that
//! fail validation produce a [`SettingWarning`] and fall back to the
//! default. Resolution never fails.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// Layout mode requested by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Horizontal,
    #[default]
    Vertical,
}

/// Column of the first item in vertical mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VerticalStart {
    #[default]
    Left,
    Right,
}

/// Row of the first item in horizontal mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalStart {
    #[default]
    Top,
    Bottom,
}

/// Unit of a [`VerticalTrigger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerUnit {
    Px,
    Percent,
}

impl fmt::Display for TriggerUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px => write!(f, "px"),
            Self::Percent => write!(f, "%"),
        }
    }
}

/// Distance from the bottom of the viewport at which items count as
/// reached, e.g. `15%` or `120px`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct VerticalTrigger {
    pub value: f64,
    pub unit: TriggerUnit,
}

fn trigger_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^(-?\d*\.?\d*)(.*)$").ok())
        .as_ref()
}

impl VerticalTrigger {
    pub const DEFAULT: Self = Self {
        value: 15.0,
        unit: TriggerUnit::Percent,
    };

    /// Parse a trigger string. The numeric prefix must be present, the
    /// unit must be `px` or `%`, px values must be non-negative and
    /// percentages must lie in `[0, 100]`.
    pub fn parse(input: &str) -> Result<Self, SettingWarning> {
        let input = input.trim();
        let Some(caps) = trigger_pattern().and_then(|re| re.captures(input)) else {
            return Err(SettingWarning::TriggerNotANumber {
                value: input.to_string(),
            });
        };
        let number = caps.get(1).map_or("", |m| m.as_str());
        let unit = caps.get(2).map_or("", |m| m.as_str());

        let value: f64 = number
            .parse()
            .map_err(|_| SettingWarning::TriggerNotANumber {
                value: input.to_string(),
            })?;

        let unit = match unit {
            "px" => TriggerUnit::Px,
            "%" => TriggerUnit::Percent,
            other => {
                return Err(SettingWarning::TriggerUnit {
                    unit: other.to_string(),
                })
            }
        };

        let in_range = match unit {
            TriggerUnit::Px => value >= 0.0,
            TriggerUnit::Percent => (0.0..=100.0).contains(&value),
        };
        if !in_range {
            return Err(SettingWarning::TriggerOutOfRange {
                value: input.to_string(),
            });
        }

        Ok(Self { value, unit })
    }
}

impl Default for VerticalTrigger {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for VerticalTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

impl From<VerticalTrigger> for String {
    fn from(trigger: VerticalTrigger) -> Self {
        trigger.to_string()
    }
}

impl TryFrom<String> for VerticalTrigger {
    type Error = SettingWarning;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Fully validated settings for one timeline instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub mode: Mode,
    /// Viewport width at or below which the vertical mobile layout is forced.
    pub force_vertical_mode: u32,
    pub vertical_start_position: VerticalStart,
    pub horizontal_start_position: HorizontalStart,
    pub visible_items: usize,
    pub move_items: usize,
    pub start_index: usize,
    pub rtl_mode: bool,
    pub vertical_trigger: VerticalTrigger,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::Vertical,
            force_vertical_mode: 600,
            vertical_start_position: VerticalStart::Left,
            horizontal_start_position: HorizontalStart::Top,
            visible_items: 3,
            move_items: 1,
            start_index: 0,
            rtl_mode: false,
            vertical_trigger: VerticalTrigger::DEFAULT,
        }
    }
}

/// Caller-supplied options, keyed by camelCase option name. Values are
/// loosely typed and validated during resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimelineOptions(Map<String, Value>);

impl TimelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option, returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for TimelineOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Value type and validation rule of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Whole number within `[min, max]`.
    Integer { min: Option<i64>, max: i64 },
    /// One of a fixed set of strings.
    Choice(&'static [&'static str]),
    Boolean,
    /// `<number>px` or `<number>%`; checked by the trigger cross-field rule.
    Magnitude,
}

/// One recognised option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionDescriptor {
    pub key: &'static str,
    pub kind: OptionKind,
    pub default: &'static str,
}

impl OptionDescriptor {
    /// Name of the matching `data-*` attribute, without the prefix.
    pub fn attribute_name(&self) -> String {
        kebab_case(self.key)
    }
}

/// Largest integer option accepted: `u32::MAX`, so every integer setting
/// fits its field on 32-bit targets too.
const INTEGER_MAX: i64 = 4_294_967_295;

/// The option table.
pub const OPTIONS: [OptionDescriptor; 9] = [
    OptionDescriptor {
        key: "mode",
        kind: OptionKind::Choice(&["horizontal", "vertical"]),
        default: "vertical",
    },
    OptionDescriptor {
        key: "forceVerticalMode",
        kind: OptionKind::Integer {
            min: Some(0),
            max: INTEGER_MAX,
        },
        default: "600",
    },
    OptionDescriptor {
        key: "verticalStartPosition",
        kind: OptionKind::Choice(&["left", "right"]),
        default: "left",
    },
    OptionDescriptor {
        key: "horizontalStartPosition",
        kind: OptionKind::Choice(&["top", "bottom"]),
        default: "top",
    },
    OptionDescriptor {
        key: "visibleItems",
        kind: OptionKind::Integer {
            min: Some(1),
            max: INTEGER_MAX,
        },
        default: "3",
    },
    OptionDescriptor {
        key: "moveItems",
        kind: OptionKind::Integer {
            min: Some(1),
            max: INTEGER_MAX,
        },
        default: "1",
    },
    OptionDescriptor {
        key: "startIndex",
        kind: OptionKind::Integer {
            min: None,
            max: INTEGER_MAX,
        },
        default: "0",
    },
    OptionDescriptor {
        key: "rtlMode",
        kind: OptionKind::Boolean,
        default: "false",
    },
    OptionDescriptor {
        key: "verticalTrigger",
        kind: OptionKind::Magnitude,
        default: "15%",
    },
];

/// Advisory diagnostics produced while resolving settings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingWarning {
    #[error("Supplied number '{value}' for '{setting}' is not an integer")]
    NotAnInteger { setting: &'static str, value: String },

    #[error("Supplied number '{value}' for '{setting}' is below the minimum of {min}")]
    BelowMinimum {
        setting: &'static str,
        value: i64,
        min: i64,
    },

    #[error("Supplied number '{value}' for '{setting}' is above the maximum of {max}")]
    AboveMaximum {
        setting: &'static str,
        value: String,
        max: i64,
    },

    #[error("The {setting} '{value}' was not recognised")]
    NotRecognised { setting: &'static str, value: String },

    #[error("Supplied value '{value}' for '{setting}' is not a boolean")]
    NotABoolean { setting: &'static str, value: String },

    #[error("The verticalTrigger value '{value}' is not a number")]
    TriggerNotANumber { value: String },

    #[error("The verticalTrigger unit '{unit}' is not supported, use 'px' or '%'")]
    TriggerUnit { unit: String },

    #[error("The verticalTrigger '{value}' is out of range")]
    TriggerOutOfRange { value: String },

    #[error("moveItems ({move_items}) exceeds visibleItems ({visible_items}), using {visible_items}")]
    MoveItemsClamped {
        move_items: usize,
        visible_items: usize,
    },

    #[error("startIndex {start_index} is out of range, using {clamped}")]
    StartIndexClamped { start_index: i64, clamped: usize },

    #[error(
        "startIndex {start_index} ignored: {items} items do not exceed visibleItems ({visible_items})"
    )]
    PagingInapplicable {
        start_index: i64,
        items: usize,
        visible_items: usize,
    },
}

/// Resolved settings together with every diagnostic raised on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub settings: Settings,
    pub warnings: Vec<SettingWarning>,
}

/// A validated option value.
#[derive(Debug, Clone, PartialEq)]
enum Resolved {
    Integer(i64),
    Choice(&'static str),
    Flag(bool),
    Text(String),
}

/// A supplied option value before validation.
enum Raw {
    Text(String),
    Number(f64),
    Flag(bool),
}

impl Raw {
    fn from_attribute(text: String) -> Option<Self> {
        if text.trim().is_empty() {
            None
        } else {
            Some(Self::Text(text))
        }
    }

    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) => Self::from_attribute(s.clone()),
            Value::Number(n) => n.as_f64().map(Self::Number),
            Value::Bool(b) => Some(Self::Flag(*b)),
            other => Some(Self::Text(other.to_string())),
        }
    }

    fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Flag(b) => b.to_string(),
        }
    }
}

/// Resolve settings for a container with `item_count` items.
///
/// `attribute` looks up a `data-*` attribute by its kebab-case name.
pub fn resolve<F>(attribute: F, options: &TimelineOptions, item_count: usize) -> Resolution
where
    F: Fn(&str) -> Option<String>,
{
    let mut warnings = Vec::new();
    let mut values = BTreeMap::new();

    for descriptor in &OPTIONS {
        let raw = attribute(&descriptor.attribute_name())
            .and_then(Raw::from_attribute)
            .or_else(|| options.get(descriptor.key).and_then(Raw::from_json));
        let value = match raw {
            Some(raw) => validate(descriptor, &raw).unwrap_or_else(|warning| {
                warnings.push(warning);
                default_value(descriptor)
            }),
            None => default_value(descriptor),
        };
        values.insert(descriptor.key, value);
    }

    let settings = assemble(&values, item_count, &mut warnings);
    Resolution { settings, warnings }
}

fn validate(descriptor: &OptionDescriptor, raw: &Raw) -> Result<Resolved, SettingWarning> {
    match descriptor.kind {
        OptionKind::Integer { min, max } => {
            let number = match raw {
                Raw::Number(n) => Some(*n),
                Raw::Text(s) => s.trim().parse::<f64>().ok(),
                Raw::Flag(_) => None,
            };
            let Some(number) = number.filter(|n| n.is_finite() && n.fract() == 0.0) else {
                return Err(SettingWarning::NotAnInteger {
                    setting: descriptor.key,
                    value: raw.display(),
                });
            };
            if number > max as f64 {
                return Err(SettingWarning::AboveMaximum {
                    setting: descriptor.key,
                    value: raw.display(),
                    max,
                });
            }
            let number = number as i64;
            match min {
                Some(min) if number < min => Err(SettingWarning::BelowMinimum {
                    setting: descriptor.key,
                    value: number,
                    min,
                }),
                _ => Ok(Resolved::Integer(number)),
            }
        }
        OptionKind::Choice(accepted) => {
            let text = raw.display();
            accepted
                .iter()
                .find(|choice| **choice == text.trim())
                .map(|choice| Resolved::Choice(*choice))
                .ok_or(SettingWarning::NotRecognised {
                    setting: descriptor.key,
                    value: text,
                })
        }
        OptionKind::Boolean => match raw {
            Raw::Flag(b) => Ok(Resolved::Flag(*b)),
            Raw::Text(s) if s.trim() == "true" => Ok(Resolved::Flag(true)),
            Raw::Text(s) if s.trim() == "false" => Ok(Resolved::Flag(false)),
            other => Err(SettingWarning::NotABoolean {
                setting: descriptor.key,
                value: other.display(),
            }),
        },
        OptionKind::Magnitude => Ok(Resolved::Text(raw.display())),
    }
}

fn default_value(descriptor: &OptionDescriptor) -> Resolved {
    match descriptor.kind {
        OptionKind::Integer { .. } => Resolved::Integer(descriptor.default.parse().unwrap_or(0)),
        OptionKind::Choice(_) => Resolved::Choice(descriptor.default),
        OptionKind::Boolean => Resolved::Flag(descriptor.default == "true"),
        OptionKind::Magnitude => Resolved::Text(descriptor.default.to_string()),
    }
}

fn assemble(
    values: &BTreeMap<&'static str, Resolved>,
    item_count: usize,
    warnings: &mut Vec<SettingWarning>,
) -> Settings {
    let defaults = Settings::default();
    let integer = |key: &str| match values.get(key) {
        Some(Resolved::Integer(n)) => Some(*n),
        _ => None,
    };
    let choice = |key: &str| match values.get(key) {
        Some(Resolved::Choice(c)) => Some(*c),
        _ => None,
    };

    let mode = match choice("mode") {
        Some("horizontal") => Mode::Horizontal,
        _ => Mode::Vertical,
    };
    let vertical_start_position = match choice("verticalStartPosition") {
        Some("right") => VerticalStart::Right,
        _ => VerticalStart::Left,
    };
    let horizontal_start_position = match choice("horizontalStartPosition") {
        Some("bottom") => HorizontalStart::Bottom,
        _ => HorizontalStart::Top,
    };
    let force_vertical_mode = integer("forceVerticalMode")
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(defaults.force_vertical_mode);
    let visible_items = integer("visibleItems")
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(defaults.visible_items);
    let mut move_items = integer("moveItems")
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(defaults.move_items);
    let requested_start = integer("startIndex").unwrap_or(0);
    let rtl_mode = matches!(values.get("rtlMode"), Some(Resolved::Flag(true)));

    let vertical_trigger = match values.get("verticalTrigger") {
        Some(Resolved::Text(text)) => VerticalTrigger::parse(text).unwrap_or_else(|warning| {
            warnings.push(warning);
            VerticalTrigger::DEFAULT
        }),
        _ => VerticalTrigger::DEFAULT,
    };

    if move_items > visible_items {
        warnings.push(SettingWarning::MoveItemsClamped {
            move_items,
            visible_items,
        });
        move_items = visible_items;
    }

    let start_index = if item_count > visible_items {
        let max_index = item_count - visible_items;
        match usize::try_from(requested_start) {
            Ok(index) if index <= max_index => index,
            Ok(_) => {
                warnings.push(SettingWarning::StartIndexClamped {
                    start_index: requested_start,
                    clamped: max_index,
                });
                max_index
            }
            Err(_) => {
                warnings.push(SettingWarning::StartIndexClamped {
                    start_index: requested_start,
                    clamped: 0,
                });
                0
            }
        }
    } else {
        if requested_start != 0 {
            warnings.push(SettingWarning::PagingInapplicable {
                start_index: requested_start,
                items: item_count,
                visible_items,
            });
        }
        0
    };

    Settings {
        mode,
        force_vertical_mode,
        vertical_start_position,
        horizontal_start_position,
        visible_items,
        move_items,
        start_index,
        rtl_mode,
        vertical_trigger,
    }
}

/// `visibleItems` -> `visible-items`.
pub fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_attributes(_: &str) -> Option<String> {
        None
    }

    fn resolve_with(options: &TimelineOptions, items: usize) -> Resolution {
        resolve(no_attributes, options, items)
    }

    #[test]
    fn test_defaults() {
        let resolution = resolve_with(&TimelineOptions::new(), 5);
        assert_eq!(resolution.settings, Settings::default());
        assert!(resolution.warnings.is_empty());
    }

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("visibleItems"), "visible-items");
        assert_eq!(kebab_case("mode"), "mode");
        assert_eq!(
            kebab_case("horizontalStartPosition"),
            "horizontal-start-position"
        );
    }

    #[test]
    fn test_attribute_beats_option() {
        let attrs: HashMap<&str, &str> = [("visible-items", "2"), ("mode", "horizontal")]
            .into_iter()
            .collect();
        let options = TimelineOptions::new()
            .with("visibleItems", 4)
            .with("mode", "vertical");
        let resolution = resolve(
            |name| attrs.get(name).map(ToString::to_string),
            &options,
            6,
        );
        assert_eq!(resolution.settings.visible_items, 2);
        assert_eq!(resolution.settings.mode, Mode::Horizontal);
    }

    #[test]
    fn test_option_beats_default() {
        let options = TimelineOptions::new()
            .with("visibleItems", 4)
            .with("rtlMode", true)
            .with("verticalStartPosition", "right");
        let settings = resolve_with(&options, 6).settings;
        assert_eq!(settings.visible_items, 4);
        assert!(settings.rtl_mode);
        assert_eq!(settings.vertical_start_position, VerticalStart::Right);
    }

    #[test]
    fn test_empty_attribute_is_absent() {
        let options = TimelineOptions::new().with("visibleItems", 2);
        let settings = resolve(|_| Some(String::new()), &options, 6).settings;
        assert_eq!(settings.visible_items, 2);
    }

    #[test]
    fn test_non_integer_falls_back_to_default() {
        for bad in [
            Value::from(2.5),
            Value::from("abc"),
            Value::from("1.5"),
            Value::from(true),
        ] {
            let options = TimelineOptions::new()
                .with("visibleItems", bad.clone())
                .with("forceVerticalMode", bad.clone())
                .with("moveItems", bad.clone())
                .with("startIndex", bad.clone());
            let resolution = resolve_with(&options, 10);
            let settings = &resolution.settings;
            assert_eq!(settings.visible_items, 3, "value {bad}");
            assert_eq!(settings.force_vertical_mode, 600, "value {bad}");
            assert_eq!(settings.move_items, 1, "value {bad}");
            assert_eq!(settings.start_index, 0, "value {bad}");
            for key in ["visibleItems", "forceVerticalMode", "moveItems", "startIndex"] {
                assert!(
                    resolution
                        .warnings
                        .iter()
                        .any(|w| matches!(w, SettingWarning::NotAnInteger { setting, .. } if *setting == key)),
                    "no warning for {key} = {bad}"
                );
            }
        }
    }

    #[test]
    fn test_integer_above_maximum_warns() {
        assert_eq!(INTEGER_MAX, i64::from(u32::MAX));

        let options = TimelineOptions::new()
            .with("forceVerticalMode", 10_000_000_000_i64)
            .with("visibleItems", 1e12)
            .with("moveItems", "5000000000")
            .with("startIndex", 10_000_000_000_i64);
        let resolution = resolve_with(&options, 10);

        assert_eq!(resolution.settings.force_vertical_mode, 600);
        assert_eq!(resolution.settings.visible_items, 3);
        assert_eq!(resolution.settings.move_items, 1);
        assert_eq!(resolution.settings.start_index, 0);
        for key in ["forceVerticalMode", "visibleItems", "moveItems", "startIndex"] {
            assert!(
                resolution.warnings.iter().any(|w| matches!(
                    w,
                    SettingWarning::AboveMaximum { setting, max, .. }
                        if *setting == key && *max == INTEGER_MAX
                )),
                "no warning for {key}: {:?}",
                resolution.warnings
            );
        }
    }

    #[test]
    fn test_integer_at_maximum_is_accepted() {
        let options = TimelineOptions::new().with("forceVerticalMode", INTEGER_MAX);
        let resolution = resolve_with(&options, 10);
        assert_eq!(resolution.settings.force_vertical_mode, u32::MAX);
        assert!(resolution.warnings.is_empty());
    }

    #[test]
    fn test_empty_integer_is_default_without_warning() {
        let options = TimelineOptions::new()
            .with("visibleItems", "")
            .with("moveItems", Value::Null);
        let resolution = resolve_with(&options, 10);
        assert_eq!(resolution.settings.visible_items, 3);
        assert_eq!(resolution.settings.move_items, 1);
        assert!(resolution.warnings.is_empty());
    }

    #[test]
    fn test_integer_strings_accepted() {
        let options = TimelineOptions::new().with("visibleItems", "4.0");
        assert_eq!(resolve_with(&options, 10).settings.visible_items, 4);
    }

    #[test]
    fn test_visible_items_minimum() {
        let options = TimelineOptions::new().with("visibleItems", 0);
        let resolution = resolve_with(&options, 10);
        assert_eq!(resolution.settings.visible_items, 3);
        assert!(matches!(
            resolution.warnings[0],
            SettingWarning::BelowMinimum { min: 1, .. }
        ));
    }

    #[test]
    fn test_unrecognised_choice() {
        let options = TimelineOptions::new()
            .with("mode", "diagonal")
            .with("horizontalStartPosition", "middle");
        let resolution = resolve_with(&options, 4);
        assert_eq!(resolution.settings.mode, Mode::Vertical);
        assert_eq!(resolution.settings.horizontal_start_position, HorizontalStart::Top);
        assert_eq!(resolution.warnings.len(), 2);
        assert_eq!(
            resolution.warnings[0].to_string(),
            "The mode 'diagonal' was not recognised"
        );
    }

    #[test]
    fn test_boolean_validation() {
        let attrs = |name: &str| (name == "rtl-mode").then(|| "true".to_string());
        assert!(resolve(attrs, &TimelineOptions::new(), 5).settings.rtl_mode);

        let options = TimelineOptions::new().with("rtlMode", "yes");
        let resolution = resolve_with(&options, 5);
        assert!(!resolution.settings.rtl_mode);
        assert!(matches!(
            resolution.warnings[0],
            SettingWarning::NotABoolean { .. }
        ));
    }

    #[test]
    fn test_move_items_clamped() {
        let options = TimelineOptions::new()
            .with("visibleItems", 2)
            .with("moveItems", 5);
        let resolution = resolve_with(&options, 10);
        assert_eq!(resolution.settings.move_items, 2);
        assert_eq!(
            resolution.warnings,
            vec![SettingWarning::MoveItemsClamped {
                move_items: 5,
                visible_items: 2
            }]
        );
    }

    #[test]
    fn test_move_items_never_exceeds_visible_items() {
        for visible in 1..6 {
            for moving in 1..10 {
                let options = TimelineOptions::new()
                    .with("visibleItems", visible)
                    .with("moveItems", moving);
                let settings = resolve_with(&options, 8).settings;
                assert!(settings.move_items <= settings.visible_items);
            }
        }
    }

    #[test]
    fn test_start_index_clamped_high() {
        let options = TimelineOptions::new().with("startIndex", 9);
        let resolution = resolve_with(&options, 5);
        assert_eq!(resolution.settings.start_index, 2);
        assert_eq!(
            resolution.warnings,
            vec![SettingWarning::StartIndexClamped {
                start_index: 9,
                clamped: 2
            }]
        );
    }

    #[test]
    fn test_start_index_clamped_negative() {
        let options = TimelineOptions::new().with("startIndex", -3);
        let resolution = resolve_with(&options, 5);
        assert_eq!(resolution.settings.start_index, 0);
        assert_eq!(resolution.warnings.len(), 1);
    }

    #[test]
    fn test_start_index_zero_when_paging_inapplicable() {
        let options = TimelineOptions::new().with("startIndex", 1);
        let resolution = resolve_with(&options, 3);
        assert_eq!(resolution.settings.start_index, 0);
        assert!(matches!(
            resolution.warnings[0],
            SettingWarning::PagingInapplicable { items: 3, .. }
        ));
    }

    #[test]
    fn test_start_index_always_in_range() {
        for items in 0..8 {
            for start in -2..10 {
                let options = TimelineOptions::new().with("startIndex", start);
                let settings = resolve_with(&options, items).settings;
                let max = items.saturating_sub(settings.visible_items);
                assert!(settings.start_index <= max);
            }
        }
    }

    #[test]
    fn test_trigger_parse() {
        let trigger = VerticalTrigger::parse("120px").unwrap();
        assert_eq!(trigger.unit, TriggerUnit::Px);
        assert!((trigger.value - 120.0).abs() < f64::EPSILON);

        let trigger = VerticalTrigger::parse("12.5%").unwrap();
        assert_eq!(trigger.unit, TriggerUnit::Percent);
        assert!((trigger.value - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_trigger_rejections() {
        assert!(matches!(
            VerticalTrigger::parse("px"),
            Err(SettingWarning::TriggerNotANumber { .. })
        ));
        assert!(matches!(
            VerticalTrigger::parse("15em"),
            Err(SettingWarning::TriggerUnit { .. })
        ));
        assert!(matches!(
            VerticalTrigger::parse("150%"),
            Err(SettingWarning::TriggerOutOfRange { .. })
        ));
        assert!(matches!(
            VerticalTrigger::parse("-5px"),
            Err(SettingWarning::TriggerOutOfRange { .. })
        ));
        assert!(matches!(
            VerticalTrigger::parse("-1%"),
            Err(SettingWarning::TriggerOutOfRange { .. })
        ));
    }

    #[test]
    fn test_invalid_trigger_falls_back() {
        for bad in ["150%", "-20px", "20vh", ""] {
            let options = TimelineOptions::new().with("verticalTrigger", bad);
            let settings = resolve_with(&options, 5).settings;
            assert_eq!(settings.vertical_trigger, VerticalTrigger::DEFAULT, "value {bad}");
        }
    }

    #[test]
    fn test_settings_serialization() {
        let options = TimelineOptions::new()
            .with("mode", "horizontal")
            .with("verticalTrigger", "120px");
        let settings = resolve_with(&options, 5).settings;
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["mode"], "horizontal");
        assert_eq!(json["verticalTrigger"], "120px");
        assert_eq!(json["visibleItems"], 3);

        let parsed: Settings = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_options_deserialize_from_json() {
        let options: TimelineOptions =
            serde_json::from_str(r#"{"mode": "horizontal", "visibleItems": "2"}"#).unwrap();
        let settings = resolve_with(&options, 5).settings;
        assert_eq!(settings.mode, Mode::Horizontal);
        assert_eq!(settings.visible_items, 2);
    }
}
