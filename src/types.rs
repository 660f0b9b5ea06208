//! Filter value types shared across the dashboard.
//!
//! These types describe what a filter holds (free text, a number, an
//! inclusive numeric range, or a set of category values) and how filters are
//! keyed by column.

use std::collections::BTreeMap;
use std::str::FromStr;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// An inclusive numeric range `[low, high]`.
pub type Range = (f64, f64);

/// Filters keyed by column id.
pub type FilterMap<T> = BTreeMap<String, T>;

/// A category value that can be picked in a category filter.
///
/// Two category values are the same selection when their `value` strings
/// are equal; `count` and `color` are display data only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryValue {
    /// Display text, also used as the match key and identity.
    pub value: String,
    /// How many records carry this value.
    pub count: u64,
    /// Colour token for the chip (`"blue"`, `"#5f87ff"`, `"42"`, ...).
    pub color: String,
}

impl CategoryValue {
    /// Create a new category value.
    pub fn new(value: impl Into<String>, count: u64, color: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            count,
            color: color.into(),
        }
    }

    /// Parse the colour token into a terminal colour.
    ///
    /// Returns `None` when the token is not a colour ratatui understands.
    pub fn terminal_color(&self) -> Option<Color> {
        Color::from_str(self.color.trim()).ok()
    }

    /// Check whether this value starts with `prefix`, ignoring case.
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        self.value
            .to_lowercase()
            .starts_with(&prefix.to_lowercase())
    }
}

/// The value held by a single column filter.
///
/// Serialized untagged, so JSON `"abc"`, `3`, `[1, 5]` and
/// `[{"value": .., "count": .., "color": ..}]` map to the four variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Case-insensitive substring match.
    Text(String),
    /// Exact numeric match.
    Number(f64),
    /// Inclusive numeric range.
    Range(Range),
    /// Membership in a set of category values.
    Categories(Vec<CategoryValue>),
}

impl FilterValue {
    /// The filter method used to evaluate this value, if it has one.
    ///
    /// Numbers and category sets are matched directly and have no method.
    pub fn method(&self) -> Option<FilterMethod> {
        match self {
            FilterValue::Text(_) => Some(FilterMethod::Text),
            FilterValue::Range(_) => Some(FilterMethod::Between),
            FilterValue::Number(_) | FilterValue::Categories(_) => None,
        }
    }

    /// Check whether this filter constrains anything.
    ///
    /// Empty text and empty category sets let every record through.
    pub fn is_active(&self) -> bool {
        match self {
            FilterValue::Text(text) => !text.is_empty(),
            FilterValue::Categories(values) => !values.is_empty(),
            FilterValue::Number(_) | FilterValue::Range(_) => true,
        }
    }
}

/// How a column filter compares record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMethod {
    /// Case-insensitive substring match.
    Text,
    /// Inclusive range match.
    Between,
}

/// A filter bound to a column id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter<T> {
    /// The column this filter applies to.
    pub id: String,
    /// The filter value.
    pub value: T,
}

impl<T> Filter<T> {
    /// Create a new filter.
    pub fn new(id: impl Into<String>, value: T) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }

    /// Split into an `(id, value)` pair for collecting into a [`FilterMap`].
    pub fn into_entry(self) -> (String, T) {
        (self.id, self.value)
    }
}
