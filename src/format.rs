//! Process-wide temporal rendering configuration.
//!
//! Temporal leaves without an explicit format directive render with the
//! pattern configured here. The default is deliberately the compact ISO
//! date so the values read well in query strings and redirect URLs.

use std::fmt::Write as _;

use chrono::format::strftime::StrftimeItems;
use chrono::format::Item;
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

/// Pattern used until [`set_default_date_format`] is called.
pub const INITIAL_DATE_FORMAT: &str = "%Y-%m-%d";

static DEFAULT_DATE_FORMAT: Lazy<RwLock<String>> =
    Lazy::new(|| RwLock::new(INITIAL_DATE_FORMAT.to_string()));

/// The current process-wide default date pattern.
pub fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.read().clone()
}

/// Replace the process-wide default date pattern. Affects every temporal
/// leaf flattened afterwards that carries no format directive.
pub fn set_default_date_format(pattern: impl Into<String>) {
    *DEFAULT_DATE_FORMAT.write() = pattern.into();
}

/// Render `dt` with a strftime `pattern`, or `None` if the pattern is
/// malformed or uses a specifier the value cannot satisfy. Formatting
/// failures never escape as panics; callers fall back on `None`.
pub fn try_format(dt: &NaiveDateTime, pattern: &str) -> Option<String> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return None;
    }
    let mut rendered = String::new();
    match write!(rendered, "{}", dt.format_with_items(items.into_iter())) {
        Ok(()) => Some(rendered),
        Err(_) => None,
    }
}

/// Render `dt` with the current default pattern, degrading to the
/// value's own `Display` if the configured default is unusable.
pub fn format_with_default(dt: &NaiveDateTime) -> String {
    let pattern = default_date_format();
    try_format(dt, &pattern).unwrap_or_else(|| dt.to_string())
}
