use css_events::{ImportEvent, Position};
use smol_str::SmolStr;

/// Name given to references that come from `@import`.
pub const IMPORT_MARKER: &str = "@import";

/// One URL occurrence found in a stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceReference {
    /// Lowercased property name, or [`IMPORT_MARKER`].
    pub name: SmolStr,
    /// The value text the URL came from, e.g. `url("a.png")`.
    pub raw_value: String,
    /// Where the URL (or the `@import` keyword) starts.
    pub position: Position,
    /// The URL target with quotes and `url()` removed.
    pub path: String,
}

impl ResourceReference {
    /// Builds the reference for an `@import` statement.
    pub fn from_import(event: &ImportEvent) -> Self {
        Self {
            name: SmolStr::new_static(IMPORT_MARKER),
            raw_value: event.uri.clone(),
            position: event.position,
            path: event.uri.clone(),
        }
    }

    /// 1-based line.
    pub fn line(&self) -> u32 {
        self.position.line
    }

    /// 1-based column.
    pub fn column(&self) -> u32 {
        self.position.col
    }
}
