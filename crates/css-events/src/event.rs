//! Structural events emitted while walking a stylesheet.

use crate::position::Position;
use smol_str::SmolStr;

/// A single structural event.
///
/// Every [`StylesheetEvent::StartBlock`] is eventually followed by an
/// [`StylesheetEvent::EndBlock`] of the same kind, even when the block is
/// left unclosed in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StylesheetEvent {
    /// `@import url(...) media;`
    Import(ImportEvent),
    /// A declaration inside a block.
    Property(PropertyEvent),
    /// The opening brace of a block.
    StartBlock(BlockEvent),
    /// The closing brace of a block.
    EndBlock(BlockEvent),
}

impl StylesheetEvent {
    /// Returns the subscription key for this event.
    pub fn kind(&self) -> EventKind {
        match self {
            StylesheetEvent::Import(_) => EventKind::Import,
            StylesheetEvent::Property(_) => EventKind::Property,
            StylesheetEvent::StartBlock(block) => EventKind::StartBlock(block.kind),
            StylesheetEvent::EndBlock(block) => EventKind::EndBlock(block.kind),
        }
    }

    /// Returns where the event starts in the source.
    pub fn position(&self) -> Position {
        match self {
            StylesheetEvent::Import(import) => import.position,
            StylesheetEvent::Property(property) => property.property.position,
            StylesheetEvent::StartBlock(block) | StylesheetEvent::EndBlock(block) => {
                block.position
            }
        }
    }
}

/// The key rules subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// `@import`
    Import,
    /// A declaration.
    Property,
    /// The start of a block of the given kind.
    StartBlock(BlockKind),
    /// The end of a block of the given kind.
    EndBlock(BlockKind),
}

/// The kinds of blocks the parser reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockKind {
    /// A style rule, `selector { ... }`.
    Rule,
    /// `@font-face { ... }`
    FontFace,
    /// `@page :first { ... }`
    Page,
    /// A margin box inside `@page`, e.g. `@top-left { ... }`.
    PageMargin,
    /// `@keyframes name { ... }`, including vendor-prefixed forms.
    Keyframes,
    /// A keyframe selector block inside `@keyframes`, e.g. `50% { ... }`.
    KeyframeRule,
    /// `@media ... { ... }`
    Media,
    /// `@supports ... { ... }`
    Supports,
    /// `@document ... { ... }`, including `@-moz-document`.
    Document,
    /// `@viewport { ... }`
    Viewport,
}

impl BlockKind {
    /// Returns a short name for debugging output.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Rule => "rule",
            BlockKind::FontFace => "fontface",
            BlockKind::Page => "page",
            BlockKind::PageMargin => "pagemargin",
            BlockKind::Keyframes => "keyframes",
            BlockKind::KeyframeRule => "keyframerule",
            BlockKind::Media => "media",
            BlockKind::Supports => "supports",
            BlockKind::Document => "document",
            BlockKind::Viewport => "viewport",
        }
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An `@import` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportEvent {
    /// The import target with quotes and `url()` removed.
    pub uri: String,
    /// Media queries following the target, as written.
    pub media: Vec<String>,
    /// Position of the `@import` keyword.
    pub position: Position,
}

/// A block boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockEvent {
    /// The kind of block.
    pub kind: BlockKind,
    /// The text between the at-keyword (or start of rule) and `{`:
    /// selectors for style rules, the name for `@keyframes`, the query
    /// for `@media`. Empty on end events.
    pub prelude: String,
    /// Position of the first token of the block on start events, of the
    /// closing brace on end events.
    pub position: Position,
}

/// A declaration, `name: value [!important]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyEvent {
    /// The property name as written.
    pub property: PropertyName,
    /// The parsed value.
    pub value: PropertyValue,
    /// Whether the declaration ended with `!important`.
    pub important: bool,
}

/// A property name and where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyName {
    /// The name without any hack prefix.
    pub text: SmolStr,
    /// The `*` or `_` hack prefix, if the name had one.
    pub hack: Option<char>,
    /// Position of the name.
    pub position: Position,
}

/// A declaration value split into parts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyValue {
    /// The value text as written, without `!important`.
    pub text: String,
    /// The value's top-level parts in source order.
    pub parts: Vec<ValuePart>,
}

/// One component of a declaration value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValuePart {
    /// What sort of component this is.
    pub kind: PartKind,
    /// The component text as written.
    pub text: String,
    /// Position of the component.
    pub position: Position,
    /// The URL target for [`PartKind::Uri`] parts.
    pub uri: Option<String>,
}

/// The type of a [`ValuePart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PartKind {
    /// `url(...)`
    Uri,
    /// A keyword such as `no-repeat`.
    Identifier,
    /// A quoted string.
    String,
    /// A number, dimension or percentage.
    Number,
    /// A hex color.
    Color,
    /// A function call other than `url()`, including its arguments.
    Function,
    /// `,` or `/`
    Operator,
    /// Anything else.
    Unknown,
}
