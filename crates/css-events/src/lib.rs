//! CSS structural event stream for csslint-rs.
//!
//! This crate turns stylesheet text into the flat sequence of events lint
//! rules listen to:
//! - Lexer (tokenizer) using `logos`
//! - A recovering recursive descent walker that emits [`StylesheetEvent`]s
//! - 1-based positions for every event and value part
//!
//! # Example
//!
//! ```
//! use css_events::{parse, EventKind, StylesheetEvent};
//!
//! let result = parse(".logo { background: url(logo.png) no-repeat; }");
//! assert!(result.errors.is_empty());
//!
//! for event in &result.events {
//!     if let StylesheetEvent::Property(property) = event {
//!         println!("{} = {}", property.property.text, property.value.text);
//!     }
//! }
//! assert_eq!(result.events[1].kind(), EventKind::Property);
//! ```

mod error;
mod event;
mod lexer;
mod parser;
mod position;

pub use error::{ParseError, ParseErrorKind};
pub use event::{
    BlockEvent, BlockKind, EventKind, ImportEvent, PartKind, PropertyEvent, PropertyName,
    PropertyValue, StylesheetEvent, ValuePart,
};
pub use lexer::{unquote, unwrap_url, Lexer, Token, TokenKind};
pub use position::{ByteOffset, LineIndex, Position, Span};

/// The result of walking a stylesheet.
#[derive(Debug, Default)]
pub struct ParseResult {
    /// Events in source order.
    pub events: Vec<StylesheetEvent>,
    /// Any errors encountered while parsing.
    pub errors: Vec<ParseError>,
}

/// Parses a stylesheet into its event stream.
///
/// Parsing never fails outright: malformed input is skipped and reported in
/// [`ParseResult::errors`], and every block start gets its block end.
pub fn parse(source: &str) -> ParseResult {
    parser::Parser::new(source).parse()
}
