//! Parse error types.

use crate::position::{Position, Span};
use thiserror::Error;

/// An error that occurred while turning a stylesheet into events.
///
/// Parsing always recovers; errors are collected next to the events.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// The location in the source where the error occurred.
    pub span: Span,
    /// The 1-based start of `span`.
    pub position: Position,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span, position: Position) -> Self {
        Self {
            kind,
            span,
            position,
        }
    }
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// An unexpected token was encountered.
    #[error("unexpected token: expected {expected}, found {found}")]
    UnexpectedToken {
        /// What was expected.
        expected: String,
        /// What was found.
        found: String,
    },

    /// The input ended inside a block.
    #[error("unexpected end of file: expected {expected}")]
    UnexpectedEof {
        /// What was expected.
        expected: String,
    },

    /// An at-rule the parser does not know how to read.
    #[error("unknown @ rule: {name}")]
    UnknownAtRule {
        /// The at-keyword, including `@`.
        name: String,
    },

    /// An `@import` without a string or `url()` target.
    #[error("@import is missing its target")]
    MissingImportTarget,

    /// A declaration without a value.
    #[error("expected a value for property '{property}'")]
    EmptyValue {
        /// The property name.
        property: String,
    },
}
