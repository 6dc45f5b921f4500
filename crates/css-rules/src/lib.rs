//! Lint rules for csslint-rs.
//!
//! This crate hosts rules over the event stream produced by `css-events`:
//! - [`host`]: the interface rules are written against
//! - [`Linter`]: parses a stylesheet and dispatches its events to rules
//! - [`resource`]: flags remote and missing resources
//!
//! # Example
//!
//! ```
//! use css_rules::{Linter, RuleContext, RuleSet};
//!
//! let linter = Linter::new();
//! let result = linter.verify(
//!     "@import url(\"http://cdn.example.com/a.css\");",
//!     &RuleSet::all_warnings(),
//!     &RuleContext::new(),
//! );
//! assert_eq!(result.warning_count(), 1);
//! assert_eq!(
//!     result.messages[0].message,
//!     "Consider using a localised resource instead for 'http://cdn.example.com/a.css'"
//! );
//! ```

mod diagnostic;
mod engine;
pub mod host;
pub mod resource;
mod ruleset;

pub use diagnostic::{Diagnostic, Severity, PARSE_ERROR_RULE};
pub use engine::{LintResult, Linter};
pub use host::{FileProbe, Reporter, RuleContext, RuleInfo, RuleListener};
pub use ruleset::{RuleLevel, RuleSet, RuleSetError};

pub use css_events::Position;

/// Every rule shipped with the crate, in registration order.
pub static BUILTIN_RULES: &[&RuleInfo] = &[&resource::RULE];
