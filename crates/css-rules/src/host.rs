//! The narrow interface between the lint engine and its rules.
//!
//! A rule is a static [`RuleInfo`] record. The engine calls its `init`
//! entry point once per stylesheet with a [`RuleContext`] holding the
//! optional capabilities, then feeds the returned [`RuleListener`] every
//! event whose kind it subscribed to. Listeners report through a
//! [`Reporter`].

use crate::diagnostic::Diagnostic;
use css_events::{EventKind, Position, StylesheetEvent};
use std::sync::Arc;

/// Receives warnings from rules.
pub trait Reporter {
    /// Records a warning raised by `rule` at `position`.
    fn warn(&mut self, message: String, position: Position, rule: &'static RuleInfo);
}

/// Collects plain warnings, ignoring any ruleset.
impl Reporter for Vec<Diagnostic> {
    fn warn(&mut self, message: String, position: Position, rule: &'static RuleInfo) {
        self.push(Diagnostic::new(rule.id, message, position));
    }
}

/// Answers whether a file exists at a path referenced from a stylesheet.
///
/// Implementations resolve the path however suits them and report any
/// failure to look it up as "no file".
pub trait FileProbe: Send + Sync {
    /// Returns true if a file exists at `path`.
    fn is_file(&self, path: &str) -> bool;
}

impl<F> FileProbe for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_file(&self, path: &str) -> bool {
        self(path)
    }
}

/// Capabilities handed to a rule at initialisation.
#[derive(Clone, Default)]
pub struct RuleContext {
    /// Filesystem access, when the host has any.
    pub file_probe: Option<Arc<dyn FileProbe>>,
}

impl RuleContext {
    /// A context without optional capabilities.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context with filesystem access.
    pub fn with_file_probe(probe: Arc<dyn FileProbe>) -> Self {
        Self {
            file_probe: Some(probe),
        }
    }
}

impl std::fmt::Debug for RuleContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleContext")
            .field("file_probe", &self.file_probe.is_some())
            .finish()
    }
}

/// Per-stylesheet state of an initialised rule.
pub trait RuleListener {
    /// The event kinds this listener wants. Other events are never delivered.
    fn subscriptions(&self) -> &'static [EventKind];

    /// Handles one event. Events arrive in source order and each call
    /// completes before the next event is delivered.
    fn handle(&mut self, event: &StylesheetEvent, reporter: &mut dyn Reporter);
}

/// A rule registration record.
pub struct RuleInfo {
    /// Stable identifier, used in rulesets and output.
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// One-line description.
    pub desc: &'static str,
    /// Which browsers the rule is relevant for.
    pub browsers: &'static str,
    /// Creates the rule's listener for one stylesheet.
    pub init: fn(&RuleContext) -> Box<dyn RuleListener>,
}

impl std::fmt::Debug for RuleInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleInfo")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("browsers", &self.browsers)
            .finish_non_exhaustive()
    }
}
