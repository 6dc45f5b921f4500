//! Dispatches parser events to the enabled rules.

use crate::diagnostic::{Diagnostic, Severity, PARSE_ERROR_RULE};
use crate::host::{Reporter, RuleContext, RuleInfo, RuleListener};
use crate::ruleset::{RuleLevel, RuleSet, RuleSetError};
use css_events::{EventKind, ParseError, Position, StylesheetEvent};
use rustc_hash::FxHashMap;

/// The diagnostics produced for one stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintResult {
    /// Diagnostics ordered by line, then column.
    pub messages: Vec<Diagnostic>,
}

impl LintResult {
    /// Number of error diagnostics.
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Number of warning diagnostics.
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Returns true if nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn count(&self, severity: Severity) -> usize {
        self.messages
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

/// Registered rules and the means to run them.
#[derive(Debug, Clone)]
pub struct Linter {
    rules: Vec<&'static RuleInfo>,
}

impl Linter {
    /// A linter with every built-in rule registered.
    pub fn new() -> Self {
        Self {
            rules: crate::BUILTIN_RULES.to_vec(),
        }
    }

    /// A linter with no rules.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Registers a rule. A rule with the same id is replaced.
    pub fn add_rule(&mut self, rule: &'static RuleInfo) -> &mut Self {
        match self.rules.iter_mut().find(|existing| existing.id == rule.id) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
        self
    }

    /// Registered rules, in registration order.
    pub fn rules(&self) -> &[&'static RuleInfo] {
        &self.rules
    }

    /// Looks up a rule by id.
    pub fn rule(&self, id: &str) -> Option<&'static RuleInfo> {
        self.rules.iter().copied().find(|rule| rule.id == id)
    }

    /// Every registered rule as a warning.
    pub fn default_ruleset(&self) -> RuleSet {
        let mut ruleset = RuleSet::new();
        for rule in &self.rules {
            ruleset.set(rule.id, RuleLevel::Warn);
        }
        ruleset
    }

    /// Checks that every id in the ruleset names a registered rule.
    pub fn validate(&self, ruleset: &RuleSet) -> Result<(), RuleSetError> {
        match ruleset.ids().find(|id| self.rule(id).is_none()) {
            Some(id) => Err(RuleSetError::UnknownRule(id.to_string())),
            None => Ok(()),
        }
    }

    /// Parses `source` and runs the enabled rules over it.
    pub fn verify(&self, source: &str, ruleset: &RuleSet, ctx: &RuleContext) -> LintResult {
        let parsed = css_events::parse(source);
        let mut result = self.verify_events(&parsed.events, ruleset, ctx);
        if !parsed.errors.is_empty() {
            result
                .messages
                .extend(parsed.errors.iter().map(parse_error_diagnostic));
            sort_messages(&mut result.messages);
        }
        result
    }

    /// Runs the enabled rules over an already parsed event stream.
    pub fn verify_events(
        &self,
        events: &[StylesheetEvent],
        ruleset: &RuleSet,
        ctx: &RuleContext,
    ) -> LintResult {
        let mut listeners: Vec<Box<dyn RuleListener>> = Vec::new();
        let mut dispatch: FxHashMap<EventKind, Vec<usize>> = FxHashMap::default();

        for rule in self.rules.iter().filter(|rule| ruleset.is_enabled(rule.id)) {
            let listener = (rule.init)(ctx);
            let index = listeners.len();
            for kind in listener.subscriptions() {
                dispatch.entry(*kind).or_default().push(index);
            }
            listeners.push(listener);
        }

        let mut reporter = CollectingReporter {
            ruleset,
            messages: Vec::new(),
        };

        if !listeners.is_empty() {
            for event in events {
                let Some(subscribers) = dispatch.get(&event.kind()) else {
                    continue;
                };
                for &index in subscribers {
                    listeners[index].handle(event, &mut reporter);
                }
            }
        }

        let mut messages = reporter.messages;
        sort_messages(&mut messages);
        LintResult { messages }
    }
}

impl Default for Linter {
    fn default() -> Self {
        Self::new()
    }
}

struct CollectingReporter<'a> {
    ruleset: &'a RuleSet,
    messages: Vec<Diagnostic>,
}

impl Reporter for CollectingReporter<'_> {
    fn warn(&mut self, message: String, position: Position, rule: &'static RuleInfo) {
        let severity = match self.ruleset.level(rule.id) {
            RuleLevel::Error => Severity::Error,
            _ => Severity::Warning,
        };
        self.messages
            .push(Diagnostic::new(rule.id, message, position).with_severity(severity));
    }
}

fn parse_error_diagnostic(error: &ParseError) -> Diagnostic {
    Diagnostic::new(PARSE_ERROR_RULE, error.to_string(), error.position)
        .with_severity(Severity::Error)
}

// stable, so diagnostics for one reference keep their test order
fn sort_messages(messages: &mut [Diagnostic]) {
    messages.sort_by_key(|d| d.position);
}

#[cfg(test)]
mod tests {
    use super::*;
    use css_events::BlockKind;
    use pretty_assertions::assert_eq;

    static SHOUT: RuleInfo = RuleInfo {
        id: "shout",
        name: "Shout",
        desc: "Reports every block start.",
        browsers: "All",
        init: init_shout,
    };

    struct Shout;

    fn init_shout(_: &RuleContext) -> Box<dyn RuleListener> {
        Box::new(Shout)
    }

    impl RuleListener for Shout {
        fn subscriptions(&self) -> &'static [EventKind] {
            &[EventKind::StartBlock(BlockKind::Rule)]
        }

        fn handle(&mut self, event: &StylesheetEvent, reporter: &mut dyn Reporter) {
            reporter.warn("block".to_string(), event.position(), &SHOUT);
        }
    }

    #[test]
    fn test_builtin_rules() {
        let linter = Linter::new();
        assert_eq!(linter.rules().len(), 1);
        assert_eq!(linter.rule("resource").map(|r| r.name), Some("Resource"));
        assert!(linter.rule("missing").is_none());
        assert!(Linter::empty().rules().is_empty());
    }

    #[test]
    fn test_add_rule_replaces_same_id() {
        let mut linter = Linter::empty();
        linter.add_rule(&SHOUT).add_rule(&SHOUT);
        assert_eq!(linter.rules().len(), 1);
    }

    #[test]
    fn test_disabled_rules_do_not_run() {
        let linter = Linter::new();
        let result = linter.verify(
            "@import url(http://cdn.example.com/a.css);",
            &RuleSet::new(),
            &RuleContext::new(),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_error_level_sets_severity() {
        let linter = Linter::new();
        let ruleset = RuleSet::new().with("resource", RuleLevel::Error);
        let result = linter.verify(
            "@import url(http://cdn.example.com/a.css);",
            &ruleset,
            &RuleContext::new(),
        );
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.warning_count(), 0);
    }

    #[test]
    fn test_dispatch_only_subscribed_kinds() {
        let mut linter = Linter::empty();
        linter.add_rule(&SHOUT);
        let ruleset = linter.default_ruleset();
        let result = linter.verify(
            "a { color: red }\n@font-face { src: url(x) }\nb { }",
            &ruleset,
            &RuleContext::new(),
        );
        let positions: Vec<(u32, u32)> = result
            .messages
            .iter()
            .map(|d| (d.line(), d.column()))
            .collect();
        assert_eq!(positions, vec![(1, 1), (3, 1)]);
    }

    #[test]
    fn test_messages_sorted_by_position() {
        let mut linter = Linter::new();
        linter.add_rule(&SHOUT);
        let ruleset = linter.default_ruleset();
        let result = linter.verify(
            "a { background: url(http://x.com/a.png) }",
            &ruleset,
            &RuleContext::new(),
        );
        let rules: Vec<&str> = result.messages.iter().map(|d| d.rule).collect();
        assert_eq!(rules, vec!["shout", "resource"]);
    }

    #[test]
    fn test_parse_errors_become_diagnostics() {
        let linter = Linter::new();
        let result = linter.verify(
            "@unknown foo;\na { background: url(http://x.com/a.png) }",
            &linter.default_ruleset(),
            &RuleContext::new(),
        );
        assert_eq!(result.messages.len(), 2);
        assert_eq!(result.messages[0].rule, PARSE_ERROR_RULE);
        assert_eq!(result.messages[0].severity, Severity::Error);
        assert_eq!(result.messages[0].message, "unknown @ rule: @unknown");
        assert_eq!(result.messages[1].rule, "resource");
    }

    #[test]
    fn test_validate() {
        let linter = Linter::new();
        assert_eq!(linter.validate(&linter.default_ruleset()), Ok(()));
        let ruleset = RuleSet::new().with("nope", RuleLevel::Warn);
        assert_eq!(
            linter.validate(&ruleset),
            Err(RuleSetError::UnknownRule("nope".to_string()))
        );
    }
}
