//! The `resource` rule.
//!
//! Checks every URL in resource-bearing properties and `@import` targets:
//! - references to remote hosts are flagged so they can be localised
//! - local paths that the file probe cannot find are flagged, when a probe
//!   is available
//!
//! URLs found in declarations are buffered per enclosing block and checked
//! when the block ends. `@import` targets are checked immediately.

mod evaluator;
mod extractor;
mod reference;
mod registry;
mod scope;
mod url_shape;

pub use evaluator::MatchEvaluator;
pub use extractor::{extract_references, is_resource_property, RESOURCE_PROPERTIES};
pub use reference::{ResourceReference, IMPORT_MARKER};
pub use registry::{
    external_test, filesystem_test, Capabilities, PathTest, PathTestRegistry, PATH_PLACEHOLDER,
};
pub use scope::{is_tracked, PendingMatchSet, ScopeBuffer, ScopeState, TRACKED_BLOCKS};
pub use url_shape::{is_external, parse_external_url, uri_scheme, ExternalUrl};

use crate::host::{Reporter, RuleContext, RuleInfo, RuleListener};
use css_events::{BlockKind, EventKind, StylesheetEvent};

/// Registration record for the rule.
pub static RULE: RuleInfo = RuleInfo {
    id: "resource",
    name: "Resource",
    desc: "Performs a series of checks against properties which reference resources.",
    browsers: "All",
    init,
};

const SUBSCRIPTIONS: &[EventKind] = &[
    EventKind::Import,
    EventKind::Property,
    EventKind::StartBlock(BlockKind::Rule),
    EventKind::EndBlock(BlockKind::Rule),
    EventKind::StartBlock(BlockKind::FontFace),
    EventKind::EndBlock(BlockKind::FontFace),
    EventKind::StartBlock(BlockKind::Page),
    EventKind::EndBlock(BlockKind::Page),
    EventKind::StartBlock(BlockKind::PageMargin),
    EventKind::EndBlock(BlockKind::PageMargin),
    EventKind::StartBlock(BlockKind::Keyframes),
    EventKind::EndBlock(BlockKind::Keyframes),
];

fn init(ctx: &RuleContext) -> Box<dyn RuleListener> {
    Box::new(ResourceRule::new(ctx))
}

/// Per-stylesheet state of the `resource` rule.
#[derive(Debug)]
pub struct ResourceRule {
    scope: ScopeBuffer,
    evaluator: MatchEvaluator,
}

impl ResourceRule {
    /// Creates the rule with the built-in tests.
    pub fn new(ctx: &RuleContext) -> Self {
        Self::with_registry(PathTestRegistry::builtin(), ctx)
    }

    /// Creates the rule with a custom set of tests.
    pub fn with_registry(registry: PathTestRegistry, ctx: &RuleContext) -> Self {
        Self {
            scope: ScopeBuffer::new(),
            evaluator: MatchEvaluator::new(registry, ctx.file_probe.clone()),
        }
    }

    /// The buffer's current state.
    pub fn scope_state(&self) -> ScopeState {
        self.scope.state()
    }
}

impl RuleListener for ResourceRule {
    fn subscriptions(&self) -> &'static [EventKind] {
        SUBSCRIPTIONS
    }

    fn handle(&mut self, event: &StylesheetEvent, reporter: &mut dyn Reporter) {
        match event {
            StylesheetEvent::Import(import) => {
                let reference = ResourceReference::from_import(import);
                self.evaluator
                    .evaluate(std::slice::from_ref(&reference), &RULE, reporter);
            }
            StylesheetEvent::StartBlock(block) if is_tracked(block.kind) => {
                if let Some(discarded) = self.scope.open(block.kind) {
                    tracing::debug!(
                        open = %discarded.kind(),
                        new = %block.kind,
                        discarded = discarded.len(),
                        "block started before the previous one ended; dropping its references"
                    );
                }
            }
            StylesheetEvent::Property(property) => {
                let references = extract_references(property);
                if !references.is_empty() && !self.scope.collect(references) {
                    tracing::trace!(
                        property = %property.property.text,
                        "resource property outside a tracked block"
                    );
                }
            }
            StylesheetEvent::EndBlock(block) if is_tracked(block.kind) => {
                if let Some(set) = self.scope.close(block.kind) {
                    tracing::debug!(block = %set.kind(), references = set.len(), "evaluating block");
                    self.evaluator.evaluate(set.references(), &RULE, reporter);
                }
            }
            _ => {}
        }
    }
}
