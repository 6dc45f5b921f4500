use super::reference::ResourceReference;
use super::registry::{Capabilities, PathTestRegistry};
use crate::host::{FileProbe, Reporter, RuleInfo};
use std::sync::Arc;

/// Runs every applicable registry test against references and reports
/// each failure.
pub struct MatchEvaluator {
    registry: PathTestRegistry,
    file_probe: Option<Arc<dyn FileProbe>>,
}

impl MatchEvaluator {
    /// Creates an evaluator. Tests needing a file probe are skipped when
    /// `file_probe` is `None`.
    pub fn new(registry: PathTestRegistry, file_probe: Option<Arc<dyn FileProbe>>) -> Self {
        Self {
            registry,
            file_probe,
        }
    }

    /// The tests this evaluator runs.
    pub fn registry(&self) -> &PathTestRegistry {
        &self.registry
    }

    /// Evaluates references in order, running tests in registration order.
    /// A reference may fail any number of tests; every failure is reported.
    /// Returns the number of diagnostics emitted.
    pub fn evaluate(
        &self,
        references: &[ResourceReference],
        rule: &'static RuleInfo,
        reporter: &mut dyn Reporter,
    ) -> usize {
        let capabilities = Capabilities {
            file_probe: self.file_probe.as_deref(),
        };
        let mut emitted = 0;

        for reference in references {
            if reference.path.is_empty() {
                continue;
            }

            for test in &self.registry {
                if !test.is_runnable(&capabilities) {
                    continue;
                }
                if test.fails(&reference.path, &capabilities) {
                    tracing::trace!(
                        test = test.id(),
                        path = %reference.path,
                        line = reference.line(),
                        column = reference.column(),
                        "resource test failed"
                    );
                    reporter.warn(test.message(&reference.path), reference.position, rule);
                    emitted += 1;
                }
            }
        }

        emitted
    }
}

impl std::fmt::Debug for MatchEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchEvaluator")
            .field("registry", &self.registry)
            .field("file_probe", &self.file_probe.is_some())
            .finish()
    }
}
