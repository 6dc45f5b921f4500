//! Named checks run against every resource path.

use super::url_shape::{is_external, uri_scheme};
use crate::host::FileProbe;

/// Placeholder replaced by the offending path in message templates.
pub const PATH_PLACEHOLDER: &str = "{path}";

/// Optional capabilities available to a test's predicate.
#[derive(Clone, Copy, Default)]
pub struct Capabilities<'a> {
    /// Filesystem access, when the host provided it.
    pub file_probe: Option<&'a dyn FileProbe>,
}

type Predicate = Box<dyn Fn(&str, &Capabilities<'_>) -> bool + Send + Sync>;

/// A named check with a message template and a predicate that returns true
/// when the path is a problem.
pub struct PathTest {
    id: &'static str,
    template: &'static str,
    requires_file_probe: bool,
    predicate: Predicate,
}

impl PathTest {
    /// Creates a test that needs no optional capability.
    pub fn new<F>(id: &'static str, template: &'static str, predicate: F) -> Self
    where
        F: Fn(&str, &Capabilities<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            id,
            template,
            requires_file_probe: false,
            predicate: Box::new(predicate),
        }
    }

    /// Marks the test as needing a file probe. Without one the test is
    /// skipped entirely.
    pub fn requiring_file_probe(mut self) -> Self {
        self.requires_file_probe = true;
        self
    }

    /// The test's id.
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// The message template, containing [`PATH_PLACEHOLDER`].
    pub fn template(&self) -> &'static str {
        self.template
    }

    /// Whether the test needs a file probe.
    pub fn requires_file_probe(&self) -> bool {
        self.requires_file_probe
    }

    /// Returns true if the test may run with the given capabilities.
    pub fn is_runnable(&self, capabilities: &Capabilities<'_>) -> bool {
        !self.requires_file_probe || capabilities.file_probe.is_some()
    }

    /// Runs the predicate.
    pub fn fails(&self, path: &str, capabilities: &Capabilities<'_>) -> bool {
        (self.predicate)(path, capabilities)
    }

    /// Formats the message for `path`.
    pub fn message(&self, path: &str) -> String {
        self.template.replacen(PATH_PLACEHOLDER, path, 1)
    }
}

impl std::fmt::Debug for PathTest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathTest")
            .field("id", &self.id)
            .field("template", &self.template)
            .field("requires_file_probe", &self.requires_file_probe)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of [`PathTest`]s. Order decides the order in which
/// diagnostics for the same reference are emitted.
#[derive(Debug)]
pub struct PathTestRegistry {
    tests: Vec<PathTest>,
}

impl PathTestRegistry {
    /// A registry with no tests.
    pub fn new() -> Self {
        Self { tests: Vec::new() }
    }

    /// The `external` and `filesystem` tests, in that order.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(external_test());
        registry.register(filesystem_test());
        registry
    }

    /// Adds a test at the end. A test with an existing id replaces the old
    /// one in its position.
    pub fn register(&mut self, test: PathTest) -> &mut Self {
        match self.tests.iter_mut().find(|existing| existing.id == test.id) {
            Some(existing) => *existing = test,
            None => self.tests.push(test),
        }
        self
    }

    /// Returns the test with the given id.
    pub fn get(&self, id: &str) -> Option<&PathTest> {
        self.tests.iter().find(|test| test.id == id)
    }

    /// Iterates in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, PathTest> {
        self.tests.iter()
    }

    /// Number of tests.
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    /// Returns true if there are no tests.
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

impl Default for PathTestRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a PathTestRegistry {
    type Item = &'a PathTest;
    type IntoIter = std::slice::Iter<'a, PathTest>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Flags references to remote hosts.
pub fn external_test() -> PathTest {
    PathTest::new(
        "external",
        "Consider using a localised resource instead for '{path}'",
        |path, _| is_external(path),
    )
}

/// Flags local paths the file probe cannot find.
pub fn filesystem_test() -> PathTest {
    PathTest::new(
        "filesystem",
        "'{path}' does not exist in the file system",
        is_missing_file,
    )
    .requiring_file_probe()
}

fn is_missing_file(path: &str, capabilities: &Capabilities<'_>) -> bool {
    let Some(probe) = capabilities.file_probe else {
        return false;
    };
    let local = local_path(path);
    if local.is_empty() || is_external(local) || uri_scheme(local).is_some() {
        return false;
    }
    !probe.is_file(local)
}

/// Drops the query and fragment of a path.
fn local_path(path: &str) -> &str {
    let path = path.split('?').next().unwrap_or(path);
    path.split('#').next().unwrap_or(path)
}
