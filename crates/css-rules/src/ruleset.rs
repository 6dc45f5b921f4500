//! Which rules run, and how loudly.

use rustc_hash::FxHashMap;
use std::str::FromStr;
use thiserror::Error;

/// Ruleset errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleSetError {
    /// A level that is neither a name nor 0/1/2.
    #[error("invalid rule level '{0}': expected off, warn, error, 0, 1 or 2")]
    InvalidLevel(String),

    /// A rule id the linter does not know.
    #[error("unknown rule '{0}'")]
    UnknownRule(String),
}

/// How a rule's findings are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RuleLevel {
    /// The rule does not run.
    #[default]
    Off,
    /// Findings are warnings.
    Warn,
    /// Findings are errors.
    Error,
}

impl FromStr for RuleLevel {
    type Err = RuleSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "off" | "false" => Ok(RuleLevel::Off),
            "1" | "warn" | "warning" | "true" => Ok(RuleLevel::Warn),
            "2" | "error" => Ok(RuleLevel::Error),
            _ => Err(RuleSetError::InvalidLevel(s.to_string())),
        }
    }
}

/// Rule id to level. Rules not mentioned are off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    levels: FxHashMap<String, RuleLevel>,
}

impl RuleSet {
    /// An empty ruleset; every rule is off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in rule as a warning.
    pub fn all_warnings() -> Self {
        let mut ruleset = Self::new();
        for rule in crate::BUILTIN_RULES {
            ruleset.set(rule.id, RuleLevel::Warn);
        }
        ruleset
    }

    /// Sets the level of one rule.
    pub fn set(&mut self, id: impl Into<String>, level: RuleLevel) -> &mut Self {
        self.levels.insert(id.into(), level);
        self
    }

    /// Builder form of [`RuleSet::set`].
    pub fn with(mut self, id: impl Into<String>, level: RuleLevel) -> Self {
        self.set(id, level);
        self
    }

    /// Sets every id in a comma-separated list, e.g. `--warnings=a,b`.
    pub fn set_list(&mut self, ids: &str, level: RuleLevel) -> &mut Self {
        for id in ids.split(',').map(str::trim).filter(|id| !id.is_empty()) {
            self.set(id, level);
        }
        self
    }

    /// Returns the level of a rule.
    pub fn level(&self, id: &str) -> RuleLevel {
        self.levels.get(id).copied().unwrap_or_default()
    }

    /// Returns true if the rule runs.
    pub fn is_enabled(&self, id: &str) -> bool {
        self.level(id) != RuleLevel::Off
    }

    /// Iterates over every id mentioned, enabled or not.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.levels.keys().map(String::as_str)
    }
}
