//! Configuration loading.

use crate::cli::Args;
use camino::{Utf8Path, Utf8PathBuf};
use css_rules::{Linter, RuleLevel, RuleSet, RuleSetError};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use thiserror::Error;

/// Name of the config file looked up in the workspace root.
pub const CONFIG_FILE: &str = ".csslintrc";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("failed to read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid JSON of the expected shape.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        source: serde_json::Error,
    },

    /// A rule level that cannot be understood.
    #[error("rule '{rule}': {source}")]
    Level { rule: String, source: RuleSetError },

    /// Invalid or unknown rule configuration.
    #[error(transparent)]
    RuleSet(#[from] RuleSetError),
}

/// A rule level as written in JSON: `"warn"`, `2`, or `false`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LevelValue {
    /// `0`, `1` or `2`.
    Number(u64),
    /// `true` is a warning, `false` is off.
    Bool(bool),
    /// A level name.
    Text(String),
}

impl LevelValue {
    /// Converts to a rule level.
    pub fn level(&self) -> Result<RuleLevel, RuleSetError> {
        match self {
            LevelValue::Number(n) => n.to_string().parse(),
            LevelValue::Bool(b) => b.to_string().parse(),
            LevelValue::Text(s) => s.parse(),
        }
    }
}

/// The contents of a `.csslintrc` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CsslintConfig {
    /// Rule id to level.
    #[serde(default)]
    pub rules: IndexMap<String, LevelValue>,

    /// Glob patterns to exclude, relative to the workspace.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether local resources are probed on disk.
    pub filesystem: Option<bool>,
}

impl CsslintConfig {
    /// Loads configuration from a file.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Parses configuration text. Comments are allowed.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(&remove_json_comments(content))
    }

    /// Finds and loads `.csslintrc` from a project root.
    pub fn find(project_root: &Utf8Path) -> Result<Option<(Utf8PathBuf, Self)>, ConfigError> {
        let path = project_root.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let config = Self::load(&path)?;
        Ok(Some((path, config)))
    }

    /// Whether the file probe is enabled. Defaults to true.
    pub fn filesystem_enabled(&self) -> bool {
        self.filesystem.unwrap_or(true)
    }
}

/// Builds the ruleset for a run.
///
/// Without `--warnings` or `--errors` every rule starts as a warning and the
/// config file adjusts it. With either flag only the listed rules run.
/// `--ignore` always wins.
pub fn build_ruleset(
    linter: &Linter,
    config: &CsslintConfig,
    args: &Args,
) -> Result<RuleSet, ConfigError> {
    let explicit = args.warnings.is_some() || args.errors.is_some();

    let mut ruleset = if explicit {
        RuleSet::new()
    } else {
        let mut ruleset = linter.default_ruleset();
        for (rule, value) in &config.rules {
            let level = value.level().map_err(|source| ConfigError::Level {
                rule: rule.clone(),
                source,
            })?;
            ruleset.set(rule.as_str(), level);
        }
        ruleset
    };

    if let Some(ids) = &args.warnings {
        ruleset.set_list(ids, RuleLevel::Warn);
    }
    if let Some(ids) = &args.errors {
        ruleset.set_list(ids, RuleLevel::Error);
    }
    if let Some(ids) = &args.ignore {
        ruleset.set_list(ids, RuleLevel::Off);
    }

    linter.validate(&ruleset)?;
    Ok(ruleset)
}

/// Removes single-line and multi-line comments from JSON.
fn remove_json_comments(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let mut chars = json.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            if c == '"' {
                in_string = false;
            } else if c == '\\' {
                if let Some(next) = chars.next() {
                    result.push(next);
                }
            }
            continue;
        }

        let next = chars.peek().copied();
        match (c, next) {
            ('"', _) => {
                result.push(c);
                in_string = true;
            }
            ('/', Some('/')) => {
                while chars.peek().is_some_and(|&next| next != '\n') {
                    chars.next();
                }
            }
            ('/', Some('*')) => {
                chars.next();
                while let Some(next) = chars.next() {
                    if next == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => result.push(c),
        }
    }

    result
}
