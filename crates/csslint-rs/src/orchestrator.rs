//! Main orchestration logic.

use crate::cli::{Args, OutputFormat};
use crate::config::{build_ruleset, ConfigError, CsslintConfig};
use crate::output::{CheckSummary, FormattedDiagnostic, Formatter};
use crate::probe::FsProbe;
use camino::{Utf8Path, Utf8PathBuf};
use css_rules::{Linter, RuleContext, RuleSet, Severity};
use globset::{Glob, GlobSet, GlobSetBuilder};
use indexmap::IndexSet;
use rayon::prelude::*;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use walkdir::WalkDir;

/// Directories that are never linted.
const DEFAULT_EXCLUDES: &[&str] = &["**/node_modules/**", "**/dist/**", "**/.git/**"];

/// Orchestration errors.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Invalid glob pattern.
    #[error("invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// A path given on the command line does not exist.
    #[error("no such file or directory: {0}")]
    PathNotFound(Utf8PathBuf),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Watch error.
    #[error("watch error: {0}")]
    WatchFailed(String),
}

/// Everything a check pass needs, resolved once per run.
struct CheckPlan {
    workspace: Utf8PathBuf,
    targets: Vec<Utf8PathBuf>,
    excludes: GlobSet,
    linter: Linter,
    ruleset: RuleSet,
    filesystem: bool,
}

/// Runs the check on all files.
pub async fn run(args: Args) -> Result<CheckSummary, OrchestratorError> {
    let plan = plan(&args)?;

    if args.watch {
        run_watch_mode(&args, &plan).await
    } else {
        let files = discover_files(&plan)?;
        Ok(run_single_check(&args, &plan, &files))
    }
}

fn plan(args: &Args) -> Result<CheckPlan, OrchestratorError> {
    let cwd = std::env::current_dir()
        .ok()
        .and_then(|p| Utf8PathBuf::try_from(p).ok())
        .unwrap_or_default();
    let workspace = absolute(&cwd, &args.workspace);

    // Load configuration
    let config = match &args.config {
        Some(path) => {
            let path = absolute(&cwd, path);
            tracing::debug!(config = %path, "loading config");
            CsslintConfig::load(&path)?
        }
        None => match CsslintConfig::find(&workspace)? {
            Some((path, config)) => {
                tracing::debug!(config = %path, "found config");
                config
            }
            None => CsslintConfig::default(),
        },
    };

    let linter = Linter::new();
    let ruleset = build_ruleset(&linter, &config, args)?;
    let filesystem = args.use_filesystem() && config.filesystem_enabled();

    // Build exclude glob set
    let mut exclude_builder = GlobSetBuilder::new();
    for pattern in args.exclude.iter().chain(&config.exclude) {
        let glob = Glob::new(pattern).map_err(|e| OrchestratorError::InvalidGlob(e.to_string()))?;
        exclude_builder.add(glob);
    }

    // Add default excludes
    for pattern in DEFAULT_EXCLUDES {
        if let Ok(glob) = Glob::new(pattern) {
            exclude_builder.add(glob);
        }
    }

    let excludes = exclude_builder
        .build()
        .map_err(|e| OrchestratorError::InvalidGlob(e.to_string()))?;

    let targets = if args.paths.is_empty() {
        vec![workspace.clone()]
    } else {
        args.paths.iter().map(|p| absolute(&cwd, p)).collect()
    };

    tracing::debug!(
        workspace = %workspace,
        filesystem,
        targets = targets.len(),
        "check planned"
    );

    Ok(CheckPlan {
        workspace,
        targets,
        excludes,
        linter,
        ruleset,
        filesystem,
    })
}

/// Joins `path` onto `base` unless it is already absolute, dropping `.`
/// components so the same file always gets the same path.
fn absolute(base: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    let joined = if path.is_relative() {
        base.join(path)
    } else {
        path.to_path_buf()
    };
    joined.components().collect()
}

/// Finds the stylesheets to lint. Named files are taken as given;
/// directories are searched for `.css` files. A file reached through
/// several targets is linted once, at its first position.
fn discover_files(plan: &CheckPlan) -> Result<Vec<Utf8PathBuf>, OrchestratorError> {
    let mut files = IndexSet::new();

    for target in &plan.targets {
        if target.is_file() {
            files.insert(target.clone());
            continue;
        }
        if !target.is_dir() {
            return Err(OrchestratorError::PathNotFound(target.clone()));
        }

        files.extend(
            WalkDir::new(target)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter_map(|e| Utf8PathBuf::try_from(e.into_path()).ok())
                .filter(|p| is_stylesheet(p)),
        );
    }

    files.retain(|p| !is_excluded(plan, p));
    tracing::debug!(files = files.len(), "discovered stylesheets");
    Ok(files.into_iter().collect())
}

fn is_stylesheet(path: &Utf8Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("css"))
}

fn is_excluded(plan: &CheckPlan, path: &Utf8Path) -> bool {
    let relative = path.strip_prefix(&plan.workspace).unwrap_or(path);
    plan.excludes.is_match(relative.as_str())
}

/// Runs a single check pass.
fn run_single_check(args: &Args, plan: &CheckPlan, files: &[Utf8PathBuf]) -> CheckSummary {
    let formatter = Formatter::new(args.format);
    let output_json = args.format == OutputFormat::Json;
    let error_count = AtomicUsize::new(0);
    let warning_count = AtomicUsize::new(0);

    struct FileOutput {
        text: Option<String>,
        json: Vec<FormattedDiagnostic>,
    }

    // Lint files in parallel; each file gets fresh rule state
    let outputs: Vec<FileOutput> = files
        .par_iter()
        .filter_map(|file_path| {
            let source = match fs::read_to_string(file_path) {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!(file = %file_path, error = %e, "failed to read stylesheet");
                    return None;
                }
            };

            let ctx = if plan.filesystem {
                RuleContext::with_file_probe(Arc::new(FsProbe::for_stylesheet(
                    file_path,
                    &plan.workspace,
                )))
            } else {
                RuleContext::new()
            };

            let result = plan.linter.verify(&source, &plan.ruleset, &ctx);
            tracing::debug!(
                file = %file_path,
                diagnostics = result.messages.len(),
                "linted"
            );

            // Count errors and warnings
            for diag in &result.messages {
                match diag.severity {
                    Severity::Error => {
                        error_count.fetch_add(1, Ordering::Relaxed);
                    }
                    Severity::Warning => {
                        warning_count.fetch_add(1, Ordering::Relaxed);
                    }
                }
            }

            if result.is_empty() {
                None
            } else {
                let relative_path = file_path.strip_prefix(&plan.workspace).unwrap_or(file_path);
                Some(FileOutput {
                    text: if output_json {
                        None
                    } else {
                        Some(formatter.format(&result.messages, relative_path, &source))
                    },
                    json: if output_json {
                        Formatter::format_json_diagnostics(&result.messages, relative_path)
                    } else {
                        Vec::new()
                    },
                })
            }
        })
        .collect();

    let summary = CheckSummary {
        file_count: files.len(),
        error_count: error_count.load(Ordering::Relaxed),
        warning_count: warning_count.load(Ordering::Relaxed),
        fail_on_warnings: args.fail_on_warnings
            || read_env_bool("CSSLINT_FAIL_ON_WARNINGS").unwrap_or(false),
    };

    if output_json {
        let json_output: Vec<FormattedDiagnostic> =
            outputs.into_iter().flat_map(|output| output.json).collect();
        let json = serde_json::to_string_pretty(&json_output).unwrap_or_else(|_| "[]".to_string());
        println!("{}", json);
    } else {
        for output in outputs {
            if let Some(text) = output.text {
                print!("{}", text);
            }
        }
        if !(args.quiet && summary.is_clean()) {
            println!("{}", summary.format());
        }
    }

    summary
}

fn read_env_bool(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Runs in watch mode.
async fn run_watch_mode(args: &Args, plan: &CheckPlan) -> Result<CheckSummary, OrchestratorError> {
    use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
    use std::time::Duration;

    println!("Starting watch mode...\n");

    // Initial check
    let files = discover_files(plan)?;
    let _summary = run_single_check(args, plan, &files);

    // Set up file watcher with tokio channel
    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        },
        Config::default().with_poll_interval(Duration::from_secs(1)),
    )
    .map_err(|e| OrchestratorError::WatchFailed(e.to_string()))?;

    watcher
        .watch(plan.workspace.as_std_path(), RecursiveMode::Recursive)
        .map_err(|e| OrchestratorError::WatchFailed(e.to_string()))?;

    println!("Watching for changes... (Ctrl+C to stop)\n");

    while let Some(event) = rx.recv().await {
        let css_changed = event.paths.iter().any(|p| {
            Utf8Path::from_path(p).is_some_and(|p| is_stylesheet(p) && !is_excluded(plan, p))
        });

        if css_changed {
            if !args.preserve_watch_output {
                // Clear screen
                print!("\x1B[2J\x1B[1;1H");
            }

            println!("File changed, re-checking...\n");

            // Files may have been added or removed since the last pass
            match discover_files(plan) {
                Ok(files) => {
                    run_single_check(args, plan, &files);
                }
                Err(e) => tracing::warn!(error = %e, "skipping re-check"),
            }
        }
    }

    Err(OrchestratorError::WatchFailed(
        "watch channel closed unexpectedly".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    fn plan_for(root: &Utf8Path, extra: &[&str]) -> CheckPlan {
        let mut argv = vec!["csslint-rs", "--workspace", root.as_str()];
        argv.extend_from_slice(extra);
        plan(&Args::parse_from(argv)).unwrap()
    }

    fn relative(plan: &CheckPlan, files: &[Utf8PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(&plan.workspace).unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_relative_workspace() {
        let cwd = Utf8Path::new("/home/user");
        assert_eq!(absolute(cwd, Utf8Path::new("site")), "/home/user/site");
        assert_eq!(absolute(cwd, Utf8Path::new("/srv/site")), "/srv/site");
        assert_eq!(absolute(cwd, Utf8Path::new(".")), "/home/user");
        assert_eq!(absolute(cwd, Utf8Path::new("./css/a.css")), "/home/user/css/a.css");
    }

    #[test]
    fn test_discovery_skips_default_excludes() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        for file in [
            "a.css",
            "css/b.CSS",
            "css/c.scss",
            "node_modules/pkg/d.css",
            "dist/e.css",
            "vendor/f.css",
        ] {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "a { }").unwrap();
        }

        let plan = plan_for(root, &["--exclude", "vendor/**"]);
        let files = discover_files(&plan).unwrap();
        assert_eq!(relative(&plan, &files), vec!["a.css", "css/b.CSS"]);
    }

    #[test]
    fn test_named_file_is_linted_whatever_its_extension() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        fs::write(root.join("theme.txt"), "a { }").unwrap();

        let theme = root.join("theme.txt");
        let plan = plan_for(root, &[theme.as_str()]);
        let files = discover_files(&plan).unwrap();
        assert_eq!(relative(&plan, &files), vec!["theme.txt"]);
    }

    #[test]
    fn test_file_named_twice_is_linted_once() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        fs::create_dir_all(root.join("css")).unwrap();
        for file in ["a.css", "css/b.css"] {
            fs::write(root.join(file), "a { }").unwrap();
        }

        let b = root.join("css/b.css");
        let plan = plan_for(root, &[b.as_str(), root.as_str(), b.as_str()]);
        let files = discover_files(&plan).unwrap();
        assert_eq!(relative(&plan, &files), vec!["css/b.css", "a.css"]);
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        let missing = root.join("missing");
        let plan = plan_for(root, &[missing.as_str()]);
        assert!(matches!(
            discover_files(&plan),
            Err(OrchestratorError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_config_disables_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        fs::write(root.join(".csslintrc"), r#"{ "filesystem": false }"#).unwrap();

        assert!(!plan_for(root, &[]).filesystem);
        fs::remove_file(root.join(".csslintrc")).unwrap();
        assert!(plan_for(root, &[]).filesystem);
        assert!(!plan_for(root, &["--no-filesystem"]).filesystem);
    }

    #[test]
    fn test_invalid_exclude_glob() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        let args = Args::parse_from(["csslint-rs", "--workspace", root.as_str(), "--exclude", "a[b"]);
        assert!(matches!(plan(&args), Err(OrchestratorError::InvalidGlob(_))));
    }
}
