//! csslint-rs: flags remote and missing resources in stylesheets.

mod cli;
mod config;
mod orchestrator;
mod output;
mod probe;

use clap::Parser;
use cli::Args;
use css_rules::Linter;
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(args.quiet, args.verbose)?;

    if args.list_rules {
        for rule in Linter::new().rules() {
            println!("{} - {}: {}", rule.id, rule.name, rule.desc);
        }
        return Ok(());
    }

    let result = orchestrator::run(args).await;

    match result {
        Ok(summary) => {
            if summary.is_failure() {
                std::process::exit(1);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Installs the stderr log subscriber. `CSSLINT_LOG` overrides the level.
fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("CSSLINT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| miette::miette!("failed to initialize tracing subscriber: {error}"))
}
