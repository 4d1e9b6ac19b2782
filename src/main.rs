mod cache;
mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod identity;
mod infra;
mod services;
mod workflow;

use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::sync::Arc;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cache::IdentityCache;
use crate::cmd::changelog::{self, ChangelogCommandArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::domain::revision::EntryLimit;
use crate::error::{AppError, AppResult};
use crate::identity::IdentityResolver;
use crate::infra::http::HttpDirectory;
use crate::infra::svn::SvnCli;

const EXAMPLES: &str = "Examples:\n  svnchangelog\n  svnchangelog 10";

#[derive(Parser)]
#[command(
    name = "svnchangelog",
    about = "Generates a ChangeLog based on \"svn log\".",
    long_about = "Generates a ChangeLog based on \"svn log\".\n\
                  Tries to find names and e-mail addresses for Arch Linux related usernames.",
    disable_version_flag = true,
    after_help = EXAMPLES
)]
struct Cli {
    /// The number of entries to fetch from the log (default: all of them).
    #[arg(value_name = "N", value_parser = parse_count, allow_negative_numbers = true)]
    count: Option<NonZeroUsize>,

    /// Print the version and exit.
    #[arg(short = 'v', long = "version")]
    show_version: bool,
}

fn parse_count(value: &str) -> Result<NonZeroUsize, String> {
    EntryLimit::parse_count(value).map_err(|err| match err {
        AppError::Usage(guidance) => guidance,
        other => other.to_string(),
    })
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    if cli.show_version {
        println!("{}", version());
        return Ok(());
    }

    run_changelog(EntryLimit::from_count(cli.count)).await
}

/// Release line shown by `--version`: major and minor only.
fn version() -> String {
    format!(
        "{}.{}",
        env!("CARGO_PKG_VERSION_MAJOR"),
        env!("CARGO_PKG_VERSION_MINOR")
    )
}

async fn run_changelog(limit: EntryLimit) -> AppResult<()> {
    let cwd = std::env::current_dir()?;
    let config = AppConfig::load(&cwd)?;

    let history = Arc::new(SvnCli::new(
        config.svn_binary.clone(),
        config.workspace_root.clone(),
    ));
    let directory = Arc::new(HttpDirectory::new(config.http_timeout)?);
    let cache = Arc::new(IdentityCache::new());
    let identities = Arc::new(IdentityResolver::for_directories(
        &config.directories,
        directory,
        cache.clone(),
    ));

    let context = AppContext::new(config, history, identities);
    let output = changelog::run(&context, ChangelogCommandArgs { limit }).await?;
    debug!(handles = cache.len(), "identity cache at exit");

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("svnchangelog").chain(args.iter().copied()))
    }

    #[test]
    fn count_is_optional() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.count, None);
        assert!(!cli.show_version);
        assert_eq!(parse(&["10"]).unwrap().count.map(NonZeroUsize::get), Some(10));
    }

    #[test]
    fn rejects_non_positive_counts_with_guidance() {
        for bad in ["0", "-3", "x"] {
            let error = parse(&[bad]).err().unwrap();
            assert_eq!(error.kind(), ErrorKind::ValueValidation, "{bad}");
            assert!(
                error.to_string().contains("Please provide an int"),
                "{bad}: {error}"
            );
        }
    }

    #[test]
    fn short_and_long_version_flags() {
        assert!(parse(&["-v"]).unwrap().show_version);
        assert!(parse(&["--version"]).unwrap().show_version);
        assert_eq!(version(), "0.3");
    }

    #[test]
    fn help_lists_examples() {
        let error = parse(&["-h"]).err().unwrap();
        assert_eq!(error.kind(), ErrorKind::DisplayHelp);
        assert!(error.to_string().contains("svnchangelog 10"));
    }
}
