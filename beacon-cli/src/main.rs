//! Beacon CLI - Command line interface for Issue Beacon
//!
//! Finds issues carrying a label across an organization's repositories.

mod commands;

use std::time::Duration;

use beacon_core::Config;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{SearchArgs, ShellArgs};

/// Issue Beacon: labelled GitHub issues across an organization
#[derive(Parser, Debug)]
#[command(name = "beacon")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// GitHub API base URL (overrides config and env)
    #[arg(long, global = true, env = "BEACON_API_URL")]
    api_url: Option<String>,

    /// Seconds to wait for GitHub before aborting a search
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Search once and print the issues grouped by repository
    #[command(visible_alias = "s")]
    Search(SearchArgs),

    /// Interactive session with adjustable filters
    Shell(ShellArgs),

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `--json` output stays clean
    let default_level = if cli.verbose { "info" } else { "error" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    // Load configuration with overrides
    let config = Config::load_with_overrides(
        cli.api_url.clone(),
        cli.timeout_secs.map(Duration::from_secs),
    )?;

    if cli.verbose {
        tracing::info!(
            api_url = %config.github.api_url,
            timeout = ?config.github.timeout,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("beacon {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Search(args)) => {
            args.execute(cli.verbose, &config).await?;
        }
        Some(Commands::Shell(args)) => {
            args.execute(cli.verbose, &config).await?;
        }
        Some(Commands::Config) => {
            println!("Beacon Configuration");
            println!("====================");
            println!();
            println!("GitHub Settings:");
            println!("  api_url: {}", config.github.api_url);
            println!("  timeout: {:?}", config.github.timeout);
            println!("  user_agent: {}", config.github.user_agent);
            println!();
            println!("Default Filters:");
            println!(
                "  organization: {}",
                config.defaults.organization.as_deref().unwrap_or("(none)")
            );
            println!("  label: {}", config.defaults.label.as_deref().unwrap_or("(none)"));
            println!("  state: {}", config.defaults.state);
            println!("  sort: {} {}", config.defaults.sort, config.defaults.order);
            println!("  per_page: {}", config.defaults.per_page);
            println!();
            if let Some(path) = Config::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
        }
        None => {
            println!("Issue Beacon - labelled GitHub issues across an organization");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_must_be_positive() {
        assert!(Cli::try_parse_from(["beacon", "--timeout-secs", "0", "version"]).is_err());

        let cli = Cli::try_parse_from(["beacon", "--timeout-secs", "3", "version"]).unwrap();
        assert_eq!(cli.timeout_secs, Some(3));
    }
}
