//! Carmarket CLI - Command line tool for car marketplace search URLs.
//!
//! Commands:
//! - `carmarket url` - Build a search URL from filter JSON
//! - `carmarket parse` - Parse a query string into filters
//! - `carmarket validate` - Check a query string's ranges
//! - `carmarket describe` - Show pill text for a query string
//! - `carmarket config` - Manage configuration

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConfigArgs, DescribeArgs, ParseArgs, UrlArgs, ValidateArgs};

/// Carmarket CLI - Build and inspect search filter URLs
#[derive(Parser)]
#[command(name = "carmarket")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a search URL from filter JSON
    Url(UrlArgs),

    /// Parse a query string into filters
    Parse(ParseArgs),

    /// Validate the ranges in a query string
    Validate(ValidateArgs),

    /// Show each filter pill for a query string
    Describe(DescribeArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    // Execute command
    let result = match cli.command {
        Commands::Url(args) => commands::url::run(args, &ctx),
        Commands::Parse(args) => commands::parse::run(args, &ctx),
        Commands::Validate(args) => commands::validate::run(args, &ctx),
        Commands::Describe(args) => commands::describe::run(args, &ctx),
        Commands::Config(args) => commands::config::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Logs go to stderr so they never mix with command output.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
