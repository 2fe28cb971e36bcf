//! CLI command implementations.

pub mod config;
pub mod describe;
pub mod parse;
pub mod url;
pub mod validate;

use carmarket_filters::Locale;
use clap::{Args, Subcommand};

/// Arguments for the url command.
#[derive(Args)]
pub struct UrlArgs {
    /// JSON file with the filters, or `-` for stdin.
    #[arg(default_value = "-")]
    pub input: String,
}

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Query string, with or without the leading `?`.
    pub query: String,
}

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Query string, with or without the leading `?`.
    pub query: String,
}

/// Arguments for the describe command.
#[derive(Args)]
pub struct DescribeArgs {
    /// Query string, with or without the leading `?`.
    pub query: String,

    /// Reference catalog JSON (makes, models, locations, ...).
    #[arg(long)]
    pub catalog: String,

    /// Display language (overrides the config).
    #[arg(short, long)]
    pub locale: Option<Locale>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
