//! Configuration management commands.

use std::fs;

use anyhow::{bail, Context as _, Result};
use carmarket_filters::config::generate_default_config;

use super::{ConfigArgs, ConfigCommand};
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.info("No config file found, using defaults."),
    }

    let config = &ctx.config;
    let codec = config.codec();
    ctx.output.kv("locale", config.locale.as_str());
    ctx.output.kv("search_path", codec.search_path());
    ctx.output.kv("current_year", &codec.current_year().to_string());

    let labels = config.labels();
    ctx.output.info("");
    ctx.output.info("[labels]");
    ctx.output.kv("currency_symbol", &labels.currency_symbol);
    ctx.output.kv("mileage_unit", &labels.mileage_unit);
    ctx.output.kv("thousands_separator", &labels.thousands_separator);
    ctx.output.kv("list_separator", &labels.list_separator);

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let path = ctx.cwd.join(CONFIG_NAMES[0]);

    if path.exists() && !force {
        bail!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        );
    }

    fs::write(&path, generate_default_config())
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    ctx.output
        .success(&format!("Created {}", path.display()));

    Ok(())
}
