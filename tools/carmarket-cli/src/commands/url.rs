//! Build a search URL from filter JSON.

use std::io::Read;

use anyhow::{Context as _, Result};
use carmarket_search::FilterUrlParams;

use super::UrlArgs;
use crate::context::Context;

/// Run the url command.
pub fn run(args: UrlArgs, ctx: &Context) -> Result<()> {
    let content = if args.input == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read filters from stdin")?;
        content
    } else {
        let path = ctx.resolve_path(&args.input);
        std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read filters: {}", path.display()))?
    };

    let filters: FilterUrlParams =
        serde_json::from_str(&content).context("Failed to parse filter JSON")?;
    let url = ctx.config.codec().build_search_url(&filters);

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "url": url,
            "activeFilters": filters.count_active_filters(),
        }));
        return Ok(());
    }

    if !filters.has_active_filters() {
        ctx.output.warn("No active filters; the URL is the bare search page");
    }
    println!("{}", url);

    Ok(())
}
