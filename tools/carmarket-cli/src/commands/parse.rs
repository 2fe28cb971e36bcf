//! Parse a query string into filters.

use anyhow::Result;
use carmarket_search::FilterUrlParams;
use serde::Serialize;

use super::ParseArgs;
use crate::context::Context;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Parsed {
    filters: FilterUrlParams,
    active_filters: usize,
}

/// Run the parse command.
pub fn run(args: ParseArgs, ctx: &Context) -> Result<()> {
    let filters = ctx.config.codec().parse_query(&args.query);
    let parsed = Parsed {
        active_filters: filters.count_active_filters(),
        filters,
    };

    if ctx.output.is_json() {
        ctx.output.json(&parsed);
        return Ok(());
    }

    ctx.output.header("Parsed Filters");
    if let serde_json::Value::Object(fields) = serde_json::to_value(&parsed.filters)? {
        if fields.is_empty() {
            ctx.output.info("No filters in query.");
        }
        for (key, value) in fields {
            ctx.output.kv(&key, &value.to_string());
        }
    }
    ctx.output.info("");
    ctx.output.kv("active filters", &parsed.active_filters.to_string());

    Ok(())
}
