//! Show each filter pill for a query string.

use anyhow::{Context as _, Result};
use carmarket_filters::{FilterChip, ReferenceCatalog, SearchFilters};
use carmarket_search::{FilterGroup, ValidationReport};
use serde::Serialize;
use tracing::debug;

use super::DescribeArgs;
use crate::context::Context;
use crate::output::active_badge;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Pill {
    group: FilterGroup,
    active: bool,
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Description {
    url: String,
    active_filters: usize,
    pills: Vec<Pill>,
    chips: Vec<FilterChip>,
    validation: ValidationReport,
}

/// Run the describe command.
pub fn run(args: DescribeArgs, ctx: &Context) -> Result<()> {
    let catalog_path = ctx.resolve_path(&args.catalog);
    let catalog = ReferenceCatalog::load(&catalog_path)
        .with_context(|| format!("Failed to load catalog: {}", catalog_path.display()))?;
    debug!(
        makes = catalog.makes.len(),
        models = catalog.models.len(),
        "loaded reference catalog"
    );

    let mut config = ctx.config.clone();
    if let Some(locale) = args.locale {
        config.locale = locale;
    }

    let mut search = SearchFilters::from_config(catalog, &config);
    search.bootstrap(&args.query);

    let description = Description {
        url: search.search_url(),
        active_filters: search.active_filter_count(),
        pills: FilterGroup::PILLS
            .into_iter()
            .chain([FilterGroup::AllFilters])
            .map(|group| Pill {
                group,
                active: search.is_filter_active(group),
                text: search.display_text(group),
            })
            .collect(),
        chips: search.chips(),
        validation: search.validation(),
    };

    if ctx.output.is_json() {
        ctx.output.json(&description);
        return Ok(());
    }

    ctx.output.header("Search");
    ctx.output.kv("url", &description.url);
    ctx.output.kv("locale", config.locale.as_str());
    ctx.output
        .kv("active filters", &description.active_filters.to_string());

    ctx.output.header("Pills");
    for pill in &description.pills {
        ctx.output.table_row(
            &[pill.group.as_str(), &active_badge(pill.active), &pill.text],
            &[14, 8, 0],
        );
    }

    for error in &description.validation.errors {
        ctx.output.warn(error);
    }

    Ok(())
}
