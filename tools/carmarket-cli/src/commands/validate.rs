//! Validate the ranges in a query string.

use anyhow::{bail, Result};
use carmarket_search::{FilterField, NumericRanges, SearchParams};

use super::ValidateArgs;
use crate::context::Context;

/// Run the validate command. Fails when any range is invalid.
pub fn run(args: ValidateArgs, ctx: &Context) -> Result<()> {
    let params = SearchParams::parse(&args.query);
    let report = ctx.config.codec().validate_filters(raw_ranges(&params));

    if ctx.output.is_json() {
        ctx.output.json(&report);
    } else if report.is_valid {
        ctx.output.success("Filters are valid");
    } else {
        ctx.output.header("Validation Errors");
        for error in &report.errors {
            ctx.output.list_item(error);
        }
    }

    if !report.is_valid {
        bail!("{} problem(s) found", report.errors.len());
    }
    Ok(())
}

/// Range values as written in the query. The decoder would drop the
/// out-of-range ones before validation could see them.
fn raw_ranges(params: &SearchParams) -> NumericRanges {
    let raw = |field: FilterField| {
        params
            .get(field.as_str())
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|n| n.is_finite())
    };
    let integer = |field: FilterField| raw(field).map(|n| n.trunc() as i64);

    NumericRanges {
        min_year: integer(FilterField::MinYear),
        max_year: integer(FilterField::MaxYear),
        min_price: raw(FilterField::MinPrice),
        max_price: raw(FilterField::MaxPrice),
        min_mileage: integer(FilterField::MinMileage),
        max_mileage: integer(FilterField::MaxMileage),
    }
}
