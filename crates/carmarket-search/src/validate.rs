//! Range validation that reports problems instead of fixing them.

use serde::Serialize;

use crate::codec::FilterUrlParams;
use crate::field::FLOOR_YEAR;
use crate::model::AdvancedSearchFilters;

/// The numeric bounds a validation pass looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NumericRanges {
    pub min_year: Option<i64>,
    pub max_year: Option<i64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_mileage: Option<i64>,
    pub max_mileage: Option<i64>,
}

impl From<&FilterUrlParams> for NumericRanges {
    fn from(params: &FilterUrlParams) -> Self {
        Self {
            min_year: params.min_year,
            max_year: params.max_year,
            min_price: params.min_price,
            max_price: params.max_price,
            min_mileage: params.min_mileage,
            max_mileage: params.max_mileage,
        }
    }
}

impl From<&AdvancedSearchFilters> for NumericRanges {
    fn from(filters: &AdvancedSearchFilters) -> Self {
        Self {
            min_year: filters.min_year,
            max_year: filters.max_year,
            min_price: filters.min_price,
            max_price: filters.max_price,
            min_mileage: filters.min_mileage,
            max_mileage: filters.max_mileage,
        }
    }
}

/// Outcome of [`validate_ranges`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Check the bounds for inverted ranges, negative amounts and impossible years.
///
/// One English message is produced per violation, in a fixed order: year,
/// then price, then mileage.
pub fn validate_ranges(ranges: NumericRanges, current_year: i32) -> ValidationReport {
    let mut errors = Vec::new();
    let latest_year = i64::from(current_year) + 1;

    if let (Some(min), Some(max)) = (ranges.min_year, ranges.max_year) {
        if min > max {
            errors.push("Minimum year cannot be greater than maximum year".to_string());
        }
    }
    for (label, year) in [("Minimum", ranges.min_year), ("Maximum", ranges.max_year)] {
        if let Some(year) = year {
            if year < FLOOR_YEAR || year > latest_year {
                errors.push(format!(
                    "{} year must be between {} and {}",
                    label, FLOOR_YEAR, latest_year
                ));
            }
        }
    }

    if let (Some(min), Some(max)) = (ranges.min_price, ranges.max_price) {
        if min > max {
            errors.push("Minimum price cannot be greater than maximum price".to_string());
        }
    }
    if ranges.min_price.is_some_and(|price| price < 0.0) {
        errors.push("Minimum price cannot be negative".to_string());
    }
    if ranges.max_price.is_some_and(|price| price < 0.0) {
        errors.push("Maximum price cannot be negative".to_string());
    }

    if let (Some(min), Some(max)) = (ranges.min_mileage, ranges.max_mileage) {
        if min > max {
            errors.push("Minimum mileage cannot be greater than maximum mileage".to_string());
        }
    }
    if ranges.min_mileage.is_some_and(|mileage| mileage < 0) {
        errors.push("Minimum mileage cannot be negative".to_string());
    }
    if ranges.max_mileage.is_some_and(|mileage| mileage < 0) {
        errors.push("Maximum mileage cannot be negative".to_string());
    }

    ValidationReport::from_errors(errors)
}
