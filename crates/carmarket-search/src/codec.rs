//! Search URL encoding and decoding.
//!
//! The query string is a lossy, shareable rendering of the filters. Values
//! that fail their field's validity rule are left out when encoding and
//! dropped when decoding, so a hand-edited URL never produces an error.

use std::fmt;

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::field::FilterField;
use crate::model::{deserialize_slugs, AdvancedSearchFilters};
use crate::validate::{validate_ranges, NumericRanges, ValidationReport};

/// Path of the search page.
pub const SEARCH_PATH: &str = "/search";

/// The URL-facing subset of the filter model.
///
/// Unlike [`AdvancedSearchFilters`], location and seller type are single
/// values here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterUrlParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_slugs",
        skip_serializing_if = "Option::is_none"
    )]
    pub brands: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_slugs",
        skip_serializing_if = "Option::is_none"
    )]
    pub models: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_year: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_year: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_mileage: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_mileage: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transmission_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_type_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_style_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_type_id: Option<i64>,
}

impl FilterUrlParams {
    /// True iff any field is present. Blank text and lists holding only
    /// blank slugs do not count, since they never reach the URL.
    pub fn has_active_filters(&self) -> bool {
        self.count_active_filters() > 0
    }

    /// Count active filter groups.
    ///
    /// A range counts once however many of its bounds are set.
    pub fn count_active_filters(&self) -> usize {
        let groups = [
            self.location.as_deref().is_some_and(|l| !l.trim().is_empty()),
            has_slugs(&self.brands),
            has_slugs(&self.models),
            self.min_year.is_some() || self.max_year.is_some(),
            self.min_price.is_some() || self.max_price.is_some(),
            self.min_mileage.is_some() || self.max_mileage.is_some(),
            self.transmission_id.is_some(),
            self.fuel_type_id.is_some(),
            self.body_style_id.is_some(),
            self.seller_type_id.is_some(),
        ];
        groups.iter().filter(|active| **active).count()
    }

    /// Widen into the full filter model.
    pub fn into_filters(self) -> AdvancedSearchFilters {
        AdvancedSearchFilters {
            brands: self.brands,
            models: self.models,
            min_year: self.min_year,
            max_year: self.max_year,
            min_price: self.min_price,
            max_price: self.max_price,
            min_mileage: self.min_mileage,
            max_mileage: self.max_mileage,
            locations: self.location.map(|location| vec![location]),
            transmission_id: self.transmission_id,
            fuel_type_id: self.fuel_type_id,
            body_style_id: self.body_style_id,
            seller_type_ids: self.seller_type_id.map(|id| vec![id]),
            ..Default::default()
        }
    }
}

impl From<&AdvancedSearchFilters> for FilterUrlParams {
    /// Narrow the full model for the URL. Only the first non-blank location
    /// and the first seller type survive; condition, colour, doors and
    /// cylinders are dropped.
    fn from(filters: &AdvancedSearchFilters) -> Self {
        Self {
            location: filters
                .locations
                .iter()
                .flatten()
                .find(|location| !location.trim().is_empty())
                .cloned(),
            brands: filters.brands.clone().filter(|b| !b.is_empty()),
            models: filters.models.clone().filter(|m| !m.is_empty()),
            min_year: filters.min_year,
            max_year: filters.max_year,
            min_price: filters.min_price,
            max_price: filters.max_price,
            min_mileage: filters.min_mileage,
            max_mileage: filters.max_mileage,
            transmission_id: filters.transmission_id,
            fuel_type_id: filters.fuel_type_id,
            body_style_id: filters.body_style_id,
            seller_type_id: filters
                .seller_type_ids
                .as_ref()
                .and_then(|ids| ids.first().copied()),
        }
    }
}

fn has_slugs(slugs: &Option<Vec<String>>) -> bool {
    slugs.iter().flatten().any(|slug| !slug.trim().is_empty())
}

/// Ordered query-string parameters. Keys may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pairs: Vec<(String, String)>,
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string, with or without the leading `?`.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    /// Append a parameter.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `key`, in order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encode as `application/x-www-form-urlencoded`.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }
}

impl fmt::Display for SearchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl FromIterator<(String, String)> for SearchParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

/// Converts between [`FilterUrlParams`] and query strings.
///
/// Year validity depends on the current year, so the codec carries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlCodec {
    current_year: i32,
    search_path: String,
}

impl Default for UrlCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlCodec {
    /// Codec for today's date (UTC).
    pub fn new() -> Self {
        Self::with_current_year(chrono::Utc::now().year())
    }

    /// Codec with a fixed current year.
    pub fn with_current_year(current_year: i32) -> Self {
        Self {
            current_year,
            search_path: SEARCH_PATH.to_string(),
        }
    }

    /// Use a different search page path.
    pub fn with_search_path(mut self, path: impl Into<String>) -> Self {
        self.search_path = path.into();
        self
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    pub fn search_path(&self) -> &str {
        &self.search_path
    }

    /// Encode filters as query parameters.
    ///
    /// `location` goes first, then one `brand`/`model` per non-blank slug,
    /// then the numeric bounds and entity IDs that pass validation.
    pub fn build_search_params(&self, filters: &FilterUrlParams) -> SearchParams {
        let mut params = SearchParams::new();

        if let Some(location) = filters.location.as_deref().filter(|l| !l.trim().is_empty()) {
            params.append(key(FilterField::Locations), location);
        }
        for (field, slugs) in [
            (FilterField::Brands, &filters.brands),
            (FilterField::Models, &filters.models),
        ] {
            for slug in slugs.iter().flatten().filter(|s| !s.trim().is_empty()) {
                params.append(key(field), slug.as_str());
            }
        }

        self.push_integer(&mut params, FilterField::MinYear, filters.min_year);
        self.push_integer(&mut params, FilterField::MaxYear, filters.max_year);
        self.push_number(&mut params, FilterField::MinPrice, filters.min_price);
        self.push_number(&mut params, FilterField::MaxPrice, filters.max_price);
        self.push_integer(&mut params, FilterField::MinMileage, filters.min_mileage);
        self.push_integer(&mut params, FilterField::MaxMileage, filters.max_mileage);
        self.push_integer(&mut params, FilterField::TransmissionId, filters.transmission_id);
        self.push_integer(&mut params, FilterField::FuelTypeId, filters.fuel_type_id);
        self.push_integer(&mut params, FilterField::BodyStyleId, filters.body_style_id);
        self.push_integer(&mut params, FilterField::SellerTypeIds, filters.seller_type_id);

        params
    }

    /// Decode query parameters.
    ///
    /// Each parameter is read on its own; a bad value only loses that value.
    pub fn parse_search_params(&self, params: &SearchParams) -> FilterUrlParams {
        FilterUrlParams {
            location: params
                .get(key(FilterField::Locations))
                .filter(|l| !l.trim().is_empty())
                .map(str::to_string),
            brands: slug_list(params, FilterField::Brands),
            models: slug_list(params, FilterField::Models),
            min_year: self.integer(params, FilterField::MinYear),
            max_year: self.integer(params, FilterField::MaxYear),
            min_price: self.number(params, FilterField::MinPrice),
            max_price: self.number(params, FilterField::MaxPrice),
            min_mileage: self.integer(params, FilterField::MinMileage),
            max_mileage: self.integer(params, FilterField::MaxMileage),
            transmission_id: self.integer(params, FilterField::TransmissionId),
            fuel_type_id: self.integer(params, FilterField::FuelTypeId),
            body_style_id: self.integer(params, FilterField::BodyStyleId),
            seller_type_id: self.integer(params, FilterField::SellerTypeIds),
        }
    }

    /// Decode a raw query string.
    pub fn parse_query(&self, query: &str) -> FilterUrlParams {
        self.parse_search_params(&SearchParams::parse(query))
    }

    /// Search page path plus query, without a trailing `?` when empty.
    pub fn build_search_url(&self, filters: &FilterUrlParams) -> String {
        let params = self.build_search_params(filters);
        if params.is_empty() {
            self.search_path.clone()
        } else {
            format!("{}?{}", self.search_path, params.to_query_string())
        }
    }

    /// Report range problems without changing anything.
    pub fn validate_filters(&self, filters: impl Into<NumericRanges>) -> ValidationReport {
        validate_ranges(filters.into(), self.current_year)
    }

    fn accepts(&self, field: FilterField, value: f64) -> bool {
        field.validity().accepts(value, self.current_year)
    }

    fn push_integer(&self, params: &mut SearchParams, field: FilterField, value: Option<i64>) {
        if let Some(value) = value.filter(|v| self.accepts(field, *v as f64)) {
            params.append(key(field), value.to_string());
        }
    }

    fn push_number(&self, params: &mut SearchParams, field: FilterField, value: Option<f64>) {
        if let Some(value) = value.filter(|v| self.accepts(field, *v)) {
            params.append(key(field), value.to_string());
        }
    }

    fn integer(&self, params: &SearchParams, field: FilterField) -> Option<i64> {
        let value: i64 = params.get(key(field))?.trim().parse().ok()?;
        self.accepts(field, value as f64).then_some(value)
    }

    fn number(&self, params: &SearchParams, field: FilterField) -> Option<f64> {
        let value: f64 = params.get(key(field))?.trim().parse().ok()?;
        self.accepts(field, value).then_some(value)
    }
}

fn key(field: FilterField) -> &'static str {
    field.url_key().unwrap_or_else(|| field.as_str())
}

/// Every non-blank occurrence of a slug parameter.
///
/// Older links carry the whole list in one comma-separated parameter named
/// after the field (`brands=kia,hyundai`); that form is read only when the
/// repeated form is absent.
fn slug_list(params: &SearchParams, field: FilterField) -> Option<Vec<String>> {
    let slugs: Vec<String> = if params.contains(key(field)) {
        params
            .get_all(key(field))
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .collect()
    } else {
        params
            .get(field.as_str())
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    };
    (!slugs.is_empty()).then_some(slugs)
}

/// Encode filters with a codec for the current year.
pub fn build_search_params(filters: &FilterUrlParams) -> SearchParams {
    UrlCodec::new().build_search_params(filters)
}

/// Decode parameters with a codec for the current year.
pub fn parse_search_params(params: &SearchParams) -> FilterUrlParams {
    UrlCodec::new().parse_search_params(params)
}

/// `/search` URL for the filters.
pub fn build_search_url(filters: &FilterUrlParams) -> String {
    UrlCodec::new().build_search_url(filters)
}

pub fn has_active_filters(filters: &FilterUrlParams) -> bool {
    filters.has_active_filters()
}

pub fn count_active_filters(filters: &FilterUrlParams) -> usize {
    filters.count_active_filters()
}

/// Validate with a codec for the current year.
pub fn validate_filters(filters: impl Into<NumericRanges>) -> ValidationReport {
    UrlCodec::new().validate_filters(filters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn codec() -> UrlCodec {
        UrlCodec::with_current_year(2025)
    }

    fn slugs(items: &[&str]) -> Option<Vec<String>> {
        Some(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_build_search_url_orders_location_first() {
        let filters = FilterUrlParams {
            location: Some("damascus".to_string()),
            brands: slugs(&["toyota"]),
            min_year: Some(2020),
            max_year: Some(2024),
            ..Default::default()
        };
        assert_eq!(
            codec().build_search_url(&filters),
            "/search?location=damascus&brand=toyota&minYear=2020&maxYear=2024"
        );
    }

    #[test]
    fn test_blank_slugs_are_dropped() {
        let filters = FilterUrlParams {
            brands: slugs(&["toyota", "", "honda", "   "]),
            ..Default::default()
        };
        assert_eq!(
            codec().build_search_params(&filters).to_query_string(),
            "brand=toyota&brand=honda"
        );
    }

    #[test]
    fn test_empty_filters_give_bare_path() {
        assert_eq!(codec().build_search_url(&FilterUrlParams::default()), "/search");
    }

    #[test]
    fn test_invalid_values_are_omitted_not_clamped() {
        let filters = FilterUrlParams {
            min_year: Some(1900),
            max_year: Some(2027),
            min_price: Some(-5.0),
            max_mileage: Some(0),
            transmission_id: Some(0),
            fuel_type_id: Some(3),
            ..Default::default()
        };
        assert_eq!(
            codec().build_search_params(&filters).to_query_string(),
            "maxMileage=0&fuelTypeId=3"
        );
    }

    #[test]
    fn test_emit_order_for_every_field() {
        let filters = FilterUrlParams {
            location: Some("aleppo".to_string()),
            brands: slugs(&["kia"]),
            models: slugs(&["rio"]),
            min_year: Some(2010),
            max_year: Some(2020),
            min_price: Some(1000.0),
            max_price: Some(2500.5),
            min_mileage: Some(0),
            max_mileage: Some(90000),
            transmission_id: Some(1),
            fuel_type_id: Some(2),
            body_style_id: Some(3),
            seller_type_id: Some(4),
        };
        let params = codec().build_search_params(&filters);
        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                "location",
                "brand",
                "model",
                "minYear",
                "maxYear",
                "minPrice",
                "maxPrice",
                "minMileage",
                "maxMileage",
                "transmissionId",
                "fuelTypeId",
                "bodyStyleId",
                "sellerTypeId",
            ]
        );
        assert_eq!(params.get("maxPrice"), Some("2500.5"));
    }

    #[test]
    fn test_round_trip_valid_filters() {
        let filters = FilterUrlParams {
            location: Some("homs".to_string()),
            brands: slugs(&["toyota", "land-rover"]),
            models: slugs(&["corolla"]),
            min_year: Some(2001),
            max_year: Some(2026),
            min_price: Some(0.0),
            max_price: Some(15000.75),
            min_mileage: Some(100),
            max_mileage: Some(200000),
            transmission_id: Some(2),
            fuel_type_id: Some(1),
            body_style_id: Some(7),
            seller_type_id: Some(3),
        };
        let codec = codec();
        let parsed = codec.parse_search_params(&codec.build_search_params(&filters));
        assert_eq!(parsed, filters);
    }

    #[test]
    fn test_parse_drops_invalid_values() {
        let parsed = codec().parse_query("?minYear=1800&maxYear=abc&minPrice=-1&transmissionId=0&brand=kia&brand=");
        assert_eq!(
            parsed,
            FilterUrlParams {
                brands: slugs(&["kia"]),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_parse_repeated_and_escaped_slugs() {
        let parsed = codec().parse_query("brand=mercedes-benz&brand=bmw&model=c%20class&location=rif+dimashq");
        assert_eq!(parsed.brands, slugs(&["mercedes-benz", "bmw"]));
        assert_eq!(parsed.models, slugs(&["c class"]));
        assert_eq!(parsed.location.as_deref(), Some("rif dimashq"));
    }

    #[test]
    fn test_parse_legacy_comma_list() {
        let parsed = codec().parse_query("brands=kia,%20hyundai,&models=rio");
        assert_eq!(parsed.brands, slugs(&["kia", "hyundai"]));
        assert_eq!(parsed.models, slugs(&["rio"]));

        let repeated_wins = codec().parse_query("brand=bmw&brands=kia");
        assert_eq!(repeated_wins.brands, slugs(&["bmw"]));
    }

    #[test]
    fn test_count_active_filters_counts_groups() {
        let filters = FilterUrlParams {
            min_year: Some(2020),
            max_year: Some(2024),
            min_price: Some(10000.0),
            ..Default::default()
        };
        assert_eq!(count_active_filters(&filters), 2);
        assert!(has_active_filters(&filters));
        assert!(!has_active_filters(&FilterUrlParams::default()));
    }

    #[test]
    fn test_count_brands_and_models_separately() {
        let filters = FilterUrlParams {
            location: Some("damascus".to_string()),
            brands: slugs(&["kia", "bmw"]),
            models: slugs(&["rio"]),
            seller_type_id: Some(1),
            ..Default::default()
        };
        assert_eq!(filters.count_active_filters(), 4);
    }

    #[test]
    fn test_blank_values_are_not_counted() {
        let filters = FilterUrlParams {
            location: Some("  ".to_string()),
            brands: slugs(&[""]),
            models: slugs(&[" ", "rio"]),
            ..Default::default()
        };
        assert_eq!(filters.count_active_filters(), 1);
        assert_eq!(codec().build_search_url(&filters), "/search?model=rio");

        let blank = FilterUrlParams {
            location: Some(String::new()),
            brands: slugs(&["  "]),
            ..Default::default()
        };
        assert!(!blank.has_active_filters());
        assert_eq!(codec().build_search_url(&blank), "/search");
    }

    #[test]
    fn test_narrowing_skips_blank_location() {
        let filters = AdvancedSearchFilters {
            locations: Some(vec![" ".into(), "homs".into()]),
            ..Default::default()
        };
        assert_eq!(FilterUrlParams::from(&filters).location.as_deref(), Some("homs"));
    }

    #[test]
    fn test_narrowing_from_full_model() {
        let filters = AdvancedSearchFilters {
            locations: Some(vec!["latakia".into(), "tartus".into()]),
            seller_type_ids: Some(vec![2, 5]),
            doors: Some(4),
            ..Default::default()
        };
        let params = FilterUrlParams::from(&filters);
        assert_eq!(params.location.as_deref(), Some("latakia"));
        assert_eq!(params.seller_type_id, Some(2));

        let widened = params.into_filters();
        assert_eq!(widened.locations, Some(vec!["latakia".to_string()]));
        assert_eq!(widened.doors, None);
    }

    #[test]
    fn test_validate_through_codec() {
        let filters = FilterUrlParams {
            min_price: Some(50000.0),
            max_price: Some(10000.0),
            ..Default::default()
        };
        let report = codec().validate_filters(&filters);
        assert!(!report.is_valid);
        assert_eq!(
            report.errors,
            vec!["Minimum price cannot be greater than maximum price".to_string()]
        );
    }

    #[test]
    fn test_custom_search_path() {
        let codec = codec().with_search_path("/ar/search");
        let filters = FilterUrlParams {
            body_style_id: Some(2),
            ..Default::default()
        };
        assert_eq!(codec.build_search_url(&filters), "/ar/search?bodyStyleId=2");
    }
}
