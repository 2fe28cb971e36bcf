//! Typed descriptors for every filter field.
//!
//! The reducer's input coercion and the URL codec's validity checks both read
//! from this table, so the two can never disagree about which fields are
//! numeric, which are slug lists, or which values are acceptable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::group::FilterGroup;

/// Earliest manufacture year the marketplace knows about.
pub const FLOOR_YEAR: i64 = 1900;

/// A single field of [`AdvancedSearchFilters`](crate::AdvancedSearchFilters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterField {
    Brands,
    Models,
    MinYear,
    MaxYear,
    MinPrice,
    MaxPrice,
    MinMileage,
    MaxMileage,
    Locations,
    ConditionId,
    TransmissionId,
    FuelTypeId,
    BodyStyleId,
    SellerTypeIds,
    ExteriorColor,
    Doors,
    Cylinders,
}

impl FilterField {
    /// Every field, in model declaration order.
    pub const ALL: [FilterField; 17] = [
        FilterField::Brands,
        FilterField::Models,
        FilterField::MinYear,
        FilterField::MaxYear,
        FilterField::MinPrice,
        FilterField::MaxPrice,
        FilterField::MinMileage,
        FilterField::MaxMileage,
        FilterField::Locations,
        FilterField::ConditionId,
        FilterField::TransmissionId,
        FilterField::FuelTypeId,
        FilterField::BodyStyleId,
        FilterField::SellerTypeIds,
        FilterField::ExteriorColor,
        FilterField::Doors,
        FilterField::Cylinders,
    ];

    /// The camelCase name used by the frontend and in JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterField::Brands => "brands",
            FilterField::Models => "models",
            FilterField::MinYear => "minYear",
            FilterField::MaxYear => "maxYear",
            FilterField::MinPrice => "minPrice",
            FilterField::MaxPrice => "maxPrice",
            FilterField::MinMileage => "minMileage",
            FilterField::MaxMileage => "maxMileage",
            FilterField::Locations => "locations",
            FilterField::ConditionId => "conditionId",
            FilterField::TransmissionId => "transmissionId",
            FilterField::FuelTypeId => "fuelTypeId",
            FilterField::BodyStyleId => "bodyStyleId",
            FilterField::SellerTypeIds => "sellerTypeIds",
            FilterField::ExteriorColor => "exteriorColor",
            FilterField::Doors => "doors",
            FilterField::Cylinders => "cylinders",
        }
    }

    /// Value shape stored for this field.
    pub fn kind(&self) -> FieldKind {
        match self {
            FilterField::Brands | FilterField::Models | FilterField::Locations => {
                FieldKind::SlugList
            }
            FilterField::MinPrice | FilterField::MaxPrice => FieldKind::Number,
            FilterField::SellerTypeIds => FieldKind::IntegerList,
            FilterField::ExteriorColor => FieldKind::Text,
            FilterField::MinYear
            | FilterField::MaxYear
            | FilterField::MinMileage
            | FilterField::MaxMileage
            | FilterField::ConditionId
            | FilterField::TransmissionId
            | FilterField::FuelTypeId
            | FilterField::BodyStyleId
            | FilterField::Doors
            | FilterField::Cylinders => FieldKind::Integer,
        }
    }

    /// Rule a numeric value must pass to be written into a URL.
    pub fn validity(&self) -> Validity {
        match self {
            FilterField::MinYear => Validity::AfterFloorYear,
            FilterField::MaxYear => Validity::NotAfterNextYear,
            FilterField::MinPrice
            | FilterField::MaxPrice
            | FilterField::MinMileage
            | FilterField::MaxMileage => Validity::NonNegative,
            FilterField::ConditionId
            | FilterField::TransmissionId
            | FilterField::FuelTypeId
            | FilterField::BodyStyleId
            | FilterField::SellerTypeIds => Validity::Positive,
            _ => Validity::Any,
        }
    }

    /// Query-string key, or `None` for fields that never appear in URLs.
    pub fn url_key(&self) -> Option<&'static str> {
        match self {
            FilterField::Brands => Some("brand"),
            FilterField::Models => Some("model"),
            FilterField::Locations => Some("location"),
            FilterField::SellerTypeIds => Some("sellerTypeId"),
            FilterField::MinYear
            | FilterField::MaxYear
            | FilterField::MinPrice
            | FilterField::MaxPrice
            | FilterField::MinMileage
            | FilterField::MaxMileage
            | FilterField::TransmissionId
            | FilterField::FuelTypeId
            | FilterField::BodyStyleId => Some(self.as_str()),
            FilterField::ConditionId
            | FilterField::ExteriorColor
            | FilterField::Doors
            | FilterField::Cylinders => None,
        }
    }

    /// The pill group this field belongs to, if any.
    ///
    /// This is the only place group membership is defined;
    /// [`FilterGroup::fields`] is derived from it.
    pub fn group(&self) -> Option<FilterGroup> {
        match self {
            FilterField::Brands | FilterField::Models => Some(FilterGroup::MakeModel),
            FilterField::MinYear | FilterField::MaxYear => Some(FilterGroup::Year),
            FilterField::MinPrice | FilterField::MaxPrice => Some(FilterGroup::Price),
            FilterField::MinMileage | FilterField::MaxMileage => Some(FilterGroup::Mileage),
            FilterField::Locations => Some(FilterGroup::Location),
            FilterField::TransmissionId => Some(FilterGroup::Transmission),
            FilterField::FuelTypeId => Some(FilterGroup::FuelType),
            FilterField::BodyStyleId => Some(FilterGroup::BodyStyle),
            FilterField::SellerTypeIds => Some(FilterGroup::SellerType),
            FilterField::ConditionId
            | FilterField::ExteriorColor
            | FilterField::Doors
            | FilterField::Cylinders => None,
        }
    }

    /// For a range bound, the opposite bound of the same range.
    pub fn opposite_bound(&self) -> Option<FilterField> {
        match self {
            FilterField::MinYear => Some(FilterField::MaxYear),
            FilterField::MaxYear => Some(FilterField::MinYear),
            FilterField::MinPrice => Some(FilterField::MaxPrice),
            FilterField::MaxPrice => Some(FilterField::MinPrice),
            FilterField::MinMileage => Some(FilterField::MaxMileage),
            FilterField::MaxMileage => Some(FilterField::MinMileage),
            _ => None,
        }
    }

    /// Whether this is the lower end of a range.
    pub fn is_lower_bound(&self) -> bool {
        matches!(
            self,
            FilterField::MinYear | FilterField::MinPrice | FilterField::MinMileage
        )
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterField {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| SearchError::UnknownField(s.to_string()))
    }
}

/// Storage shape of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Ordered list of slug strings.
    SlugList,
    /// Whole number.
    Integer,
    /// Any finite number.
    Number,
    /// Free text, compared by equality.
    Text,
    /// List of entity IDs.
    IntegerList,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::SlugList => "a list of slugs",
            FieldKind::Integer => "an integer",
            FieldKind::Number => "a number",
            FieldKind::Text => "text",
            FieldKind::IntegerList => "a list of integers",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Acceptance rule for a numeric field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Validity {
    /// No constraint beyond being finite.
    Any,
    /// Strictly after [`FLOOR_YEAR`].
    AfterFloorYear,
    /// No later than next year.
    NotAfterNextYear,
    /// Zero or more.
    NonNegative,
    /// Strictly positive (entity IDs).
    Positive,
}

impl Validity {
    /// Check a value against this rule.
    pub fn accepts(&self, value: f64, current_year: i32) -> bool {
        if !value.is_finite() {
            return false;
        }
        match self {
            Validity::Any => true,
            Validity::AfterFloorYear => value > FLOOR_YEAR as f64,
            Validity::NotAfterNextYear => value <= f64::from(current_year) + 1.0,
            Validity::NonNegative => value >= 0.0,
            Validity::Positive => value > 0.0,
        }
    }
}

/// A typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Slugs(Vec<String>),
    Integer(i64),
    Number(f64),
    Text(String),
    Integers(Vec<i64>),
}

impl FieldValue {
    /// Reshape this value for a field kind.
    ///
    /// Only lossless conversions are made (an integer becomes a number, a
    /// whole number becomes an integer, a single slug becomes a list). Text
    /// is never parsed here; that is the reducer's job.
    pub fn conform(self, kind: FieldKind) -> Option<FieldValue> {
        match (self, kind) {
            (FieldValue::Slugs(slugs), FieldKind::SlugList) => Some(FieldValue::Slugs(slugs)),
            (FieldValue::Text(slug), FieldKind::SlugList) => Some(FieldValue::Slugs(vec![slug])),
            (FieldValue::Integer(n), FieldKind::Integer) => Some(FieldValue::Integer(n)),
            (FieldValue::Number(n), FieldKind::Integer) if n.is_finite() && n.fract() == 0.0 => {
                Some(FieldValue::Integer(n as i64))
            }
            (FieldValue::Integer(n), FieldKind::Number) => Some(FieldValue::Number(n as f64)),
            (FieldValue::Number(n), FieldKind::Number) if n.is_finite() => {
                Some(FieldValue::Number(n))
            }
            (FieldValue::Text(text), FieldKind::Text) => Some(FieldValue::Text(text)),
            (FieldValue::Integers(ids), FieldKind::IntegerList) => Some(FieldValue::Integers(ids)),
            (FieldValue::Integer(id), FieldKind::IntegerList) => {
                Some(FieldValue::Integers(vec![id]))
            }
            _ => None,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(slugs: Vec<String>) -> Self {
        FieldValue::Slugs(slugs)
    }
}

impl From<Vec<i64>> for FieldValue {
    fn from(ids: Vec<i64>) -> Self {
        FieldValue::Integers(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for field in FilterField::ALL {
            assert_eq!(field.as_str().parse::<FilterField>(), Ok(field));
        }
        assert_eq!(
            "colour".parse::<FilterField>(),
            Err(SearchError::UnknownField("colour".to_string()))
        );
    }

    #[test]
    fn test_opposite_bounds_pair_up() {
        for field in FilterField::ALL {
            if let Some(other) = field.opposite_bound() {
                assert_eq!(other.opposite_bound(), Some(field));
                assert_ne!(field.is_lower_bound(), other.is_lower_bound());
                assert_eq!(field.group(), other.group());
            }
        }
    }

    #[test]
    fn test_year_validity() {
        assert!(!Validity::AfterFloorYear.accepts(1900.0, 2025));
        assert!(Validity::AfterFloorYear.accepts(1901.0, 2025));
        assert!(Validity::NotAfterNextYear.accepts(2026.0, 2025));
        assert!(!Validity::NotAfterNextYear.accepts(2027.0, 2025));
        assert!(!Validity::NonNegative.accepts(f64::NAN, 2025));
        assert!(!Validity::Positive.accepts(0.0, 2025));
    }

    #[test]
    fn test_conform() {
        assert_eq!(
            FieldValue::Number(2020.0).conform(FieldKind::Integer),
            Some(FieldValue::Integer(2020))
        );
        assert_eq!(FieldValue::Number(2020.5).conform(FieldKind::Integer), None);
        assert_eq!(
            FieldValue::Text("toyota".into()).conform(FieldKind::SlugList),
            Some(FieldValue::Slugs(vec!["toyota".into()]))
        );
        assert_eq!(FieldValue::Text("5".into()).conform(FieldKind::Integer), None);
        assert_eq!(
            FieldValue::Integer(3).conform(FieldKind::IntegerList),
            Some(FieldValue::Integers(vec![3]))
        );
    }

    #[test]
    fn test_url_keys_only_for_codec_fields() {
        assert_eq!(FilterField::Brands.url_key(), Some("brand"));
        assert_eq!(FilterField::SellerTypeIds.url_key(), Some("sellerTypeId"));
        assert_eq!(FilterField::Doors.url_key(), None);
    }
}
