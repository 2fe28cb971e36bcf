//! Named filter groups.
//!
//! The UI shows filters as compound pills: one "Price" pill governs both
//! price bounds. Clearing, the active check and the display text all go
//! through [`FilterGroup::fields`], so they always agree on which fields
//! make up a group.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::field::FilterField;
use crate::model::AdvancedSearchFilters;

/// A named group of related filter fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterGroup {
    MakeModel,
    Price,
    Year,
    Mileage,
    Transmission,
    FuelType,
    BodyStyle,
    SellerType,
    Location,
    /// Every field.
    AllFilters,
}

impl FilterGroup {
    pub const ALL: [FilterGroup; 10] = [
        FilterGroup::MakeModel,
        FilterGroup::Price,
        FilterGroup::Year,
        FilterGroup::Mileage,
        FilterGroup::Transmission,
        FilterGroup::FuelType,
        FilterGroup::BodyStyle,
        FilterGroup::SellerType,
        FilterGroup::Location,
        FilterGroup::AllFilters,
    ];

    /// Groups shown as pills, in display order.
    pub const PILLS: [FilterGroup; 9] = [
        FilterGroup::MakeModel,
        FilterGroup::Location,
        FilterGroup::Price,
        FilterGroup::Year,
        FilterGroup::Mileage,
        FilterGroup::Transmission,
        FilterGroup::FuelType,
        FilterGroup::BodyStyle,
        FilterGroup::SellerType,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterGroup::MakeModel => "makeModel",
            FilterGroup::Price => "price",
            FilterGroup::Year => "year",
            FilterGroup::Mileage => "mileage",
            FilterGroup::Transmission => "transmission",
            FilterGroup::FuelType => "fuelType",
            FilterGroup::BodyStyle => "bodyStyle",
            FilterGroup::SellerType => "sellerType",
            FilterGroup::Location => "location",
            FilterGroup::AllFilters => "allFilters",
        }
    }

    /// Whether `field` belongs to this group.
    pub fn contains(&self, field: FilterField) -> bool {
        match self {
            FilterGroup::AllFilters => true,
            group => field.group() == Some(*group),
        }
    }

    /// The fields making up this group.
    pub fn fields(self) -> impl Iterator<Item = FilterField> {
        FilterField::ALL
            .into_iter()
            .filter(move |field| self.contains(*field))
    }

    /// Lower and upper bound fields for range groups.
    pub fn range(&self) -> Option<(FilterField, FilterField)> {
        match self {
            FilterGroup::Price => Some((FilterField::MinPrice, FilterField::MaxPrice)),
            FilterGroup::Year => Some((FilterField::MinYear, FilterField::MaxYear)),
            FilterGroup::Mileage => Some((FilterField::MinMileage, FilterField::MaxMileage)),
            _ => None,
        }
    }

    /// True iff any field of the group is set.
    pub fn is_active(&self, filters: &AdvancedSearchFilters) -> bool {
        self.fields().any(|field| filters.is_set(field))
    }

    /// Clear every field of the group.
    pub fn clear(&self, filters: &mut AdvancedSearchFilters) {
        for field in self.fields() {
            filters.clear(field);
        }
    }
}

impl fmt::Display for FilterGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterGroup {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterGroup::ALL
            .iter()
            .copied()
            .find(|group| group.as_str() == s)
            .ok_or_else(|| SearchError::UnknownGroup(s.to_string()))
    }
}
