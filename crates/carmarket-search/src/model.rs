//! The advanced search filter model.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SearchError;
use crate::field::{FieldValue, FilterField};

/// Filters a buyer can apply to the listings search.
///
/// A present field means the filter is active. Empty lists and blank text
/// are never stored: every write path normalizes them to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedSearchFilters {
    /// Selected makes, by slug.
    #[serde(
        default,
        deserialize_with = "deserialize_slugs",
        skip_serializing_if = "Option::is_none"
    )]
    pub brands: Option<Vec<String>>,
    /// Selected models, by slug.
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
    /// Selected governorates, by slug.
    #[serde(
        default,
        deserialize_with = "deserialize_slugs",
        skip_serializing_if = "Option::is_none"
    )]
    pub locations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transmission_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_type_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_style_id: Option<i64>,
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub seller_type_ids: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exterior_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doors: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cylinders: Option<i64>,
}

impl AdvancedSearchFilters {
    /// Create an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no filter is active.
    pub fn is_empty(&self) -> bool {
        !FilterField::ALL.iter().any(|field| self.is_set(*field))
    }

    /// Fields currently set, in declaration order.
    pub fn active_fields(&self) -> Vec<FilterField> {
        FilterField::ALL
            .iter()
            .copied()
            .filter(|field| self.is_set(*field))
            .collect()
    }

    /// Check whether a field is active.
    pub fn is_set(&self, field: FilterField) -> bool {
        match field {
            FilterField::Brands => has_items(&self.brands),
            FilterField::Models => has_items(&self.models),
            FilterField::Locations => has_items(&self.locations),
            FilterField::SellerTypeIds => has_items(&self.seller_type_ids),
            FilterField::ExteriorColor => self
                .exterior_color
                .as_deref()
                .is_some_and(|color| !color.trim().is_empty()),
            FilterField::MinPrice => self.min_price.is_some(),
            FilterField::MaxPrice => self.max_price.is_some(),
            _ => self.integer(field).is_some(),
        }
    }

    /// Read a field as a typed value.
    pub fn get(&self, field: FilterField) -> Option<FieldValue> {
        if !self.is_set(field) {
            return None;
        }
        match field {
            FilterField::Brands => self.brands.clone().map(FieldValue::Slugs),
            FilterField::Models => self.models.clone().map(FieldValue::Slugs),
            FilterField::Locations => self.locations.clone().map(FieldValue::Slugs),
            FilterField::SellerTypeIds => self.seller_type_ids.clone().map(FieldValue::Integers),
            FilterField::ExteriorColor => self.exterior_color.clone().map(FieldValue::Text),
            FilterField::MinPrice => self.min_price.map(FieldValue::Number),
            FilterField::MaxPrice => self.max_price.map(FieldValue::Number),
            _ => self.integer(field).map(FieldValue::Integer),
        }
    }

    /// Numeric view of a scalar field, used for range comparisons.
    pub fn numeric(&self, field: FilterField) -> Option<f64> {
        match self.get(field)? {
            FieldValue::Integer(n) => Some(n as f64),
            FieldValue::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Set a field.
    ///
    /// The value is reshaped to the field's kind when that is lossless. Slugs
    /// are trimmed and blank ones dropped; an empty list or blank text clears
    /// the field instead.
    pub fn set(&mut self, field: FilterField, value: FieldValue) -> Result<(), SearchError> {
        let kind = field.kind();
        let value = value.conform(kind).ok_or(SearchError::KindMismatch {
            field,
            expected: kind,
        })?;

        match value {
            FieldValue::Slugs(slugs) => {
                let slugs = normalize_slugs(Some(slugs));
                match field {
                    FilterField::Brands => self.brands = slugs,
                    FilterField::Models => self.models = slugs,
                    _ => self.locations = slugs,
                }
            }
            FieldValue::Integers(ids) => {
                self.seller_type_ids = (!ids.is_empty()).then_some(ids);
            }
            FieldValue::Text(text) => {
                self.exterior_color = (!text.trim().is_empty()).then_some(text);
            }
            FieldValue::Number(n) => match field {
                FilterField::MinPrice => self.min_price = Some(n),
                _ => self.max_price = Some(n),
            },
            FieldValue::Integer(n) => {
                if let Some(slot) = self.integer_slot(field) {
                    *slot = Some(n);
                }
            }
        }
        Ok(())
    }

    /// Remove a field.
    pub fn clear(&mut self, field: FilterField) {
        match field {
            FilterField::Brands => self.brands = None,
            FilterField::Models => self.models = None,
            FilterField::Locations => self.locations = None,
            FilterField::SellerTypeIds => self.seller_type_ids = None,
            FilterField::ExteriorColor => self.exterior_color = None,
            FilterField::MinPrice => self.min_price = None,
            FilterField::MaxPrice => self.max_price = None,
            _ => {
                if let Some(slot) = self.integer_slot(field) {
                    *slot = None;
                }
            }
        }
    }

    /// Apply a bulk patch.
    ///
    /// Entries are applied in order. Entries whose value has the wrong shape
    /// are skipped and returned so the caller can report them.
    pub fn apply_patch(&mut self, patch: &FilterPatch) -> Vec<SearchError> {
        let mut rejected = Vec::new();
        for (field, value) in patch.entries() {
            match value {
                Some(value) => {
                    if let Err(e) = self.set(*field, value.clone()) {
                        rejected.push(e);
                    }
                }
                None => self.clear(*field),
            }
        }
        rejected
    }

    fn integer(&self, field: FilterField) -> Option<i64> {
        match field {
            FilterField::MinYear => self.min_year,
            FilterField::MaxYear => self.max_year,
            FilterField::MinMileage => self.min_mileage,
            FilterField::MaxMileage => self.max_mileage,
            FilterField::ConditionId => self.condition_id,
            FilterField::TransmissionId => self.transmission_id,
            FilterField::FuelTypeId => self.fuel_type_id,
            FilterField::BodyStyleId => self.body_style_id,
            FilterField::Doors => self.doors,
            FilterField::Cylinders => self.cylinders,
            _ => None,
        }
    }

    fn integer_slot(&mut self, field: FilterField) -> Option<&mut Option<i64>> {
        match field {
            FilterField::MinYear => Some(&mut self.min_year),
            FilterField::MaxYear => Some(&mut self.max_year),
            FilterField::MinMileage => Some(&mut self.min_mileage),
            FilterField::MaxMileage => Some(&mut self.max_mileage),
            FilterField::ConditionId => Some(&mut self.condition_id),
            FilterField::TransmissionId => Some(&mut self.transmission_id),
            FilterField::FuelTypeId => Some(&mut self.fuel_type_id),
            FilterField::BodyStyleId => Some(&mut self.body_style_id),
            FilterField::Doors => Some(&mut self.doors),
            FilterField::Cylinders => Some(&mut self.cylinders),
            _ => None,
        }
    }
}

/// A partial update for [`AdvancedSearchFilters`].
///
/// `Some(value)` sets the field, `None` clears it, and fields the patch does
/// not mention are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPatch {
    entries: Vec<(FilterField, Option<FieldValue>)>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field.
    pub fn set(mut self, field: FilterField, value: impl Into<FieldValue>) -> Self {
        self.entries.push((field, Some(value.into())));
        self
    }

    /// Clear a field.
    pub fn unset(mut self, field: FilterField) -> Self {
        self.entries.push((field, None));
        self
    }

    /// A patch that sets every active field of `filters`.
    pub fn from_filters(filters: &AdvancedSearchFilters) -> Self {
        let entries = FilterField::ALL
            .iter()
            .filter_map(|field| filters.get(*field).map(|value| (*field, Some(value))))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[(FilterField, Option<FieldValue>)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Trim every slug and drop the blank ones. `None` when nothing is left.
pub fn normalize_slugs(slugs: Option<Vec<String>>) -> Option<Vec<String>> {
    let slugs: Vec<String> = slugs?
        .into_iter()
        .map(|slug| slug.trim().to_string())
        .filter(|slug| !slug.is_empty())
        .collect();
    (!slugs.is_empty()).then_some(slugs)
}

fn has_items<T>(list: &Option<Vec<T>>) -> bool {
    list.as_ref().is_some_and(|items| !items.is_empty())
}

/// Deserialize a list, mapping `[]` to `None`.
pub(crate) fn non_empty<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let list = Option::<Vec<T>>::deserialize(deserializer)?;
    Ok(list.filter(|items| !items.is_empty()))
}

/// Deserialize a slug list, normalized like [`normalize_slugs`].
pub(crate) fn deserialize_slugs<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(normalize_slugs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_list_clears() {
        let mut filters = AdvancedSearchFilters::new();
        filters
            .set(FilterField::Brands, FieldValue::Slugs(vec!["kia".into()]))
            .unwrap();
        assert!(filters.is_set(FilterField::Brands));

        filters
            .set(FilterField::Brands, FieldValue::Slugs(Vec::new()))
            .unwrap();
        assert_eq!(filters.brands, None);
        assert!(filters.is_empty());
    }

    #[test]
    fn test_set_trims_and_drops_blank_slugs() {
        let mut filters = AdvancedSearchFilters::new();
        let patch = FilterPatch::new()
            .set(FilterField::Locations, vec!["".to_string(), " damascus ".to_string()])
            .set(FilterField::Brands, vec![" ".to_string()]);
        assert!(filters.apply_patch(&patch).is_empty());

        assert_eq!(filters.locations, Some(vec!["damascus".to_string()]));
        assert_eq!(filters.brands, None);
        assert_eq!(filters.active_fields(), vec![FilterField::Locations]);
    }

    #[test]
    fn test_set_rejects_wrong_shape() {
        let mut filters = AdvancedSearchFilters::new();
        let err = filters
            .set(FilterField::MinYear, FieldValue::Text("2020".into()))
            .unwrap_err();
        assert!(matches!(err, SearchError::KindMismatch { field: FilterField::MinYear, .. }));
        assert_eq!(filters.min_year, None);
    }

    #[test]
    fn test_get_reflects_set() {
        let mut filters = AdvancedSearchFilters::new();
        for (field, value) in [
            (FilterField::MinPrice, FieldValue::Number(5000.0)),
            (FilterField::Doors, FieldValue::Integer(4)),
            (FilterField::ExteriorColor, FieldValue::Text("white".into())),
            (FilterField::SellerTypeIds, FieldValue::Integers(vec![1, 2])),
        ] {
            filters.set(field, value.clone()).unwrap();
            assert_eq!(filters.get(field), Some(value));
        }
        assert_eq!(
            filters.active_fields(),
            vec![
                FilterField::MinPrice,
                FilterField::SellerTypeIds,
                FilterField::ExteriorColor,
                FilterField::Doors,
            ]
        );
    }

    #[test]
    fn test_patch_sets_and_clears() {
        let mut filters = AdvancedSearchFilters {
            min_price: Some(1000.0),
            max_price: Some(9000.0),
            ..Default::default()
        };
        let patch = FilterPatch::new()
            .set(FilterField::MinYear, FieldValue::Integer(2018))
            .unset(FilterField::MaxPrice);
        let rejected = filters.apply_patch(&patch);

        assert!(rejected.is_empty());
        assert_eq!(filters.min_year, Some(2018));
        assert_eq!(filters.min_price, Some(1000.0));
        assert_eq!(filters.max_price, None);
    }

    #[test]
    fn test_json_shape() {
        let filters: AdvancedSearchFilters =
            serde_json::from_str(r#"{"brands":[],"models":[" "],"minYear":2020,"sellerTypeIds":[2]}"#)
                .unwrap();
        assert_eq!(filters.brands, None);
        assert_eq!(filters.models, None);
        assert_eq!(filters.min_year, Some(2020));

        let json = serde_json::to_string(&filters).unwrap();
        assert_eq!(json, r#"{"minYear":2020,"sellerTypeIds":[2]}"#);
    }
}
