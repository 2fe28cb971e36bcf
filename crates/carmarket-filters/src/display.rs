//! Human-readable summaries of active filters.

use carmarket_search::{AdvancedSearchFilters, FieldValue, FilterGroup};
use serde::Serialize;

use crate::locale::{Labels, Locale};
use crate::reducer::active_group_count;
use crate::reference::{EntityKind, ReferenceData};

/// One active pill, as rendered by the chips and pills bars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterChip {
    pub group: FilterGroup,
    pub label: String,
}

/// Renders display text for filter groups.
///
/// Unresolvable slugs fall back to the slug itself; unresolvable IDs are
/// skipped, and a group with nothing left to show gets its placeholder.
/// The text is never empty.
pub struct FilterDisplay<'a, R: ?Sized> {
    reference: &'a R,
    labels: &'a Labels,
    locale: Locale,
}

impl<'a, R: ReferenceData + ?Sized> FilterDisplay<'a, R> {
    pub fn new(reference: &'a R, labels: &'a Labels, locale: Locale) -> Self {
        Self {
            reference,
            labels,
            locale,
        }
    }

    /// Summary of a group, or its placeholder when inactive.
    pub fn display_text(&self, filters: &AdvancedSearchFilters, group: FilterGroup) -> String {
        let text = match group {
            FilterGroup::MakeModel => self.make_model_text(filters),
            FilterGroup::Price | FilterGroup::Year | FilterGroup::Mileage => {
                self.range_text(filters, group)
            }
            FilterGroup::Transmission | FilterGroup::FuelType | FilterGroup::BodyStyle => {
                self.single_entity_text(filters, group)
            }
            FilterGroup::SellerType => self.seller_type_text(filters),
            FilterGroup::Location => self.location_text(filters),
            FilterGroup::AllFilters => match active_group_count(filters) {
                0 => None,
                count => Some(self.labels.count(count)),
            },
        };
        text.filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.labels.placeholder(group).to_string())
    }

    /// One chip per active pill group, in display order.
    pub fn chips(&self, filters: &AdvancedSearchFilters) -> Vec<FilterChip> {
        FilterGroup::PILLS
            .iter()
            .filter(|group| group.is_active(filters))
            .map(|group| FilterChip {
                group: *group,
                label: self.display_text(filters, *group),
            })
            .collect()
    }

    pub fn make_name(&self, slug: &str) -> String {
        self.reference
            .make(slug)
            .map(|make| make.name.get(self.locale).to_string())
            .unwrap_or_else(|| slug.to_string())
    }

    pub fn model_name(&self, slug: &str) -> String {
        self.reference
            .model(slug)
            .map(|model| model.name.get(self.locale).to_string())
            .unwrap_or_else(|| slug.to_string())
    }

    pub fn location_name(&self, slug: &str) -> String {
        self.reference
            .location(slug)
            .map(|location| location.name.get(self.locale).to_string())
            .unwrap_or_else(|| slug.to_string())
    }

    pub fn entity_name(&self, kind: EntityKind, id: i64) -> Option<String> {
        self.reference
            .entity(kind, id)
            .map(|entity| entity.name.get(self.locale).to_string())
    }

    fn make_model_text(&self, filters: &AdvancedSearchFilters) -> Option<String> {
        let separator = &self.labels.list_separator;
        let brands = join_names(filters.brands.as_deref(), |slug| self.make_name(slug), separator);
        let models = join_names(filters.models.as_deref(), |slug| self.model_name(slug), separator);
        let parts: Vec<String> = [brands, models].into_iter().flatten().collect();
        (!parts.is_empty()).then(|| parts.join(&self.labels.group_separator))
    }

    fn location_text(&self, filters: &AdvancedSearchFilters) -> Option<String> {
        join_names(
            filters.locations.as_deref(),
            |slug| self.location_name(slug),
            &self.labels.list_separator,
        )
    }

    fn range_text(&self, filters: &AdvancedSearchFilters, group: FilterGroup) -> Option<String> {
        let (lower, upper) = group.range()?;
        let min = filters.numeric(lower).map(|v| self.format_bound(group, v));
        let max = filters.numeric(upper).map(|v| self.format_bound(group, v));
        match (min, max) {
            (Some(min), Some(max)) => {
                Some(format!("{}{}{}", min, self.labels.range_separator, max))
            }
            (Some(min), None) => Some(self.labels.from_value(&min)),
            (None, Some(max)) => Some(self.labels.up_to_value(&max)),
            (None, None) => None,
        }
    }

    fn format_bound(&self, group: FilterGroup, value: f64) -> String {
        match group {
            FilterGroup::Price => {
                format!("{}{}", self.labels.currency_symbol, self.labels.grouped(value))
            }
            FilterGroup::Mileage => {
                format!("{} {}", self.labels.grouped(value), self.labels.mileage_unit)
            }
            _ => value.to_string(),
        }
    }

    fn single_entity_text(
        &self,
        filters: &AdvancedSearchFilters,
        group: FilterGroup,
    ) -> Option<String> {
        let kind = EntityKind::for_group(group)?;
        let id = group.fields().find_map(|field| match filters.get(field)? {
            FieldValue::Integer(id) => Some(id),
            _ => None,
        })?;
        self.entity_name(kind, id)
    }

    fn seller_type_text(&self, filters: &AdvancedSearchFilters) -> Option<String> {
        let ids = filters.seller_type_ids.as_deref()?;
        let names: Vec<String> = ids
            .iter()
            .filter_map(|id| self.reference.entity(EntityKind::SellerType, *id))
            .map(|seller| {
                let name = seller.name.get(self.locale);
                match seller.listing_count {
                    Some(count) => format!("{} ({})", name, count),
                    None => name.to_string(),
                }
            })
            .collect();
        (!names.is_empty()).then(|| names.join(&self.labels.list_separator))
    }
}

fn join_names(
    slugs: Option<&[String]>,
    name: impl Fn(&str) -> String,
    separator: &str,
) -> Option<String> {
    let slugs = slugs.filter(|s| !s.is_empty())?;
    Some(
        slugs
            .iter()
            .map(|slug| name(slug))
            .collect::<Vec<_>>()
            .join(separator),
    )
}
