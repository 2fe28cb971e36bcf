//! The search filters controller.
//!
//! [`SearchFilters`] owns the one canonical [`FilterState`] for a search page
//! and is what the filter bars, modals and dropdowns talk to. Every change
//! goes through [`SearchFilters::dispatch`]; the URL, the display text and
//! the listings fetch are all derived from the committed state.

use std::fmt;

use carmarket_search::{
    AdvancedSearchFilters, FieldValue, FilterField, FilterGroup, FilterPatch, FilterUrlParams,
    UrlCodec, ValidationReport,
};
use tracing::{debug, trace};

use crate::config::FilterConfig;
use crate::display::{FilterChip, FilterDisplay};
use crate::locale::{Labels, Locale};
use crate::reducer::{
    active_group_count, is_filter_active, reduce, sync_selection, FieldInput, FilterAction,
    FilterState,
};
use crate::reference::{EntityKind, ReferenceData, ReferenceEntry};

/// Called with the committed filters whenever they change.
pub type FiltersListener = Box<dyn FnMut(&AdvancedSearchFilters)>;

/// Called with the new search URL whenever the filters change.
pub type UrlListener = Box<dyn FnMut(&str)>;

/// Filter state for one search page.
pub struct SearchFilters<R> {
    state: FilterState,
    active_modal: Option<FilterGroup>,
    reference: R,
    labels: Labels,
    locale: Locale,
    codec: UrlCodec,
    on_filters_change: Option<FiltersListener>,
    on_url_change: Option<UrlListener>,
}

impl<R: ReferenceData> SearchFilters<R> {
    /// Empty filters with English labels and today's codec.
    pub fn new(reference: R) -> Self {
        Self {
            state: FilterState::new(),
            active_modal: None,
            reference,
            labels: Labels::english(),
            locale: Locale::En,
            codec: UrlCodec::new(),
            on_filters_change: None,
            on_url_change: None,
        }
    }

    pub fn from_config(reference: R, config: &FilterConfig) -> Self {
        Self {
            labels: config.labels(),
            locale: config.locale,
            codec: config.codec(),
            ..Self::new(reference)
        }
    }

    /// Switch language. Labels are reset to the locale's defaults.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self.labels = Labels::for_locale(locale);
        self
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_codec(mut self, codec: UrlCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Register the listings-fetch listener.
    pub fn on_filters_change(mut self, listener: impl FnMut(&AdvancedSearchFilters) + 'static) -> Self {
        self.on_filters_change = Some(Box::new(listener));
        self
    }

    /// Register the router push listener.
    pub fn on_url_change(mut self, listener: impl FnMut(&str) + 'static) -> Self {
        self.on_url_change = Some(Box::new(listener));
        self
    }

    /// Load the state from the address bar's query string.
    ///
    /// Replaces whatever filters are set. The selected make and model are
    /// derived from the parsed slugs.
    pub fn bootstrap(&mut self, query: &str) {
        let filters = self.codec.parse_query(query).into_filters();
        let patch = FilterField::ALL
            .into_iter()
            .fold(FilterPatch::new(), |patch, field| match filters.get(field) {
                Some(value) => patch.set(field, value),
                None => patch.unset(field),
            });
        debug!(query, "bootstrapping search filters");
        self.dispatch(FilterAction::UpdateFilters(patch));
    }

    /// Run an action through the reducer and commit the result.
    pub fn dispatch(&mut self, action: FilterAction) {
        let name = action.name();
        let mut next = reduce(&self.state, action);
        sync_selection(&self.state, &mut next, &self.reference);

        let changed = next.filters() != self.state.filters();
        debug!(
            action = name,
            changed,
            active = active_group_count(next.filters()),
            "dispatched filter action"
        );
        self.state = next;
        if changed {
            self.commit();
        }
    }

    fn commit(&mut self) {
        let url = self.search_url();
        trace!(url = %url, "pushing search url");
        if let Some(listener) = self.on_url_change.as_mut() {
            listener(&url);
        }
        if let Some(listener) = self.on_filters_change.as_mut() {
            listener(self.state.filters());
        }
    }

    /// Bulk update from a modal or advanced filter form.
    pub fn update_filters_and_state(&mut self, patch: FilterPatch) {
        self.dispatch(FilterAction::UpdateFilters(patch));
    }

    /// Form input changed for one field.
    pub fn handle_input_change(&mut self, field: FilterField, input: impl Into<FieldInput>) {
        self.dispatch(FilterAction::UpdateField {
            field,
            value: input.into(),
        });
    }

    pub fn clear_specific_filter(&mut self, group: FilterGroup) {
        self.dispatch(FilterAction::ClearFilter(group));
    }

    pub fn update_brands(&mut self, brands: Vec<String>, make_id: Option<i64>) {
        self.dispatch(FilterAction::UpdateBrands {
            brands: Some(brands),
            make_id,
        });
    }

    pub fn update_models(&mut self, models: Vec<String>, model_id: Option<i64>) {
        self.dispatch(FilterAction::UpdateModels {
            models: Some(models),
            model_id,
        });
    }

    /// Add or remove a location in the multi-select.
    pub fn toggle_location(&mut self, slug: &str) {
        let slug = slug.trim();
        if slug.is_empty() {
            return;
        }
        let locations = toggled(self.state.filters().locations.as_deref(), slug.to_string());
        self.handle_input_change(FilterField::Locations, FieldInput::List(locations));
    }

    /// Add or remove a seller type.
    pub fn toggle_seller_type(&mut self, id: i64) {
        let ids = toggled(self.state.filters().seller_type_ids.as_deref(), id);
        let patch = if ids.is_empty() {
            FilterPatch::new().unset(FilterField::SellerTypeIds)
        } else {
            FilterPatch::new().set(FilterField::SellerTypeIds, FieldValue::Integers(ids))
        };
        self.update_filters_and_state(patch);
    }

    pub fn reset(&mut self) {
        self.dispatch(FilterAction::ResetFilters);
    }

    pub fn open_modal(&mut self, group: FilterGroup) {
        self.active_modal = Some(group);
    }

    pub fn close_modal(&mut self) {
        self.active_modal = None;
    }

    pub fn active_modal(&self) -> Option<FilterGroup> {
        self.active_modal
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn filters(&self) -> &AdvancedSearchFilters {
        self.state.filters()
    }

    pub fn selected_make(&self) -> Option<i64> {
        self.state.selected_make()
    }

    pub fn selected_model(&self) -> Option<i64> {
        self.state.selected_model()
    }

    pub fn reference(&self) -> &R {
        &self.reference
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn codec(&self) -> &UrlCodec {
        &self.codec
    }

    /// Display helper bound to this controller's labels and locale.
    pub fn display(&self) -> FilterDisplay<'_, R> {
        FilterDisplay::new(&self.reference, &self.labels, self.locale)
    }

    pub fn display_text(&self, group: FilterGroup) -> String {
        self.display().display_text(self.state.filters(), group)
    }

    pub fn is_filter_active(&self, group: FilterGroup) -> bool {
        is_filter_active(self.state.filters(), group)
    }

    pub fn chips(&self) -> Vec<FilterChip> {
        self.display().chips(self.state.filters())
    }

    pub fn active_filter_count(&self) -> usize {
        active_group_count(self.state.filters())
    }

    pub fn url_params(&self) -> FilterUrlParams {
        FilterUrlParams::from(self.state.filters())
    }

    pub fn search_url(&self) -> String {
        self.codec.build_search_url(&self.url_params())
    }

    pub fn validation(&self) -> ValidationReport {
        self.codec.validate_filters(self.state.filters())
    }

    /// Models offered by the dependent dropdown for the selected make.
    pub fn available_models(&self) -> Vec<&ReferenceEntry> {
        match self.state.selected_make() {
            Some(make_id) => self.reference.models_for_make(make_id),
            None => Vec::new(),
        }
    }

    pub fn make_name(&self, slug: &str) -> String {
        self.display().make_name(slug)
    }

    pub fn model_name(&self, slug: &str) -> String {
        self.display().model_name(slug)
    }

    pub fn location_name(&self, slug: &str) -> String {
        self.display().location_name(slug)
    }

    pub fn entity_name(&self, kind: EntityKind, id: i64) -> Option<String> {
        self.display().entity_name(kind, id)
    }
}

impl<R> fmt::Debug for SearchFilters<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchFilters")
            .field("state", &self.state)
            .field("active_modal", &self.active_modal)
            .field("locale", &self.locale)
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

fn toggled<T: PartialEq + Clone>(current: Option<&[T]>, item: T) -> Vec<T> {
    let mut items = current.map(<[T]>::to_vec).unwrap_or_default();
    match items.iter().position(|existing| *existing == item) {
        Some(index) => {
            items.remove(index);
        }
        None => items.push(item),
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{LocalizedName, ReferenceCatalog};
    use pretty_assertions::assert_eq;

    fn controller() -> SearchFilters<ReferenceCatalog> {
        let catalog = ReferenceCatalog::new()
            .with_make(ReferenceEntry::new(1, "toyota", LocalizedName::new("Toyota", "")))
            .with_model(ReferenceEntry::new(10, "corolla", LocalizedName::new("Corolla", "")).with_make(1))
            .with_model(ReferenceEntry::new(11, "camry", LocalizedName::new("Camry", "")).with_make(1));
        SearchFilters::new(catalog).with_codec(UrlCodec::with_current_year(2025))
    }

    #[test]
    fn test_toggle_location() {
        let mut filters = controller();
        filters.toggle_location("damascus");
        filters.toggle_location("aleppo");
        assert_eq!(
            filters.filters().locations,
            Some(vec!["damascus".to_string(), "aleppo".to_string()])
        );

        filters.toggle_location("damascus");
        filters.toggle_location("aleppo");
        assert_eq!(filters.filters().locations, None);
    }

    #[test]
    fn test_toggle_location_trims_slug() {
        let mut filters = controller();
        filters.toggle_location(" damascus ");
        assert_eq!(filters.filters().locations, Some(vec!["damascus".to_string()]));
        assert_eq!(filters.search_url(), "/search?location=damascus");

        filters.toggle_location("damascus  ");
        assert_eq!(filters.filters().locations, None);

        filters.toggle_location("   ");
        assert_eq!(filters.filters().locations, None);
    }

    #[test]
    fn test_toggle_seller_type() {
        let mut filters = controller();
        filters.toggle_seller_type(2);
        assert_eq!(filters.filters().seller_type_ids, Some(vec![2]));
        filters.toggle_seller_type(2);
        assert!(!filters.is_filter_active(FilterGroup::SellerType));
    }

    #[test]
    fn test_available_models_follow_selected_make() {
        let mut filters = controller();
        assert!(filters.available_models().is_empty());

        filters.update_brands(vec!["toyota".to_string()], None);
        assert_eq!(filters.selected_make(), Some(1));
        let models: Vec<_> = filters.available_models().iter().map(|m| m.slug.clone()).collect();
        assert_eq!(models, vec!["corolla".to_string(), "camry".to_string()]);
    }

    #[test]
    fn test_modal() {
        let mut filters = controller();
        filters.open_modal(FilterGroup::Price);
        assert_eq!(filters.active_modal(), Some(FilterGroup::Price));
        filters.close_modal();
        assert_eq!(filters.active_modal(), None);
    }

    #[test]
    fn test_validation_reports_bulk_inversion() {
        let mut filters = controller();
        filters.update_filters_and_state(
            FilterPatch::new()
                .set(FilterField::MinPrice, FieldValue::Number(50000.0))
                .set(FilterField::MaxPrice, FieldValue::Number(10000.0)),
        );
        let report = filters.validation();
        assert!(!report.is_valid);
        assert_eq!(
            report.errors,
            vec!["Minimum price cannot be greater than maximum price".to_string()]
        );
    }
}
