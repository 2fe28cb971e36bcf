//! The filter reducer.
//!
//! [`reduce`] is the only way a [`FilterState`] changes. The selected make and
//! model are convenience state for the dependent dropdowns; they are only
//! written here and in [`sync_selection`], and `filters` stays authoritative.

use carmarket_search::{
    normalize_slugs, AdvancedSearchFilters, FieldKind, FieldValue, FilterField, FilterGroup,
    FilterPatch,
};
use serde::Serialize;
use tracing::warn;

use crate::reference::{ReferenceData, ReferenceEntry};

/// Reducer state: the filters plus the derived dropdown selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    filters: AdvancedSearchFilters,
    selected_make: Option<i64>,
    selected_model: Option<i64>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filters(&self) -> &AdvancedSearchFilters {
        &self.filters
    }

    pub fn selected_make(&self) -> Option<i64> {
        self.selected_make
    }

    pub fn selected_model(&self) -> Option<i64> {
        self.selected_model
    }

    /// True when no filter is set and nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.selected_make.is_none() && self.selected_model.is_none()
    }
}

/// Raw form input for a single field, before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    Text(String),
    List(Vec<String>),
    Number(f64),
    Unset,
}

impl From<&str> for FieldInput {
    fn from(text: &str) -> Self {
        FieldInput::Text(text.to_string())
    }
}

impl From<String> for FieldInput {
    fn from(text: String) -> Self {
        FieldInput::Text(text)
    }
}

impl From<f64> for FieldInput {
    fn from(n: f64) -> Self {
        FieldInput::Number(n)
    }
}

impl From<i64> for FieldInput {
    fn from(n: i64) -> Self {
        FieldInput::Number(n as f64)
    }
}

impl From<Vec<String>> for FieldInput {
    fn from(items: Vec<String>) -> Self {
        FieldInput::List(items)
    }
}

impl<T: Into<FieldInput>> From<Option<T>> for FieldInput {
    fn from(input: Option<T>) -> Self {
        input.map_or(FieldInput::Unset, Into::into)
    }
}

/// A state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterAction {
    /// Replace the brand list. `make_id`, when given, overwrites the selection.
    UpdateBrands {
        brands: Option<Vec<String>>,
        make_id: Option<i64>,
    },
    /// Replace the model list. `model_id`, when given, overwrites the selection.
    UpdateModels {
        models: Option<Vec<String>>,
        model_id: Option<i64>,
    },
    /// Bulk update. No coercion and no range correction.
    UpdateFilters(FilterPatch),
    /// Form-input update of one field, with coercion and range correction.
    UpdateField { field: FilterField, value: FieldInput },
    /// Clear one named group.
    ClearFilter(FilterGroup),
    ResetFilters,
}

impl FilterAction {
    pub fn name(&self) -> &'static str {
        match self {
            FilterAction::UpdateBrands { .. } => "UPDATE_BRANDS",
            FilterAction::UpdateModels { .. } => "UPDATE_MODELS",
            FilterAction::UpdateFilters(_) => "UPDATE_FILTERS",
            FilterAction::UpdateField { .. } => "UPDATE_FIELD",
            FilterAction::ClearFilter(_) => "CLEAR_FILTER",
            FilterAction::ResetFilters => "RESET_FILTERS",
        }
    }
}

/// Apply `action` to `state`, producing the next state.
pub fn reduce(state: &FilterState, action: FilterAction) -> FilterState {
    let mut next = state.clone();
    match action {
        FilterAction::UpdateBrands { brands, make_id } => {
            next.filters.brands = normalize_slugs(brands);
            if make_id.is_some() {
                next.selected_make = make_id;
            }
        }
        FilterAction::UpdateModels { models, model_id } => {
            next.filters.models = normalize_slugs(models);
            if model_id.is_some() {
                next.selected_model = model_id;
            }
        }
        FilterAction::UpdateFilters(patch) => {
            for err in next.filters.apply_patch(&patch) {
                warn!(error = %err, "skipping filter patch entry");
            }
        }
        FilterAction::UpdateField { field, value } => {
            update_field(&mut next.filters, field, value);
        }
        FilterAction::ClearFilter(group) => clear_group(&mut next, group),
        FilterAction::ResetFilters => clear_group(&mut next, FilterGroup::AllFilters),
    }
    next
}

fn update_field(filters: &mut AdvancedSearchFilters, field: FilterField, input: FieldInput) {
    let Some(value) = coerce(field, input) else {
        filters.clear(field);
        return;
    };
    if let Err(err) = filters.set(field, value) {
        warn!(error = %err, "dropping field update");
        return;
    }
    drop_incompatible_bound(filters, field);
}

/// A new bound that crosses the opposite one wins; the opposite is cleared.
fn drop_incompatible_bound(filters: &mut AdvancedSearchFilters, field: FilterField) {
    let Some(opposite) = field.opposite_bound() else {
        return;
    };
    let (Some(value), Some(other)) = (filters.numeric(field), filters.numeric(opposite)) else {
        return;
    };
    let crossed = if field.is_lower_bound() {
        value > other
    } else {
        value < other
    };
    if crossed {
        filters.clear(opposite);
    }
}

fn clear_group(state: &mut FilterState, group: FilterGroup) {
    group.clear(&mut state.filters);
    if matches!(group, FilterGroup::MakeModel | FilterGroup::AllFilters) {
        state.selected_make = None;
        state.selected_model = None;
    }
}

/// Turn form input into a value of the field's kind.
///
/// `None` means the field should be removed: the input was unset, blank, an
/// empty list, or not a number where one was needed. Integer fields keep the
/// whole part of a fractional input.
pub fn coerce(field: FilterField, input: FieldInput) -> Option<FieldValue> {
    match (field.kind(), input) {
        (_, FieldInput::Unset) => None,

        (FieldKind::SlugList, FieldInput::Text(text)) => {
            normalize_slugs(Some(vec![text])).map(FieldValue::Slugs)
        }
        (FieldKind::SlugList, FieldInput::List(items)) => {
            normalize_slugs(Some(items)).map(FieldValue::Slugs)
        }
        (FieldKind::SlugList, FieldInput::Number(_)) => None,

        (FieldKind::Integer, input) => {
            number_of(input).map(|n| FieldValue::Integer(n.trunc() as i64))
        }
        (FieldKind::Number, input) => number_of(input).map(FieldValue::Number),

        (FieldKind::Text, FieldInput::Text(text)) => {
            (!text.trim().is_empty()).then_some(FieldValue::Text(text))
        }
        (FieldKind::Text, FieldInput::Number(n)) => Some(FieldValue::Text(n.to_string())),
        (FieldKind::Text, FieldInput::List(_)) => None,

        (FieldKind::IntegerList, FieldInput::Text(text)) => {
            integers(text.split(',').map(str::to_string).collect())
        }
        (FieldKind::IntegerList, FieldInput::List(items)) => integers(items),
        (FieldKind::IntegerList, FieldInput::Number(n)) => {
            n.is_finite().then(|| FieldValue::Integers(vec![n.trunc() as i64]))
        }
    }
}

fn number_of(input: FieldInput) -> Option<f64> {
    let n = match input {
        FieldInput::Number(n) => n,
        FieldInput::Text(text) => text.trim().parse::<f64>().ok()?,
        FieldInput::List(_) | FieldInput::Unset => return None,
    };
    n.is_finite().then_some(n)
}

fn integers(items: Vec<String>) -> Option<FieldValue> {
    let ids: Vec<i64> = items
        .iter()
        .filter_map(|item| item.trim().parse::<i64>().ok())
        .collect();
    (!ids.is_empty()).then_some(FieldValue::Integers(ids))
}

/// Recompute the selected make and model after a transition.
///
/// Runs only for lists that changed, and leaves alone a selection the action
/// set explicitly. One resolvable slug selects its ID, an empty list clears
/// the selection, and anything else (an unknown slug, several slugs) keeps
/// the previous selection.
pub fn sync_selection<R: ReferenceData + ?Sized>(
    prev: &FilterState,
    next: &mut FilterState,
    reference: &R,
) {
    if prev.filters.brands != next.filters.brands && prev.selected_make == next.selected_make {
        if let Some(selected) = resolve_selection(next.filters.brands.as_deref(), |slug| {
            reference.make(slug)
        }) {
            next.selected_make = selected;
        }
    }
    if prev.filters.models != next.filters.models && prev.selected_model == next.selected_model {
        if let Some(selected) = resolve_selection(next.filters.models.as_deref(), |slug| {
            reference.model(slug)
        }) {
            next.selected_model = selected;
        }
    }
}

/// `None` keeps the current selection, `Some(id)` replaces it.
fn resolve_selection<'r>(
    slugs: Option<&[String]>,
    lookup: impl Fn(&str) -> Option<&'r ReferenceEntry>,
) -> Option<Option<i64>> {
    match slugs.unwrap_or_default() {
        [] => Some(None),
        [slug] => lookup(slug).map(|entry| Some(entry.id)),
        _ => None,
    }
}

/// True iff any field of `group` is set.
pub fn is_filter_active(filters: &AdvancedSearchFilters, group: FilterGroup) -> bool {
    group.is_active(filters)
}

/// Active pills plus set fields no pill covers.
pub fn active_group_count(filters: &AdvancedSearchFilters) -> usize {
    let pills = FilterGroup::PILLS
        .iter()
        .filter(|group| group.is_active(filters))
        .count();
    let ungrouped = FilterField::ALL
        .iter()
        .filter(|field| field.group().is_none() && filters.is_set(**field))
        .count();
    pills + ungrouped
}
