/// Clearing, the active check and the display text must agree on which
/// fields make up every filter group.
use carmarket_filters::{
    reduce, EntityKind, FilterAction, FilterDisplay, FilterState, Labels, Locale, LocalizedName,
    ReferenceCatalog, ReferenceEntry,
};
use carmarket_search::{FieldKind, FieldValue, FilterField, FilterGroup, FilterPatch};

fn catalog() -> ReferenceCatalog {
    let entry = |slug: &str| ReferenceEntry::new(1, slug, LocalizedName::new(slug.to_uppercase(), ""));
    ReferenceCatalog::new()
        .with_make(entry("toyota"))
        .with_model(entry("corolla").with_make(1))
        .with_location(entry("damascus"))
        .with_entity(EntityKind::Condition, entry("used"))
        .with_entity(EntityKind::Transmission, entry("automatic"))
        .with_entity(EntityKind::FuelType, entry("petrol"))
        .with_entity(EntityKind::BodyStyle, entry("sedan"))
        .with_entity(EntityKind::SellerType, entry("dealer"))
}

fn sample(field: FilterField) -> FieldValue {
    match (field, field.kind()) {
        (FilterField::MinYear | FilterField::MaxYear, _) => FieldValue::Integer(2020),
        (_, FieldKind::SlugList) => FieldValue::Slugs(vec!["toyota".to_string()]),
        (_, FieldKind::Integer) => FieldValue::Integer(1),
        (_, FieldKind::Number) => FieldValue::Number(1000.0),
        (_, FieldKind::Text) => FieldValue::Text("red".to_string()),
        (_, FieldKind::IntegerList) => FieldValue::Integers(vec![1]),
    }
}

fn state_with(fields: impl IntoIterator<Item = FilterField>) -> FilterState {
    let patch = fields
        .into_iter()
        .fold(FilterPatch::new(), |patch, field| patch.set(field, sample(field)));
    reduce(&FilterState::new(), FilterAction::UpdateFilters(patch))
}

#[test]
fn clear_active_and_display_agree_for_every_group_and_field() {
    let catalog = catalog();
    let labels = Labels::english();
    let display = FilterDisplay::new(&catalog, &labels, Locale::En);

    for group in FilterGroup::ALL {
        for field in FilterField::ALL {
            let state = state_with([field]);
            assert!(state.filters().is_set(field), "{field} should be set");

            let owned = group.contains(field);
            assert_eq!(
                group.is_active(state.filters()),
                owned,
                "is_active({group}) with only {field} set"
            );

            let cleared = reduce(&state, FilterAction::ClearFilter(group));
            assert_eq!(
                !cleared.filters().is_set(field),
                owned,
                "clear({group}) with only {field} set"
            );

            let text = display.display_text(state.filters(), group);
            assert!(!text.is_empty());
            assert_eq!(
                text != labels.placeholder(group),
                owned,
                "display({group}) with only {field} set gave {text:?}"
            );
        }
    }
}

#[test]
fn clearing_a_group_leaves_other_groups_alone() {
    for group in FilterGroup::ALL {
        let state = state_with(FilterField::ALL);
        let cleared = reduce(&state, FilterAction::ClearFilter(group));

        for field in FilterField::ALL {
            assert_eq!(
                cleared.filters().is_set(field),
                !group.contains(field),
                "clear({group}) and {field}"
            );
        }
        assert!(!group.is_active(cleared.filters()));
    }
}

#[test]
fn reset_is_idempotent() {
    let state = state_with(FilterField::ALL);
    let once = reduce(&state, FilterAction::ClearFilter(FilterGroup::AllFilters));
    let twice = reduce(&once, FilterAction::ClearFilter(FilterGroup::AllFilters));
    assert!(once.is_empty());
    assert_eq!(once, twice);
    assert_eq!(reduce(&state, FilterAction::ResetFilters), once);
}
