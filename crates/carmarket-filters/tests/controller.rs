use std::cell::RefCell;
use std::rc::Rc;

use carmarket_filters::prelude::*;
use carmarket_filters::{EntityKind, LocalizedName, ReferenceEntry};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct Recorded {
    urls: Vec<String>,
    fetches: Vec<AdvancedSearchFilters>,
}

fn catalog() -> ReferenceCatalog {
    ReferenceCatalog::new()
        .with_make(ReferenceEntry::new(1, "toyota", LocalizedName::new("Toyota", "تويوتا")))
        .with_make(ReferenceEntry::new(2, "kia", LocalizedName::new("Kia", "كيا")))
        .with_model(ReferenceEntry::new(10, "corolla", LocalizedName::new("Corolla", "كورولا")).with_make(1))
        .with_location(ReferenceEntry::new(1, "damascus", LocalizedName::new("Damascus", "دمشق")))
        .with_entity(
            EntityKind::Transmission,
            ReferenceEntry::new(2, "manual", LocalizedName::new("Manual", "يدوي")),
        )
}

fn recording_filters() -> (SearchFilters<ReferenceCatalog>, Rc<RefCell<Recorded>>) {
    let recorded = Rc::new(RefCell::new(Recorded::default()));
    let urls = Rc::clone(&recorded);
    let fetches = Rc::clone(&recorded);
    let filters = SearchFilters::new(catalog())
        .with_codec(UrlCodec::with_current_year(2025))
        .on_url_change(move |url| urls.borrow_mut().urls.push(url.to_string()))
        .on_filters_change(move |filters| fetches.borrow_mut().fetches.push(filters.clone()));
    (filters, recorded)
}

#[test]
fn min_year_above_max_year_drops_max_year() {
    let (mut search, recorded) = recording_filters();
    search.handle_input_change(FilterField::MaxYear, "2020");
    search.handle_input_change(FilterField::MinYear, 2024_i64);

    assert_eq!(search.filters().min_year, Some(2024));
    assert_eq!(search.filters().max_year, None);
    assert_eq!(
        recorded.borrow().urls,
        vec![
            "/search?maxYear=2020".to_string(),
            "/search?minYear=2024".to_string(),
        ]
    );
    assert_eq!(recorded.borrow().fetches.len(), 2);
}

#[test]
fn bootstrap_derives_selection_from_url() {
    let (mut search, recorded) = recording_filters();
    search.bootstrap("?brand=toyota&model=corolla&location=damascus&transmissionId=2&minPrice=-5");

    assert_eq!(search.selected_make(), Some(1));
    assert_eq!(search.selected_model(), Some(10));
    assert_eq!(search.filters().min_price, None);
    assert_eq!(search.display_text(FilterGroup::MakeModel), "Toyota - Corolla");
    assert_eq!(search.display_text(FilterGroup::Transmission), "Manual");
    assert_eq!(search.active_filter_count(), 3);
    assert_eq!(
        recorded.borrow().urls,
        vec!["/search?location=damascus&brand=toyota&model=corolla&transmissionId=2".to_string()]
    );
}

#[test]
fn bootstrap_replaces_existing_filters() {
    let (mut search, _) = recording_filters();
    search.handle_input_change(FilterField::Doors, "4");
    search.bootstrap("maxMileage=90000");

    assert_eq!(search.filters().doors, None);
    assert_eq!(search.filters().max_mileage, Some(90000));
}

#[test]
fn unknown_brand_keeps_selection() {
    let (mut search, _) = recording_filters();
    search.update_brands(vec!["kia".to_string()], None);
    assert_eq!(search.selected_make(), Some(2));

    search.update_brands(vec!["lada".to_string()], None);
    assert_eq!(search.filters().brands, Some(vec!["lada".to_string()]));
    assert_eq!(search.selected_make(), Some(2));
    assert_eq!(search.display_text(FilterGroup::MakeModel), "lada");

    search.update_brands(Vec::new(), None);
    assert_eq!(search.selected_make(), None);
    assert!(!search.is_filter_active(FilterGroup::MakeModel));
}

#[test]
fn unchanged_filters_are_not_committed() {
    let (mut search, recorded) = recording_filters();
    search.clear_specific_filter(FilterGroup::Price);
    search.reset();
    search.open_modal(FilterGroup::Year);

    assert!(recorded.borrow().urls.is_empty());
    assert!(recorded.borrow().fetches.is_empty());
}

#[test]
fn reset_clears_everything_and_pushes_bare_path() {
    let (mut search, recorded) = recording_filters();
    search.toggle_location("damascus");
    search.update_brands(vec!["toyota".to_string()], Some(1));
    search.reset();

    assert!(search.state().is_empty());
    assert_eq!(recorded.borrow().urls.last().map(String::as_str), Some("/search"));
    assert_eq!(recorded.borrow().fetches.last(), Some(&AdvancedSearchFilters::default()));
}

#[test]
fn chips_and_arabic_labels() {
    let config = FilterConfig {
        locale: Locale::Ar,
        current_year: Some(2025),
        ..Default::default()
    };
    let mut search = SearchFilters::from_config(catalog(), &config);
    search.toggle_location("damascus");
    search.handle_input_change(FilterField::MaxPrice, 15000.0);

    let labels: Vec<String> = search.chips().into_iter().map(|chip| chip.label).collect();
    assert_eq!(labels, vec!["دمشق".to_string(), "حتى $15,000".to_string()]);
    assert_eq!(search.make_name("kia"), "كيا");
    assert_eq!(search.entity_name(EntityKind::Transmission, 9), None);
}
