//! Faceted search filter state for the car marketplace.
//!
//! Builds on `carmarket-search` with the stateful half of the search page:
//!
//! - **Reducer**: `FilterState`, `FilterAction` and the pure `reduce`
//! - **Controller**: `SearchFilters`, which commits state, pushes the URL and
//!   notifies the listings fetch
//! - **Display**: pill text, chips and name resolution
//! - **Reference data**: the `ReferenceData` lookup and a JSON-backed catalog
//! - **Config**: locale, search path and label overrides
//!
//! # Example
//!
//! ```rust
//! use carmarket_filters::prelude::*;
//!
//! let mut search = SearchFilters::new(ReferenceCatalog::new())
//!     .with_codec(UrlCodec::with_current_year(2025));
//!
//! search.handle_input_change(FilterField::MaxPrice, "50000");
//! assert_eq!(search.display_text(FilterGroup::Price), "Up to $50,000");
//! assert_eq!(search.search_url(), "/search?maxPrice=50000");
//!
//! search.clear_specific_filter(FilterGroup::Price);
//! assert!(!search.is_filter_active(FilterGroup::Price));
//! ```

pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod locale;
pub mod reducer;
pub mod reference;

pub use config::{FilterConfig, LabelOverrides};
pub use controller::{FiltersListener, SearchFilters, UrlListener};
pub use display::{FilterChip, FilterDisplay};
pub use error::{CatalogError, ConfigError};
pub use locale::{Labels, Locale};
pub use reducer::{
    active_group_count, coerce, is_filter_active, reduce, sync_selection, FieldInput,
    FilterAction, FilterState,
};
pub use reference::{EntityKind, LocalizedName, ReferenceCatalog, ReferenceData, ReferenceEntry};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::FilterConfig;
    pub use crate::controller::SearchFilters;
    pub use crate::locale::{Labels, Locale};
    pub use crate::reducer::{FieldInput, FilterAction, FilterState};
    pub use crate::reference::{ReferenceCatalog, ReferenceData};
    pub use carmarket_search::prelude::*;
}
