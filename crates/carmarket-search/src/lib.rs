//! Search filter model for the car marketplace.
//!
//! This crate holds the pure, stateless half of faceted search:
//!
//! - **Model**: `AdvancedSearchFilters` and bulk `FilterPatch` updates
//! - **Fields**: the typed descriptor table (`FilterField`, `FieldKind`, `Validity`)
//! - **Groups**: `FilterGroup`, the compound pills the UI clears as a unit
//! - **Codec**: `FilterUrlParams` <-> query string, filter counting
//! - **Validation**: range checks that report instead of fixing
//!
//! # Example
//!
//! ```rust
//! use carmarket_search::prelude::*;
//!
//! let codec = UrlCodec::with_current_year(2025);
//! let filters = FilterUrlParams {
//!     location: Some("damascus".to_string()),
//!     brands: Some(vec!["toyota".to_string()]),
//!     min_year: Some(2020),
//!     max_year: Some(2024),
//!     ..Default::default()
//! };
//!
//! let url = codec.build_search_url(&filters);
//! assert_eq!(url, "/search?location=damascus&brand=toyota&minYear=2020&maxYear=2024");
//! assert_eq!(codec.parse_query(url.trim_start_matches("/search")), filters);
//! ```

pub mod codec;
pub mod error;
pub mod field;
pub mod group;
pub mod model;
pub mod validate;

pub use codec::{
    build_search_params, build_search_url, count_active_filters, has_active_filters,
    parse_search_params, validate_filters, FilterUrlParams, SearchParams, UrlCodec, SEARCH_PATH,
};
pub use error::SearchError;
pub use field::{FieldKind, FieldValue, FilterField, Validity, FLOOR_YEAR};
pub use group::FilterGroup;
pub use model::{normalize_slugs, AdvancedSearchFilters, FilterPatch};
pub use validate::{validate_ranges, NumericRanges, ValidationReport};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::codec::{FilterUrlParams, SearchParams, UrlCodec};
    pub use crate::error::SearchError;
    pub use crate::field::{FieldKind, FieldValue, FilterField};
    pub use crate::group::FilterGroup;
    pub use crate::model::{AdvancedSearchFilters, FilterPatch};
    pub use crate::validate::ValidationReport;
}
