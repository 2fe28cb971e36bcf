//! Search error types.

use thiserror::Error;

use crate::field::{FieldKind, FilterField};

/// Errors raised at the edges of the filter model.
///
/// Filter operations themselves never fail; these only come up when a name
/// from the outside world has to be turned into a typed field or group, or
/// when a value does not have the shape its field requires.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Field name not in the descriptor table.
    #[error("Unknown filter field: {0}")]
    UnknownField(String),

    /// Group name not recognised.
    #[error("Unknown filter group: {0}")]
    UnknownGroup(String),

    /// Value shape does not fit the field.
    #[error("Value for {field} must be {expected}")]
    KindMismatch {
        field: FilterField,
        expected: FieldKind,
    },
}
