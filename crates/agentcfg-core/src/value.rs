//! Value model shared by records and schema engines.

use serde_json::{Map, Value};

/// Untyped options map handed to records and schema engines.
pub type Options = Map<String, Value>;

/// Report whether a value counts as supplied.
///
/// Only `null` is absent. Empty strings, zero, `false` and empty collections
/// are values the caller chose, so they are kept and projected like any other.
pub fn is_present(value: &Value) -> bool {
    !value.is_null()
}
