//! The delta result model: what changed between two composite values.
//!
//! A [`Delta`] is a pure result value. It owns all nested deltas and value
//! pairs, keeps no reference to the compared instances, and is never
//! mutated after the engine returns it.

use std::collections::{BTreeMap, BTreeSet};

use odl_types::Value;
use serde::{Deserialize, Serialize};

/// Type name stamped on a delta produced from two absent values, where no
/// runtime type is available on either side.
pub const GENERIC_TYPE_NAME: &str = "value";

/// An old/new pair recorded for a differing scalar field or scalar-element
/// collection field.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuePair {
    /// The value on the old side (`Null` when absent).
    pub old: Value,
    /// The value on the new side (`Null` when absent).
    pub new: Value,
}

impl ValuePair {
    /// Record an old/new pair.
    pub fn new(old: Value, new: Value) -> Self {
        Self { old, new }
    }
}

/// The result of comparing one composite value against another.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    /// Display name of the compared type.
    pub type_name: String,
    /// True iff the old side was absent while the new side was present.
    pub is_added: bool,
    /// True iff the new side was absent while the old side was present.
    pub is_deleted: bool,
    /// True iff neither added nor deleted and at least one field-level
    /// difference was recorded.
    pub is_modified: bool,
    /// Key-field name → key value, populated only when this delta was
    /// produced while reconciling a collection by declared key.
    pub keys: BTreeMap<String, Value>,
    /// Scalar fields whose values differ.
    pub simple_fields: BTreeMap<String, ValuePair>,
    /// Scalar-element collection fields that differ, holding both full
    /// sequences.
    pub simple_list_fields: BTreeMap<String, ValuePair>,
    /// Nested composite fields whose delta is added, deleted, or modified.
    pub complex_fields: BTreeMap<String, Delta>,
    /// Composite-element collection fields, one delta per reconciled
    /// element that differs.
    pub complex_list_fields: BTreeMap<String, Vec<Delta>>,
    /// Names of fields explicitly excluded from comparison, in field order.
    pub ignored_fields: Vec<String>,
    /// Names of fields the engine could not classify, in field order.
    pub unsupported_fields: Vec<String>,
}

impl Delta {
    /// An empty delta for the given type, all flags false.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// Returns `true` if this delta records any difference at all.
    pub fn has_changes(&self) -> bool {
        self.is_added || self.is_deleted || self.is_modified
    }

    /// Every scalar field name that changed anywhere in this delta tree:
    /// this delta's own `simple_fields` keys, unioned with those of all
    /// nested composite deltas and all reconciled collection elements.
    pub fn changed_simple_field_names(&self) -> BTreeSet<String> {
        let mut names: BTreeSet<String> = self.simple_fields.keys().cloned().collect();

        for nested in self.complex_fields.values() {
            names.extend(nested.changed_simple_field_names());
        }
        for deltas in self.complex_list_fields.values() {
            for nested in deltas {
                names.extend(nested.changed_simple_field_names());
            }
        }

        names
    }
}
