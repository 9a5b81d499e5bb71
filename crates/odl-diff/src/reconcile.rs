//! Collection reconciliation: pairing composite elements across two
//! collections before diffing them.
//!
//! Elements of a type that declares key fields are matched by key:
//! first-match semantics, not a bijection solver, so duplicate or ambiguous
//! keys resolve to whichever unconsumed new element appears first. Types
//! with no key fields fall back to positional pairing, which makes no
//! attempt at reordering detection or minimum-edit alignment: a reordered
//! collection with no key reports spurious modifications. That is the
//! documented contract of the keyless path.

use std::collections::BTreeMap;

use odl_types::{CompositeValue, FieldDescriptor, TypeRef, Value};

use crate::delta::Delta;
use crate::engine::{field_value, Comparer, NULL};
use crate::equality::values_equal;
use crate::error::CompareResult;

impl Comparer {
    /// Produce one delta per reconciled element pair that differs, plus
    /// pure additions and deletions for unmatched elements.
    pub(crate) fn reconcile_composites(
        &self,
        element: &TypeRef,
        old: &Value,
        new: &Value,
    ) -> CompareResult<Vec<Delta>> {
        if old.is_null() && new.is_null() {
            return Ok(Vec::new());
        }

        let old_items = collection_items(old);
        let new_items = collection_items(new);

        let key_fields = self.cache.key_fields_for(element)?;
        if key_fields.is_empty() {
            self.reconcile_positional(element, old_items, new_items)
        } else {
            self.reconcile_by_key(element, &key_fields, old_items, new_items)
        }
    }

    /// Key-based matching. Null elements carry no identity and are
    /// discarded before matching.
    fn reconcile_by_key(
        &self,
        element: &TypeRef,
        key_fields: &[FieldDescriptor],
        old_items: &[Value],
        new_items: &[Value],
    ) -> CompareResult<Vec<Delta>> {
        let old_items: Vec<&Value> = old_items.iter().filter(|v| !v.is_null()).collect();
        let new_items: Vec<&Value> = new_items.iter().filter(|v| !v.is_null()).collect();

        let mut old_matched = vec![false; old_items.len()];
        let mut new_matched = vec![false; new_items.len()];
        let mut deltas = Vec::new();

        for (oi, old_item) in old_items.iter().enumerate() {
            let candidate = new_items.iter().enumerate().find(|(ni, new_item)| {
                !new_matched[*ni] && self.keys_match(key_fields, old_item, new_item)
            });

            if let Some((ni, new_item)) = candidate {
                let mut delta = self.compare_values(element, old_item, new_item)?;
                delta.keys = key_values(old_item, key_fields);
                if delta.has_changes() {
                    deltas.push(delta);
                }
                old_matched[oi] = true;
                new_matched[ni] = true;
            }
        }

        for (oi, old_item) in old_items.iter().enumerate() {
            if old_matched[oi] {
                continue;
            }
            let mut delta = self.compare_values(element, old_item, &NULL)?;
            delta.keys = key_values(old_item, key_fields);
            if delta.has_changes() {
                deltas.push(delta);
            }
        }

        for (ni, new_item) in new_items.iter().enumerate() {
            if new_matched[ni] {
                continue;
            }
            let mut delta = self.compare_values(element, &NULL, new_item)?;
            delta.keys = key_values(new_item, key_fields);
            if delta.has_changes() {
                deltas.push(delta);
            }
        }

        Ok(deltas)
    }

    /// Positional pairing: index-by-index up to the shorter length, then
    /// trailing one-sided comparisons for the longer side.
    fn reconcile_positional(
        &self,
        element: &TypeRef,
        old_items: &[Value],
        new_items: &[Value],
    ) -> CompareResult<Vec<Delta>> {
        let mut deltas = Vec::new();

        for index in 0..old_items.len().max(new_items.len()) {
            let old_item = old_items.get(index).unwrap_or(&NULL);
            let new_item = new_items.get(index).unwrap_or(&NULL);
            let delta = self.compare_values(element, old_item, new_item)?;
            if delta.has_changes() {
                deltas.push(delta);
            }
        }

        Ok(deltas)
    }

    fn keys_match(&self, key_fields: &[FieldDescriptor], old_item: &Value, new_item: &Value) -> bool {
        let old_composite = as_composite(old_item);
        let new_composite = as_composite(new_item);
        key_fields.iter().all(|fd| {
            values_equal(
                &self.registry,
                field_value(old_composite, fd.name()),
                field_value(new_composite, fd.name()),
            )
        })
    }
}

fn collection_items(value: &Value) -> &[Value] {
    match value {
        Value::Collection(items) => items,
        _ => &[],
    }
}

fn as_composite(value: &Value) -> Option<&CompositeValue> {
    match value {
        Value::Composite(c) => Some(c),
        _ => None,
    }
}

/// The element's key values, stamped onto the delta it produced.
fn key_values(item: &Value, key_fields: &[FieldDescriptor]) -> BTreeMap<String, Value> {
    let composite = as_composite(item);
    key_fields
        .iter()
        .map(|fd| {
            (
                fd.name().to_string(),
                field_value(composite, fd.name()).clone(),
            )
        })
        .collect()
}
