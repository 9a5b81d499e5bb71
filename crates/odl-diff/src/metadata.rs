//! The field-metadata cache: discover a type's fields once, reuse them for
//! every subsequent comparison.
//!
//! The cache is the engine's only shared mutable state. It is read-mostly
//! and append-only: a racing double-discover of the same type overwrites an
//! entry with structurally identical data, which is harmless. Lifetime is
//! scoped to the owning engine; there is no global registry.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use odl_types::{FieldDescriptor, TypeKind, TypeRef};
use tracing::debug;

use crate::error::{CompareError, CompareResult};

pub(crate) struct FieldCache {
    enabled: bool,
    entries: RwLock<HashMap<String, Arc<[FieldDescriptor]>>>,
}

impl FieldCache {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Field descriptors for a composite type, in declaration order.
    ///
    /// Discovery runs once per distinct type name while the cache is
    /// enabled, and on every call when it is disabled. Non-composite
    /// references yield an empty list.
    pub(crate) fn fields_for(&self, ty: &TypeRef) -> CompareResult<Arc<[FieldDescriptor]>> {
        if !self.enabled {
            return Ok(discover(ty));
        }

        {
            let entries = self
                .entries
                .read()
                .map_err(|e| CompareError::CachePoisoned(e.to_string()))?;
            if let Some(fields) = entries.get(ty.name()) {
                return Ok(Arc::clone(fields));
            }
        }

        let fields = discover(ty);
        let mut entries = self
            .entries
            .write()
            .map_err(|e| CompareError::CachePoisoned(e.to_string()))?;
        entries.insert(ty.name().to_string(), Arc::clone(&fields));
        Ok(fields)
    }

    /// The key fields of a composite type, validated on the way out: a key
    /// marker on a non-scalar field is a configuration error, reported here
    /// at first use rather than at registration time.
    pub(crate) fn key_fields_for(&self, ty: &TypeRef) -> CompareResult<Vec<FieldDescriptor>> {
        let fields = self.fields_for(ty)?;
        let keys: Vec<FieldDescriptor> = fields
            .iter()
            .filter(|fd| fd.is_key())
            .cloned()
            .collect();

        for fd in &keys {
            if fd.declared().kind() != TypeKind::Scalar {
                return Err(CompareError::InvalidKeyField {
                    type_name: ty.name().to_string(),
                    field: fd.name().to_string(),
                    kind: fd.declared().kind(),
                });
            }
        }

        Ok(keys)
    }
}

fn discover(ty: &TypeRef) -> Arc<[FieldDescriptor]> {
    let fields = ty.discover_fields().unwrap_or_default();
    debug!(type_name = ty.name(), count = fields.len(), "discovered fields");
    fields.into()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use odl_types::{CompositeValue, Reflect, Value};

    use super::*;

    // One counter per probe type: tests run concurrently, so sharing a
    // counter across tests would make the deltas unreliable.
    macro_rules! counted_probe {
        ($name:ident, $counter:ident) => {
            static $counter: AtomicUsize = AtomicUsize::new(0);

            struct $name;

            impl Reflect for $name {
                fn fields() -> Vec<FieldDescriptor> {
                    $counter.fetch_add(1, Ordering::SeqCst);
                    vec![FieldDescriptor::new("id", TypeRef::scalar::<u64>()).key()]
                }

                fn to_value(&self) -> Value {
                    CompositeValue::new(Self::type_name())
                        .with_field("id", 0u64)
                        .into()
                }
            }
        };
    }

    counted_probe!(CachedProbe, CACHED_DISCOVERIES);
    counted_probe!(UncachedProbe, UNCACHED_DISCOVERIES);

    struct KeyedProbe;

    impl Reflect for KeyedProbe {
        fn fields() -> Vec<FieldDescriptor> {
            vec![
                FieldDescriptor::new("id", TypeRef::scalar::<u64>()).key(),
                FieldDescriptor::new("label", TypeRef::scalar::<String>()),
            ]
        }

        fn to_value(&self) -> Value {
            CompositeValue::new(Self::type_name())
                .with_field("id", 0u64)
                .with_field("label", "")
                .into()
        }
    }

    struct BadKeys;

    impl Reflect for BadKeys {
        fn fields() -> Vec<FieldDescriptor> {
            vec![
                FieldDescriptor::new("id", TypeRef::scalar::<u64>()).key(),
                FieldDescriptor::new(
                    "parts",
                    TypeRef::collection(TypeRef::scalar::<String>()),
                )
                .key(),
            ]
        }

        fn to_value(&self) -> Value {
            CompositeValue::new(Self::type_name()).into()
        }
    }

    #[test]
    fn enabled_cache_discovers_once() {
        let cache = FieldCache::new(true);
        let ty = TypeRef::composite::<CachedProbe>();

        cache.fields_for(&ty).unwrap();
        cache.fields_for(&ty).unwrap();
        cache.fields_for(&ty).unwrap();

        assert_eq!(CACHED_DISCOVERIES.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn disabled_cache_rediscovers_every_call() {
        let cache = FieldCache::new(false);
        let ty = TypeRef::composite::<UncachedProbe>();

        cache.fields_for(&ty).unwrap();
        cache.fields_for(&ty).unwrap();

        assert_eq!(UNCACHED_DISCOVERIES.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn key_fields_are_filtered() {
        let cache = FieldCache::new(true);
        let ty = TypeRef::composite::<KeyedProbe>();

        let keys = cache.key_fields_for(&ty).unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].name(), "id");
    }

    #[test]
    fn non_scalar_key_is_rejected_at_first_use() {
        let cache = FieldCache::new(true);
        let ty = TypeRef::composite::<BadKeys>();

        // Plain discovery succeeds; the marker is only validated when the
        // fields are used as keys.
        assert_eq!(cache.fields_for(&ty).unwrap().len(), 2);

        let err = cache.key_fields_for(&ty).unwrap_err();
        match err {
            CompareError::InvalidKeyField { field, kind, .. } => {
                assert_eq!(field, "parts");
                assert_eq!(kind, TypeKind::Collection);
            }
            other => panic!("expected InvalidKeyField, got {other:?}"),
        }
    }

    #[test]
    fn non_composite_reference_has_no_fields() {
        let cache = FieldCache::new(true);
        let ty = TypeRef::scalar::<i64>();
        assert!(cache.fields_for(&ty).unwrap().is_empty());
    }
}
