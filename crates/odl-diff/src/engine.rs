//! The comparison engine: recursive structural delta between two values of
//! the same type.
//!
//! The engine is synchronous and pure: no I/O, no background work, no
//! retry. A comparison is a deterministic function of its two inputs and
//! the engine's configuration. Recursion depth is bounded only by the
//! object graph's actual nesting; inputs are assumed acyclic and finite.

use odl_types::{CompositeValue, Reflect, TypeKind, TypeRef, Value};
use tracing::trace;

use crate::delta::{Delta, ValuePair, GENERIC_TYPE_NAME};
use crate::equality::{sequences_equal, values_equal, ComparerRegistry};
use crate::error::{CompareError, CompareResult};
use crate::metadata::FieldCache;
use crate::options::CompareOptions;

pub(crate) static NULL: Value = Value::Null;

/// The delta engine.
///
/// One engine may be shared across threads: the field-metadata cache is its
/// only mutable state and tolerates concurrent read/insert. Custom
/// comparers and options are fixed at construction.
pub struct Comparer {
    options: CompareOptions,
    pub(crate) registry: ComparerRegistry,
    pub(crate) cache: FieldCache,
}

impl Comparer {
    /// An engine with default options.
    pub fn new() -> Self {
        Self::with_options(CompareOptions::default())
    }

    /// An engine with explicit options. The custom comparer list is
    /// flattened into a by-type lookup here; later registrations for the
    /// same type win.
    pub fn with_options(options: CompareOptions) -> Self {
        let registry = ComparerRegistry::from_comparers(&options.custom_comparers);
        let cache = FieldCache::new(!options.disable_field_cache);
        Self {
            options,
            registry,
            cache,
        }
    }

    /// The configuration this engine was built with.
    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// Compare two optional instances of a reflected type.
    ///
    /// Both sides absent yields an empty delta with all flags false. One
    /// side absent sets `is_added`/`is_deleted` and still enumerates every
    /// non-ignored field as a one-sided difference, so the delta captures
    /// *what* was added or removed.
    pub fn compare<T: Reflect>(&self, old: Option<&T>, new: Option<&T>) -> CompareResult<Delta> {
        let ty = TypeRef::composite::<T>();
        let old_value = old.map(Reflect::to_value).unwrap_or(Value::Null);
        let new_value = new.map(Reflect::to_value).unwrap_or(Value::Null);
        self.compare_values(&ty, &old_value, &new_value)
    }

    /// Compare two already-snapshotted values declared as `ty`.
    ///
    /// This is the dynamic entry point: values of different runtime types
    /// can meet here, and doing so is a [`CompareError::TypeMismatch`]. A
    /// non-composite effective type is a
    /// [`CompareError::UnsupportedRoot`].
    pub fn compare_values(
        &self,
        ty: &TypeRef,
        old: &Value,
        new: &Value,
    ) -> CompareResult<Delta> {
        if let (Some(left), Some(right)) = (old.runtime_type_name(), new.runtime_type_name()) {
            if left != right {
                return Err(CompareError::TypeMismatch {
                    left: left.to_string(),
                    right: right.to_string(),
                });
            }
        }

        if old.is_null() && new.is_null() {
            return Ok(Delta::new(GENERIC_TYPE_NAME));
        }

        let effective = if old.is_null() { new } else { old };
        let composite = match effective {
            Value::Composite(c) if ty.kind() == TypeKind::Composite => c,
            _ => {
                return Err(CompareError::UnsupportedRoot {
                    type_name: effective
                        .runtime_type_name()
                        .unwrap_or(ty.name())
                        .to_string(),
                    kind: root_kind(ty, effective),
                });
            }
        };

        trace!(type_name = composite.type_name(), "comparing composite");

        let mut delta = Delta::new(composite.type_name());
        if old.is_null() || new.is_null() {
            delta.is_added = old.is_null();
            delta.is_deleted = new.is_null();
        }

        let old_composite = as_composite(old);
        let new_composite = as_composite(new);

        for fd in self.cache.fields_for(ty)?.iter() {
            if fd.is_ignored() {
                delta.ignored_fields.push(fd.name().to_string());
                continue;
            }

            let old_value = field_value(old_composite, fd.name());
            let new_value = field_value(new_composite, fd.name());

            match fd.declared().kind() {
                TypeKind::Scalar => {
                    if !values_equal(&self.registry, old_value, new_value) {
                        delta.simple_fields.insert(
                            fd.name().to_string(),
                            ValuePair::new(old_value.clone(), new_value.clone()),
                        );
                    }
                }
                TypeKind::Composite => {
                    let nested = self.compare_values(fd.declared(), old_value, new_value)?;
                    if nested.has_changes() {
                        delta.complex_fields.insert(fd.name().to_string(), nested);
                    }
                }
                TypeKind::Collection => match fd.declared().element() {
                    Some(element) if element.kind() == TypeKind::Scalar => {
                        if !sequences_equal(&self.registry, element, old_value, new_value) {
                            delta.simple_list_fields.insert(
                                fd.name().to_string(),
                                ValuePair::new(old_value.clone(), new_value.clone()),
                            );
                        }
                    }
                    Some(element) if element.kind() == TypeKind::Composite => {
                        let deltas =
                            self.reconcile_composites(element, old_value, new_value)?;
                        if !deltas.is_empty() {
                            delta
                                .complex_list_fields
                                .insert(fd.name().to_string(), deltas);
                        }
                    }
                    // Unknown element type, or an element kind the engine
                    // cannot diff.
                    _ => delta.unsupported_fields.push(fd.name().to_string()),
                },
                TypeKind::Unsupported => {
                    delta.unsupported_fields.push(fd.name().to_string());
                }
            }
        }

        delta.is_modified = !delta.is_added
            && !delta.is_deleted
            && (!delta.simple_fields.is_empty()
                || !delta.complex_fields.is_empty()
                || !delta.simple_list_fields.is_empty()
                || !delta.complex_list_fields.is_empty());

        Ok(delta)
    }
}

impl Default for Comparer {
    fn default() -> Self {
        Self::new()
    }
}

fn as_composite(value: &Value) -> Option<&CompositeValue> {
    match value {
        Value::Composite(c) => Some(c),
        _ => None,
    }
}

/// Null-safe field read: any field of an absent container is `Null`.
pub(crate) fn field_value<'a>(composite: Option<&'a CompositeValue>, name: &str) -> &'a Value {
    composite.and_then(|c| c.get(name)).unwrap_or(&NULL)
}

fn root_kind(ty: &TypeRef, effective: &Value) -> TypeKind {
    match effective {
        Value::Scalar(_) => TypeKind::Scalar,
        Value::Collection(_) => TypeKind::Collection,
        // A composite value whose declared type is not composite: report
        // the declared classification.
        Value::Composite(_) => ty.kind(),
        Value::Null => TypeKind::Unsupported,
    }
}
