//! Equality resolution: custom comparers first, then null rules, then
//! structural equality.
//!
//! A registered [`TypeComparer`] takes absolute precedence over every other
//! rule for its target type. Otherwise two nulls are equal, a single null
//! is unequal, and anything else falls back to structural equality on the
//! value model.

use std::collections::HashMap;
use std::sync::Arc;

use odl_types::{TypeRef, Value};

/// A pluggable, type-scoped equality override.
///
/// Implementations answer "are these two values equal?" for one specific
/// type, identified by its fully-qualified name. Lookup happens by the
/// runtime type of whichever compared value is non-null.
pub trait TypeComparer: Send + Sync {
    /// Fully-qualified name of the type this comparer overrides.
    fn type_name(&self) -> &str;

    /// Whether the two values are equal. Either side may be `Null`.
    fn is_equal(&self, a: &Value, b: &Value) -> bool;
}

/// Custom comparers flattened into a by-name lookup at engine
/// construction. Duplicate registrations are last-write-wins.
pub(crate) struct ComparerRegistry {
    by_type: HashMap<String, Arc<dyn TypeComparer>>,
}

impl ComparerRegistry {
    pub(crate) fn from_comparers(comparers: &[Arc<dyn TypeComparer>]) -> Self {
        let mut by_type = HashMap::new();
        for comparer in comparers {
            by_type.insert(comparer.type_name().to_string(), Arc::clone(comparer));
        }
        Self { by_type }
    }

    /// Look up the comparer registered for a fully-qualified type name.
    pub(crate) fn lookup(&self, type_name: &str) -> Option<&dyn TypeComparer> {
        self.by_type.get(type_name).map(Arc::as_ref)
    }

    /// Look up by the runtime type of whichever value is non-null.
    fn for_pair(&self, a: &Value, b: &Value) -> Option<&dyn TypeComparer> {
        let type_name = a.runtime_type_name().or_else(|| b.runtime_type_name())?;
        self.lookup(type_name)
    }
}

/// Single-value equality per the resolution order above.
pub(crate) fn values_equal(registry: &ComparerRegistry, a: &Value, b: &Value) -> bool {
    if let Some(comparer) = registry.for_pair(a, b) {
        return comparer.is_equal(a, b);
    }
    default_equal(a, b)
}

/// Sequence equality for scalar-element collections. The comparer lookup is
/// keyed by the declared *element* type and applied per positional pair.
pub(crate) fn sequences_equal(
    registry: &ComparerRegistry,
    element: &TypeRef,
    a: &Value,
    b: &Value,
) -> bool {
    let comparer = registry.lookup(element.name());

    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Collection(left), Value::Collection(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right)
                    .all(|(x, y)| element_equal(comparer, x, y))
        }
        // Malformed shapes (a snapshot that put a non-sequence in a
        // collection field) fall back to structural equality.
        _ => a == b,
    }
}

fn element_equal(comparer: Option<&dyn TypeComparer>, a: &Value, b: &Value) -> bool {
    match comparer {
        Some(c) => c.is_equal(a, b),
        None => default_equal(a, b),
    }
}

fn default_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use odl_types::ScalarValue;

    fn empty_registry() -> ComparerRegistry {
        ComparerRegistry::from_comparers(&[])
    }

    struct MoneyComparer {
        verdict: bool,
    }

    impl TypeComparer for MoneyComparer {
        fn type_name(&self) -> &str {
            "demo::Money"
        }

        fn is_equal(&self, _a: &Value, _b: &Value) -> bool {
            self.verdict
        }
    }

    fn money(repr: &str) -> Value {
        Value::Scalar(ScalarValue::Opaque {
            type_name: "demo::Money".to_string(),
            repr: repr.to_string(),
        })
    }

    #[test]
    fn null_rules() {
        let registry = empty_registry();
        assert!(values_equal(&registry, &Value::Null, &Value::Null));
        assert!(!values_equal(&registry, &Value::Null, &Value::from(1i64)));
        assert!(!values_equal(&registry, &Value::from(1i64), &Value::Null));
    }

    #[test]
    fn structural_fallback() {
        let registry = empty_registry();
        assert!(values_equal(&registry, &Value::from("a"), &Value::from("a")));
        assert!(!values_equal(&registry, &Value::from("a"), &Value::from("b")));
    }

    #[test]
    fn custom_comparer_takes_precedence() {
        let registry =
            ComparerRegistry::from_comparers(&[Arc::new(MoneyComparer { verdict: true })]);
        // Different representations, comparer says equal.
        assert!(values_equal(&registry, &money("1.00"), &money("2.00")));

        let registry =
            ComparerRegistry::from_comparers(&[Arc::new(MoneyComparer { verdict: false })]);
        // Identical representations, comparer says unequal.
        assert!(!values_equal(&registry, &money("1.00"), &money("1.00")));
    }

    #[test]
    fn custom_comparer_sees_one_sided_nulls() {
        let registry =
            ComparerRegistry::from_comparers(&[Arc::new(MoneyComparer { verdict: true })]);
        // The non-null side keys the lookup; the comparer still decides.
        assert!(values_equal(&registry, &Value::Null, &money("1.00")));
    }

    #[test]
    fn duplicate_registration_is_last_write_wins() {
        let registry = ComparerRegistry::from_comparers(&[
            Arc::new(MoneyComparer { verdict: false }),
            Arc::new(MoneyComparer { verdict: true }),
        ]);
        assert!(values_equal(&registry, &money("1.00"), &money("2.00")));
    }

    #[test]
    fn sequence_null_rules() {
        let registry = empty_registry();
        let element = TypeRef::scalar::<String>();
        let seq = Value::collection([Value::from("a")]);

        assert!(sequences_equal(&registry, &element, &Value::Null, &Value::Null));
        assert!(!sequences_equal(&registry, &element, &Value::Null, &seq));
        assert!(!sequences_equal(&registry, &element, &seq, &Value::Null));
    }

    #[test]
    fn sequence_length_mismatch() {
        let registry = empty_registry();
        let element = TypeRef::scalar::<String>();
        let short = Value::collection([Value::from("a")]);
        let long = Value::collection([Value::from("a"), Value::from("b")]);
        assert!(!sequences_equal(&registry, &element, &short, &long));
    }

    #[test]
    fn sequence_positional_comparison() {
        let registry = empty_registry();
        let element = TypeRef::scalar::<String>();
        let left = Value::collection([Value::from("a"), Value::from("b")]);
        let same = Value::collection([Value::from("a"), Value::from("b")]);
        let reordered = Value::collection([Value::from("b"), Value::from("a")]);

        assert!(sequences_equal(&registry, &element, &left, &same));
        assert!(!sequences_equal(&registry, &element, &left, &reordered));
    }

    #[test]
    fn sequence_null_elements_compare_positionally() {
        let registry = empty_registry();
        let element = TypeRef::scalar::<String>();
        let left = Value::collection([Value::Null, Value::from("b")]);
        let right = Value::collection([Value::Null, Value::from("b")]);
        assert!(sequences_equal(&registry, &element, &left, &right));
    }

    #[test]
    fn sequence_uses_element_comparer() {
        let registry =
            ComparerRegistry::from_comparers(&[Arc::new(MoneyComparer { verdict: true })]);
        let element = TypeRef::scalar_named("demo::Money");
        let left = Value::collection([money("1.00")]);
        let right = Value::collection([money("9.99")]);
        assert!(sequences_equal(&registry, &element, &left, &right));
    }
}
