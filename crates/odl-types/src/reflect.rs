//! The introspection seam between domain types and the delta engine.
//!
//! The engine never inspects a domain type directly. A type opts in by
//! implementing [`Reflect`]: it names itself, describes its fields in
//! declaration order, and snapshots instances into [`Value`] trees. The
//! ignore and key markers that would be attributes in an annotation-based
//! language are carried on [`FieldDescriptor`] and queried by the engine's
//! metadata cache.

use crate::typeref::TypeRef;
use crate::value::Value;

/// Describes a type's shape to the delta engine and snapshots its
/// instances.
///
/// Implementations list fields in declaration order; that order is the
/// order the engine walks them in and the order ignored/unsupported field
/// names are reported in.
pub trait Reflect {
    /// Fully-qualified display name of this type. The default is the
    /// compiler's canonical name.
    fn type_name() -> &'static str
    where
        Self: Sized,
    {
        std::any::type_name::<Self>()
    }

    /// Field descriptors, in declaration order. This is discovery: it runs
    /// once per type when metadata caching is enabled, and on every
    /// comparison when it is disabled.
    fn fields() -> Vec<FieldDescriptor>
    where
        Self: Sized;

    /// Snapshot this instance into a dynamic value.
    fn to_value(&self) -> Value;
}

/// Cached, read-only description of a single field.
#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    name: &'static str,
    declared: TypeRef,
    ignored: bool,
    is_key: bool,
}

impl FieldDescriptor {
    /// Describe a field by name and declared type.
    pub fn new(name: &'static str, declared: TypeRef) -> Self {
        Self {
            name,
            declared,
            ignored: false,
            is_key: false,
        }
    }

    /// Mark this field as excluded from comparison.
    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Mark this field as part of the owning type's identity key. Only
    /// scalar fields may carry this marker; the engine validates it the
    /// first time the type's fields are used for reconciliation.
    pub fn key(mut self) -> Self {
        self.is_key = true;
        self
    }

    /// Field name.
    pub fn name(&self) -> &str {
        self.name
    }

    /// Declared type of the field.
    pub fn declared(&self) -> &TypeRef {
        &self.declared
    }

    /// Whether the ignore marker is present.
    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    /// Whether the key marker is present.
    pub fn is_key(&self) -> bool {
        self.is_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::CompositeValue;

    struct Tag {
        label: String,
    }

    impl Reflect for Tag {
        fn fields() -> Vec<FieldDescriptor> {
            vec![FieldDescriptor::new("label", TypeRef::scalar::<String>())]
        }

        fn to_value(&self) -> Value {
            CompositeValue::new(Self::type_name())
                .with_field("label", self.label.as_str())
                .into()
        }
    }

    #[test]
    fn default_type_name_is_canonical() {
        assert!(Tag::type_name().ends_with("::Tag"));
    }

    #[test]
    fn markers_default_off() {
        let fd = FieldDescriptor::new("label", TypeRef::scalar::<String>());
        assert!(!fd.is_ignored());
        assert!(!fd.is_key());
    }

    #[test]
    fn markers_are_independent() {
        let fd = FieldDescriptor::new("id", TypeRef::scalar::<u64>()).key();
        assert!(fd.is_key());
        assert!(!fd.is_ignored());

        let fd = FieldDescriptor::new("notes", TypeRef::scalar::<String>()).ignored();
        assert!(fd.is_ignored());
        assert!(!fd.is_key());
    }

    #[test]
    fn snapshot_carries_type_name() {
        let tag = Tag {
            label: "alpha".to_string(),
        };
        match tag.to_value() {
            Value::Composite(c) => {
                assert_eq!(c.type_name(), Tag::type_name());
                assert_eq!(c.get("label"), Some(&Value::from("alpha")));
            }
            other => panic!("expected composite, got {other:?}"),
        }
    }
}
