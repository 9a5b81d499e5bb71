//! Type references and classification.
//!
//! Every declared field type resolves to exactly one [`TypeKind`]. A
//! [`TypeRef`] bundles that classification with the type's fully-qualified
//! name, the element type for collections, and, for composites, a field
//! provider the metadata cache invokes to discover field descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::reflect::{FieldDescriptor, Reflect};

/// The four mutually exclusive classifications a declared type can have.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    /// Value-like, compared by value equality, never recursed into.
    Scalar,
    /// Named-field aggregate, recursively diffed field by field.
    Composite,
    /// Ordered finite sequence; the element type is classified separately.
    Collection,
    /// Anything the engine cannot model (callables, raw references, ...).
    Unsupported,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => write!(f, "scalar"),
            Self::Composite => write!(f, "composite"),
            Self::Collection => write!(f, "collection"),
            Self::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// A reference to a declared type: name, classification, and (depending on
/// the kind) the collection element type or the composite field provider.
#[derive(Clone)]
pub struct TypeRef {
    name: String,
    kind: TypeKind,
    element: Option<Box<TypeRef>>,
    fields_fn: Option<fn() -> Vec<FieldDescriptor>>,
}

impl TypeRef {
    /// A scalar type, named after `T`.
    pub fn scalar<T>() -> Self {
        Self::scalar_named(std::any::type_name::<T>())
    }

    /// A scalar type with an explicit fully-qualified name.
    pub fn scalar_named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Scalar,
            element: None,
            fields_fn: None,
        }
    }

    /// A composite type described by its [`Reflect`] implementation.
    pub fn composite<T: Reflect>() -> Self {
        Self {
            name: T::type_name().to_string(),
            kind: TypeKind::Composite,
            element: None,
            fields_fn: Some(T::fields),
        }
    }

    /// A collection whose element type is known.
    pub fn collection(element: TypeRef) -> Self {
        Self {
            name: format!("Vec<{}>", element.name),
            kind: TypeKind::Collection,
            element: Some(Box::new(element)),
            fields_fn: None,
        }
    }

    /// A sequence whose element type cannot be resolved. Fields declared
    /// with this type land in a delta's unsupported list.
    pub fn opaque_collection() -> Self {
        Self {
            name: "Vec<?>".to_string(),
            kind: TypeKind::Collection,
            element: None,
            fields_fn: None,
        }
    }

    /// A type the engine cannot classify at all.
    pub fn unsupported(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Unsupported,
            element: None,
            fields_fn: None,
        }
    }

    /// Fully-qualified name of the referenced type.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Classification of the referenced type.
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Element type of a collection, or `None` when this is not a
    /// collection or the element type is unknown.
    pub fn element(&self) -> Option<&TypeRef> {
        self.element.as_deref()
    }

    /// Run field discovery for a composite type. Returns `None` for
    /// non-composite references. Each call re-runs discovery; callers that
    /// care about cost go through the engine's metadata cache.
    pub fn discover_fields(&self) -> Option<Vec<FieldDescriptor>> {
        self.fields_fn.map(|f| f())
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRef")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}
