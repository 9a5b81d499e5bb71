//! Error types for the delta engine.

use odl_types::TypeKind;

/// Errors that can occur during a comparison.
///
/// All of these are fatal to the call that raised them: a failing
/// comparison yields no delta at all, never a partial one. Unclassifiable
/// fields are deliberately not an error; they degrade into a delta's
/// unsupported-field list.
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    /// Two present values of different runtime types were compared.
    #[error("cannot compare values of different types: {left} vs {right}")]
    TypeMismatch { left: String, right: String },

    /// The effective root type is not composite; scalar or collection
    /// roots must be wrapped by the caller.
    #[error("cannot compare values of non-composite type {type_name} ({kind})")]
    UnsupportedRoot { type_name: String, kind: TypeKind },

    /// A key marker was declared on a non-scalar field. Raised the first
    /// time the type's fields are used for reconciliation.
    #[error("key marker is not supported for field {field} of {type_name}: declared type is {kind}")]
    InvalidKeyField {
        type_name: String,
        field: String,
        kind: TypeKind,
    },

    /// The field-metadata cache lock was poisoned by a panicking thread.
    #[error("field metadata cache poisoned: {0}")]
    CachePoisoned(String),
}

/// Convenience alias for comparison results.
pub type CompareResult<T> = Result<T, CompareError>;
