//! Foundation types for ODL, the object delta library.
//!
//! This crate holds the dynamic value model and the introspection facility
//! the comparison engine in `odl-diff` is built on. It performs no I/O and
//! has no engine logic of its own.
//!
//! # Key Types
//!
//! - [`Value`] / [`CompositeValue`] — Dynamic snapshots of runtime values
//! - [`ScalarValue`] — The leaf domain: numerics, strings, dates, UUIDs, ...
//! - [`TypeRef`] / [`TypeKind`] — Declared-type references and their
//!   four-way classification
//! - [`Reflect`] / [`FieldDescriptor`] — The introspection seam domain
//!   types implement, with ignore/key field markers

pub mod reflect;
pub mod scalar;
pub mod typeref;
pub mod value;

pub use reflect::{FieldDescriptor, Reflect};
pub use scalar::ScalarValue;
pub use typeref::{TypeKind, TypeRef};
pub use value::{CompositeValue, Value};
