//! Dynamic values: the snapshot a reflected instance produces.
//!
//! The comparison engine never touches domain objects directly. A type's
//! [`Reflect`](crate::Reflect) implementation snapshots the instance into a
//! [`Value`] tree, and all field reads and equality checks happen on that
//! tree. Absence is explicit: `None` options and every field of an absent
//! container fold to [`Value::Null`].

use serde::{Deserialize, Serialize};

use crate::scalar::ScalarValue;

/// A dynamic snapshot of a runtime value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Absence: a `None` option, or any field of an absent container.
    #[default]
    Null,
    /// A leaf value compared by value equality.
    Scalar(ScalarValue),
    /// A named-field aggregate.
    Composite(CompositeValue),
    /// An ordered finite sequence of element snapshots.
    Collection(Vec<Value>),
}

impl Value {
    /// Returns `true` if this value is absent.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Build a collection value from element snapshots.
    pub fn collection(items: impl IntoIterator<Item = Value>) -> Self {
        Self::Collection(items.into_iter().collect())
    }

    /// Fully-qualified runtime type name, when the value carries one.
    ///
    /// `Null` has no type, and a bare sequence has no single name the
    /// comparer registry could key on.
    pub fn runtime_type_name(&self) -> Option<&str> {
        match self {
            Self::Null | Self::Collection(_) => None,
            Self::Scalar(s) => Some(s.type_name()),
            Self::Composite(c) => Some(c.type_name()),
        }
    }
}

impl From<ScalarValue> for Value {
    fn from(v: ScalarValue) -> Self {
        Self::Scalar(v)
    }
}

impl From<CompositeValue> for Value {
    fn from(v: CompositeValue) -> Self {
        Self::Composite(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Collection(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

macro_rules! value_from_scalar {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Self::Scalar(ScalarValue::from(v))
            }
        })*
    };
}

value_from_scalar!(
    bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, char, &str, String
);

value_from_scalar!(
    chrono::DateTime<chrono::Utc>,
    chrono::NaiveDate,
    uuid::Uuid,
    std::time::Duration
);

/// A named-field aggregate snapshot.
///
/// Fields keep their declaration order; [`CompositeValue::get`] is the
/// null-safe read accessor the engine uses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositeValue {
    type_name: String,
    fields: Vec<(String, Value)>,
}

impl CompositeValue {
    /// Create an empty composite snapshot for the given type name.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field snapshot, builder style.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Fully-qualified runtime type name of the snapshotted instance.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Read a field by name. A name this snapshot never recorded yields
    /// `None`; callers treat that the same as an absent container.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// All recorded fields, in declaration order.
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }
}
