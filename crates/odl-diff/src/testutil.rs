//! Shared reflected model types for unit tests.

use odl_types::{CompositeValue, FieldDescriptor, Reflect, TypeRef, Value};

/// A composite with scalars, a nested optional composite, a scalar list,
/// and a composite list.
pub(crate) struct Order {
    pub reference: String,
    pub total_cents: i64,
    pub revision: u64,
    pub contact: Option<Contact>,
    pub tags: Vec<String>,
    pub lines: Vec<OrderLine>,
}

impl Reflect for Order {
    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("reference", TypeRef::scalar::<String>()),
            FieldDescriptor::new("total_cents", TypeRef::scalar::<i64>()),
            FieldDescriptor::new("revision", TypeRef::scalar::<u64>()),
            FieldDescriptor::new("contact", TypeRef::composite::<Contact>()),
            FieldDescriptor::new("tags", TypeRef::collection(TypeRef::scalar::<String>())),
            FieldDescriptor::new(
                "lines",
                TypeRef::collection(TypeRef::composite::<OrderLine>()),
            ),
        ]
    }

    fn to_value(&self) -> Value {
        CompositeValue::new(Self::type_name())
            .with_field("reference", self.reference.as_str())
            .with_field("total_cents", self.total_cents)
            .with_field("revision", self.revision)
            .with_field("contact", self.contact.as_ref().map(Reflect::to_value))
            .with_field(
                "tags",
                Value::collection(self.tags.iter().map(|t| Value::from(t.as_str()))),
            )
            .with_field(
                "lines",
                Value::collection(self.lines.iter().map(Reflect::to_value)),
            )
            .into()
    }
}

pub(crate) struct Contact {
    pub email: String,
    pub phone: Option<String>,
}

impl Reflect for Contact {
    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("email", TypeRef::scalar::<String>()),
            FieldDescriptor::new("phone", TypeRef::scalar::<String>()),
        ]
    }

    fn to_value(&self) -> Value {
        CompositeValue::new(Self::type_name())
            .with_field("email", self.email.as_str())
            .with_field("phone", self.phone.clone())
            .into()
    }
}

pub(crate) struct OrderLine {
    pub sku: String,
    pub quantity: u64,
}

impl Reflect for OrderLine {
    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("sku", TypeRef::scalar::<String>()).key(),
            FieldDescriptor::new("quantity", TypeRef::scalar::<u64>()),
        ]
    }

    fn to_value(&self) -> Value {
        CompositeValue::new(Self::type_name())
            .with_field("sku", self.sku.as_str())
            .with_field("quantity", self.quantity)
            .into()
    }
}

/// A composite with a declared key field, for key-based reconciliation.
pub(crate) struct Keyed {
    pub id: i64,
    pub label: String,
}

impl Reflect for Keyed {
    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("id", TypeRef::scalar::<i64>()).key(),
            FieldDescriptor::new("label", TypeRef::scalar::<String>()),
        ]
    }

    fn to_value(&self) -> Value {
        CompositeValue::new(Self::type_name())
            .with_field("id", self.id)
            .with_field("label", self.label.as_str())
            .into()
    }
}

/// A composite with no key fields, for positional reconciliation.
pub(crate) struct Unkeyed {
    pub label: String,
}

impl Reflect for Unkeyed {
    fn fields() -> Vec<FieldDescriptor> {
        vec![FieldDescriptor::new("label", TypeRef::scalar::<String>())]
    }

    fn to_value(&self) -> Value {
        CompositeValue::new(Self::type_name())
            .with_field("label", self.label.as_str())
            .into()
    }
}
