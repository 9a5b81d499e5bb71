//! Scalar values: the leaf domain of the value model.
//!
//! A scalar is any value-like type that is compared by value equality and
//! never recursed into: numerics, booleans, characters and strings, dates
//! and timestamps, UUIDs, durations, and user-defined copy-semantics types
//! (see [`ScalarValue::Opaque`]).

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single scalar value together with its runtime type identity.
///
/// Integral values normalize to the widest lane of their signedness
/// (`i64` / `u64`), and floats to `f64`. The runtime type name reported by
/// [`ScalarValue::type_name`] reflects that normalization; custom comparers
/// targeting integer or float scalars should register against the widened
/// names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ScalarValue {
    /// Boolean.
    Bool(bool),
    /// Signed integer (all signed widths widen to `i64`).
    Int(i64),
    /// Unsigned integer (all unsigned widths widen to `u64`).
    UInt(u64),
    /// Floating point (`f32` widens to `f64`).
    Float(f64),
    /// Single character.
    Char(char),
    /// Owned string.
    Str(String),
    /// UTC timestamp.
    DateTime(DateTime<Utc>),
    /// Calendar date without a time component.
    Date(NaiveDate),
    /// UUID.
    Uuid(Uuid),
    /// Elapsed-time duration.
    Duration(Duration),
    /// A user-defined value type with copy semantics (a currency amount, a
    /// measurement, ...). Carries its own fully-qualified type name so
    /// custom comparers can target it, and a canonical textual
    /// representation used for default equality.
    Opaque { type_name: String, repr: String },
}

impl ScalarValue {
    /// Build an [`ScalarValue::Opaque`] scalar for the value type `T`,
    /// stamping `T`'s fully-qualified name.
    pub fn opaque<T>(repr: impl Into<String>) -> Self {
        Self::Opaque {
            type_name: std::any::type_name::<T>().to_string(),
            repr: repr.into(),
        }
    }

    /// Fully-qualified runtime type name of this value.
    ///
    /// This is the identity custom comparers are keyed by.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Bool(_) => std::any::type_name::<bool>(),
            Self::Int(_) => std::any::type_name::<i64>(),
            Self::UInt(_) => std::any::type_name::<u64>(),
            Self::Float(_) => std::any::type_name::<f64>(),
            Self::Char(_) => std::any::type_name::<char>(),
            Self::Str(_) => std::any::type_name::<String>(),
            Self::DateTime(_) => std::any::type_name::<DateTime<Utc>>(),
            Self::Date(_) => std::any::type_name::<NaiveDate>(),
            Self::Uuid(_) => std::any::type_name::<Uuid>(),
            Self::Duration(_) => std::any::type_name::<Duration>(),
            Self::Opaque { type_name, .. } => type_name,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Char(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
            Self::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            Self::Date(v) => write!(f, "{v}"),
            Self::Uuid(v) => write!(f, "{v}"),
            Self::Duration(v) => write!(f, "{v:?}"),
            Self::Opaque { repr, .. } => write!(f, "{repr}"),
        }
    }
}

macro_rules! scalar_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for ScalarValue {
            fn from(v: $t) -> Self {
                Self::Int(v as i64)
            }
        })*
    };
}

macro_rules! scalar_from_uint {
    ($($t:ty),*) => {
        $(impl From<$t> for ScalarValue {
            fn from(v: $t) -> Self {
                Self::UInt(v as u64)
            }
        })*
    };
}

scalar_from_int!(i8, i16, i32, i64);
scalar_from_uint!(u8, u16, u32, u64);

impl From<bool> for ScalarValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f32> for ScalarValue {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for ScalarValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<char> for ScalarValue {
    fn from(v: char) -> Self {
        Self::Char(v)
    }
}

impl From<&str> for ScalarValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<DateTime<Utc>> for ScalarValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::DateTime(v)
    }
}

impl From<NaiveDate> for ScalarValue {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<Uuid> for ScalarValue {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl From<Duration> for ScalarValue {
    fn from(v: Duration) -> Self {
        Self::Duration(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_widths_widen() {
        assert_eq!(ScalarValue::from(7i8), ScalarValue::Int(7));
        assert_eq!(ScalarValue::from(7i32), ScalarValue::Int(7));
        assert_eq!(ScalarValue::from(7u16), ScalarValue::UInt(7));
        assert_eq!(ScalarValue::from(7u64), ScalarValue::UInt(7));
    }

    #[test]
    fn widened_type_names() {
        assert_eq!(ScalarValue::from(1i32).type_name(), "i64");
        assert_eq!(ScalarValue::from(1u8).type_name(), "u64");
        assert_eq!(ScalarValue::from(1.5f32).type_name(), "f64");
    }

    #[test]
    fn string_type_name_is_fully_qualified() {
        let v = ScalarValue::from("hello");
        assert_eq!(v.type_name(), std::any::type_name::<String>());
    }

    #[test]
    fn opaque_stamps_the_target_type() {
        struct Money;
        let v = ScalarValue::opaque::<Money>("12.50 USD");
        assert!(v.type_name().ends_with("Money"));
        assert_eq!(v.to_string(), "12.50 USD");
    }

    #[test]
    fn signedness_distinguishes_values() {
        // An i64 and a u64 holding the same magnitude are different scalars.
        assert_ne!(ScalarValue::from(1i64), ScalarValue::from(1u64));
    }

    #[test]
    fn datetime_displays_rfc3339() {
        let ts = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let v = ScalarValue::from(ts);
        assert_eq!(v.to_string(), "2024-05-01T12:00:00+00:00");
    }

    #[test]
    fn serde_roundtrip() {
        let v = ScalarValue::from(Uuid::nil());
        let json = serde_json::to_string(&v).unwrap();
        let parsed: ScalarValue = serde_json::from_str(&json).unwrap();
        assert_eq!(v, parsed);
    }
}
