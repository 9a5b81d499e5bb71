//! Engine configuration.

use std::fmt;
use std::sync::Arc;

use crate::equality::TypeComparer;

/// Configuration accepted at engine construction.
///
/// `include_type_mappings` is reserved: the core algorithm never reads it,
/// it is only forwarded for caller-side reporting.
pub struct CompareOptions {
    /// Disable the field-metadata cache; discovery then repeats on every
    /// comparison of a type.
    pub disable_field_cache: bool,
    /// Reserved. Forwarded for caller-side reporting only.
    pub include_type_mappings: bool,
    /// Type-scoped equality overrides, keyed by the fully-qualified name
    /// each comparer targets. Registering two comparers for the same type
    /// is last-write-wins.
    pub custom_comparers: Vec<Arc<dyn TypeComparer>>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            disable_field_cache: false,
            include_type_mappings: false,
            custom_comparers: Vec::new(),
        }
    }
}

impl fmt::Debug for CompareOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let targets: Vec<&str> = self
            .custom_comparers
            .iter()
            .map(|c| c.type_name())
            .collect();
        f.debug_struct("CompareOptions")
            .field("disable_field_cache", &self.disable_field_cache)
            .field("include_type_mappings", &self.include_type_mappings)
            .field("custom_comparers", &targets)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use odl_types::Value;

    struct AlwaysEqual;

    impl TypeComparer for AlwaysEqual {
        fn type_name(&self) -> &str {
            "demo::Money"
        }

        fn is_equal(&self, _a: &Value, _b: &Value) -> bool {
            true
        }
    }

    #[test]
    fn defaults() {
        let options = CompareOptions::default();
        assert!(!options.disable_field_cache);
        assert!(!options.include_type_mappings);
        assert!(options.custom_comparers.is_empty());
    }

    #[test]
    fn debug_lists_comparer_targets() {
        let options = CompareOptions {
            custom_comparers: vec![Arc::new(AlwaysEqual)],
            ..Default::default()
        };
        let rendered = format!("{options:?}");
        assert!(rendered.contains("demo::Money"), "got: {rendered}");
    }
}
