//! Native column type to target primitive lookup.

use crate::Result;
use crate::error::ScaffoldError;
use crate::models::Backend;
use std::collections::HashMap;

/// Fully enumerated mapping from native type names to target primitives.
///
/// There is no inference: a type missing from the table is an error.
///
/// # Example
/// ```rust
/// use dbscaffold_core::adapters::TypeMapper;
/// use dbscaffold_core::models::Backend;
///
/// let mapper = TypeMapper::new(Backend::MySql, [("int", "int"), ("int unsigned", "uint")]);
/// assert_eq!(mapper.map("int").unwrap(), "int");
/// assert_eq!(mapper.map_unsigned("int").unwrap(), "uint");
/// assert!(mapper.map("geometry").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct TypeMapper {
    backend: Backend,
    entries: HashMap<String, String>,
}

impl TypeMapper {
    pub fn new<I, K, V>(backend: Backend, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            backend,
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Maps a native type name to its target primitive.
    ///
    /// # Errors
    /// Returns `UnsupportedType` if the name has no entry
    pub fn map(&self, native_type: &str) -> Result<String> {
        self.entries
            .get(native_type)
            .cloned()
            .ok_or_else(|| ScaffoldError::unsupported_type(self.backend.to_string(), native_type))
    }

    /// Maps the unsigned variant of a native integer type.
    ///
    /// # Errors
    /// Returns `UnsupportedType` if `"<native_type> unsigned"` has no entry
    pub fn map_unsigned(&self, native_type: &str) -> Result<String> {
        self.map(&format!("{} unsigned", native_type))
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
