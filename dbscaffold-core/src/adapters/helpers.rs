//! Helper utilities for schema source implementations.
//!
//! Provides row decoding shared by the backends so every metadata decode
//! failure surfaces as the same `SchemaQuery` error shape.

use crate::{Result, error::ScaffoldError};
use sqlx::{ColumnIndex, Row};

/// Extension trait for extracting typed values from metadata rows
/// with consistent error handling.
///
/// # Example
/// ```rust,ignore
/// use dbscaffold_core::adapters::helpers::RowExt;
///
/// let name: String = row.get_field("column_name", Some("users"))?;
/// let default: Option<String> = row.get_field("column_default", Some("users"))?;
/// ```
pub trait RowExt: Row {
    /// Extracts a typed field from the row with proper error context.
    ///
    /// # Arguments
    /// * `field_name` - Name of the result column to extract
    /// * `table_context` - Optional table name for error messages
    fn get_field<'r, T>(&'r self, field_name: &str, table_context: Option<&str>) -> Result<T>
    where
        T: sqlx::Decode<'r, Self::Database> + sqlx::Type<Self::Database>,
        for<'a> &'a str: ColumnIndex<Self>,
    {
        self.try_get(field_name)
            .map_err(|e| ScaffoldError::parse_field(field_name, table_context, e))
    }
}

#[cfg(feature = "postgresql")]
impl RowExt for sqlx::postgres::PgRow {}

#[cfg(feature = "mysql")]
impl RowExt for sqlx::mysql::MySqlRow {}

/// Wraps a failed metadata query with the resource it targeted.
pub(crate) fn query_error(resource: &str, table: Option<&str>, error: sqlx::Error) -> ScaffoldError {
    let context = match table {
        Some(table) => format!("Failed to query {} for table '{}'", resource, table),
        None => format!("Failed to query {}", resource),
    };
    ScaffoldError::query_failed(context, error)
}

/// Returns true for metadata `IS_NULLABLE` values meaning nullable.
pub(crate) fn is_nullable_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("YES")
}
