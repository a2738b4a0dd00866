//! Schema source traits and registry for backend-independent introspection.
//!
//! Every backend implements [`SchemaSource`]; the rest of the pipeline only
//! ever talks to `Box<dyn SchemaSource>`. Backend differences that matter to
//! column classification are carried as data in [`ClassificationRules`]
//! instead of being branched on by name.
//!
//! # Module Structure
//! - `config`: Connection configuration parsed from connection strings
//! - `helpers`: Shared row decoding utilities
//! - `rules`: Per-backend type families and behaviour switches
//! - `type_mapper`: Native type to target type lookup tables
//! - Backend modules (`mysql`, `postgres`) behind cargo features

use crate::Result;
use crate::models::{Backend, RawColumn, TableConstraints};
use async_trait::async_trait;

pub mod config;
pub mod rules;
pub mod type_mapper;

pub use config::ConnectionConfig;
pub use rules::ClassificationRules;
pub use type_mapper::TypeMapper;

/// Read-only access to the metadata of one database.
///
/// # Object Safety
/// This trait is object-safe, allowing for dynamic dispatch through
/// `Box<dyn SchemaSource>`.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// Returns the backend this source reads from.
    fn backend(&self) -> Backend;

    /// Lists the base tables of the current database in name order.
    ///
    /// # Errors
    /// Returns `SchemaQuery` if the metadata query fails
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Collects primary, unique and foreign key constraints of a table.
    ///
    /// # Errors
    /// Returns `SchemaQuery` if the metadata query or row decoding fails
    async fn discover_constraints(&self, table: &str) -> Result<TableConstraints>;

    /// Collects the raw columns of a table in ordinal order.
    ///
    /// # Errors
    /// Returns `SchemaQuery` if the metadata query or row decoding fails
    async fn discover_columns(&self, table: &str) -> Result<Vec<RawColumn>>;

    /// Native to target type table of this backend.
    fn type_mapper(&self) -> &TypeMapper;

    /// Classification rules of this backend.
    fn rules(&self) -> ClassificationRules;

    /// Releases the underlying connection.
    async fn close(&self);
}

/// Opens a schema source for the given backend.
///
/// Adding a backend means implementing [`SchemaSource`] and adding one arm
/// here.
///
/// # Errors
/// Returns error if:
/// - The backend is not supported or not compiled in (`UnsupportedDriver`)
/// - The connection string is invalid (`Configuration`)
/// - The database cannot be reached (`Connection`)
pub async fn open_source(
    backend: Backend,
    connection_string: &str,
) -> Result<Box<dyn SchemaSource>> {
    tracing::debug!(
        "Opening {} schema source at {}",
        backend,
        crate::error::redact_database_url(connection_string)
    );

    match backend {
        #[cfg(feature = "mysql")]
        Backend::MySql => {
            let source = mysql::MySqlSource::connect(connection_string).await?;
            Ok(Box::new(source))
        }
        #[cfg(not(feature = "mysql"))]
        Backend::MySql => Err(crate::error::ScaffoldError::unsupported_driver(
            "mysql (compile with --features mysql)",
        )),
        #[cfg(feature = "postgresql")]
        Backend::Postgres => {
            let source = postgres::PostgresSource::connect(connection_string).await?;
            Ok(Box::new(source))
        }
        #[cfg(not(feature = "postgresql"))]
        Backend::Postgres => Err(crate::error::ScaffoldError::unsupported_driver(
            "postgres (compile with --features postgresql)",
        )),
        Backend::Sqlite => Err(crate::error::ScaffoldError::unsupported_driver(
            Backend::Sqlite.key(),
        )),
    }
}

// Shared helper utilities
#[cfg(any(feature = "mysql", feature = "postgresql"))]
pub mod helpers;

#[cfg(feature = "postgresql")]
pub mod postgres;

#[cfg(feature = "mysql")]
pub mod mysql;
