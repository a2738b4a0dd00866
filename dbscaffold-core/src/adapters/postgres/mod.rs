//! PostgreSQL schema source.
//!
//! Tables are read from the `public` schema of the connected database.
//!
//! # Module Structure
//! - `connection`: Pool creation and session settings
//! - `type_mapping`: PostgreSQL type table and classification rules
//! - `schema_collection`: Table, constraint and column metadata queries

mod connection;
mod schema_collection;
mod type_mapping;


use super::{ClassificationRules, ConnectionConfig, SchemaSource, TypeMapper};
use crate::Result;
use crate::models::{Backend, RawColumn, TableConstraints};
use async_trait::async_trait;
use sqlx::PgPool;

pub use connection::DEFAULT_POSTGRES_PORT;
pub use schema_collection::normalize_postgres_default;
pub use type_mapping::{POSTGRES_TYPES, postgres_rules, postgres_type_mapper};

/// Schema searched for tables
pub const PUBLIC_SCHEMA: &str = "public";

/// PostgreSQL schema source holding a single pooled connection
pub struct PostgresSource {
    pub pool: PgPool,
    pub config: ConnectionConfig,
    type_mapper: TypeMapper,
}

impl std::fmt::Debug for PostgresSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresSource")
            .field("config", &self.config)
            .field("pool_size", &self.pool.size())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SchemaSource for PostgresSource {
    fn backend(&self) -> Backend {
        Backend::Postgres
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        schema_collection::list_tables(&self.pool).await
    }

    async fn discover_constraints(&self, table: &str) -> Result<TableConstraints> {
        schema_collection::discover_constraints(&self.pool, table).await
    }

    async fn discover_columns(&self, table: &str) -> Result<Vec<RawColumn>> {
        schema_collection::discover_columns(&self.pool, table).await
    }

    fn type_mapper(&self) -> &TypeMapper {
        &self.type_mapper
    }

    fn rules(&self) -> ClassificationRules {
        postgres_rules()
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
