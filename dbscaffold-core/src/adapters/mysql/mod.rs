//! MySQL schema source.
//!
//! # Module Structure
//! - `connection`: Connection string normalization and pool creation
//! - `type_mapping`: MySQL type table and classification rules
//! - `schema_collection`: Table, constraint and column metadata queries

pub mod connection;
pub mod schema_collection;
pub mod type_mapping;


use super::{ClassificationRules, ConnectionConfig, SchemaSource, TypeMapper};
use crate::Result;
use crate::models::{Backend, RawColumn, TableConstraints};
use async_trait::async_trait;
use sqlx::MySqlPool;

pub use connection::normalize_mysql_dsn;
pub use type_mapping::{mysql_rules, mysql_type_mapper};

/// MySQL schema source holding a single pooled connection
pub struct MySqlSource {
    pub pool: MySqlPool,
    pub config: ConnectionConfig,
    type_mapper: TypeMapper,
}

impl std::fmt::Debug for MySqlSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlSource")
            .field("config", &self.config)
            .field("pool_size", &self.pool.size())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SchemaSource for MySqlSource {
    fn backend(&self) -> Backend {
        Backend::MySql
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
        mysql_rules()
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
