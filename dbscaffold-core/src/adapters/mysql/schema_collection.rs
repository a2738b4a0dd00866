//! MySQL metadata queries.
//!
//! All text columns are cast to CHAR to avoid VARBINARY decoding issues in
//! MySQL 8.0+ INFORMATION_SCHEMA views.

use crate::Result;
use crate::adapters::helpers::{RowExt, is_nullable_flag, query_error};
use crate::models::{ConstraintRow, RawColumn, TableConstraints};
use sqlx::MySqlPool;

/// Tables owned by migration tooling, never generated
pub const RESERVED_TABLES: &[&str] = &["migrations"];

/// Marker MySQL 8 prefixes to `EXTRA` for expression defaults
const DEFAULT_GENERATED: &str = "DEFAULT_GENERATED";

/// Lists base tables of the current database, excluding reserved ones
pub(crate) async fn list_tables(pool: &MySqlPool) -> Result<Vec<String>> {
    let tables_query = r#"
        SELECT CAST(TABLE_NAME AS CHAR) AS table_name
        FROM INFORMATION_SCHEMA.TABLES
        WHERE TABLE_SCHEMA = DATABASE()
          AND TABLE_TYPE = 'BASE TABLE'
        ORDER BY TABLE_NAME
    "#;

    let rows = sqlx::query(tables_query)
        .fetch_all(pool)
        .await
        .map_err(|e| query_error("INFORMATION_SCHEMA.TABLES", None, e))?;

    let mut tables = Vec::with_capacity(rows.len());
    for row in &rows {
        let name: String = row.get_field("table_name", None)?;
        if RESERVED_TABLES.contains(&name.as_str()) {
            tracing::debug!("Skipping reserved table '{}'", name);
            continue;
        }
        tables.push(name);
    }

    tracing::debug!("Found {} MySQL tables", tables.len());
    Ok(tables)
}

/// Collects primary, unique and foreign key rows of a table
pub(crate) async fn discover_constraints(pool: &MySqlPool, table: &str) -> Result<TableConstraints> {
    let constraints_query = r#"
        SELECT
            CAST(c.CONSTRAINT_NAME AS CHAR) AS constraint_name,
            CAST(c.CONSTRAINT_TYPE AS CHAR) AS constraint_type,
            CAST(u.COLUMN_NAME AS CHAR) AS column_name,
            CAST(COALESCE(u.REFERENCED_TABLE_SCHEMA, '') AS CHAR) AS referenced_schema,
            CAST(COALESCE(u.REFERENCED_TABLE_NAME, '') AS CHAR) AS referenced_table,
            CAST(COALESCE(u.REFERENCED_COLUMN_NAME, '') AS CHAR) AS referenced_column,
            CAST(u.ORDINAL_POSITION AS SIGNED) AS ordinal_position
        FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS c
        INNER JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE u
            ON c.CONSTRAINT_NAME = u.CONSTRAINT_NAME
            AND c.TABLE_SCHEMA = u.TABLE_SCHEMA
            AND c.TABLE_NAME = u.TABLE_NAME
        WHERE c.TABLE_SCHEMA = DATABASE()
          AND c.TABLE_NAME = ?
        ORDER BY c.CONSTRAINT_TYPE, c.CONSTRAINT_NAME, u.ORDINAL_POSITION
    "#;

    let rows = sqlx::query(constraints_query)
        .bind(table)
        .fetch_all(pool)
        .await
        .map_err(|e| query_error("INFORMATION_SCHEMA.TABLE_CONSTRAINTS", Some(table), e))?;

    let mut constraint_rows = Vec::with_capacity(rows.len());
    for row in &rows {
        constraint_rows.push(ConstraintRow {
            constraint_name: row.get_field("constraint_name", Some(table))?,
            constraint_type: row.get_field("constraint_type", Some(table))?,
            column_name: row.get_field("column_name", Some(table))?,
            referenced_schema: row.get_field("referenced_schema", Some(table))?,
            referenced_table: row.get_field("referenced_table", Some(table))?,
            referenced_column: row.get_field("referenced_column", Some(table))?,
            ordinal_position: row.get_field("ordinal_position", Some(table))?,
        });
    }

    Ok(TableConstraints::from_rows(constraint_rows))
}

/// Collects the columns of a table in ordinal order
pub(crate) async fn discover_columns(pool: &MySqlPool, table: &str) -> Result<Vec<RawColumn>> {
    let columns_query = r#"
        SELECT
            CAST(COLUMN_NAME AS CHAR) AS column_name,
            CAST(DATA_TYPE AS CHAR) AS data_type,
            CAST(COLUMN_TYPE AS CHAR) AS column_type,
            CAST(IS_NULLABLE AS CHAR) AS is_nullable,
            CAST(COLUMN_DEFAULT AS CHAR) AS column_default,
            CAST(EXTRA AS CHAR) AS extra
        FROM INFORMATION_SCHEMA.COLUMNS
        WHERE TABLE_SCHEMA = DATABASE()
          AND TABLE_NAME = ?
        ORDER BY ORDINAL_POSITION
    "#;

    let rows = sqlx::query(columns_query)
        .bind(table)
        .fetch_all(pool)
        .await
        .map_err(|e| query_error("INFORMATION_SCHEMA.COLUMNS", Some(table), e))?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in &rows {
        let is_nullable: String = row.get_field("is_nullable", Some(table))?;
        let extra: String = row.get_field("extra", Some(table))?;

        columns.push(RawColumn {
            name: row.get_field("column_name", Some(table))?,
            data_type: row.get_field::<String>("data_type", Some(table))?.to_lowercase(),
            column_type: row.get_field::<String>("column_type", Some(table))?.to_lowercase(),
            is_nullable: is_nullable_flag(&is_nullable),
            default_value: row.get_field("column_default", Some(table))?,
            extra: normalize_extra(&extra),
        });
    }

    tracing::debug!("Found {} columns in MySQL table '{}'", columns.len(), table);
    Ok(columns)
}

/// Drops the MySQL 8 `DEFAULT_GENERATED` marker so `EXTRA` reads the same
/// across server versions.
pub fn normalize_extra(extra: &str) -> String {
    let trimmed = extra.trim();
    trimmed
        .strip_prefix(DEFAULT_GENERATED)
        .map_or(trimmed, str::trim_start)
        .to_string()
}
