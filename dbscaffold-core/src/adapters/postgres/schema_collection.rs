//! PostgreSQL metadata queries.
//!
//! Identifier and type columns are cast to `text` so they decode as
//! `String` regardless of the `information_schema` domain types.

use super::PUBLIC_SCHEMA;
use crate::Result;
use crate::adapters::helpers::{RowExt, is_nullable_flag, query_error};
use crate::models::{ConstraintRow, RawColumn, TableConstraints};
use sqlx::PgPool;

/// Prefix of defaults drawn from a sequence
const SEQUENCE_DEFAULT_PREFIX: &str = "nextval(";

/// Lists base tables of the public schema of the current database
pub(crate) async fn list_tables(pool: &PgPool) -> Result<Vec<String>> {
    let tables_query = r#"
        SELECT table_name::text AS table_name
        FROM information_schema.tables
        WHERE table_catalog = current_database()
          AND table_schema = $1
          AND table_type = 'BASE TABLE'
        ORDER BY table_name
    "#;

    let rows = sqlx::query(tables_query)
        .bind(PUBLIC_SCHEMA)
        .fetch_all(pool)
        .await
        .map_err(|e| query_error("information_schema.tables", None, e))?;

    let mut tables = Vec::with_capacity(rows.len());
    for row in &rows {
        tables.push(row.get_field("table_name", None)?);
    }

    tracing::debug!("Found {} PostgreSQL tables", tables.len());
    Ok(tables)
}

/// Collects primary, unique and foreign key rows of a table
pub(crate) async fn discover_constraints(pool: &PgPool, table: &str) -> Result<TableConstraints> {
    let constraints_query = r#"
        SELECT
            c.constraint_name::text AS constraint_name,
            c.constraint_type::text AS constraint_type,
            u.column_name::text AS column_name,
            COALESCE(cu.table_schema::text, '') AS referenced_schema,
            COALESCE(cu.table_name::text, '') AS referenced_table,
            COALESCE(cu.column_name::text, '') AS referenced_column,
            u.ordinal_position::integer AS ordinal_position
        FROM information_schema.table_constraints c
        INNER JOIN information_schema.key_column_usage u
            ON c.constraint_name = u.constraint_name
            AND c.constraint_schema = u.constraint_schema
            AND c.table_name = u.table_name
        LEFT JOIN information_schema.constraint_column_usage cu
            ON c.constraint_type = 'FOREIGN KEY'
            AND cu.constraint_name = c.constraint_name
            AND cu.constraint_schema = c.constraint_schema
        WHERE c.table_catalog = current_database()
          AND c.table_schema = $1
          AND c.table_name = $2
        ORDER BY c.constraint_type, c.constraint_name, u.ordinal_position
    "#;

    let rows = sqlx::query(constraints_query)
        .bind(PUBLIC_SCHEMA)
        .bind(table)
        .fetch_all(pool)
        .await
        .map_err(|e| query_error("information_schema.table_constraints", Some(table), e))?;

    let mut constraint_rows = Vec::with_capacity(rows.len());
    for row in &rows {
        let ordinal_position: i32 = row.get_field("ordinal_position", Some(table))?;
        constraint_rows.push(ConstraintRow {
            constraint_name: row.get_field("constraint_name", Some(table))?,
            constraint_type: row.get_field("constraint_type", Some(table))?,
            column_name: row.get_field("column_name", Some(table))?,
            referenced_schema: row.get_field("referenced_schema", Some(table))?,
            referenced_table: row.get_field("referenced_table", Some(table))?,
            referenced_column: row.get_field("referenced_column", Some(table))?,
            ordinal_position: i64::from(ordinal_position),
        });
    }

    Ok(TableConstraints::from_rows(constraint_rows))
}

/// Collects the columns of a table in ordinal order.
///
/// The full type string is synthesized from the length and precision
/// columns, and serial or identity columns report `auto_increment`.
pub(crate) async fn discover_columns(pool: &PgPool, table: &str) -> Result<Vec<RawColumn>> {
    let columns_query = r#"
        SELECT
            column_name::text AS column_name,
            data_type::text AS data_type,
            (data_type ||
                CASE
                    WHEN data_type IN ('character varying', 'character')
                        AND character_maximum_length IS NOT NULL
                        THEN '(' || character_maximum_length || ')'
                    WHEN data_type = 'numeric' AND numeric_precision IS NOT NULL
                        THEN '(' || numeric_precision || ',' || COALESCE(numeric_scale, 0) || ')'
                    ELSE ''
                END)::text AS column_type,
            is_nullable::text AS is_nullable,
            column_default::text AS column_default,
            (CASE
                WHEN column_default LIKE 'nextval(%' OR is_identity = 'YES' THEN 'auto_increment'
                ELSE ''
            END)::text AS extra
        FROM information_schema.columns
        WHERE table_catalog = current_database()
          AND table_schema = $1
          AND table_name = $2
        ORDER BY ordinal_position
    "#;

    let rows = sqlx::query(columns_query)
        .bind(PUBLIC_SCHEMA)
        .bind(table)
        .fetch_all(pool)
        .await
        .map_err(|e| query_error("information_schema.columns", Some(table), e))?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in &rows {
        let is_nullable: String = row.get_field("is_nullable", Some(table))?;
        let default_value: Option<String> = row.get_field("column_default", Some(table))?;

        columns.push(RawColumn {
            name: row.get_field("column_name", Some(table))?,
            data_type: row.get_field("data_type", Some(table))?,
            column_type: row.get_field("column_type", Some(table))?,
            is_nullable: is_nullable_flag(&is_nullable),
            default_value: default_value.as_deref().map(normalize_postgres_default),
            extra: row.get_field("extra", Some(table))?,
        });
    }

    tracing::debug!(
        "Found {} columns in PostgreSQL table '{}'",
        columns.len(),
        table
    );
    Ok(columns)
}

/// Reduces a PostgreSQL default expression to its literal value.
///
/// Quoted literals lose their quotes and type cast; other expressions lose
/// a trailing `::type` cast. Sequence defaults are kept verbatim.
///
/// # Example
/// ```rust
/// use dbscaffold_core::adapters::postgres::normalize_postgres_default;
///
/// assert_eq!(normalize_postgres_default("'draft'::character varying"), "draft");
/// assert_eq!(normalize_postgres_default("now()"), "now()");
/// ```
pub fn normalize_postgres_default(raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with(SEQUENCE_DEFAULT_PREFIX) {
        return raw.to_string();
    }

    if let Some(quoted) = raw.strip_prefix('\'') {
        let mut literal = String::new();
        let mut chars = quoted.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    literal.push('\'');
                    chars.next();
                } else {
                    return literal;
                }
            } else {
                literal.push(c);
            }
        }
        // Unterminated quote, keep what was read
        return literal;
    }

    match raw.split_once("::") {
        Some((value, _cast)) => value.trim().to_string(),
        None => raw.to_string(),
    }
}
