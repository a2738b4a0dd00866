//! PostgreSQL type table and classification rules.
//!
//! Names are `information_schema.columns.data_type` values, which spell out
//! zone handling and report arrays and domains as `ARRAY`/`USER-DEFINED`.

use crate::adapters::{ClassificationRules, TypeMapper};
use crate::models::Backend;

/// PostgreSQL native type names and their target primitives.
pub const POSTGRES_TYPES: &[(&str, &str)] = &[
    // Serial pseudo types
    ("serial", "int"),
    ("big serial", "int64"),
    ("bigserial", "int64"),
    // Integers
    ("smallint", "int16"),
    ("integer", "int"),
    ("bigint", "int64"),
    ("boolean", "bool"),
    // Character
    ("char", "string"),
    ("character", "string"),
    ("character varying", "string"),
    ("varchar", "string"),
    ("text", "string"),
    // Temporal
    ("date", "time.Time"),
    ("time", "time.Time"),
    ("time without time zone", "time.Time"),
    ("time with time zone", "time.Time"),
    ("timestamp", "time.Time"),
    ("timestamp without time zone", "time.Time"),
    ("timestamp with time zone", "time.Time"),
    ("interval", "string"),
    // Floating and fixed point
    ("real", "float32"),
    ("double precision", "float64"),
    ("decimal", "float64"),
    ("numeric", "float64"),
    ("money", "float64"),
    // Opaque
    ("bytea", "string"),
    ("tsvector", "string"),
    ("ARRAY", "string"),
    ("USER-DEFINED", "string"),
    ("uuid", "string"),
    ("json", "string"),
    ("jsonb", "string"),
];

/// Builds the PostgreSQL type mapper.
pub fn postgres_type_mapper() -> TypeMapper {
    TypeMapper::new(Backend::Postgres, POSTGRES_TYPES.iter().copied())
}

/// PostgreSQL classification rules.
///
/// There are no unsigned integers; a current-timestamp default marks a
/// temporal column as set on insert.
pub fn postgres_rules() -> ClassificationRules {
    ClassificationRules {
        signed_integer_types: &[],
        string_types: &["char", "character", "character varying", "varchar"],
        temporal_types: &["date", "time", "timestamp"],
        temporal_prefixes: &["timestamp", "time "],
        decimal_types: &["decimal", "numeric"],
        binary_types: &[],
        bit_types: &[],
        opaque_types: &["interval", "uuid", "json", "jsonb"],
        unsigned_remap: false,
        auto_now_on_create: true,
    }
}
